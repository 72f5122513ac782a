//! Feature filtering primitives.

pub mod min_detection;
pub mod qc_presence;

pub use min_detection::{evaluate, Decision};
pub use qc_presence::{classify, QcClassification};

/// Intensity value Mass Profiler writes for a feature that was not
/// detected in a sample. Chosen upstream to be distinguishable from true
/// zero and from missing-data markers; overridable via `FilterConfig`.
pub const NOT_DETECTED: f64 = 0.001;

/// Round to a fixed number of decimal places, half away from zero.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
        assert_eq!(round_to(0.0014, 3), 0.001);
        assert_eq!(round_to(0.0015, 3), 0.002);
        assert_eq!(round_to(NOT_DETECTED, 3), NOT_DETECTED);
    }
}
