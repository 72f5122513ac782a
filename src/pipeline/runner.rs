//! End-to-end filter execution.

use crate::data::{FeatureTable, SampleCatalog, SampleGroupMap};
use crate::error::{FilterError, Result};
use crate::filter::{self, min_detection, qc_presence, QcClassification, NOT_DETECTED};
use crate::report::{self, FilterReport, RowDecision, RowOutcome};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options for the two filter stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Enable the QC presence stage (remove features only found in QCs).
    #[serde(default = "default_remove_qc_only")]
    pub remove_metabolites_only_in_qcs: bool,
    /// Maximum tolerable fraction of not-detected samples within a
    /// feature's best-represented group, in [0, 1].
    #[serde(default = "default_threshold")]
    pub minimum_detection_group_threshold: f64,
    /// Sentinel intensity denoting "not detected".
    #[serde(default = "default_not_detected")]
    pub not_detected: f64,
}

fn default_remove_qc_only() -> bool {
    true
}

fn default_threshold() -> f64 {
    0.33
}

fn default_not_detected() -> f64 {
    NOT_DETECTED
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            remove_metabolites_only_in_qcs: default_remove_qc_only(),
            minimum_detection_group_threshold: default_threshold(),
            not_detected: default_not_detected(),
        }
    }
}

impl FilterConfig {
    /// Validate option values.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.minimum_detection_group_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FilterError::InvalidParameter(format!(
                "minimum_detection_group_threshold must be a fraction in [0, 1], got {}",
                threshold
            )));
        }
        if !self.not_detected.is_finite() || self.not_detected < 0.0 {
            return Err(FilterError::InvalidParameter(format!(
                "not_detected sentinel must be a non-negative number, got {}",
                self.not_detected
            )));
        }
        Ok(())
    }
}

/// A complete run configuration, loadable from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to the feature table CSV.
    pub input_file: PathBuf,
    /// Path to the filled-in groupings CSV. Defaults to
    /// `<stem>_sample_groupings.csv` next to the input.
    #[serde(default)]
    pub groupings_file: Option<PathBuf>,
    /// Output path for kept features. Defaults to
    /// `<stem>_metabolites_kept.csv`.
    #[serde(default)]
    pub kept_file: Option<PathBuf>,
    /// Output path for removed features. Defaults to
    /// `<stem>_metabolites_removed.csv`.
    #[serde(default)]
    pub removed_file: Option<PathBuf>,
    /// Filter options.
    #[serde(flatten)]
    pub filter: FilterConfig,
}

impl RunConfig {
    /// Configuration for an input file with every option at its default.
    pub fn for_input<P: Into<PathBuf>>(input_file: P) -> Self {
        Self {
            input_file: input_file.into(),
            groupings_file: None,
            kept_file: None,
            removed_file: None,
            filter: FilterConfig::default(),
        }
    }

    /// Load from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(FilterError::from)
    }

    /// Save to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(FilterError::from)
    }

    /// Resolved groupings file path.
    pub fn groupings_path(&self) -> PathBuf {
        self.groupings_file
            .clone()
            .unwrap_or_else(|| with_suffix(&self.input_file, "_sample_groupings.csv"))
    }

    /// Resolved kept-features output path.
    pub fn kept_path(&self) -> PathBuf {
        self.kept_file
            .clone()
            .unwrap_or_else(|| with_suffix(&self.input_file, "_metabolites_kept.csv"))
    }

    /// Resolved removed-features output path.
    pub fn removed_path(&self) -> PathBuf {
        self.removed_file
            .clone()
            .unwrap_or_else(|| with_suffix(&self.input_file, "_metabolites_removed.csv"))
    }
}

/// Derive a sibling path by appending a suffix to the input's file stem.
fn with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("features");
    input.with_file_name(format!("{stem}{suffix}"))
}

/// Run both filter stages over a feature table.
///
/// Validates the configuration and the group map's coverage of the
/// table's samples up front, so a bad run aborts before any output
/// exists. Rows are evaluated independently in parallel (the group map is
/// shared read-only) and outputs are assembled in input order.
pub fn run_filter(
    table: &FeatureTable,
    groups: &SampleGroupMap,
    config: &FilterConfig,
) -> Result<FilterReport> {
    config.validate()?;
    let catalog = SampleCatalog::from_headers(table.headers())?;
    groups.validate_covers(&catalog)?;

    let decisions: Vec<RowDecision> = (0..table.n_rows())
        .into_par_iter()
        .map(|row| {
            let qc = config.remove_metabolites_only_in_qcs.then(|| {
                qc_presence::classify(table, row, &catalog, groups, config.not_detected)
            });
            let outcome = match qc {
                Some(QcClassification::QcOnly) => RowOutcome::RemovedQcOnly,
                _ => match min_detection::evaluate(
                    table,
                    row,
                    &catalog,
                    groups,
                    config.minimum_detection_group_threshold,
                    config.not_detected,
                ) {
                    filter::Decision::Remove => RowOutcome::RemovedOverThreshold,
                    filter::Decision::Keep => RowOutcome::Kept,
                },
            };
            RowDecision { qc, outcome }
        })
        .collect();

    report::assemble(table, &decisions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> FeatureTable {
        let headers: Vec<String> = ["ID", "Name", "S1", "S2", "S3", "QC1", "Blank1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows: Vec<Vec<String>> = [
            // Detected everywhere: kept.
            ["1", "Alanine", "5.0", "6.0", "7.0", "4.0", "0.001"],
            // QC-only: removed by the QC stage.
            ["2", "Artifact", "0.001", "0.001", "0.001", "3.0", "0.001"],
            // 2/3 not detected: removed by the threshold stage at 0.33.
            ["3", "Valine", "0.001", "0.001", "5.0", "2.0", "0.001"],
        ]
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();
        FeatureTable::new(headers, rows).unwrap()
    }

    fn make_groups() -> SampleGroupMap {
        SampleGroupMap::new([
            ("S1", "A"),
            ("S2", "A"),
            ("S3", "A"),
            ("QC1", "QC"),
            ("Blank1", "Ignore"),
        ])
        .unwrap()
    }

    #[test]
    fn test_run_filter_partitions_and_counts() {
        let report = run_filter(&make_table(), &make_groups(), &FilterConfig::default()).unwrap();

        assert_eq!(report.kept.n_rows(), 1);
        assert_eq!(report.kept.cell(0, 1), "Alanine");
        assert_eq!(report.removed.n_rows(), 2);
        assert_eq!(report.removed.cell(0, 1), "Artifact");
        assert_eq!(report.removed.cell(1, 1), "Valine");

        let qc = report.summary.qc_presence.unwrap();
        assert_eq!(qc.n_detected_in_qcs, 3);
        assert_eq!(qc.n_qc_only_removed, 1);
        assert_eq!(report.summary.n_over_threshold_removed, 1);
        assert_eq!(report.summary.n_under_threshold_kept, 1);
    }

    #[test]
    fn test_qc_stage_can_be_disabled() {
        let config = FilterConfig {
            remove_metabolites_only_in_qcs: false,
            ..FilterConfig::default()
        };
        let report = run_filter(&make_table(), &make_groups(), &config).unwrap();

        assert!(report.summary.qc_presence.is_none());
        // The QC-only artifact now reaches the threshold filter, where its
        // all-sentinel group removes it anyway.
        assert_eq!(report.kept.n_rows(), 1);
        assert_eq!(report.removed.n_rows(), 2);
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let config = FilterConfig {
            minimum_detection_group_threshold: 1.5,
            ..FilterConfig::default()
        };
        let result = run_filter(&make_table(), &make_groups(), &config);
        assert!(matches!(result, Err(FilterError::InvalidParameter(_))));
    }

    #[test]
    fn test_uncovered_sample_aborts_the_run() {
        let groups = SampleGroupMap::new([
            ("S1", "A"),
            ("S2", "A"),
            ("QC1", "QC"),
            ("Blank1", "Ignore"),
        ])
        .unwrap();
        let result = run_filter(&make_table(), &groups, &FilterConfig::default());
        assert!(matches!(result, Err(FilterError::SampleMismatch(_))));
    }

    #[test]
    fn test_run_config_yaml_and_derived_paths() {
        let yaml = "input_file: data/ExampleData_NEG.csv\nminimum_detection_group_threshold: 0.5\n";
        let config = RunConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.filter.minimum_detection_group_threshold, 0.5);
        assert!(config.filter.remove_metabolites_only_in_qcs);
        assert_eq!(config.filter.not_detected, NOT_DETECTED);
        assert_eq!(
            config.groupings_path(),
            PathBuf::from("data/ExampleData_NEG_sample_groupings.csv")
        );
        assert_eq!(
            config.kept_path(),
            PathBuf::from("data/ExampleData_NEG_metabolites_kept.csv")
        );
        assert_eq!(
            config.removed_path(),
            PathBuf::from("data/ExampleData_NEG_metabolites_removed.csv")
        );

        let roundtrip = RunConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(roundtrip.input_file, config.input_file);
    }
}
