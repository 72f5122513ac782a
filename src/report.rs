//! Assembly of filter outputs and summary counters.

use crate::data::FeatureTable;
use crate::error::Result;
use crate::filter::QcClassification;
use serde::Serialize;

/// Final destination of one feature row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Kept by the minimum-detection filter.
    Kept,
    /// Removed by the QC presence filter (detected only in QCs).
    RemovedQcOnly,
    /// Removed by the minimum-detection filter.
    RemovedOverThreshold,
}

/// Per-row decision record, a pure function of (row, group map, config).
#[derive(Debug, Clone, Copy)]
pub struct RowDecision {
    /// QC presence classification; `None` when the QC stage was disabled.
    pub qc: Option<QcClassification>,
    /// Where the row ended up.
    pub outcome: RowOutcome,
}

/// Counters for the QC presence stage.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct QcPresenceCounts {
    /// Features whose QC mean indicated detection.
    pub n_detected_in_qcs: usize,
    /// QC-detected features absent from analysis samples (removed).
    pub n_qc_only_removed: usize,
    /// QC-detected features also present in analysis samples.
    pub n_detected_in_samples: usize,
}

/// Summary counters for a filter run.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    /// Total feature rows in the input table.
    pub n_input: usize,
    /// QC presence counters; `None` when the stage was disabled.
    pub qc_presence: Option<QcPresenceCounts>,
    /// Features removed by the minimum-detection filter.
    pub n_over_threshold_removed: usize,
    /// Features kept by the minimum-detection filter.
    pub n_under_threshold_kept: usize,
}

impl std::fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Minimum Detection Filter Summary")?;
        writeln!(f, "  Input features:                    {}", self.n_input)?;
        if let Some(qc) = &self.qc_presence {
            writeln!(
                f,
                "  Detected in QCs:                   {}",
                qc.n_detected_in_qcs
            )?;
            writeln!(
                f,
                "  QC-only (removed):                 {}",
                qc.n_qc_only_removed
            )?;
            writeln!(
                f,
                "  Detected in QCs and samples:       {}",
                qc.n_detected_in_samples
            )?;
        }
        writeln!(
            f,
            "  Over threshold (removed):          {}",
            self.n_over_threshold_removed
        )?;
        writeln!(
            f,
            "  Under threshold (kept):            {}",
            self.n_under_threshold_kept
        )?;
        Ok(())
    }
}

/// Kept/removed tables plus summary counters for one filter run.
#[derive(Debug, Clone)]
pub struct FilterReport {
    pub kept: FeatureTable,
    pub removed: FeatureTable,
    pub summary: FilterSummary,
}

/// Fold per-row decisions into kept/removed tables and counters.
///
/// Kept rows keep their input order. Removed rows are ordered by stage of
/// first assignment: QC-only removals first, then over-threshold removals,
/// each in input order.
pub fn assemble(table: &FeatureTable, decisions: &[RowDecision]) -> Result<FilterReport> {
    let mut kept_rows = Vec::new();
    let mut qc_removed_rows = Vec::new();
    let mut threshold_removed_rows = Vec::new();

    let qc_stage_ran = decisions.iter().any(|d| d.qc.is_some());
    let mut qc_counts = QcPresenceCounts::default();
    let mut n_over = 0usize;
    let mut n_under = 0usize;

    for (row, decision) in decisions.iter().enumerate() {
        match decision.qc {
            Some(QcClassification::DetectedInSamples) => {
                qc_counts.n_detected_in_qcs += 1;
                qc_counts.n_detected_in_samples += 1;
            }
            Some(QcClassification::QcOnly) => {
                qc_counts.n_detected_in_qcs += 1;
                qc_counts.n_qc_only_removed += 1;
            }
            Some(QcClassification::UndetectedInQcs) | None => {}
        }

        match decision.outcome {
            RowOutcome::Kept => {
                n_under += 1;
                kept_rows.push(row);
            }
            RowOutcome::RemovedQcOnly => qc_removed_rows.push(row),
            RowOutcome::RemovedOverThreshold => {
                n_over += 1;
                threshold_removed_rows.push(row);
            }
        }
    }

    let mut removed_rows = qc_removed_rows;
    removed_rows.extend(threshold_removed_rows);

    let summary = FilterSummary {
        n_input: decisions.len(),
        qc_presence: qc_stage_ran.then_some(qc_counts),
        n_over_threshold_removed: n_over,
        n_under_threshold_kept: n_under,
    };

    Ok(FilterReport {
        kept: table.subset_rows(&kept_rows)?,
        removed: table.subset_rows(&removed_rows)?,
        summary,
    })
}
