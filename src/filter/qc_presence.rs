//! Quality-control presence classification.
//!
//! A feature that shows up in the pooled QC replicates but in none of the
//! real samples is an instrument artifact: the first filter stage removes
//! it before the minimum-detection rule runs.

use crate::data::{FeatureTable, SampleCatalog, SampleGroupMap, IGNORE_GROUP, QC_GROUP};
use crate::filter::round_to;

/// Outcome of QC presence classification for one feature row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QcClassification {
    /// Detected in QCs and in at least one analysis sample; proceeds to
    /// the minimum-detection filter.
    DetectedInSamples,
    /// Detected in QCs but in no analysis sample; removed.
    QcOnly,
    /// Undetected across all QCs. Proceeds unchanged to the
    /// minimum-detection filter and is not counted as detected-in-QC.
    UndetectedInQcs,
}

/// Classify one feature row by its presence in QC replicates.
///
/// Intensities are joined with group labels from `groups`; samples without
/// an entry and cells that do not parse as numbers are skipped. The QC
/// mean and the analysis-sample mean are rounded to 3 decimal places
/// before comparison with the not-detected sentinel.
///
/// A row with no numeric QC intensities at all has an undefined QC mean
/// and is treated as detected in QCs (its fate is then decided by the
/// analysis-sample mean and the minimum-detection filter).
pub fn classify(
    table: &FeatureTable,
    row: usize,
    catalog: &SampleCatalog,
    groups: &SampleGroupMap,
    sentinel: f64,
) -> QcClassification {
    let mut qc_sum = 0.0;
    let mut qc_n = 0usize;
    let mut sample_sum = 0.0;
    let mut sample_n = 0usize;

    for sample in catalog.samples() {
        let Some(group) = groups.group(&sample.id) else {
            continue;
        };
        let Some(value) = table.numeric(row, sample.column) else {
            continue;
        };
        if group == QC_GROUP {
            qc_sum += value;
            qc_n += 1;
        } else if group != IGNORE_GROUP {
            sample_sum += value;
            sample_n += 1;
        }
    }

    // Sentinel comparisons are exact: cells holding the sentinel parse to
    // the same f64, and rounding a mean of sentinels yields it back.
    if qc_n > 0 && round_to(qc_sum / qc_n as f64, 3) == sentinel {
        return QcClassification::UndetectedInQcs;
    }

    if sample_n > 0 && round_to(sample_sum / sample_n as f64, 3) == sentinel {
        QcClassification::QcOnly
    } else {
        QcClassification::DetectedInSamples
    }
}
