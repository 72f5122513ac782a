//! Minimum-detection threshold rule.
//!
//! A feature is kept when at least one analysis group detects it often
//! enough: for each group the proportion of not-detected intensities is
//! computed, and the feature is removed only if even its best group's
//! proportion exceeds the threshold.

use crate::data::{FeatureTable, SampleCatalog, SampleGroupMap, IGNORE_GROUP, QC_GROUP};
use crate::filter::round_to;
use std::collections::HashMap;

/// Keep/remove decision for one feature row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Remove,
}

/// Per-group tally of numeric intensities for one feature row.
#[derive(Default)]
struct GroupTally {
    n: usize,
    not_detected: usize,
}

/// Evaluate one feature row against the minimum-detection threshold.
///
/// Only analysis groups are considered (`QC` and `Ignore` samples are
/// skipped, as are samples without a group entry and cells that do not
/// parse as numbers). Each group present for the row contributes exactly
/// one proportion — the fraction of its intensities equal to the sentinel,
/// rounded to 2 decimal places, with an explicit `0.0` when the group has
/// no not-detected samples. The row is removed when the minimum proportion
/// is strictly greater than `threshold`; a proportion exactly equal to the
/// threshold counts as detected enough.
///
/// A row contributing no proportions at all (no numeric analysis-group
/// intensities) is kept.
pub fn evaluate(
    table: &FeatureTable,
    row: usize,
    catalog: &SampleCatalog,
    groups: &SampleGroupMap,
    threshold: f64,
    sentinel: f64,
) -> Decision {
    let mut tallies: HashMap<&str, GroupTally> = HashMap::new();

    for sample in catalog.samples() {
        let Some(group) = groups.group(&sample.id) else {
            continue;
        };
        if group == QC_GROUP || group == IGNORE_GROUP {
            continue;
        }
        let Some(value) = table.numeric(row, sample.column) else {
            continue;
        };
        let tally = tallies.entry(group).or_default();
        tally.n += 1;
        // Exact comparison: sentinel cells parse to the same f64.
        if value == sentinel {
            tally.not_detected += 1;
        }
    }

    let min_proportion = tallies
        .values()
        .map(|tally| round_to(tally.not_detected as f64 / tally.n as f64, 2))
        .reduce(f64::min);

    match min_proportion {
        Some(p) if p > threshold => Decision::Remove,
        _ => Decision::Keep,
    }
}
