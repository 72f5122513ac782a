//! Minimum-detection filtering for metabolomics feature tables.
//!
//! This library filters annotated Mass Profiler feature tables to remove
//! features that are not reliably detected across a study's samples. It
//! works in two stages: a groupings template is derived from the table's
//! sample columns for the user to annotate, then a two-part filter — QC
//! presence filtering and per-group minimum-detection thresholding —
//! splits the table into kept and removed features.
//!
//! # Overview
//!
//! - **data**: feature tables, sample column discovery, group assignments
//! - **filter**: the QC presence and minimum-detection decision rules
//! - **report**: kept/removed assembly and summary counters
//! - **pipeline**: configuration and end-to-end execution
//!
//! # Example
//!
//! ```no_run
//! use metabfilter::prelude::*;
//!
//! let table = FeatureTable::from_csv("ExampleData_NEG.csv").unwrap();
//! let groups = SampleGroupMap::from_csv("ExampleData_NEG_sample_groupings.csv").unwrap();
//!
//! let report = run_filter(&table, &groups, &FilterConfig::default()).unwrap();
//! report.kept.to_csv("ExampleData_NEG_metabolites_kept.csv").unwrap();
//! report.removed.to_csv("ExampleData_NEG_metabolites_removed.csv").unwrap();
//! println!("{}", report.summary);
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod report;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        write_template, FeatureTable, SampleCatalog, SampleGroupMap, IGNORE_GROUP,
        METADATA_COLUMNS, QC_GROUP,
    };
    pub use crate::error::{FilterError, Result};
    pub use crate::filter::{Decision, QcClassification, NOT_DETECTED};
    pub use crate::pipeline::{run_filter, FilterConfig, RunConfig};
    pub use crate::report::{FilterReport, FilterSummary, QcPresenceCounts, RowOutcome};
}
