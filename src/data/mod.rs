//! Data structures for feature-table filtering.

mod feature_table;
mod groupings;
mod sample_catalog;

pub use feature_table::FeatureTable;
pub use groupings::{write_template, SampleGroupMap, IGNORE_GROUP, QC_GROUP};
pub use sample_catalog::{
    is_metadata_column, output_header, SampleCatalog, SampleColumn, METADATA_COLUMNS,
};
