//! Sample column discovery from feature table headers.
//!
//! Mass Profiler exports mix metadata columns (identifier, formula,
//! retention time, ...) with one intensity column per sample. The catalog
//! separates the two using a fixed denylist of known metadata names,
//! keeping sample columns in their original order.

use crate::error::{FilterError, Result};

/// Metadata column names produced by annotated Mass Profiler outputs.
///
/// Any header matching one of these (or a duplicate-name variant such as
/// `SD.1`, see [`is_metadata_column`]) is excluded from the sample set.
pub const METADATA_COLUMNS: [&str; 20] = [
    "ID",
    "Name",
    "Formula",
    "Ion Species",
    "Mass (DB)",
    "CAS",
    "CCS (DB)",
    "RT",
    "SD",
    "DT",
    "CCS",
    "m/z",
    "Abundance",
    "RSD",
    "Z",
    "Ions",
    "Freq.",
    "Q Score",
    "Sat.",
    "Mark",
];

/// Check whether a header names a metadata column.
///
/// Matches exact denylist entries and duplicate-name variants of the form
/// `<base>.<digits>` (spreadsheet tools disambiguate the repeated `SD`
/// columns that way).
pub fn is_metadata_column(name: &str) -> bool {
    METADATA_COLUMNS.contains(&name) || alias_base(name).is_some()
}

/// Map a header to the name it should carry in output files.
///
/// Duplicate-name variants are folded back onto their base metadata name
/// (`SD.1` -> `SD`); everything else passes through unchanged.
pub fn output_header(name: &str) -> &str {
    alias_base(name).unwrap_or(name)
}

/// If `name` is `<base>.<digits>` for a denylisted base, return the base.
fn alias_base(name: &str) -> Option<&str> {
    let (base, suffix) = name.rsplit_once('.')?;
    if !suffix.is_empty()
        && suffix.bytes().all(|b| b.is_ascii_digit())
        && METADATA_COLUMNS.contains(&base)
    {
        Some(base)
    } else {
        None
    }
}

/// A sample column in a feature table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleColumn {
    /// Column index in the feature table.
    pub column: usize,
    /// Sample identifier (the header text).
    pub id: String,
}

/// The set of true sample columns in a feature table, in header order.
#[derive(Debug, Clone)]
pub struct SampleCatalog {
    samples: Vec<SampleColumn>,
}

impl SampleCatalog {
    /// Identify sample columns among the headers.
    ///
    /// Fails with [`FilterError::EmptyData`] if every header is a metadata
    /// column, since nothing downstream can run without samples.
    pub fn from_headers(headers: &[String]) -> Result<Self> {
        let samples: Vec<SampleColumn> = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !is_metadata_column(name))
            .map(|(column, name)| SampleColumn {
                column,
                id: name.clone(),
            })
            .collect();

        if samples.is_empty() {
            return Err(FilterError::EmptyData(
                "no sample columns found after excluding metadata columns".to_string(),
            ));
        }

        Ok(Self { samples })
    }

    /// Sample columns in original header order.
    pub fn samples(&self) -> &[SampleColumn] {
        &self.samples
    }

    /// Sample identifiers in original header order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.id.as_str())
    }

    /// Number of sample columns.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no sample columns were found (unreachable after
    /// construction, but keeps the API honest).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
