//! Feature table storage for Mass Profiler exports.

use crate::data::sample_catalog::output_header;
use crate::error::{FilterError, Result};
use std::path::Path;

/// A delimited feature table: one row per detected feature, one column per
/// metadata field or sample.
///
/// Cells are kept as the verbatim (trimmed) input text so filtered outputs
/// preserve original row content exactly. Numeric interpretation happens on
/// demand via [`numeric`](Self::numeric); a cell that does not parse is
/// simply excluded from numeric aggregation.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FeatureTable {
    /// Create a table from headers and rows.
    ///
    /// Every row must have exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(FilterError::EmptyData(
                "feature table has no columns".to_string(),
            ));
        }
        for row in &rows {
            if row.len() != headers.len() {
                return Err(FilterError::EmptyData(format!(
                    "feature table row has {} cells, expected {}",
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Load a feature table from a CSV file.
    ///
    /// Leading/trailing whitespace is stripped from headers and cells
    /// (Mass Profiler outputs sporadically carry it). Short rows are padded
    /// with empty cells.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() {
            return Err(FilterError::EmptyData(
                "feature table has no header row".to_string(),
            ));
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            row.resize(headers.len(), String::new());
            row.truncate(headers.len());
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    /// Write the table to a CSV file.
    ///
    /// Duplicate-name metadata headers are folded back to their base name
    /// (`SD.1` -> `SD`), so outputs match the instrument's original schema.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(self.headers.iter().map(|h| output_header(h)))?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Column headers.
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of feature rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }

    /// The verbatim cell text at (row, col).
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// A full row of cells.
    #[inline]
    pub fn row(&self, row: usize) -> &[String] {
        &self.rows[row]
    }

    /// The cell at (row, col) interpreted as a number, if it parses.
    #[inline]
    pub fn numeric(&self, row: usize, col: usize) -> Option<f64> {
        self.rows[row][col].parse::<f64>().ok()
    }

    /// Build a new table containing only the given rows, in the given
    /// order, with the same column schema.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut rows = Vec::with_capacity(indices.len());
        for &idx in indices {
            let row = self.rows.get(idx).ok_or_else(|| {
                FilterError::InvalidParameter(format!("row index {} out of bounds", idx))
            })?;
            rows.push(row.clone());
        }
        Ok(Self {
            headers: self.headers.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ID,Name, RT ,S1,S2").unwrap();
        writeln!(file, "1,Alanine,1.2, 5.0 ,0.001").unwrap();
        writeln!(file, "2,Valine,2.4,n/a,7.25").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_trims_headers_and_cells() {
        let file = create_test_csv();
        let table = FeatureTable::from_csv(file.path()).unwrap();

        assert_eq!(table.headers(), &["ID", "Name", "RT", "S1", "S2"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.cell(0, 3), "5.0");
    }

    #[test]
    fn test_numeric_is_lenient() {
        let file = create_test_csv();
        let table = FeatureTable::from_csv(file.path()).unwrap();

        assert_eq!(table.numeric(0, 3), Some(5.0));
        assert_eq!(table.numeric(0, 4), Some(0.001));
        // "n/a" is not numeric and must be excluded from aggregation.
        assert_eq!(table.numeric(1, 3), None);
        // Text columns are not numeric either.
        assert_eq!(table.numeric(0, 1), None);
    }

    #[test]
    fn test_subset_rows_preserves_content() {
        let file = create_test_csv();
        let table = FeatureTable::from_csv(file.path()).unwrap();

        let subset = table.subset_rows(&[1]).unwrap();
        assert_eq!(subset.n_rows(), 1);
        assert_eq!(subset.cell(0, 1), "Valine");
        assert_eq!(subset.headers(), table.headers());

        assert!(table.subset_rows(&[5]).is_err());
    }

    #[test]
    fn test_csv_roundtrip_restores_duplicate_headers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ID,RT,SD.1,S1").unwrap();
        writeln!(file, "1,1.2,0.05,9.1").unwrap();
        file.flush().unwrap();

        let table = FeatureTable::from_csv(file.path()).unwrap();
        let out = NamedTempFile::new().unwrap();
        table.to_csv(out.path()).unwrap();

        let content = std::fs::read_to_string(out.path()).unwrap();
        let header_line = content.lines().next().unwrap();
        assert_eq!(header_line, "ID,RT,SD,S1");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ID,S1,S2").unwrap();
        writeln!(file, "1,5.0").unwrap();
        file.flush().unwrap();

        let table = FeatureTable::from_csv(file.path()).unwrap();
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.numeric(0, 2), None);
    }
}
