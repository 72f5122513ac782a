//! Sample-to-group assignments and the groupings template.

use crate::data::sample_catalog::SampleCatalog;
use crate::error::{FilterError, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Reserved group label for quality-control replicates.
pub const QC_GROUP: &str = "QC";

/// Reserved group label for samples excluded from analysis.
pub const IGNORE_GROUP: &str = "Ignore";

/// Header of the sample identifier column in a groupings file.
const SAMPLES_COLUMN: &str = "Samples";

/// Header of the group label column in a groupings file.
const GROUPS_COLUMN: &str = "Groups";

/// Mapping from sample identifier to group label.
///
/// Loaded from the groupings CSV the user fills in after
/// [`write_template`]. The labels `QC` and `Ignore` are reserved; every
/// other label is an analysis group.
#[derive(Debug, Clone)]
pub struct SampleGroupMap {
    sample_ids: Vec<String>,
    groups: HashMap<String, String>,
}

impl SampleGroupMap {
    /// Build a map from (sample, group) pairs.
    ///
    /// Validates that each sample appears exactly once, that every sample
    /// has a non-empty label, and that both reserved labels appear among
    /// the assignments (downstream stages rely on them, so their absence
    /// almost always means a mislabeled groupings file).
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut sample_ids = Vec::new();
        let mut groups = HashMap::new();

        for (sample, group) in entries {
            let sample = sample.into();
            let group = group.into();
            if group.is_empty() {
                return Err(FilterError::SampleMismatch(format!(
                    "sample '{}' has no group assigned",
                    sample
                )));
            }
            if groups.insert(sample.clone(), group).is_some() {
                return Err(FilterError::DuplicateSample(sample));
            }
            sample_ids.push(sample);
        }

        if sample_ids.is_empty() {
            return Err(FilterError::EmptyData(
                "sample groupings contain no samples".to_string(),
            ));
        }
        for reserved in [QC_GROUP, IGNORE_GROUP] {
            if !groups.values().any(|g| g == reserved) {
                return Err(FilterError::MissingGroup(reserved.to_string()));
            }
        }

        Ok(Self { sample_ids, groups })
    }

    /// Load a groupings file (columns `Samples`, `Groups`).
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let sample_col = column_index(&headers, SAMPLES_COLUMN)?;
        let group_col = column_index(&headers, GROUPS_COLUMN)?;

        let mut entries: Vec<(String, String)> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let sample = record.get(sample_col).unwrap_or("").to_string();
            if sample.is_empty() {
                continue;
            }
            let group = record.get(group_col).unwrap_or("").to_string();
            entries.push((sample, group));
        }

        Self::new(entries)
    }

    /// Group label for a sample, if the sample has an entry.
    pub fn group(&self, sample: &str) -> Option<&str> {
        self.groups.get(sample).map(String::as_str)
    }

    /// Distinct group labels minus the reserved `QC` and `Ignore`, sorted.
    pub fn analysis_groups(&self) -> Vec<String> {
        self.groups
            .values()
            .filter(|g| g.as_str() != QC_GROUP && g.as_str() != IGNORE_GROUP)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sample identifiers in file order.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Number of samples with an assignment.
    pub fn len(&self) -> usize {
        self.sample_ids.len()
    }

    /// True if the map holds no assignments.
    pub fn is_empty(&self) -> bool {
        self.sample_ids.is_empty()
    }

    /// Verify that every sample column in the catalog has an assignment.
    ///
    /// Run before filtering so a run with an incomplete groupings file
    /// aborts without writing any output. Map entries for samples absent
    /// from the table are tolerated.
    pub fn validate_covers(&self, catalog: &SampleCatalog) -> Result<()> {
        let missing: Vec<&str> = catalog
            .ids()
            .filter(|id| !self.groups.contains_key(*id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FilterError::SampleMismatch(format!(
                "no group entry for sample(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Write a groupings template for the catalog's samples.
///
/// One row per sample in ascending identifier order, with an empty
/// `Groups` column for the user to fill in (QC replicates as `QC`,
/// excluded samples as `Ignore`).
pub fn write_template<P: AsRef<Path>>(catalog: &SampleCatalog, path: P) -> Result<()> {
    let mut ids: Vec<&str> = catalog.ids().collect();
    ids.sort_unstable();

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([SAMPLES_COLUMN, GROUPS_COLUMN])?;
    for id in ids {
        writer.write_record([id, ""])?;
    }
    writer.flush()?;
    Ok(())
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| FilterError::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Samples,Groups").unwrap();
        writeln!(file, "S1,Control").unwrap();
        writeln!(file, "S2,Treated").unwrap();
        writeln!(file, "S3,Control").unwrap();
        writeln!(file, "QC1,QC").unwrap();
        writeln!(file, "Blank1,Ignore").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_groupings() {
        let file = create_test_csv();
        let map = SampleGroupMap::from_csv(file.path()).unwrap();

        assert_eq!(map.len(), 5);
        assert_eq!(map.group("S1"), Some("Control"));
        assert_eq!(map.group("QC1"), Some("QC"));
        assert_eq!(map.group("unknown"), None);
    }

    #[test]
    fn test_analysis_groups_exclude_reserved() {
        let file = create_test_csv();
        let map = SampleGroupMap::from_csv(file.path()).unwrap();

        assert_eq!(map.analysis_groups(), vec!["Control", "Treated"]);
    }

    #[test]
    fn test_missing_reserved_label() {
        let result = SampleGroupMap::new([("S1", "Control"), ("QC1", "QC")]);
        assert!(matches!(result, Err(FilterError::MissingGroup(g)) if g == "Ignore"));

        let result = SampleGroupMap::new([("S1", "Control"), ("B1", "Ignore")]);
        assert!(matches!(result, Err(FilterError::MissingGroup(g)) if g == "QC"));
    }

    #[test]
    fn test_duplicate_sample_rejected() {
        let result = SampleGroupMap::new([
            ("S1", "Control"),
            ("S1", "Treated"),
            ("QC1", "QC"),
            ("B1", "Ignore"),
        ]);
        assert!(matches!(result, Err(FilterError::DuplicateSample(s)) if s == "S1"));
    }

    #[test]
    fn test_unassigned_sample_rejected() {
        let result = SampleGroupMap::new([("S1", ""), ("QC1", "QC"), ("B1", "Ignore")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_covers() {
        let file = create_test_csv();
        let map = SampleGroupMap::from_csv(file.path()).unwrap();

        let headers: Vec<String> = ["ID", "S1", "S2", "QC1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let catalog = SampleCatalog::from_headers(&headers).unwrap();
        assert!(map.validate_covers(&catalog).is_ok());

        let headers: Vec<String> = ["ID", "S1", "S9"].iter().map(|s| s.to_string()).collect();
        let catalog = SampleCatalog::from_headers(&headers).unwrap();
        let err = map.validate_covers(&catalog).unwrap_err();
        assert!(matches!(err, FilterError::SampleMismatch(msg) if msg.contains("S9")));
    }

    #[test]
    fn test_write_template_sorts_samples() {
        let headers: Vec<String> = ["ID", "RT", "S2", "QC1", "S1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let catalog = SampleCatalog::from_headers(&headers).unwrap();

        let file = NamedTempFile::new().unwrap();
        write_template(&catalog, file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["Samples,Groups", "QC1,", "S1,", "S2,"]);
    }
}
