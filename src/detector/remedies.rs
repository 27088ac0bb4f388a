//! Static remedy and precaution table, keyed by class index.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::DataError;
use crate::localization::LocalizedText;

// ---

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemedyEntry {
    /// Canonical label; must agree with the model's label for the same index
    pub disease: String,
    #[serde(default = "unknown_crop")]
    pub crop: String,
    #[serde(default)]
    pub remedy: LocalizedText,
    #[serde(default)]
    pub precautions: LocalizedText,
}

fn unknown_crop() -> String {
    "Unknown".to_string()
}

/// Remedy entries keyed by the class index rendered as a string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RemedyTable {
    entries: HashMap<String, RemedyEntry>,
}

impl RemedyTable {
    pub fn load(path: &Path) -> Result<Self, DataError> {
        // ---
        let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: Self = serde_json::from_str(&raw).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded {} remedy entries from {}", table.len(), path.display());
        Ok(table)
    }

    /// Entry for `index` whose stored disease equals `label`.
    ///
    /// An entry filed under the right index but naming another disease is
    /// treated as missing.
    pub fn lookup(&self, index: usize, label: &str) -> Option<&RemedyEntry> {
        // ---
        let entry = self.entries.get(&index.to_string())?;
        if entry.disease == label {
            Some(entry)
        } else {
            tracing::warn!(
                "Remedy entry {} names '{}' but model label is '{}'",
                index,
                entry.disease,
                label
            );
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(usize, RemedyEntry)> for RemedyTable {
    fn from_iter<I: IntoIterator<Item = (usize, RemedyEntry)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(idx, entry)| (idx.to_string(), entry))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    const JSON: &str = r#"{
        "22": {
            "disease": "Potato___Late_blight",
            "crop": "Potato",
            "remedy": {"en": "Apply mancozeb", "hi": "मैंकोजेब डालें"},
            "precautions": {"en": "Avoid overhead watering"}
        },
        "30": {
            "disease": "Tomato___Leaf_Mold",
            "remedy": {"en": "Improve airflow"}
        }
    }"#;

    #[test]
    fn test_parses_partial_entries() {
        // ---
        let table: RemedyTable = serde_json::from_str(JSON).unwrap();
        assert_eq!(table.len(), 2);

        let blight = table.lookup(22, "Potato___Late_blight").unwrap();
        assert_eq!(blight.crop, "Potato");
        assert_eq!(blight.remedy.hi, "मैंकोजेब डालें");
        assert_eq!(blight.precautions.hi, "");
    }

    #[test]
    fn test_label_mismatch_is_treated_as_missing() {
        // ---
        let table: RemedyTable = serde_json::from_str(JSON).unwrap();
        // Entry 30 is filed under the wrong index (30 is Early_blight)
        assert!(table.lookup(30, "Tomato___Early_blight").is_none());
        assert!(table.lookup(31, "Tomato___Late_blight").is_none());
    }

    #[test]
    fn test_crop_defaults_to_unknown() {
        // ---
        let table: RemedyTable = serde_json::from_str(JSON).unwrap();
        assert_eq!(table.lookup(30, "Tomato___Leaf_Mold").unwrap().crop, "Unknown");
    }

    #[test]
    fn test_load_reports_bad_json() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remedies.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(RemedyTable::load(&path), Err(DataError::Json { .. })));
    }
}
