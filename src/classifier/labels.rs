use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Sentinel returned when a predicted index has no entry in the label map.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, thiserror::Error)]
pub enum LabelMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Label file is not a valid JSON object: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Mapping from class index to a human-readable food name.
///
/// The on-disk format is a JSON object whose keys are string-encoded
/// integer indices (`{"0": "apple", "1": "banana"}`). The index set is
/// expected to be contiguous from 0 to N-1 and to match the classifier's
/// output width; the map itself does not enforce this.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    entries: HashMap<String, String>,
}

impl LabelMap {
    /// Creates an empty label map. Every index resolves to [`UNKNOWN_LABEL`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the label map from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LabelMapError> {
        let contents = fs::read_to_string(path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&contents)?;
        Ok(Self { entries })
    }

    /// Resolves a class index to its food name, or [`UNKNOWN_LABEL`] if the
    /// index is not present. Never fails.
    pub fn resolve(&self, index: usize) -> &str {
        self.entries
            .get(&index.to_string())
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
