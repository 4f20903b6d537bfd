//! Loader for scenario documents.
//!
//! Documents are YAML or JSON with a top-level `tests` list.

use std::io::Read;
use std::path::Path;

use crate::error::DecodeError;
use crate::TestSet;

impl TestSet {
    /// Decode a YAML (or JSON, a subset of YAML) document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, DecodeError> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Decode a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, DecodeError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Decode a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a document from disk. `.json` files are decoded as JSON,
    /// everything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| DecodeError::file_read(path, e))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
    }
}
