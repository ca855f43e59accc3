//! Engine configuration, read from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::CatalogueError;
use crate::planner::SlotPolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub slot_policy: SlotPolicy,
    /// Overrides the context inferred from the assignment shape.
    #[serde(default)]
    pub mixed_context: Option<bool>,
    #[serde(default)]
    pub dedup_identifiers: bool,
}

impl EngineConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map_err(|e| CatalogueError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.slot_policy, SlotPolicy::Pad);
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogueError::Io(_)));
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"slotPolicy": "omit", "dedupIdentifiers": true}}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.slot_policy, SlotPolicy::Omit);
        assert!(config.dedup_identifiers);
        assert_eq!(config.mixed_context, None);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"slotPolicy": "stretch"}}"#).unwrap();
        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidConfig(_)));
    }
}
