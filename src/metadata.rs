//! Index metadata and compatibility checking (spec §4.9, C12).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read metadata {0}: {1}")]
    Read(std::path::PathBuf, std::io::Error),
    #[error("failed to write metadata {0}: {1}")]
    Write(std::path::PathBuf, std::io::Error),
    #[error("corrupt metadata at {0}: {1}")]
    Corrupt(std::path::PathBuf, serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTag {
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub model: String,
    pub provider_endpoint: String,
    pub dimension: usize,
    pub record_count: usize,
    pub created_at: DateTime<Utc>,
    pub warm: ProviderTag,
    pub search: ProviderTag,
}

impl IndexMetadata {
    /// Whether a query embedded with `search` dimension/model/provider is
    /// usable against this index without a rebuild. An empty provider on
    /// either side is a wildcard (doesn't disqualify a match), since not
    /// every caller knows a concrete provider identity.
    pub fn is_compatible_with(
        &self,
        search_dimension: usize,
        search_model: &str,
        search_provider: &str,
    ) -> bool {
        let provider_matches = self.search.provider.is_empty()
            || search_provider.is_empty()
            || self.search.provider == search_provider;
        self.dimension == search_dimension && self.search.model == search_model && provider_matches
    }

    pub fn save(&self, path: &Path) -> Result<(), MetadataError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| MetadataError::Write(path.to_path_buf(), std::io::Error::other(e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MetadataError::Write(path.to_path_buf(), e))?;
        }
        std::fs::write(path, json).map_err(|e| MetadataError::Write(path.to_path_buf(), e))
    }

    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let bytes = std::fs::read(path).map_err(|e| MetadataError::Read(path.to_path_buf(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| MetadataError::Corrupt(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> IndexMetadata {
        IndexMetadata {
            model: "nomic-embed-text".into(),
            provider_endpoint: "http://localhost:11434".into(),
            dimension: 768,
            record_count: 10,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            warm: ProviderTag {
                provider: "ollama".into(),
                model: "nomic-embed-text".into(),
            },
            search: ProviderTag {
                provider: "ollama".into(),
                model: "nomic-embed-text".into(),
            },
        }
    }

    #[test]
    fn compatible_when_dimension_and_model_match() {
        let meta = sample();
        assert!(meta.is_compatible_with(768, "nomic-embed-text", "ollama"));
    }

    #[test]
    fn incompatible_on_dimension_mismatch() {
        let meta = sample();
        assert!(!meta.is_compatible_with(1536, "nomic-embed-text", "ollama"));
    }

    #[test]
    fn incompatible_on_model_mismatch() {
        let meta = sample();
        assert!(!meta.is_compatible_with(768, "different-model", "ollama"));
    }

    #[test]
    fn incompatible_on_provider_mismatch() {
        let meta = sample();
        assert!(!meta.is_compatible_with(768, "nomic-embed-text", "huggingface"));
    }

    #[test]
    fn empty_provider_is_a_wildcard_on_either_side() {
        let meta = sample();
        assert!(meta.is_compatible_with(768, "nomic-embed-text", ""));

        let mut unknown_provider = sample();
        unknown_provider.search.provider = String::new();
        assert!(unknown_provider.is_compatible_with(768, "nomic-embed-text", "ollama"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        let meta = sample();
        meta.save(&path).unwrap();
        let loaded = IndexMetadata::load(&path).unwrap();
        assert_eq!(loaded.dimension, meta.dimension);
        assert_eq!(loaded.warm.model, meta.warm.model);
    }
}
