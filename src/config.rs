//! Layered YAML configuration (spec §1.1/§6, C14).
//!
//! Loaded from a project file, merged with a user-home twin, then overridden
//! by `GCQ_*` environment variables — the same three-tier precedence as the
//! teacher's `Config::load`/`override_with` (`src/config.rs`), ported from
//! TOML to YAML since the distilled spec's wire format is YAML. A legacy
//! flat-key layout (`provider`, `hf_model`, `hf_token`, `ollama_model`,
//! `ollama_base_url`, `ollama_api_key`) is migrated into the nested
//! `warm:`/`search:` blocks on load.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(std::path::PathBuf, std::io::Error),
    #[error("failed to write config {0}: {1}")]
    Write(std::path::PathBuf, std::io::Error),
    #[error("invalid YAML in {0}: {1}")]
    Parse(std::path::PathBuf, serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderBlock {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ProviderBlock {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            base_url: Some("http://localhost:11434".to_string()),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub warm: ProviderBlock,
    #[serde(default)]
    pub search: ProviderBlock,
    #[serde(default = "default_cache_max_size")]
    pub cache_max_size: usize,
    #[serde(default)]
    pub cache_max_bytes: Option<usize>,
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    #[serde(default)]
    pub threshold_similarity: f32,
    #[serde(default)]
    pub threshold_min_score: f32,
    #[serde(default = "default_max_context_chunks")]
    pub max_context_chunks: usize,
    #[serde(default)]
    pub chunk_overlap: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub verbose: bool,

    // Legacy flat keys, migrated into `warm`/`search` on load and never
    // written back out.
    #[serde(default, skip_serializing)]
    provider: Option<String>,
    #[serde(default, skip_serializing)]
    hf_model: Option<String>,
    #[serde(default, skip_serializing)]
    hf_token: Option<String>,
    #[serde(default, skip_serializing)]
    ollama_model: Option<String>,
    #[serde(default, skip_serializing)]
    ollama_base_url: Option<String>,
    #[serde(default, skip_serializing)]
    ollama_api_key: Option<String>,
}

fn default_cache_max_size() -> usize {
    10_000
}

fn default_socket_path() -> String {
    "/tmp/gcq.sock".to_string()
}

fn default_max_context_chunks() -> usize {
    5
}

fn default_chunk_size() -> usize {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warm: ProviderBlock::default(),
            search: ProviderBlock::default(),
            cache_max_size: default_cache_max_size(),
            cache_max_bytes: None,
            socket_path: default_socket_path(),
            threshold_similarity: 0.0,
            threshold_min_score: 0.0,
            max_context_chunks: default_max_context_chunks(),
            chunk_overlap: 0,
            chunk_size: default_chunk_size(),
            verbose: false,
            provider: None,
            hf_model: None,
            hf_token: None,
            ollama_model: None,
            ollama_base_url: None,
            ollama_api_key: None,
        }
    }
}

impl Config {
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let mut config: Config =
            serde_yaml::from_slice(&bytes).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.migrate_legacy_keys();
        Ok(config)
    }

    /// Load the project config, merge the user-home twin over it (user
    /// values win ties), then apply `GCQ_*` environment overrides.
    pub fn load(project_root: &Path, user_home: Option<&Path>) -> Result<Self, ConfigError> {
        let project_path = crate::paths::Layout::new(project_root).config_path();
        let mut config = if project_path.exists() {
            Self::load_file(&project_path)?
        } else {
            Self::default()
        };

        if let Some(home) = user_home {
            let user_path = home.join(".gcq").join("config.yaml");
            if user_path.exists() {
                let user_config = Self::load_file(&user_path)?;
                config.override_with(&user_config);
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// The legacy flat layout has no warm/search split, so `provider` and
    /// whichever of `hf_*`/`ollama_*` matches each block's resolved provider
    /// apply identically to both blocks.
    fn migrate_legacy_keys(&mut self) {
        if let Some(provider) = self.provider.take() {
            self.warm.provider = provider.clone();
            self.search.provider = provider;
        }

        for block in [&mut self.warm, &mut self.search] {
            match block.provider.as_str() {
                "huggingface" => {
                    if let Some(model) = &self.hf_model {
                        block.model = model.clone();
                    }
                    if let Some(token) = &self.hf_token {
                        block.token = Some(token.clone());
                    }
                }
                "ollama" => {
                    if let Some(model) = &self.ollama_model {
                        block.model = model.clone();
                    }
                    if let Some(base_url) = &self.ollama_base_url {
                        block.base_url = Some(base_url.clone());
                    }
                    if let Some(key) = &self.ollama_api_key {
                        block.token = Some(key.clone());
                    }
                }
                _ => {}
            }
        }

        self.hf_model = None;
        self.hf_token = None;
        self.ollama_model = None;
        self.ollama_base_url = None;
        self.ollama_api_key = None;
    }

    /// Merge `other`'s explicitly-set fields over `self`. Used to layer the
    /// user-home config over the project config.
    pub fn override_with(&mut self, other: &Config) {
        self.warm = other.warm.clone();
        self.search = other.search.clone();
        self.cache_max_size = other.cache_max_size;
        if other.cache_max_bytes.is_some() {
            self.cache_max_bytes = other.cache_max_bytes;
        }
        self.socket_path = other.socket_path.clone();
        self.threshold_similarity = other.threshold_similarity;
        self.threshold_min_score = other.threshold_min_score;
        self.max_context_chunks = other.max_context_chunks;
        self.chunk_overlap = other.chunk_overlap;
        self.chunk_size = other.chunk_size;
        self.verbose = other.verbose;
    }

    fn apply_env_overrides(&mut self) {
        apply_block_env(&mut self.warm, "GCQ_WARM");
        apply_block_env(&mut self.search, "GCQ_SEARCH");

        if let Ok(v) = std::env::var("GCQ_CACHE_MAX_SIZE") {
            if let Ok(n) = v.parse() {
                self.cache_max_size = n;
            }
        }
        if let Ok(v) = std::env::var("GCQ_CACHE_MAX_BYTES") {
            if let Ok(n) = v.parse() {
                self.cache_max_bytes = Some(n);
            }
        }
        if let Ok(v) = std::env::var("GCQ_SOCKET_PATH") {
            self.socket_path = v;
        }
        if let Ok(v) = std::env::var("GCQ_THRESHOLD_SIMILARITY") {
            if let Ok(n) = v.parse() {
                self.threshold_similarity = n;
            }
        }
        if let Ok(v) = std::env::var("GCQ_THRESHOLD_MIN_SCORE") {
            if let Ok(n) = v.parse() {
                self.threshold_min_score = n;
            }
        }
        if let Ok(v) = std::env::var("GCQ_MAX_CONTEXT_CHUNKS") {
            if let Ok(n) = v.parse() {
                self.max_context_chunks = n;
            }
        }
        if let Ok(v) = std::env::var("GCQ_CHUNK_OVERLAP") {
            if let Ok(n) = v.parse() {
                self.chunk_overlap = n;
            }
        }
        if let Ok(v) = std::env::var("GCQ_CHUNK_SIZE") {
            if let Ok(n) = v.parse() {
                self.chunk_size = n;
            }
        }
        if let Ok(v) = std::env::var("GCQ_VERBOSE") {
            if let Ok(b) = v.parse() {
                self.verbose = b;
            }
        }
    }

    /// Write the config to `path`, hardening permissions to 0600 since the
    /// provider blocks may carry a token reachable only with a key set
    /// elsewhere in the environment (defense in depth, not an API key store).
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
        }
        std::fs::write(path, yaml).map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
        let _ = crate::paths::harden_permissions(path, true);
        Ok(())
    }
}

/// Apply `<prefix>_PROVIDER`/`_MODEL` to one provider block, plus a
/// provider-qualified base-url/token form (e.g. `GCQ_SEARCH_OLLAMA_BASE_URL`)
/// falling back to the unqualified `<prefix>_BASE_URL`/`_TOKEN`.
fn apply_block_env(block: &mut ProviderBlock, prefix: &str) {
    if let Ok(v) = std::env::var(format!("{prefix}_PROVIDER")) {
        block.provider = v;
    }
    if let Ok(v) = std::env::var(format!("{prefix}_MODEL")) {
        block.model = v;
    }

    let provider_tag = block.provider.to_uppercase();
    if let Ok(v) = std::env::var(format!("{prefix}_{provider_tag}_BASE_URL"))
        .or_else(|_| std::env::var(format!("{prefix}_BASE_URL")))
    {
        block.base_url = Some(v);
    }
    if let Ok(v) = std::env::var(format!("{prefix}_{provider_tag}_API_KEY"))
        .or_else(|_| std::env::var(format!("{prefix}_{provider_tag}_TOKEN")))
        .or_else(|_| std::env::var(format!("{prefix}_TOKEN")))
    {
        block.token = Some(v);
    }
}
