//! Persistence layout under `<root>/.gcq/` (spec §4.10, C13).
//!
//! Directory mode 0755, credential-bearing files 0600, everything else 0644
//! — grounded on the teacher's config-file permission hardening
//! (`src/config.rs::add_reference_to_config`, which sets 0600 on write).

use std::path::{Path, PathBuf};

pub const CACHE_DIR_NAME: &str = ".gcq";

pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn cache_root(&self) -> PathBuf {
        self.root.join(CACHE_DIR_NAME)
    }

    pub fn vector_index_path(&self) -> PathBuf {
        self.cache_root().join("cache/semantic/index.msgpack")
    }

    pub fn index_metadata_path(&self) -> PathBuf {
        self.cache_root().join("cache/semantic/metadata.json")
    }

    pub fn dirty_state_path(&self) -> PathBuf {
        self.cache_root().join("cache/dirty.json")
    }

    pub fn embedding_cache_path(&self) -> PathBuf {
        self.cache_root().join("cache/semantic/embeddings.msgpack")
    }

    pub fn config_path(&self) -> PathBuf {
        self.cache_root().join("config.yaml")
    }

    /// Create every directory in the layout with mode 0755 (no-op on non-unix).
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [
            self.cache_root(),
            self.cache_root().join("cache"),
            self.cache_root().join("cache/semantic"),
        ] {
            std::fs::create_dir_all(&dir)?;
            set_mode(&dir, 0o755)?;
        }
        Ok(())
    }
}

/// Credential-bearing files (the config file, which may carry an API key)
/// get 0600; everything else in the layout gets 0644.
pub fn harden_permissions(path: &Path, credential_bearing: bool) -> std::io::Result<()> {
    set_mode(path, if credential_bearing { 0o600 } else { 0o644 })
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(mode);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
