//! Content-hash based dirty tracking (spec §4.2, C3).
//!
//! A single shared table behind one `RwLock`, mirroring the teacher's
//! lock-protected shared cache in `src/store/mod.rs` — adapted here to a
//! plain `RwLock<HashMap<...>>` since this layer calls for one shared lock,
//! not sharding.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

const DIRTY_STATE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum DirtyError {
    #[error("failed to read file {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to persist dirty state to {0}: {1}")]
    Write(PathBuf, std::io::Error),
    #[error("corrupt dirty state at {0}: {1}")]
    Corrupt(PathBuf, serde_json::Error),
    #[error("unsupported dirty state version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    content_hash: String,
    is_dirty: bool,
    last_seen_unix: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct OnDisk {
    version: u32,
    files: HashMap<PathBuf, Entry>,
}

/// Shared dirty-state table, keyed by absolute path.
pub struct DirtyTracker {
    inner: RwLock<HashMap<PathBuf, Entry>>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn now_unix() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Hash `path` and record it dirty. A no-op if the hash is unchanged
    /// from what's stored and the entry was already clean.
    pub fn mark_dirty(&self, path: &Path) -> Result<(), DirtyError> {
        let bytes = std::fs::read(path).map_err(|e| DirtyError::Read(path.to_path_buf(), e))?;
        let hash = hash_bytes(&bytes);
        let mut guard = self.inner.write().expect("dirty tracker lock poisoned");
        if let Some(existing) = guard.get(path) {
            if existing.content_hash == hash && !existing.is_dirty {
                return Ok(());
            }
        }
        guard.insert(
            path.to_path_buf(),
            Entry {
                content_hash: hash,
                is_dirty: true,
                last_seen_unix: Self::now_unix(),
            },
        );
        Ok(())
    }

    /// Hash the file at `path` and record it dirty iff the hash differs from
    /// what's stored (or nothing is stored yet). Returns whether it is dirty.
    pub fn check_and_mark(&self, path: &Path) -> Result<bool, DirtyError> {
        let bytes = std::fs::read(path).map_err(|e| DirtyError::Read(path.to_path_buf(), e))?;
        let hash = hash_bytes(&bytes);
        let mut guard = self.inner.write().expect("dirty tracker lock poisoned");
        let now = Self::now_unix();
        let dirty = match guard.get(path) {
            Some(existing) => existing.content_hash != hash,
            None => true,
        };
        guard.insert(
            path.to_path_buf(),
            Entry {
                content_hash: hash,
                is_dirty: dirty,
                last_seen_unix: now,
            },
        );
        Ok(dirty)
    }

    pub fn is_dirty(&self, path: &Path) -> bool {
        self.inner
            .read()
            .expect("dirty tracker lock poisoned")
            .get(path)
            .map(|e| e.is_dirty)
            .unwrap_or(true)
    }

    pub fn get_hash(&self, path: &Path) -> Option<String> {
        self.inner
            .read()
            .expect("dirty tracker lock poisoned")
            .get(path)
            .map(|e| e.content_hash.clone())
    }

    pub fn count(&self) -> usize {
        self.inner
            .read()
            .expect("dirty tracker lock poisoned")
            .values()
            .filter(|e| e.is_dirty)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.inner.read().expect("dirty tracker lock poisoned").len()
    }

    pub fn get_dirty_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .expect("dirty tracker lock poisoned")
            .iter()
            .filter(|(_, e)| e.is_dirty)
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Clear the dirty flag on every entry without discarding hashes.
    pub fn clear_dirty(&self) {
        let mut guard = self.inner.write().expect("dirty tracker lock poisoned");
        for entry in guard.values_mut() {
            entry.is_dirty = false;
        }
    }

    pub fn remove(&self, path: &Path) {
        self.inner
            .write()
            .expect("dirty tracker lock poisoned")
            .remove(path);
    }

    pub fn clear(&self) {
        self.inner.write().expect("dirty tracker lock poisoned").clear();
    }

    pub fn save(&self, path: &Path) -> Result<(), DirtyError> {
        let guard = self.inner.read().expect("dirty tracker lock poisoned");
        let on_disk = OnDisk {
            version: DIRTY_STATE_VERSION,
            files: guard.clone(),
        };
        let json = serde_json::to_vec_pretty(&on_disk)
            .map_err(|e| DirtyError::Write(path.to_path_buf(), std::io::Error::other(e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DirtyError::Write(path.to_path_buf(), e))?;
        }
        std::fs::write(path, json).map_err(|e| DirtyError::Write(path.to_path_buf(), e))
    }

    pub fn load(path: &Path) -> Result<Self, DirtyError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let bytes = std::fs::read(path).map_err(|e| DirtyError::Read(path.to_path_buf(), e))?;
        let on_disk: OnDisk =
            serde_json::from_slice(&bytes).map_err(|e| DirtyError::Corrupt(path.to_path_buf(), e))?;
        if on_disk.version != DIRTY_STATE_VERSION {
            return Err(DirtyError::UnsupportedVersion(on_disk.version));
        }
        Ok(Self {
            inner: RwLock::new(on_disk.files),
        })
    }
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
