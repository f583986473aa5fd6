//! LRU / embedding cache (spec §4.6, C8).
//!
//! The core sits directly on the teacher's own `lru = "0.18"` dependency
//! (already used for the teacher's in-memory chunk/session caches); this
//! module adds the byte-budget eviction and eviction-callback semantics the
//! spec requires, an embedding-specific wrapper keyed by the SHA-256 of the
//! embedding text, and an optional sharded variant mirroring the teacher's
//! per-shard locking idiom.

pub mod embedding;
pub mod sharded;

use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Hash a cache key's backing bytes (embedding text, file content, ...) to a
/// stable hex string used as the LRU key.
pub fn hash_key(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Bounded LRU keyed by `String`, with an optional byte budget on top of the
/// entry-count cap and an eviction callback.
pub struct BoundedCache<V> {
    inner: Mutex<LruCache<String, (V, usize)>>,
    max_bytes: Option<usize>,
    current_bytes: Mutex<usize>,
    on_evict: Option<Box<dyn Fn(&str, &V) + Send + Sync>>,
}

impl<V: Clone> BoundedCache<V> {
    /// `max_size == 0` means unlimited entry count (byte budget still applies
    /// if set), since `lru::LruCache` has no dedicated unbounded variant.
    pub fn new(max_size: usize, max_bytes: Option<usize>) -> Self {
        let cap = if max_size == 0 {
            NonZeroUsize::new(usize::MAX).unwrap()
        } else {
            NonZeroUsize::new(max_size).unwrap()
        };
        Self {
            inner: Mutex::new(LruCache::new(cap)),
            max_bytes,
            current_bytes: Mutex::new(0),
            on_evict: None,
        }
    }

    pub fn with_eviction_callback(mut self, cb: impl Fn(&str, &V) + Send + Sync + 'static) -> Self {
        self.on_evict = Some(Box::new(cb));
        self
    }

    /// Look up `key`, promoting it to most-recently-used on hit.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.lock().expect("cache lock poisoned");
        guard.get(key).map(|(v, _)| v.clone())
    }

    /// Insert `value` of `byte_size` bytes under `key`, evicting LRU entries
    /// (by count, then by byte budget) as needed.
    pub fn set(&self, key: String, value: V, byte_size: usize) {
        let mut guard = self.inner.lock().expect("cache lock poisoned");
        if let Some((old_value, old_size)) = guard.put(key.clone(), (value.clone(), byte_size)) {
            let mut bytes = self.current_bytes.lock().expect("bytes lock poisoned");
            *bytes = bytes.saturating_sub(old_size);
            if let Some(cb) = &self.on_evict {
                cb(&key, &old_value);
            }
        }
        {
            let mut bytes = self.current_bytes.lock().expect("bytes lock poisoned");
            *bytes += byte_size;
        }

        if let Some(budget) = self.max_bytes {
            loop {
                let over_budget = {
                    let bytes = self.current_bytes.lock().expect("bytes lock poisoned");
                    *bytes > budget
                };
                if !over_budget {
                    break;
                }
                match guard.pop_lru() {
                    Some((evicted_key, (evicted_value, evicted_size))) => {
                        let mut bytes = self.current_bytes.lock().expect("bytes lock poisoned");
                        *bytes = bytes.saturating_sub(evicted_size);
                        if let Some(cb) = &self.on_evict {
                            cb(&evicted_key, &evicted_value);
                        }
                    }
                    None => break,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().expect("cache lock poisoned").clear();
        *self.current_bytes.lock().expect("bytes lock poisoned") = 0;
    }
}
