//! Optional sharded cache wrapper (spec §4.6).
//!
//! `N` independent [`BoundedCache`]s selected by hashing the key, mirroring
//! the teacher's per-shard locking idiom for its in-memory caches — reduces
//! lock contention under concurrent `rayon` fan-out without giving up LRU
//! semantics within each shard.

use super::BoundedCache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub struct ShardedCache<V> {
    shards: Vec<BoundedCache<V>>,
}

impl<V: Clone> ShardedCache<V> {
    pub fn new(shard_count: usize, max_size_per_shard: usize, max_bytes_per_shard: Option<usize>) -> Self {
        let shard_count = shard_count.max(1);
        let shards = (0..shard_count)
            .map(|_| BoundedCache::new(max_size_per_shard, max_bytes_per_shard))
            .collect();
        Self { shards }
    }

    fn shard_for(&self, key: &str) -> &BoundedCache<V> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let idx = (hasher.finish() as usize) % self.shards.len();
        &self.shards[idx]
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.shard_for(key).get(key)
    }

    pub fn set(&self, key: String, value: V, byte_size: usize) {
        self.shard_for(&key).set(key.clone(), value, byte_size);
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
