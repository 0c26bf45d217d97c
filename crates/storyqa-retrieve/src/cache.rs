//! Bounded in-memory embedding cache keyed by exact text.
//!
//! Least-recently-used entries are evicted once `capacity` is reached. The
//! cache is owned by whoever builds the pipeline and shared through an `Arc`;
//! all access goes through one mutex.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use storyqa_core::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

struct Inner {
    entries: LruCache<String, Vec<f32>>,
    stats: CacheStats,
}

pub struct EmbeddingCache {
    inner: Mutex<Inner>,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::InvalidArgument("cache capacity must be at least 1".to_string()))?;
        Ok(Self { inner: Mutex::new(Inner { entries: LruCache::new(capacity), stats: CacheStats::default() }) })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up `text`, marking it most recently used on a hit.
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let mut inner = self.lock();
        let found = inner.entries.get(text).cloned();
        if found.is_some() { inner.stats.hits += 1; } else { inner.stats.misses += 1; }
        found
    }

    pub fn put(&self, text: String, vector: Vec<f32>) {
        let mut inner = self.lock();
        inner.stats.inserts += 1;
        if let Some((evicted, _)) = inner.entries.push(text.clone(), vector) {
            if evicted != text {
                inner.stats.evictions += 1;
                debug!(evicted_len = evicted.len(), "evicted cached embedding");
            }
        }
    }

    pub fn contains(&self, text: &str) -> bool { self.lock().entries.contains(text) }

    pub fn len(&self) -> usize { self.lock().entries.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.lock().entries.cap().get() }

    pub fn stats(&self) -> CacheStats { self.lock().stats }
}
