use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::index_stream_cache_key::IndexStreamCacheKey;
use super::index_stream_cache_stats::IndexStreamCacheStats;
use super::index_stream_handle::IndexStreamHandle;
use crate::engine::errors::IndexCacheError;
use crate::shared::config::CONFIG;

/// Process-wide LRU of raw index streams, bounded by total bytes.
#[derive(Debug)]
pub struct IndexStreamCache {
    inner: Mutex<LruCache<IndexStreamCacheKey, Arc<[u8]>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    current_bytes: AtomicUsize,
    capacity_bytes: AtomicUsize,
}

static GLOBAL_INDEX_STREAM_CACHE: Lazy<Arc<IndexStreamCache>> = Lazy::new(|| {
    Arc::new(IndexStreamCache::new(
        CONFIG.cache.index_stream_cache_max_bytes,
    ))
});

impl IndexStreamCache {
    pub fn new(capacity_bytes: usize) -> Self {
        // Count is unbounded; eviction is driven by the byte counter.
        Self {
            inner: Mutex::new(LruCache::unbounded()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            current_bytes: AtomicUsize::new(0),
            capacity_bytes: AtomicUsize::new(capacity_bytes),
        }
    }

    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_INDEX_STREAM_CACHE)
    }

    pub fn lookup(&self, key: &IndexStreamCacheKey) -> Option<IndexStreamHandle> {
        let mut guard = self.inner.lock().ok()?;
        match guard.get(key) {
            Some(bytes) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(IndexStreamHandle::new(Arc::clone(bytes)))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Takes ownership of `bytes` and returns a handle onto the cached copy.
    /// Replaces an existing entry under the same key.
    pub fn insert(
        &self,
        key: IndexStreamCacheKey,
        bytes: Vec<u8>,
    ) -> Result<IndexStreamHandle, IndexCacheError> {
        let size = bytes.len();
        let capacity = self.capacity_bytes.load(Ordering::Relaxed);
        if size > capacity {
            warn!(
                target: "colseg::cache",
                size,
                capacity,
                column_unique_id = key.column_unique_id,
                "Index stream larger than cache capacity"
            );
            return Err(IndexCacheError::EntryTooLarge { size, capacity });
        }

        let bytes: Arc<[u8]> = Arc::from(bytes);
        let mut guard = self.inner.lock().map_err(|_| IndexCacheError::Poisoned)?;
        if let Some(prev) = guard.put(key, Arc::clone(&bytes)) {
            self.current_bytes.fetch_sub(prev.len(), Ordering::Relaxed);
        }
        self.current_bytes.fetch_add(size, Ordering::Relaxed);
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.evict_locked(&mut guard, capacity);

        Ok(IndexStreamHandle::new(bytes))
    }

    /// Gives a handle back. The bytes are freed once the cache and every other
    /// holder have let go of them.
    pub fn release(&self, handle: IndexStreamHandle) {
        drop(handle);
    }

    pub fn resize_bytes(&self, new_capacity_bytes: usize) {
        self.capacity_bytes
            .store(new_capacity_bytes, Ordering::Relaxed);
        if let Ok(mut guard) = self.inner.lock() {
            self.evict_locked(&mut guard, new_capacity_bytes);
        }
    }

    pub fn stats(&self) -> IndexStreamCacheStats {
        IndexStreamCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            current_bytes: self.current_bytes.load(Ordering::Relaxed),
            capacity_bytes: self.capacity_bytes.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn clear_for_test(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.clear();
        }
        self.current_bytes.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    fn evict_locked(&self, guard: &mut LruCache<IndexStreamCacheKey, Arc<[u8]>>, capacity: usize) {
        while self.current_bytes.load(Ordering::Relaxed) > capacity {
            let Some((key, bytes)) = guard.pop_lru() else {
                break;
            };
            self.current_bytes.fetch_sub(bytes.len(), Ordering::Relaxed);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            if tracing::enabled!(tracing::Level::DEBUG) {
                debug!(
                    target: "colseg::cache",
                    file = %key.file_identity,
                    column_unique_id = key.column_unique_id,
                    kind = ?key.kind,
                    size = bytes.len(),
                    "Evicted index stream"
                );
            }
        }
    }
}
