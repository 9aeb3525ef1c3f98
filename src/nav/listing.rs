//! Bounded directory-listing cache.
//!
//! Listing a directory is blocking I/O, so misses are computed on a worker
//! via `spawn_blocking` while the interactive thread awaits the result. Hits
//! resume synchronously. Entries are keyed by `(path, limit)` and evicted
//! strictly least-recently-used at a fixed capacity; they are never refreshed
//! by time, only by explicit invalidation through [`ListingCache::reload`].
//!
//! The store lock is released during the blocking read, so two tasks missing
//! the same key may both perform the read. The later insert wins and exactly
//! one entry survives per key; redundant reads are accepted in exchange for
//! never holding the lock across I/O.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::ListingError;

/// Maximum number of children fetched per listing request.
pub const DEFAULT_LISTING_LIMIT: usize = 100;

/// Maximum number of distinct `(path, limit)` keys held by the cache.
pub const CACHE_CAPACITY: usize = 100;

type ListingKey = (PathBuf, usize);

/// Fixed-capacity map with access-order eviction.
///
/// Both lookups and inserts count as access; the front of `order` is the
/// least recently used key.
struct LruStore {
    capacity: usize,
    entries: HashMap<ListingKey, Arc<Vec<PathBuf>>>,
    order: VecDeque<ListingKey>,
}

impl LruStore {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    fn touch(&mut self, key: &ListingKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());
    }

    fn get(&mut self, key: &ListingKey) -> Option<Arc<Vec<PathBuf>>> {
        let value = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(value)
    }

    fn insert(&mut self, key: ListingKey, value: Arc<Vec<PathBuf>>) {
        if self.entries.insert(key.clone(), value).is_none() && self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.touch(&key);
    }

    /// Drop every key whose stored path equals `path`, regardless of limit.
    fn remove_path(&mut self, path: &Path) {
        self.entries.retain(|(p, _), _| p != path);
        self.order.retain(|(p, _)| p != path);
    }
}

/// Cache of directory children, backed by off-thread blocking reads.
pub struct ListingCache {
    store: Mutex<LruStore>,
    io_reads: AtomicU64,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Mutex::new(LruStore::new(capacity)),
            io_reads: AtomicU64::new(0),
        }
    }

    /// Up to `limit` children of `path`, in filesystem iteration order.
    ///
    /// Cache hits return without touching the filesystem. A failed read is
    /// propagated and nothing is stored, so the next call retries.
    pub async fn list(
        &self,
        path: &Path,
        limit: usize,
    ) -> Result<Arc<Vec<PathBuf>>, ListingError> {
        let key = (path.to_path_buf(), limit);

        if let Ok(mut store) = self.store.lock() {
            if let Some(cached) = store.get(&key) {
                return Ok(cached);
            }
        }

        self.io_reads.fetch_add(1, Ordering::Relaxed);
        let read_path = key.0.clone();
        let children = tokio::task::spawn_blocking(move || read_children(&read_path, limit))
            .await
            .map_err(|e| io::Error::other(e.to_string()))
            .and_then(|r| r)
            .map_err(|source| ListingError::Unreadable {
                path: key.0.clone(),
                source,
            })?;

        let children = Arc::new(children);
        if let Ok(mut store) = self.store.lock() {
            store.insert(key, Arc::clone(&children));
        }
        Ok(children)
    }

    /// Invalidate every cached listing for `path`, forcing the next `list`
    /// call to recompute.
    pub fn reload(&self, path: &Path) {
        if let Ok(mut store) = self.store.lock() {
            store.remove_path(path);
        }
    }

    /// Number of blocking directory reads performed so far.
    #[allow(dead_code)]
    pub fn io_reads(&self) -> u64 {
        self.io_reads.load(Ordering::Relaxed)
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Read up to `limit` entries of a directory. Unreadable individual entries
/// are skipped; an unreadable directory is an error.
fn read_children(path: &Path, limit: usize) -> io::Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in std::fs::read_dir(path)?.take(limit) {
        match entry {
            Ok(e) => children.push(e.path()),
            Err(_) => continue,
        }
    }
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn setup_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn repeated_listings_hit_the_cache() {
        let dir = setup_dir(&["a", "b", "c"]);
        let cache = ListingCache::new();

        let first = cache.list(dir.path(), 100).await.unwrap();
        let second = cache.list(dir.path(), 100).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.io_reads(), 1);
    }

    #[tokio::test]
    async fn different_limits_are_distinct_keys() {
        let dir = setup_dir(&["a", "b", "c"]);
        let cache = ListingCache::new();

        let narrow = cache.list(dir.path(), 2).await.unwrap();
        let wide = cache.list(dir.path(), 100).await.unwrap();

        assert_eq!(narrow.len(), 2);
        assert_eq!(wide.len(), 3);
        assert_eq!(cache.io_reads(), 2);
    }

    #[tokio::test]
    async fn limit_caps_returned_children() {
        let dir = setup_dir(&["a", "b", "c", "d", "e"]);
        let cache = ListingCache::new();
        let children = cache.list(dir.path(), 3).await.unwrap();
        assert_eq!(children.len(), 3);
    }

    #[tokio::test]
    async fn inserting_one_past_capacity_evicts_the_oldest_key() {
        let dir = setup_dir(&["a"]);
        let cache = ListingCache::new();

        // 101 distinct keys: same path, limits 1..=101.
        for limit in 1..=CACHE_CAPACITY + 1 {
            cache.list(dir.path(), limit).await.unwrap();
        }
        assert_eq!(cache.io_reads(), (CACHE_CAPACITY + 1) as u64);

        // Only the least-recently-used key (limit 1) was evicted.
        cache.list(dir.path(), 2).await.unwrap();
        assert_eq!(cache.io_reads(), (CACHE_CAPACITY + 1) as u64);
        cache.list(dir.path(), 1).await.unwrap();
        assert_eq!(cache.io_reads(), (CACHE_CAPACITY + 2) as u64);
    }

    #[tokio::test]
    async fn access_refreshes_recency() {
        let dir = setup_dir(&["a"]);
        let cache = ListingCache::with_capacity(2);

        cache.list(dir.path(), 1).await.unwrap();
        cache.list(dir.path(), 2).await.unwrap();
        // Touch limit-1 so limit-2 becomes least recent.
        cache.list(dir.path(), 1).await.unwrap();
        cache.list(dir.path(), 3).await.unwrap();

        let before = cache.io_reads();
        cache.list(dir.path(), 1).await.unwrap();
        assert_eq!(cache.io_reads(), before, "refreshed key should survive");
        cache.list(dir.path(), 2).await.unwrap();
        assert_eq!(cache.io_reads(), before + 1, "stale key should be evicted");
    }

    #[tokio::test]
    async fn reload_forces_fresh_io_for_every_limit() {
        let dir = setup_dir(&["a", "b"]);
        let cache = ListingCache::new();

        cache.list(dir.path(), 1).await.unwrap();
        cache.list(dir.path(), 2).await.unwrap();
        assert_eq!(cache.io_reads(), 2);

        cache.reload(dir.path());

        cache.list(dir.path(), 1).await.unwrap();
        cache.list(dir.path(), 2).await.unwrap();
        assert_eq!(cache.io_reads(), 4);
    }

    #[tokio::test]
    async fn reload_leaves_other_paths_cached() {
        let dir_a = setup_dir(&["a"]);
        let dir_b = setup_dir(&["b"]);
        let cache = ListingCache::new();

        cache.list(dir_a.path(), 100).await.unwrap();
        cache.list(dir_b.path(), 100).await.unwrap();
        cache.reload(dir_a.path());

        let before = cache.io_reads();
        cache.list(dir_b.path(), 100).await.unwrap();
        assert_eq!(cache.io_reads(), before);
    }

    #[tokio::test]
    async fn reload_picks_up_new_entries() {
        let dir = setup_dir(&["a"]);
        let cache = ListingCache::new();

        assert_eq!(cache.list(dir.path(), 100).await.unwrap().len(), 1);
        File::create(dir.path().join("b")).unwrap();
        assert_eq!(cache.list(dir.path(), 100).await.unwrap().len(), 1);

        cache.reload(dir.path());
        assert_eq!(cache.list(dir.path(), 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_listing_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let cache = ListingCache::new();

        assert!(cache.list(&missing, 100).await.is_err());

        std::fs::create_dir(&missing).unwrap();
        File::create(missing.join("now-here")).unwrap();
        let children = cache.list(&missing, 100).await.unwrap();
        assert_eq!(children.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_listings_agree() {
        let dir = setup_dir(&["a", "b", "c"]);
        let cache = Arc::new(ListingCache::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let path = dir.path().to_path_buf();
            handles.push(tokio::spawn(
                async move { cache.list(&path, 100).await.unwrap() },
            ));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        for pair in results.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
        // Duplicate in-flight misses are tolerated, but one entry survives:
        // a follow-up call performs no further I/O.
        let before = cache.io_reads();
        cache.list(dir.path(), 100).await.unwrap();
        assert_eq!(cache.io_reads(), before);
    }
}
