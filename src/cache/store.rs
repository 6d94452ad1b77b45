// Cache stores for raw response bytes.
// Keys are endpoint URL strings; values are the exact bytes the transport returned.

use bytes::Bytes;
use dashmap::DashMap;
use moka::sync::Cache;

/// Key/value store that memoizes response bodies for the life of the process.
pub trait CacheStore: Send + Sync {
    /// Look up the bytes stored under `key`.
    fn get(&self, key: &str) -> Option<Bytes>;

    /// Insert or overwrite the bytes stored under `key`.
    fn put(&self, key: &str, bytes: Bytes);

    /// Number of entries currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Unbounded concurrent store. Entries are never evicted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Bytes>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Bytes> {
        // Bytes clones share the underlying buffer.
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: &str, bytes: Bytes) {
        self.entries.insert(key.to_string(), bytes);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

/// Concurrent store holding at most `capacity` entries.
///
/// The bound counts entries, not bytes. Entries may be discarded when the
/// store is full, so a populated key is not guaranteed to stay. Use
/// [`MemoryStore`] when every fetched response must remain cached.
#[derive(Clone)]
pub struct BoundedStore {
    entries: Cache<String, Bytes>,
    capacity: u64,
}

impl BoundedStore {
    /// Create a store that keeps at most `capacity` entries.
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::new(capacity),
            capacity,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl std::fmt::Debug for BoundedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedStore")
            .field("capacity", &self.capacity)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl CacheStore for BoundedStore {
    fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.get(key)
    }

    fn put(&self, key: &str, bytes: Bytes) {
        self.entries.insert(key.to_string(), bytes);
    }

    fn len(&self) -> usize {
        // Entry counts lag behind inserts until housekeeping runs.
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
