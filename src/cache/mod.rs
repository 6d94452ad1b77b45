// Cache module for in-memory response caching.
// Memoizes raw response bytes keyed by endpoint URL.

pub mod store;

pub use store::{BoundedStore, CacheStore, MemoryStore};
