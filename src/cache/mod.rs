// Cache module.
// Process-wide in-memory memoization of repository stats snapshots.

pub mod store;

pub use store::{CacheEntry, CacheStats, DEFAULT_TTL, TtlCache};
