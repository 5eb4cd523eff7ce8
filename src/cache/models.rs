//! Answer cache statistics.

// Author: kelexine (https://github.com/kelexine)

/// Statistics for answer cache operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Answers written into the cache (overwrites included).
    pub stores: u64,
}
