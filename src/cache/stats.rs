//! Cache Statistics Module
//!
//! Tracks cache performance counters and assembles point-in-time
//! snapshots for callers.

use serde::Serialize;

// == Cache Counters ==
/// Monotonic performance counters maintained by the engine.
#[derive(Debug, Clone, Default)]
pub struct CacheCounters {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries removed by the eviction policy
    pub evictions: u64,
    /// Number of entries removed because their TTL lapsed
    pub expirations: u64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates counters with everything at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expiration ==
    /// Increments the expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Cache Stats ==
/// Point-in-time cache snapshot, cheap to produce and serialize.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Sum of advisory value sizes in bytes
    pub memory_estimate: usize,
    /// Age of the oldest entry in milliseconds, None when empty
    pub oldest_entry_age_ms: Option<u64>,
    /// Key with the highest access count, None when empty
    pub most_accessed_key: Option<String>,
    /// Successful retrievals since the engine was created
    pub hits: u64,
    /// Failed retrievals (key absent or expired)
    pub misses: u64,
    /// Entries removed by the eviction policy
    pub evictions: u64,
    /// Entries removed because their TTL lapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
