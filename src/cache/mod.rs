//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and pluggable eviction
//! strategies, generic over the cached value type.

mod engine;
mod entry;
mod stats;
mod strategy;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::{CacheEngine, SharedCache};
pub use entry::CacheEntry;
pub use stats::{CacheCounters, CacheStats};
pub use strategy::{
    EvictionCandidate, EvictionKind, EvictionStrategy, ExpiryProximityStrategy, FrequencyStrategy,
    RecencyStrategy,
};
