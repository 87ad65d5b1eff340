//! Configuration Module
//!
//! Handles loading and managing data-layer configuration from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::batch::BatchOptions;
use crate::cache::EvictionKind;

/// Data-layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Records per bulk sub-batch
    pub batch_size: usize,
    /// Maximum number of batches in flight at once
    pub max_concurrency: usize,
    /// Per-batch timeout in milliseconds
    pub timeout_ms: u64,
    /// Default TTL in milliseconds for cached search pages
    pub cache_ttl_ms: u64,
    /// Maximum number of entries the cache can hold
    pub cache_max_size: usize,
    /// Eviction policy applied when the cache is full
    pub cache_strategy: EvictionKind,
    /// Background purge task interval in milliseconds
    pub purge_interval_ms: u64,
    /// Cache size above which the purge task actually sweeps
    pub purge_threshold: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset or unparseable variables fall back to their defaults.
    ///
    /// # Environment Variables
    /// - `BULK_BATCH_SIZE` - Records per sub-batch (default: 1000)
    /// - `BULK_MAX_CONCURRENCY` - Batches in flight at once (default: 5)
    /// - `BULK_TIMEOUT_MS` - Per-batch timeout (default: 30000)
    /// - `CACHE_TTL_MS` - Cached page TTL (default: 300000)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_STRATEGY` - `recency`, `frequency` or `expiry-proximity` (default: recency)
    /// - `CACHE_PURGE_INTERVAL_MS` - Purge frequency (default: 60000)
    /// - `CACHE_PURGE_THRESHOLD` - Entry count that triggers a sweep (default: 800)
    pub fn from_env() -> Self {
        Self {
            batch_size: env::var("BULK_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            max_concurrency: env::var("BULK_MAX_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            timeout_ms: env::var("BULK_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            cache_ttl_ms: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            cache_max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            cache_strategy: env::var("CACHE_STRATEGY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            purge_interval_ms: env::var("CACHE_PURGE_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60_000),
            purge_threshold: env::var("CACHE_PURGE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
        }
    }

    // == Derived Views ==
    /// Bulk executor options built from the batch fields.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            batch_size: self.batch_size,
            max_concurrency: self.max_concurrency,
            per_batch_timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    /// Cached page TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Purge interval as a [`Duration`].
    pub fn purge_interval(&self) -> Duration {
        Duration::from_millis(self.purge_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrency: 5,
            timeout_ms: 30_000,
            cache_ttl_ms: 300_000,
            cache_max_size: 1000,
            cache_strategy: EvictionKind::Recency,
            purge_interval_ms: 60_000,
            purge_threshold: 800,
        }
    }
}
