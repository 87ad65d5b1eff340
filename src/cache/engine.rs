//! Cache Engine Module
//!
//! Main cache engine combining HashMap storage with access accounting,
//! TTL expiration and a pluggable eviction strategy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::cache::entry::{current_timestamp_ms, CacheEntry};
use crate::cache::stats::{CacheCounters, CacheStats};
use crate::cache::strategy::{EvictionCandidate, EvictionKind, EvictionStrategy};

// == Shared Handle ==
/// Shared, lock-guarded cache handle used across tasks.
pub type SharedCache<V> = Arc<RwLock<CacheEngine<V>>>;

// == Cache Engine ==
/// Bounded key-value cache with per-entry TTL.
///
/// Access accounting (last access time and access count) lives in two
/// side maps created and removed together with the entry itself, so the
/// three maps always cover the same key set.
#[derive(Debug)]
pub struct CacheEngine<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Last access timestamp per key (Unix milliseconds)
    last_access: HashMap<String, u64>,
    /// Lifetime access count per key, starting at 1 on insert
    access_count: HashMap<String, u64>,
    /// Victim-selection policy, fixed at construction
    strategy: Box<dyn EvictionStrategy>,
    /// Performance counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Default TTL for entries stored without an explicit one
    default_ttl: Duration,
}

impl<V: Clone + Serialize> CacheEngine<V> {
    // == Constructor ==
    /// Creates a new CacheEngine with the given capacity, default TTL and
    /// eviction policy.
    ///
    /// A zero capacity is rounded up to one so that inserts always have a
    /// slot to land in.
    pub fn new(max_size: usize, default_ttl: Duration, kind: EvictionKind) -> Self {
        Self {
            entries: HashMap::new(),
            last_access: HashMap::new(),
            access_count: HashMap::new(),
            strategy: kind.build(),
            counters: CacheCounters::new(),
            max_size: max_size.max(1),
            default_ttl,
        }
    }

    // == Shared Constructor ==
    /// Creates an engine already wrapped for shared use across tasks.
    pub fn shared(max_size: usize, default_ttl: Duration, kind: EvictionKind) -> SharedCache<V> {
        Arc::new(RwLock::new(Self::new(max_size, default_ttl, kind)))
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// Overwriting an existing key resets its accounting: the entry is
    /// treated as brand new. Inserting a new key into a full cache evicts
    /// exactly one entry, chosen by the configured strategy, before the
    /// insert.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the default when None)
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_size {
            self.evict_one();
        }

        let effective_ttl = ttl.unwrap_or(self.default_ttl);
        let approx_size = serde_json::to_vec(&value).map(|b| b.len()).unwrap_or(0);

        let entry = CacheEntry::new(value, effective_ttl, approx_size);
        let created_at = entry.created_at;

        self.entries.insert(key.clone(), entry);
        self.last_access.insert(key.clone(), created_at);
        self.access_count.insert(key, 1);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and not expired. An expired entry is
    /// removed on observation and reported as a plain miss; lookups never
    /// fail structurally.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired(now) {
                self.remove_entry(key);
                self.counters.record_expiration();
                self.counters.record_miss();
                return None;
            }

            let value = entry.value.clone();
            self.touch(key, now);
            self.counters.record_hit();
            Some(value)
        } else {
            self.counters.record_miss();
            None
        }
    }

    // == Has ==
    /// Checks whether a live entry exists for `key`.
    ///
    /// Does not count as an access: last access time, access count and the
    /// hit/miss counters are left untouched. An expired entry found here is
    /// still removed.
    pub fn has(&mut self, key: &str) -> bool {
        let now = current_timestamp_ms();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired(now) {
                self.remove_entry(key);
                self.counters.record_expiration();
                return false;
            }
            true
        } else {
            false
        }
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    ///
    /// # Arguments
    /// * `key` - The key to delete
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Cleanup ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.remove_entry(&key);
            self.counters.record_expiration();
        }

        count
    }

    // == Stats ==
    /// Returns a point-in-time snapshot of cache state and counters.
    pub fn stats(&self) -> CacheStats {
        let now = current_timestamp_ms();

        let memory_estimate = self.entries.values().map(|e| e.approx_size).sum();
        let oldest_entry_age_ms = self.entries.values().map(|e| e.age_ms(now)).max();

        // Highest access count; ties resolve to the lowest key so the
        // snapshot is deterministic.
        let most_accessed_key = self
            .access_count
            .values()
            .max()
            .copied()
            .and_then(|top| {
                self.access_count
                    .iter()
                    .filter(|(_, count)| **count == top)
                    .map(|(key, _)| key)
                    .min()
                    .cloned()
            });

        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            memory_estimate,
            oldest_entry_age_ms,
            most_accessed_key,
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            expirations: self.counters.expirations,
        }
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Capacity ==
    /// Returns the configured maximum number of entries.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Evict One ==
    /// Removes exactly one entry chosen by the configured strategy.
    fn evict_one(&mut self) {
        let candidates: Vec<EvictionCandidate<'_>> = self
            .entries
            .iter()
            .map(|(key, entry)| EvictionCandidate {
                key: key.as_str(),
                last_access: self.last_access.get(key).copied().unwrap_or(0),
                access_count: self.access_count.get(key).copied().unwrap_or(0),
                expires_at: entry.expires_at(),
            })
            .collect();

        if let Some(victim) = self.strategy.choose_victim(&candidates).map(str::to_owned) {
            self.remove_entry(&victim);
            self.counters.record_eviction();
        }
    }

    // == Touch ==
    /// Marks an existing key as accessed now.
    fn touch(&mut self, key: &str, now: u64) {
        if let Some(last) = self.last_access.get_mut(key) {
            *last = now;
        }
        if let Some(count) = self.access_count.get_mut(key) {
            *count += 1;
        }
    }

    // == Remove Entry ==
    /// Removes an entry together with its accounting, keeping the three
    /// maps over the same key set.
    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.last_access.remove(key);
            self.access_count.remove(key);
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn accounting_in_sync(&self) -> bool {
        self.entries.len() == self.last_access.len()
            && self.entries.len() == self.access_count.len()
            && self
                .entries
                .keys()
                .all(|k| self.last_access.contains_key(k) && self.access_count.contains_key(k))
    }
}
