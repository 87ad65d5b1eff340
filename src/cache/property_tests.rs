//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify cache invariants across randomized operation
//! sequences.

use proptest::prelude::*;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{CacheEngine, EvictionKind};

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

fn test_engine(max_size: usize, kind: EvictionKind) -> CacheEngine<String> {
    CacheEngine::new(max_size, TEST_DEFAULT_TTL, kind)
}

// == Strategies ==
/// Generates cache keys (non-empty, bounded length)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Has { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn all_kinds() -> [EvictionKind; 3] {
    [
        EvictionKind::Recency,
        EvictionKind::Frequency,
        EvictionKind::ExpiryProximity,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, the hit and miss counters reflect
    // exactly the get() calls that occurred; has() never counts.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut cache = test_engine(TEST_MAX_SIZE, EvictionKind::Recency);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key, value, None);
                }
                CacheOp::Get { key } => {
                    match cache.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Has { key } => {
                    let _ = cache.has(&key);
                }
                CacheOp::Delete { key } => {
                    let _ = cache.delete(&key);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, cache.len(), "Size mismatch");
    }

    // For any key-value pair, storing then retrieving before expiry
    // returns exactly the stored value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut cache = test_engine(TEST_MAX_SIZE, EvictionKind::Recency);

        cache.set(key.clone(), value.clone(), None);

        let retrieved = cache.get(&key);
        prop_assert_eq!(retrieved, Some(value), "Round-trip value mismatch");
    }

    // For any stored key, delete() removes it and a subsequent get()
    // returns None.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut cache = test_engine(TEST_MAX_SIZE, EvictionKind::Recency);

        cache.set(key.clone(), value, None);
        prop_assert!(cache.has(&key), "Key should exist before delete");

        prop_assert!(cache.delete(&key), "Delete should report removal");
        prop_assert_eq!(cache.get(&key), None, "Key should not exist after delete");
    }

    // For any key, storing V1 then V2 makes get() return V2 with a single
    // entry occupied.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut cache = test_engine(TEST_MAX_SIZE, EvictionKind::Recency);

        cache.set(key.clone(), value1, None);
        cache.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(cache.get(&key), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(cache.len(), 1, "Should have exactly one entry after overwrite");
    }

    // For any sequence of inserts under any eviction policy, the entry
    // count never exceeds capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let max_size = 50;

        for kind in all_kinds() {
            let mut cache = test_engine(max_size, kind);

            for (key, value) in &entries {
                cache.set(key.clone(), value.clone(), None);
                prop_assert!(
                    cache.len() <= max_size,
                    "Cache size {} exceeds max {} under {:?}",
                    cache.len(),
                    max_size,
                    kind
                );
            }
        }
    }

    // For any sequence of operations under any eviction policy, the
    // accounting maps cover exactly the stored key set.
    #[test]
    fn prop_accounting_stays_in_sync(
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        for kind in all_kinds() {
            let mut cache = test_engine(10, kind);

            for op in ops.clone() {
                match op {
                    CacheOp::Set { key, value } => cache.set(key, value, None),
                    CacheOp::Get { key } => { let _ = cache.get(&key); }
                    CacheOp::Has { key } => { let _ = cache.has(&key); }
                    CacheOp::Delete { key } => { let _ = cache.delete(&key); }
                }

                prop_assert!(
                    cache.accounting_in_sync(),
                    "Accounting maps out of sync under {:?}",
                    kind
                );
            }
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // For any entry stored with a TTL, a get() after the TTL has fully
    // elapsed returns None and drops the entry.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let mut cache = test_engine(TEST_MAX_SIZE, EvictionKind::Recency);

        cache.set(key.clone(), value.clone(), Some(Duration::from_millis(40)));

        let before = cache.get(&key);
        prop_assert_eq!(before, Some(value), "Entry should exist before TTL expires");

        sleep(Duration::from_millis(80));

        prop_assert_eq!(cache.get(&key), None, "Entry should be gone after TTL expires");
        prop_assert_eq!(cache.len(), 0, "Expired entry should be removed");
    }

    // For any set of distinct keys inserted in order, recency eviction
    // drops the first-inserted (least recently accessed) key.
    #[test]
    fn prop_recency_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy(),
        new_value in valid_value_strategy()
    ) {
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut cache = test_engine(capacity, EvictionKind::Recency);

        // Millisecond timestamps need real time between inserts to order
        let oldest_key = unique_keys[0].clone();
        for key in &unique_keys {
            cache.set(key.clone(), format!("value_{}", key), None);
            sleep(Duration::from_millis(2));
        }

        prop_assert_eq!(cache.len(), capacity, "Cache should be at capacity");

        cache.set(new_key.clone(), new_value, None);

        prop_assert_eq!(cache.len(), capacity, "Cache should remain at capacity after eviction");
        prop_assert!(
            !cache.has(&oldest_key),
            "Oldest key '{}' should have been evicted",
            oldest_key
        );
        prop_assert!(cache.has(&new_key), "New key '{}' should exist", new_key);

        for key in unique_keys.iter().skip(1) {
            prop_assert!(cache.has(key), "Key '{}' should still exist", key);
        }
    }

    // For any full cache, touching the next recency victim via get()
    // redirects eviction to the following candidate.
    #[test]
    fn prop_recency_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..6),
        new_key in valid_key_strategy(),
        new_value in valid_value_strategy()
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut cache = test_engine(capacity, EvictionKind::Recency);

        for key in &unique_keys {
            cache.set(key.clone(), format!("value_{}", key), None);
            sleep(Duration::from_millis(2));
        }

        // Touch the would-be victim; the second key becomes oldest
        let accessed_key = unique_keys[0].clone();
        let _ = cache.get(&accessed_key);
        sleep(Duration::from_millis(2));

        let expected_evicted = unique_keys[1].clone();

        cache.set(new_key.clone(), new_value, None);

        prop_assert!(
            cache.has(&accessed_key),
            "Accessed key '{}' should not be evicted after being touched",
            accessed_key
        );
        prop_assert!(
            !cache.has(&expected_evicted),
            "Key '{}' should have been evicted as the oldest after the touch",
            expected_evicted
        );
        prop_assert!(cache.has(&new_key), "New key should exist");
    }
}

// == Property Test for Concurrent Operation Correctness ==
// Thread-safe access through Arc<RwLock<CacheEngine>>

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // For any set of concurrent operations, reads only ever observe
    // complete values and the engine stays internally consistent.
    #[test]
    fn prop_concurrent_operation_correctness(
        initial_keys in prop::collection::vec(valid_key_strategy(), 1..20),
        op_keys in prop::collection::vec((valid_key_strategy(), 0u8..4), 10..50)
    ) {
        use std::sync::Arc;
        use tokio::sync::RwLock;

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache = Arc::new(RwLock::new(test_engine(TEST_MAX_SIZE, EvictionKind::Recency)));

            {
                let mut guard = cache.write().await;
                for key in &initial_keys {
                    guard.set(key.clone(), format!("value_{}", key), None);
                }
            }

            let mut handles = vec![];

            for (key, op_code) in op_keys {
                let cache = Arc::clone(&cache);

                let handle = tokio::spawn(async move {
                    match op_code {
                        0 => {
                            let mut guard = cache.write().await;
                            guard.set(key.clone(), format!("value_{}", key), None);
                            Ok::<_, String>(())
                        }
                        1 => {
                            let mut guard = cache.write().await;
                            if let Some(value) = guard.get(&key) {
                                // Values are derived from their key, so a
                                // torn or stale read is detectable
                                if value != format!("value_{}", key) {
                                    return Err(format!(
                                        "Read unexpected value '{}' for key '{}'",
                                        value, key
                                    ));
                                }
                            }
                            Ok(())
                        }
                        2 => {
                            let mut guard = cache.write().await;
                            let _ = guard.has(&key);
                            Ok(())
                        }
                        _ => {
                            let mut guard = cache.write().await;
                            let _ = guard.delete(&key);
                            Ok(())
                        }
                    }
                });

                handles.push(handle);
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            let guard = cache.read().await;
            let stats = guard.stats();

            prop_assert!(stats.size <= TEST_MAX_SIZE, "Cache should not exceed capacity");

            let hit_rate = stats.hit_rate();
            prop_assert!(
                (0.0..=1.0).contains(&hit_rate),
                "Hit rate should be between 0 and 1, got {}",
                hit_rate
            );

            Ok(())
        })?;
    }
}
