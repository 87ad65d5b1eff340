//! Cache Purge Task
//!
//! Background task that periodically sweeps expired entries out of a
//! shared cache, but only once the cache has grown past a configured
//! size threshold. Small caches are left to lazy per-read expiry.

use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically purges expired entries.
///
/// The task sleeps for `interval` between runs. On each run it takes the
/// cache's write lock, and if the entry count exceeds `size_threshold`
/// it removes every expired entry in one sweep. Runs below the threshold
/// are skipped entirely.
///
/// # Arguments
/// * `cache` - Shared cache to sweep
/// * `interval` - Time between purge runs
/// * `size_threshold` - Entry count above which a sweep actually runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_purge_task<V>(
    cache: SharedCache<V>,
    interval: Duration,
    size_threshold: usize,
) -> JoinHandle<()>
where
    V: Clone + Serialize + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "starting cache purge task: interval {}ms, size threshold {}",
            interval.as_millis(),
            size_threshold
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = cache.write().await;
                if guard.len() <= size_threshold {
                    debug!(
                        "cache purge skipped: {} entries at or below threshold {}",
                        guard.len(),
                        size_threshold
                    );
                    continue;
                }
                guard.cleanup()
            };

            if removed > 0 {
                info!("cache purge: removed {} expired entries", removed);
            } else {
                debug!("cache purge: no expired entries found");
            }
        }
    })
}
