//! Search Service Module
//!
//! Cache-first faceted part search. Every query resolves to a canonical
//! key; a hit returns the cached page without touching the store, a miss
//! runs count + find against the store and caches the assembled page
//! under the query's TTL. Store failures pass through unchanged and
//! leave the cache untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheStats, SharedCache};
use crate::error::Result;
use crate::monitor::{OperationSample, PerfMonitor};
use crate::search::query::{SearchQuery, SearchResultPage};
use crate::store::InventoryStore;

// == Search Service ==
/// Read path over an [`InventoryStore`] with a shared result-page cache.
#[derive(Debug)]
pub struct SearchService<S: InventoryStore> {
    store: Arc<S>,
    cache: SharedCache<SearchResultPage>,
    page_ttl: Duration,
    monitor: Option<Arc<PerfMonitor>>,
}

impl<S: InventoryStore> SearchService<S> {
    // == Constructor ==
    /// Creates a service over `store`, caching pages in `cache` for
    /// `page_ttl` each.
    pub fn new(store: Arc<S>, cache: SharedCache<SearchResultPage>, page_ttl: Duration) -> Self {
        Self {
            store,
            cache,
            page_ttl,
            monitor: None,
        }
    }

    /// Attaches a monitor that receives one sample per search.
    pub fn with_monitor(mut self, monitor: Arc<PerfMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Handle to the underlying page cache.
    pub fn cache(&self) -> SharedCache<SearchResultPage> {
        Arc::clone(&self.cache)
    }

    // == Search ==
    /// Runs a faceted search, serving from cache when a fresh page for
    /// the canonical key exists.
    ///
    /// # Arguments
    /// * `query` - Facets, sort and pagination to apply
    ///
    /// # Returns
    /// * `Result<SearchResultPage>` - The page, or the store error verbatim
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResultPage> {
        let started = Instant::now();
        let key = query.canonical_key();

        let cached = self.cache.write().await.get(&key);
        if let Some(page) = cached {
            debug!("search cache hit: {}", key);
            self.record(&started, true, page.items.len() as u64, None)
                .await;
            return Ok(page);
        }
        debug!("search cache miss: {}", key);

        match self.query_store(query).await {
            Ok(page) => {
                self.cache
                    .write()
                    .await
                    .set(key, page.clone(), Some(self.page_ttl));
                self.record(&started, true, page.items.len() as u64, None)
                    .await;
                Ok(page)
            }
            Err(err) => {
                self.record(&started, false, 0, Some(err.to_string())).await;
                Err(err.into())
            }
        }
    }

    /// Snapshot of the page cache's counters and sizes.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Internal Helpers ==
    async fn query_store(
        &self,
        query: &SearchQuery,
    ) -> std::result::Result<SearchResultPage, crate::error::StoreError> {
        let filter = query.to_filter();
        let page = query.effective_page();
        let page_size = query.effective_page_size();
        let offset = (page as usize - 1) * page_size as usize;

        let total_count = self.store.count_parts(&filter).await?;
        let items = self
            .store
            .find_parts(&filter, query.sort, page_size as usize, offset)
            .await?;

        Ok(SearchResultPage::paged(items, total_count, page, page_size))
    }

    async fn record(&self, started: &Instant, success: bool, rows: u64, error: Option<String>) {
        if let Some(monitor) = &self.monitor {
            monitor
                .record(OperationSample {
                    operation: "search_parts".to_string(),
                    duration_ms: started.elapsed().as_millis() as u64,
                    success,
                    rows_affected: Some(rows),
                    error_message: error,
                })
                .await;
        }
    }
}
