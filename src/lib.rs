//! Parts Core - Data access layer for an auto-parts marketplace
//!
//! Provides concurrency-limited bulk writes, a TTL cache with pluggable
//! eviction, and cache-first faceted search over an inventory store.

pub mod batch;
pub mod bulk;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod search;
pub mod store;
pub mod tasks;

pub use batch::{BatchHooks, BatchOptions, BatchReport};
pub use bulk::BulkImporter;
pub use cache::{CacheEngine, EvictionKind, SharedCache};
pub use config::Config;
pub use error::{Error, Result, StoreError};
pub use monitor::PerfMonitor;
pub use search::{SearchQuery, SearchResultPage, SearchService};
pub use store::{InventoryStore, MemoryStore};
pub use tasks::spawn_purge_task;
