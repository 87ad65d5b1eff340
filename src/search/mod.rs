//! Search Module
//!
//! Faceted part search with a cache-first read path.

pub mod query;
pub mod service;

pub use query::{SearchQuery, SearchResultPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use service::SearchService;
