//! Store Module
//!
//! Boundary to the backing data store. The bulk and search layers only
//! ever talk to storage through [`InventoryStore`], so any relational
//! backend can sit behind it; [`MemoryStore`] is the in-process
//! implementation used by tests and local tooling.

mod filter;
mod memory;

// Re-export public types
pub use filter::{FilterClause, GeoBounds, PartFilter, SortOrder};
pub use memory::MemoryStore;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{ListingStatus, PartHit, PartRecord, SellerRecord, VehicleRecord};

// == Inventory Store ==
/// Entity persistence surface the performance layer requires.
///
/// Each call is a single store round-trip and is atomic from the layer's
/// point of view: a batched write either lands completely or reports one
/// error for the whole call (vehicle inserts are the one exception, where
/// duplicate VINs are silently skipped).
#[async_trait]
pub trait InventoryStore: Send + Sync + 'static {
    /// Inserts vehicles, skipping records whose VIN already exists.
    /// Returns the number actually created.
    async fn create_vehicles(&self, records: Vec<VehicleRecord>) -> Result<u64, StoreError>;

    /// Inserts sellers. Returns the number created.
    async fn create_sellers(&self, records: Vec<SellerRecord>) -> Result<u64, StoreError>;

    /// Inserts parts. Every referenced vehicle, seller and category must
    /// already exist. Returns the number created.
    async fn create_parts(&self, records: Vec<PartRecord>) -> Result<u64, StoreError>;

    /// Sets the listing status on every given part id. Unknown ids are
    /// ignored. Returns the number of rows touched.
    async fn update_part_status(&self, ids: Vec<u64>, status: ListingStatus)
        -> Result<u64, StoreError>;

    /// Deletes the given part ids. Unknown ids are ignored. Returns the
    /// number of rows removed.
    async fn delete_parts(&self, ids: Vec<u64>) -> Result<u64, StoreError>;

    /// Parts matching `filter`, ordered by `sort`, windowed by `limit`
    /// and `offset`.
    async fn find_parts(
        &self,
        filter: &PartFilter,
        sort: SortOrder,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PartHit>, StoreError>;

    /// Number of parts matching `filter`.
    async fn count_parts(&self, filter: &PartFilter) -> Result<u64, StoreError>;

    /// Subset of `ids` that exist as vehicles.
    async fn existing_vehicle_ids(&self, ids: &[u64]) -> Result<HashSet<u64>, StoreError>;

    /// Subset of `ids` that exist as sellers.
    async fn existing_seller_ids(&self, ids: &[u64]) -> Result<HashSet<u64>, StoreError>;

    /// Subset of `ids` that exist as part categories.
    async fn existing_category_ids(&self, ids: &[u64]) -> Result<HashSet<u64>, StoreError>;
}
