//! Bulk Module
//!
//! Entity-aware bulk operations layered on the batch executor. Each
//! operation chunks its input, fans the chunks out to the store under the
//! configured concurrency bound and reports per-item outcomes.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::batch::{self, BatchHooks, BatchOptions, BatchReport};
use crate::error::Result;
use crate::models::{ListingStatus, PartRecord, SellerRecord, VehicleRecord};
use crate::monitor::{OperationSample, PerfMonitor};
use crate::store::InventoryStore;

// == Bulk Importer ==
/// Bulk write facade over an [`InventoryStore`].
///
/// Holds the batching options once so every operation on the importer
/// runs under the same partitioning, concurrency and deadline settings.
pub struct BulkImporter<S> {
    store: Arc<S>,
    options: BatchOptions,
    monitor: Option<Arc<PerfMonitor>>,
}

impl<S: InventoryStore> BulkImporter<S> {
    // == Constructor ==
    /// Creates an importer over `store` with the given batch options.
    pub fn new(store: Arc<S>, options: BatchOptions) -> Self {
        Self {
            store,
            options,
            monitor: None,
        }
    }

    // == With Monitor ==
    /// Attaches a monitor receiving one sample per bulk operation.
    pub fn with_monitor(mut self, monitor: Arc<PerfMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    // == Create Vehicles ==
    /// Bulk-creates vehicles. Records with already-known VINs are skipped
    /// inside the store, so a batch containing them still succeeds.
    pub async fn create_vehicles(
        &self,
        vehicles: Vec<VehicleRecord>,
        hooks: BatchHooks<VehicleRecord>,
    ) -> Result<BatchReport<VehicleRecord, u64>> {
        let store = Arc::clone(&self.store);
        let report = batch::execute(
            vehicles,
            move |chunk| {
                let store = Arc::clone(&store);
                async move { store.create_vehicles(chunk).await }
            },
            &self.options,
            hooks,
        )
        .await?;

        self.finish("bulk_create_vehicles", &report).await;
        Ok(report)
    }

    // == Create Sellers ==
    /// Bulk-creates sellers.
    pub async fn create_sellers(
        &self,
        sellers: Vec<SellerRecord>,
        hooks: BatchHooks<SellerRecord>,
    ) -> Result<BatchReport<SellerRecord, u64>> {
        let store = Arc::clone(&self.store);
        let report = batch::execute(
            sellers,
            move |chunk| {
                let store = Arc::clone(&store);
                async move { store.create_sellers(chunk).await }
            },
            &self.options,
            hooks,
        )
        .await?;

        self.finish("bulk_create_sellers", &report).await;
        Ok(report)
    }

    // == Create Parts ==
    /// Bulk-creates parts.
    ///
    /// References are resolved against the store first; parts pointing at
    /// a vehicle, seller or category the store does not know are dropped
    /// before any batch runs and surface in the report's `skipped` count,
    /// never as failures.
    pub async fn create_parts(
        &self,
        parts: Vec<PartRecord>,
        hooks: BatchHooks<PartRecord>,
    ) -> Result<BatchReport<PartRecord, u64>> {
        let (valid, kept_positions, skipped) = self.resolve_part_refs(parts).await?;

        let store = Arc::clone(&self.store);
        let mut report = batch::execute(
            valid,
            move |chunk| {
                let store = Arc::clone(&store);
                async move { store.create_parts(chunk).await }
            },
            &self.options,
            hooks,
        )
        .await?;

        // Failure indices come back relative to the validated list; map
        // them back onto the caller's original input
        for failure in &mut report.errors {
            failure.index = kept_positions[failure.index];
        }

        report.skipped = skipped;
        self.finish("bulk_create_parts", &report).await;
        Ok(report)
    }

    // == Update Listing Status ==
    /// Sets the listing status on every given part id, in batches.
    pub async fn update_listing_status(
        &self,
        ids: Vec<u64>,
        status: ListingStatus,
        hooks: BatchHooks<u64>,
    ) -> Result<BatchReport<u64, u64>> {
        let store = Arc::clone(&self.store);
        let report = batch::execute(
            ids,
            move |chunk| {
                let store = Arc::clone(&store);
                async move { store.update_part_status(chunk, status).await }
            },
            &self.options,
            hooks,
        )
        .await?;

        self.finish("bulk_update_listing_status", &report).await;
        Ok(report)
    }

    // == Delete Parts ==
    /// Deletes the given part ids, in batches.
    pub async fn delete_parts(
        &self,
        ids: Vec<u64>,
        hooks: BatchHooks<u64>,
    ) -> Result<BatchReport<u64, u64>> {
        let store = Arc::clone(&self.store);
        let report = batch::execute(
            ids,
            move |chunk| {
                let store = Arc::clone(&store);
                async move { store.delete_parts(chunk).await }
            },
            &self.options,
            hooks,
        )
        .await?;

        self.finish("bulk_delete_parts", &report).await;
        Ok(report)
    }

    // == Resolve Part References ==
    /// Splits parts into those whose references all resolve, remembering
    /// each kept record's position in the original input, plus the count
    /// of those dropped.
    async fn resolve_part_refs(
        &self,
        parts: Vec<PartRecord>,
    ) -> Result<(Vec<PartRecord>, Vec<usize>, usize)> {
        if parts.is_empty() {
            return Ok((parts, Vec::new(), 0));
        }

        let vehicle_ids = distinct(parts.iter().map(|p| p.vehicle_id));
        let seller_ids = distinct(parts.iter().map(|p| p.seller_id));
        let category_ids = distinct(parts.iter().map(|p| p.category_id));

        let known_vehicles = self.store.existing_vehicle_ids(&vehicle_ids).await?;
        let known_sellers = self.store.existing_seller_ids(&seller_ids).await?;
        let known_categories = self.store.existing_category_ids(&category_ids).await?;

        let before = parts.len();
        let mut valid = Vec::with_capacity(before);
        let mut kept_positions = Vec::with_capacity(before);

        for (position, part) in parts.into_iter().enumerate() {
            let resolves = known_vehicles.contains(&part.vehicle_id)
                && known_sellers.contains(&part.seller_id)
                && known_categories.contains(&part.category_id);

            if resolves {
                kept_positions.push(position);
                valid.push(part);
            } else {
                warn!(
                    "dropping part {}: unresolved references (vehicle {}, seller {}, category {})",
                    part.id, part.vehicle_id, part.seller_id, part.category_id
                );
            }
        }

        let skipped = before - valid.len();
        Ok((valid, kept_positions, skipped))
    }

    // == Finish ==
    /// Logs the outcome and feeds the monitor, if one is attached.
    async fn finish<T>(&self, operation: &str, report: &BatchReport<T, u64>) {
        info!("{}: {}", operation, report.summary());

        if let Some(monitor) = &self.monitor {
            monitor
                .record(OperationSample {
                    operation: operation.to_string(),
                    duration_ms: report.duration_ms,
                    success: report.is_complete_success(),
                    rows_affected: Some(report.partial_results.iter().sum()),
                    error_message: report.errors.first().map(|e| e.message.clone()),
                })
                .await;
        }
    }
}

fn distinct(ids: impl Iterator<Item = u64>) -> Vec<u64> {
    ids.collect::<HashSet<u64>>().into_iter().collect()
}
