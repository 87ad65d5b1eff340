//! Memory Store Module
//!
//! In-process [`InventoryStore`] used by the test-suite and local
//! tooling. Reproduces the semantics the layer expects from a relational
//! backend: VIN-deduplicated vehicle inserts, all-or-nothing batched
//! writes and filter evaluation in clause order.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{ListingStatus, PartHit, PartRecord, SellerRecord, VehicleRecord};
use crate::store::{InventoryStore, PartFilter, SortOrder};

// == Memory Store ==
/// HashMap-backed store behind a single async lock.
///
/// Read queries also count their invocations, so tests can observe
/// whether a cached search actually reached the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    find_calls: AtomicUsize,
    count_calls: AtomicUsize,
}

#[derive(Debug, Default)]
struct Inner {
    vehicles: HashMap<u64, VehicleRecord>,
    vins: HashSet<String>,
    sellers: HashMap<u64, SellerRecord>,
    parts: HashMap<u64, PartRecord>,
    categories: HashMap<u64, String>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Add Category ==
    /// Registers a part category. Categories are reference data and are
    /// not part of the bulk pipeline; existing names are overwritten.
    pub async fn add_category(&self, id: u64, name: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner.categories.insert(id, name.into());
    }

    // == Call Counters ==
    /// Number of `find_parts` calls that reached the store.
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Number of `count_parts` calls that reached the store.
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    /// Total number of stored parts, bypassing any filter.
    pub async fn part_count(&self) -> usize {
        self.inner.read().await.parts.len()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn create_vehicles(&self, records: Vec<VehicleRecord>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;

        // Ids must be fresh before anything lands; VINs are handled
        // per-record below
        let mut seen_ids = HashSet::new();
        for record in &records {
            if inner.vehicles.contains_key(&record.id) || !seen_ids.insert(record.id) {
                return Err(StoreError::ConstraintViolation(format!(
                    "duplicate vehicle id {}",
                    record.id
                )));
            }
        }

        let mut created = 0u64;
        for record in records {
            if inner.vins.contains(&record.vin) {
                continue;
            }
            inner.vins.insert(record.vin.clone());
            inner.vehicles.insert(record.id, record);
            created += 1;
        }
        Ok(created)
    }

    async fn create_sellers(&self, records: Vec<SellerRecord>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;

        let mut seen_ids = HashSet::new();
        for record in &records {
            if inner.sellers.contains_key(&record.id) || !seen_ids.insert(record.id) {
                return Err(StoreError::ConstraintViolation(format!(
                    "duplicate seller id {}",
                    record.id
                )));
            }
        }

        let created = records.len() as u64;
        for record in records {
            inner.sellers.insert(record.id, record);
        }
        Ok(created)
    }

    async fn create_parts(&self, records: Vec<PartRecord>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;

        let mut seen_ids = HashSet::new();
        for record in &records {
            if inner.parts.contains_key(&record.id) || !seen_ids.insert(record.id) {
                return Err(StoreError::ConstraintViolation(format!(
                    "duplicate part id {}",
                    record.id
                )));
            }
            if !inner.vehicles.contains_key(&record.vehicle_id) {
                return Err(StoreError::ConstraintViolation(format!(
                    "part {} references missing vehicle {}",
                    record.id, record.vehicle_id
                )));
            }
            if !inner.sellers.contains_key(&record.seller_id) {
                return Err(StoreError::ConstraintViolation(format!(
                    "part {} references missing seller {}",
                    record.id, record.seller_id
                )));
            }
            if !inner.categories.contains_key(&record.category_id) {
                return Err(StoreError::ConstraintViolation(format!(
                    "part {} references missing category {}",
                    record.id, record.category_id
                )));
            }
        }

        let created = records.len() as u64;
        for record in records {
            inner.parts.insert(record.id, record);
        }
        Ok(created)
    }

    async fn update_part_status(
        &self,
        ids: Vec<u64>,
        status: ListingStatus,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;

        let mut touched = 0u64;
        for id in ids {
            if let Some(part) = inner.parts.get_mut(&id) {
                part.status = status;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete_parts(&self, ids: Vec<u64>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;

        let mut removed = 0u64;
        for id in ids {
            if inner.parts.remove(&id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn find_parts(
        &self,
        filter: &PartFilter,
        sort: SortOrder,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PartHit>, StoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.read().await;

        let mut matched: Vec<(&PartRecord, &SellerRecord)> = Vec::new();
        for part in inner.parts.values() {
            let Some(vehicle) = inner.vehicles.get(&part.vehicle_id) else {
                continue;
            };
            let Some(seller) = inner.sellers.get(&part.seller_id) else {
                continue;
            };
            if filter.matches(part, vehicle, seller) {
                matched.push((part, seller));
            }
        }

        // Stable tie-break on part id keeps pagination windows disjoint
        match sort {
            SortOrder::Relevance => matched.sort_by(|a, b| {
                b.1.verified
                    .cmp(&a.1.verified)
                    .then_with(|| b.0.listed_at.cmp(&a.0.listed_at))
                    .then_with(|| a.0.id.cmp(&b.0.id))
            }),
            SortOrder::PriceAsc => matched.sort_by(|a, b| {
                a.0.price_cents
                    .cmp(&b.0.price_cents)
                    .then_with(|| a.0.id.cmp(&b.0.id))
            }),
            SortOrder::PriceDesc => matched.sort_by(|a, b| {
                b.0.price_cents
                    .cmp(&a.0.price_cents)
                    .then_with(|| a.0.id.cmp(&b.0.id))
            }),
            SortOrder::DateAsc => matched.sort_by(|a, b| {
                a.0.listed_at
                    .cmp(&b.0.listed_at)
                    .then_with(|| a.0.id.cmp(&b.0.id))
            }),
            SortOrder::DateDesc => matched.sort_by(|a, b| {
                b.0.listed_at
                    .cmp(&a.0.listed_at)
                    .then_with(|| a.0.id.cmp(&b.0.id))
            }),
        }

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(part, seller)| PartHit {
                part: part.clone(),
                seller_name: seller.name.clone(),
                seller_verified: seller.verified,
            })
            .collect())
    }

    async fn count_parts(&self, filter: &PartFilter) -> Result<u64, StoreError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.read().await;

        let mut count = 0u64;
        for part in inner.parts.values() {
            let Some(vehicle) = inner.vehicles.get(&part.vehicle_id) else {
                continue;
            };
            let Some(seller) = inner.sellers.get(&part.seller_id) else {
                continue;
            };
            if filter.matches(part, vehicle, seller) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn existing_vehicle_ids(&self, ids: &[u64]) -> Result<HashSet<u64>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| inner.vehicles.contains_key(id))
            .collect())
    }

    async fn existing_seller_ids(&self, ids: &[u64]) -> Result<HashSet<u64>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| inner.sellers.contains_key(id))
            .collect())
    }

    async fn existing_category_ids(&self, ids: &[u64]) -> Result<HashSet<u64>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| inner.categories.contains_key(id))
            .collect())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PartCondition;
    use crate::store::{FilterClause, GeoBounds};
    use chrono::{TimeZone, Utc};

    fn vehicle(id: u64, vin: &str, make: &str, model: &str, year: u16) -> VehicleRecord {
        VehicleRecord {
            id,
            vin: vin.to_string(),
            make: make.to_string(),
            model: model.to_string(),
            year,
        }
    }

    fn seller(id: u64, name: &str, verified: bool, lat: f64, lng: f64) -> SellerRecord {
        SellerRecord {
            id,
            name: name.to_string(),
            verified,
            latitude: lat,
            longitude: lng,
        }
    }

    fn part(id: u64, title: &str, price: u64, day: u32) -> PartRecord {
        PartRecord {
            id,
            title: title.to_string(),
            description: format!("{} in good shape", title),
            price_cents: price,
            condition: PartCondition::Used,
            status: ListingStatus::Active,
            category_id: 10,
            vehicle_id: 1,
            seller_id: 1,
            listed_at: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        }
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_category(10, "Brakes").await;
        store.add_category(11, "Engine").await;

        store
            .create_sellers(vec![
                seller(1, "Centre Auto Laval", true, 45.58, -73.75),
                seller(2, "Pieces Usagees Gatineau", false, 45.48, -75.65),
            ])
            .await
            .unwrap();

        store
            .create_vehicles(vec![
                vehicle(1, "VINAAA111", "Honda", "Civic", 2012),
                vehicle(2, "VINBBB222", "Toyota", "Corolla", 2016),
            ])
            .await
            .unwrap();

        let mut alternator = part(101, "Alternator", 8999, 3);
        alternator.category_id = 11;
        alternator.vehicle_id = 2;
        alternator.seller_id = 2;
        alternator.condition = PartCondition::Refurbished;

        store
            .create_parts(vec![
                part(100, "Front Brake Pad Set", 4500, 1),
                alternator,
                part(102, "Brake Rotor", 6200, 5),
            ])
            .await
            .unwrap();

        store
    }

    #[tokio::test]
    async fn test_vehicle_vin_dedup_skips_silently() {
        let store = MemoryStore::new();

        let created = store
            .create_vehicles(vec![
                vehicle(1, "VIN001", "Honda", "Civic", 2012),
                vehicle(2, "VIN002", "Mazda", "3", 2018),
            ])
            .await
            .unwrap();
        assert_eq!(created, 2);

        // Same VIN on a new id: skipped, not an error
        let created = store
            .create_vehicles(vec![vehicle(3, "VIN001", "Honda", "Civic", 2012)])
            .await
            .unwrap();
        assert_eq!(created, 0);

        let known = store.existing_vehicle_ids(&[1, 2, 3]).await.unwrap();
        assert_eq!(known, HashSet::from([1, 2]));
    }

    #[tokio::test]
    async fn test_duplicate_part_id_fails_whole_batch() {
        let store = seeded_store().await;

        let result = store
            .create_parts(vec![part(200, "Radiator Hose", 1500, 7), part(100, "Dup", 1, 7)])
            .await;

        assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
        // Nothing from the failed batch landed
        assert_eq!(store.part_count().await, 3);
    }

    #[tokio::test]
    async fn test_part_with_missing_reference_fails_batch() {
        let store = seeded_store().await;

        let mut orphan = part(201, "Headlight Assembly", 7800, 8);
        orphan.seller_id = 99;

        let result = store.create_parts(vec![orphan]).await;
        assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
        assert_eq!(store.part_count().await, 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_touched_rows() {
        let store = seeded_store().await;

        let touched = store
            .update_part_status(vec![100, 102, 999], ListingStatus::Sold)
            .await
            .unwrap();
        assert_eq!(touched, 2);

        let removed = store.delete_parts(vec![101, 999]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.part_count().await, 2);
    }

    #[tokio::test]
    async fn test_find_with_term_filter() {
        let store = seeded_store().await;

        let filter = PartFilter {
            clauses: vec![FilterClause::TermMatches("brake".to_string())],
        };
        let hits = store
            .find_parts(&filter, SortOrder::PriceAsc, 10, 0)
            .await
            .unwrap();

        let ids: Vec<u64> = hits.iter().map(|h| h.part.id).collect();
        assert_eq!(ids, vec![100, 102]);
    }

    #[tokio::test]
    async fn test_find_with_vehicle_and_geo_filters() {
        let store = seeded_store().await;

        let filter = PartFilter {
            clauses: vec![
                FilterClause::MakeIs("toyota".to_string()),
                FilterClause::WithinBounds(GeoBounds {
                    min_lat: 45.0,
                    max_lat: 46.0,
                    min_lng: -76.0,
                    max_lng: -75.0,
                }),
            ],
        };
        let hits = store
            .find_parts(&filter, SortOrder::Relevance, 10, 0)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].part.id, 101);
        assert_eq!(hits[0].seller_name, "Pieces Usagees Gatineau");
        assert!(!hits[0].seller_verified);
    }

    #[tokio::test]
    async fn test_relevance_sorts_verified_first_then_newest() {
        let store = seeded_store().await;

        let hits = store
            .find_parts(&PartFilter::all(), SortOrder::Relevance, 10, 0)
            .await
            .unwrap();

        // Verified seller's parts first (newest of them leading), then the
        // unverified seller's
        let ids: Vec<u64> = hits.iter().map(|h| h.part.id).collect();
        assert_eq!(ids, vec![102, 100, 101]);
    }

    #[tokio::test]
    async fn test_price_and_date_sorts() {
        let store = seeded_store().await;

        let by_price_desc = store
            .find_parts(&PartFilter::all(), SortOrder::PriceDesc, 10, 0)
            .await
            .unwrap();
        let ids: Vec<u64> = by_price_desc.iter().map(|h| h.part.id).collect();
        assert_eq!(ids, vec![101, 102, 100]);

        let by_date_asc = store
            .find_parts(&PartFilter::all(), SortOrder::DateAsc, 10, 0)
            .await
            .unwrap();
        let ids: Vec<u64> = by_date_asc.iter().map(|h| h.part.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
    }

    #[tokio::test]
    async fn test_pagination_windows_are_disjoint() {
        let store = seeded_store().await;

        let first = store
            .find_parts(&PartFilter::all(), SortOrder::PriceAsc, 2, 0)
            .await
            .unwrap();
        let second = store
            .find_parts(&PartFilter::all(), SortOrder::PriceAsc, 2, 2)
            .await
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        let first_ids: HashSet<u64> = first.iter().map(|h| h.part.id).collect();
        assert!(!first_ids.contains(&second[0].part.id));
    }

    #[tokio::test]
    async fn test_count_matches_find_total() {
        let store = seeded_store().await;

        let filter = PartFilter {
            clauses: vec![FilterClause::ConditionIn(vec![PartCondition::Used])],
        };
        let count = store.count_parts(&filter).await.unwrap();
        assert_eq!(count, 2);

        assert_eq!(store.find_calls(), 0);
        assert_eq!(store.count_calls(), 1);
    }

    #[tokio::test]
    async fn test_existing_id_probes() {
        let store = seeded_store().await;

        let sellers = store.existing_seller_ids(&[1, 2, 77]).await.unwrap();
        assert_eq!(sellers, HashSet::from([1, 2]));

        let categories = store.existing_category_ids(&[10, 11, 12]).await.unwrap();
        assert_eq!(categories, HashSet::from([10, 11]));
    }
}
