//! Entity records for the parts marketplace
//!
//! Defines the vehicle, seller and part records accepted by the bulk
//! pipeline and the joined rows returned by part search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Part Condition ==
/// Physical condition of a listed part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartCondition {
    New,
    Refurbished,
    Used,
    ForParts,
}

impl PartCondition {
    /// Stable lowercase name, used in cache keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartCondition::New => "new",
            PartCondition::Refurbished => "refurbished",
            PartCondition::Used => "used",
            PartCondition::ForParts => "for_parts",
        }
    }
}

// == Listing Status ==
/// Lifecycle state of a part listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Active,
    Sold,
    Delisted,
}

// == Vehicle Record ==
/// A donor vehicle parts are listed against.
///
/// # Fields
/// - `vin`: unique vehicle identification number; duplicate VINs are
///   skipped by the store rather than rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: u64,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: u16,
}

// == Seller Record ==
/// A marketplace seller account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerRecord {
    pub id: u64,
    pub name: String,
    /// Verified sellers rank first under relevance ordering
    pub verified: bool,
    pub latitude: f64,
    pub longitude: f64,
}

// == Part Record ==
/// A part listing referencing its donor vehicle, seller and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Price in cents, avoiding float arithmetic on money
    pub price_cents: u64,
    pub condition: PartCondition,
    pub status: ListingStatus,
    pub category_id: u64,
    pub vehicle_id: u64,
    pub seller_id: u64,
    pub listed_at: DateTime<Utc>,
}

// == Part Hit ==
/// A search result row: the part joined with the seller fields the
/// listing page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartHit {
    pub part: PartRecord,
    pub seller_name: String,
    pub seller_verified: bool,
}
