//! Domain models for the parts marketplace
//!
//! This module defines the entity records flowing through the bulk
//! pipeline and the joined rows returned by search.

pub mod records;

// Re-export commonly used types
pub use records::{ListingStatus, PartCondition, PartHit, PartRecord, SellerRecord, VehicleRecord};
