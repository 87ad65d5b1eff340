//! Store Filter Module
//!
//! The predicate and ordering language the layer hands to the data
//! store. Clause order inside a filter is meaningful: it encodes the
//! fixed selectivity precedence used when composing store queries.

use serde::{Deserialize, Serialize};

use crate::models::{PartCondition, PartRecord, SellerRecord, VehicleRecord};

// == Geo Bounds ==
/// Inclusive geographic bounding box, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Whether a point falls inside the box, boundary included.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

// == Filter Clause ==
/// One conjunct of a part filter.
///
/// Clauses are listed here in their precedence order: exact seller and
/// category matches, then free-text term matching, then vehicle
/// attributes, then the geographic box, then the condition set, with the
/// price range always last.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Exact seller match
    SellerIs(u64),
    /// Exact category match
    CategoryIs(u64),
    /// Case-insensitive substring match against title and description
    TermMatches(String),
    MakeIs(String),
    ModelIs(String),
    /// Inclusive model-year range
    YearBetween(u16, u16),
    WithinBounds(GeoBounds),
    ConditionIn(Vec<PartCondition>),
    /// Inclusive price range in cents
    PriceBetween(u64, u64),
}

impl FilterClause {
    // == Matches ==
    /// Evaluates the clause against a part joined with its vehicle and
    /// seller. This is the reference semantics every store backend must
    /// reproduce.
    pub fn matches(&self, part: &PartRecord, vehicle: &VehicleRecord, seller: &SellerRecord) -> bool {
        match self {
            FilterClause::SellerIs(id) => part.seller_id == *id,
            FilterClause::CategoryIs(id) => part.category_id == *id,
            FilterClause::TermMatches(term) => {
                let needle = term.to_lowercase();
                part.title.to_lowercase().contains(&needle)
                    || part.description.to_lowercase().contains(&needle)
            }
            FilterClause::MakeIs(make) => vehicle.make.eq_ignore_ascii_case(make),
            FilterClause::ModelIs(model) => vehicle.model.eq_ignore_ascii_case(model),
            FilterClause::YearBetween(min, max) => (*min..=*max).contains(&vehicle.year),
            FilterClause::WithinBounds(bounds) => bounds.contains(seller.latitude, seller.longitude),
            FilterClause::ConditionIn(conditions) => conditions.contains(&part.condition),
            FilterClause::PriceBetween(min, max) => (*min..=*max).contains(&part.price_cents),
        }
    }
}

// == Part Filter ==
/// Conjunction of clauses, kept in precedence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartFilter {
    pub clauses: Vec<FilterClause>,
}

impl PartFilter {
    /// A filter matching everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// True when no clause constrains the result.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluates every clause; an empty filter matches everything.
    pub fn matches(&self, part: &PartRecord, vehicle: &VehicleRecord, seller: &SellerRecord) -> bool {
        self.clauses.iter().all(|c| c.matches(part, vehicle, seller))
    }
}

// == Sort Order ==
/// Result ordering for part search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Verified sellers first, newest listings next
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    DateAsc,
    DateDesc,
}

impl SortOrder {
    /// Stable lowercase name, used in cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::DateAsc => "date_asc",
            SortOrder::DateDesc => "date_desc",
        }
    }
}
