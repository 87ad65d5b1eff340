//! Search Query Module
//!
//! Faceted part-search parameters, their normalization, and the cached
//! result page. Two queries that mean the same thing always normalize to
//! the same canonical cache key, whatever order their fields were
//! assembled in.

use serde::{Deserialize, Serialize};

use crate::models::{PartCondition, PartHit};
use crate::store::{FilterClause, GeoBounds, PartFilter, SortOrder};

// == Public Constants ==
/// Page size applied when the query does not set one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard ceiling on requested page size
pub const MAX_PAGE_SIZE: u32 = 100;

// == Search Query ==
/// Faceted search parameters. Every field is optional; absent fields
/// impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Free-text term matched against title and description
    pub term: Option<String>,
    pub seller_id: Option<u64>,
    pub category_id: Option<u64>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_min: Option<u16>,
    pub year_max: Option<u16>,
    pub price_min_cents: Option<u64>,
    pub price_max_cents: Option<u64>,
    /// Acceptable part conditions; empty means any
    pub conditions: Vec<PartCondition>,
    pub bounds: Option<GeoBounds>,
    pub sort: SortOrder,
    /// 1-based page number; 0 is treated as 1
    pub page: u32,
    /// Results per page; 0 falls back to [`DEFAULT_PAGE_SIZE`]
    pub page_size: u32,
}

impl SearchQuery {
    // == Normalization ==
    /// Requested page, floored at 1.
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Requested page size, defaulted and clamped.
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size.min(MAX_PAGE_SIZE)
        }
    }

    /// Trimmed, lowercased term; None when absent or blank.
    fn normalized_term(&self) -> Option<String> {
        self.term
            .as_ref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
    }

    fn normalized_make(&self) -> Option<String> {
        self.make
            .as_ref()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
    }

    fn normalized_model(&self) -> Option<String> {
        self.model
            .as_ref()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
    }

    /// Condition set, sorted and deduplicated.
    fn sorted_conditions(&self) -> Vec<PartCondition> {
        let mut conditions = self.conditions.clone();
        conditions.sort();
        conditions.dedup();
        conditions
    }

    // == Canonical Key ==
    /// Deterministic cache key for this query.
    ///
    /// Fields are emitted in a fixed order with normalized values and a
    /// sorted condition set, so logically identical queries share one
    /// cache slot regardless of construction order.
    pub fn canonical_key(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(term) = self.normalized_term() {
            parts.push(format!("term={term}"));
        }
        if let Some(id) = self.seller_id {
            parts.push(format!("seller={id}"));
        }
        if let Some(id) = self.category_id {
            parts.push(format!("category={id}"));
        }
        if let Some(make) = self.normalized_make() {
            parts.push(format!("make={make}"));
        }
        if let Some(model) = self.normalized_model() {
            parts.push(format!("model={model}"));
        }
        if self.year_min.is_some() || self.year_max.is_some() {
            parts.push(format!(
                "years={}-{}",
                self.year_min.map_or("*".to_string(), |y| y.to_string()),
                self.year_max.map_or("*".to_string(), |y| y.to_string())
            ));
        }
        if self.price_min_cents.is_some() || self.price_max_cents.is_some() {
            parts.push(format!(
                "price={}-{}",
                self.price_min_cents.map_or("*".to_string(), |p| p.to_string()),
                self.price_max_cents.map_or("*".to_string(), |p| p.to_string())
            ));
        }

        let conditions = self.sorted_conditions();
        if !conditions.is_empty() {
            let names: Vec<&str> = conditions.iter().map(|c| c.as_str()).collect();
            parts.push(format!("cond={}", names.join("+")));
        }

        if let Some(bounds) = self.bounds {
            parts.push(format!(
                "bounds={},{},{},{}",
                bounds.min_lat, bounds.min_lng, bounds.max_lat, bounds.max_lng
            ));
        }

        parts.push(format!("sort={}", self.sort.as_str()));
        parts.push(format!("page={}", self.effective_page()));
        parts.push(format!("size={}", self.effective_page_size()));

        format!("parts:v1:{}", parts.join("|"))
    }

    // == To Filter ==
    /// Builds the store predicate from present fields only, clauses in
    /// the fixed selectivity precedence.
    pub fn to_filter(&self) -> PartFilter {
        let mut clauses = Vec::new();

        if let Some(id) = self.seller_id {
            clauses.push(FilterClause::SellerIs(id));
        }
        if let Some(id) = self.category_id {
            clauses.push(FilterClause::CategoryIs(id));
        }
        if let Some(term) = self.normalized_term() {
            clauses.push(FilterClause::TermMatches(term));
        }
        if let Some(make) = self.normalized_make() {
            clauses.push(FilterClause::MakeIs(make));
        }
        if let Some(model) = self.normalized_model() {
            clauses.push(FilterClause::ModelIs(model));
        }
        if self.year_min.is_some() || self.year_max.is_some() {
            clauses.push(FilterClause::YearBetween(
                self.year_min.unwrap_or(0),
                self.year_max.unwrap_or(u16::MAX),
            ));
        }
        if let Some(bounds) = self.bounds {
            clauses.push(FilterClause::WithinBounds(bounds));
        }

        let conditions = self.sorted_conditions();
        if !conditions.is_empty() {
            clauses.push(FilterClause::ConditionIn(conditions));
        }

        if self.price_min_cents.is_some() || self.price_max_cents.is_some() {
            clauses.push(FilterClause::PriceBetween(
                self.price_min_cents.unwrap_or(0),
                self.price_max_cents.unwrap_or(u64::MAX),
            ));
        }

        PartFilter { clauses }
    }
}

// == Search Result Page ==
/// One page of search results with its pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultPage {
    pub items: Vec<PartHit>,
    /// Total matches across all pages
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_more: bool,
}

impl SearchResultPage {
    // == Paged ==
    /// Assembles a page with its derived pagination fields.
    pub fn paged(items: Vec<PartHit>, total_count: u64, page: u32, page_size: u32) -> Self {
        let total_pages = total_count.div_ceil(page_size.max(1) as u64) as u32;
        Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
            has_more: page < total_pages,
        }
    }
}
