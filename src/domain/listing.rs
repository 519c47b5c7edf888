// src/domain/listing.rs

use crate::domain::filter::{mean_price_by_home_type, FilterCriteria, HomeTypePrice};
use crate::domain::property::PropertyRecord;
use serde::Serialize;

/// How many rows the listing table shows by default.
pub const DEFAULT_LIMIT: usize = 50;

// Starting positions of the dashboard sliders.
pub const DEFAULT_PRICE_MIN: f64 = 200_000.0;
pub const DEFAULT_PRICE_MAX: f64 = 1_000_000.0;
pub const DEFAULT_MIN_BEDROOMS: u32 = 2;

/// The "All" entry of a selection list means no restriction.
pub fn wildcard(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub criteria: FilterCriteria,
    pub limit: usize,
}

/// The filtered listings for one query: the first `limit` rows, the full
/// match count, and the per-home-type mean price over every match.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub total: usize,
    pub listings: Vec<PropertyRecord>,
    pub mean_price_by_home_type: Vec<HomeTypePrice>,
}

/// Builds the view from the rows that matched a query's criteria.
pub fn listing_view(matches: Vec<&PropertyRecord>, limit: usize) -> ListingView {
    ListingView {
        total: matches.len(),
        mean_price_by_home_type: mean_price_by_home_type(&matches),
        listings: matches.into_iter().take(limit).cloned().collect(),
    }
}
