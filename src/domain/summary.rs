// src/domain/summary.rs

use crate::domain::property::PropertyRecord;
use serde::Serialize;

/// Descriptive statistics for the listings of one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStats {
    pub city: String,
    pub listing_count: usize,
    pub avg_price: f64,
    pub avg_size: f64,
    pub price_min: f64,
    pub price_max: f64,
}

/// Either a fully populated summary or the explicit "no listings" marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CitySummary {
    Listings(CityStats),
    NoListings { city: String },
}

impl CitySummary {
    pub fn stats(&self) -> Option<&CityStats> {
        match self {
            CitySummary::Listings(stats) => Some(stats),
            CitySummary::NoListings { .. } => None,
        }
    }
}

/// Summarizes the rows whose city equals `query`, ignoring case.
///
/// `query` may also be written as "City, ST", in which case the part after
/// the last comma must match the row's state as well.
pub fn summarize(rows: &[PropertyRecord], query: &str) -> CitySummary {
    let (city, state) = split_city_state(query);

    let matching: Vec<&PropertyRecord> = rows
        .iter()
        .filter(|row| eq_ignore_case(row.city.as_deref(), city))
        .filter(|row| state.map_or(true, |s| eq_ignore_case(row.state.as_deref(), s)))
        .collect();

    if matching.is_empty() {
        return CitySummary::NoListings {
            city: query.trim().to_string(),
        };
    }

    let count = matching.len() as f64;
    let total_price: f64 = matching.iter().map(|r| r.price).sum();
    let total_size: f64 = matching.iter().map(|r| r.size_sq_ft).sum();
    let price_min = matching.iter().map(|r| r.price).fold(f64::INFINITY, f64::min);
    let price_max = matching
        .iter()
        .map(|r| r.price)
        .fold(f64::NEG_INFINITY, f64::max);

    CitySummary::Listings(CityStats {
        city: city.to_string(),
        listing_count: matching.len(),
        avg_price: total_price / count,
        avg_size: total_size / count,
        price_min,
        price_max,
    })
}

fn split_city_state(query: &str) -> (&str, Option<&str>) {
    match query.rsplit_once(',') {
        Some((city, state)) if !state.trim().is_empty() => (city.trim(), Some(state.trim())),
        Some((city, _)) => (city.trim(), None),
        None => (query.trim(), None),
    }
}

fn eq_ignore_case(value: Option<&str>, wanted: &str) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(wanted))
}
