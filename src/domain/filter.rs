// src/domain/filter.rs

use crate::domain::property::{ListingType, PropertyRecord};
use serde::Serialize;
use std::collections::HashMap;

/// The filter selection for one listings query.
///
/// `None` in `zip`, `home_type` or `listing_type` means "All". The engine does
/// not check that `price_min <= price_max`; an inverted range simply matches
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub state: String,
    pub city: String,
    pub zip: Option<String>,
    pub price_min: f64,
    pub price_max: f64,
    pub min_bedrooms: u32,
    pub home_type: Option<String>,
    pub listing_type: Option<ListingType>,
}

/// A single condition applied to a property row.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<'a> {
    State(&'a str),
    City(&'a str),
    Zip(&'a str),
    PriceAtLeast(f64),
    PriceAtMost(f64),
    BedroomsAtLeast(u32),
    HomeType(&'a str),
    ListingType(ListingType),
}

impl Predicate<'_> {
    pub fn matches(&self, row: &PropertyRecord) -> bool {
        match self {
            Predicate::State(state) => row.state.as_deref() == Some(*state),
            Predicate::City(city) => row.city.as_deref() == Some(*city),
            Predicate::Zip(zip) => row.zip.as_deref() == Some(*zip),
            Predicate::PriceAtLeast(min) => row.price >= *min,
            Predicate::PriceAtMost(max) => row.price <= *max,
            Predicate::BedroomsAtLeast(min) => row.bedrooms >= *min,
            Predicate::HomeType(home_type) => row.home_type == *home_type,
            Predicate::ListingType(listing_type) => row.listing_type == *listing_type,
        }
    }
}

impl FilterCriteria {
    /// The predicates for this selection, cheapest and most selective first.
    /// Wildcard fields contribute no predicate.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates = vec![Predicate::State(&self.state), Predicate::City(&self.city)];

        if let Some(zip) = self.zip.as_deref() {
            predicates.push(Predicate::Zip(zip));
        }

        predicates.push(Predicate::PriceAtLeast(self.price_min));
        predicates.push(Predicate::PriceAtMost(self.price_max));
        predicates.push(Predicate::BedroomsAtLeast(self.min_bedrooms));

        if let Some(home_type) = self.home_type.as_deref() {
            predicates.push(Predicate::HomeType(home_type));
        }
        if let Some(listing_type) = self.listing_type {
            predicates.push(Predicate::ListingType(listing_type));
        }

        predicates
    }
}

/// Rows matching every predicate of `criteria`, in store order.
/// An empty result is a normal outcome.
pub fn apply<'a>(rows: &'a [PropertyRecord], criteria: &FilterCriteria) -> Vec<&'a PropertyRecord> {
    apply_predicates(rows, &criteria.predicates())
}

/// Rows matching all of `predicates`, evaluated left to right per row.
pub fn apply_predicates<'a>(
    rows: &'a [PropertyRecord],
    predicates: &[Predicate<'_>],
) -> Vec<&'a PropertyRecord> {
    rows.iter()
        .filter(|row| predicates.iter().all(|p| p.matches(row)))
        .collect()
}

/// Mean price of one home type within a filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeTypePrice {
    pub home_type: String,
    pub mean_price: f64,
}

/// Mean price per home type, ordered by ascending mean (ties by name).
/// Only home types present in `rows` appear.
pub fn mean_price_by_home_type(rows: &[&PropertyRecord]) -> Vec<HomeTypePrice> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();

    for row in rows {
        let entry = totals.entry(row.home_type.as_str()).or_insert((0.0, 0));
        entry.0 += row.price;
        entry.1 += 1;
    }

    let mut means: Vec<HomeTypePrice> = totals
        .into_iter()
        .map(|(home_type, (sum, count))| HomeTypePrice {
            home_type: home_type.to_string(),
            mean_price: sum / count as f64,
        })
        .collect();

    means.sort_by(|a, b| {
        a.mean_price
            .total_cmp(&b.mean_price)
            .then_with(|| a.home_type.cmp(&b.home_type))
    });

    means
}
