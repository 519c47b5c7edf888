// src/domain/property.rs

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Whether a listing is offered for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ListingType {
    Rent,
    Buy,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "Rent",
            ListingType::Buy => "Buy",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rent" => Ok(ListingType::Rent),
            "buy" | "sale" => Ok(ListingType::Buy),
            other => Err(format!("unknown listing type '{other}'")),
        }
    }
}

/// One row of the property table, immutable once loaded.
///
/// `city`, `state` and `zip` may be absent in the source data; such rows stay
/// in the store but never show up in the location navigation lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub listing_type: ListingType,
    pub home_type: String,
    pub price: f64,
    pub size_sq_ft: f64,
    pub bedrooms: u32,

    // Descriptive columns, carried through for display only.
    pub bathrooms: Option<f64>,
    pub lot_size: Option<f64>,
    pub garage_size: Option<f64>,
    pub has_pool: Option<bool>,
    pub has_fireplace: Option<bool>,
    pub has_basement: Option<bool>,
    pub year_built: Option<i32>,
    pub days_on_market: Option<u32>,
    pub estimated_value: Option<f64>,
    pub price_per_sq_ft: Option<f64>,
    pub walk_score: Option<f64>,
    pub transit_score: Option<f64>,
    pub school_rating: Option<f64>,
    pub crime_index: Option<f64>,
}

impl PropertyRecord {
    /// A row takes part in state/city/zip navigation only when it has both a
    /// city and a state.
    pub fn is_navigable(&self) -> bool {
        self.city.is_some() && self.state.is_some()
    }
}

/// Canonical string form of a zip code.
///
/// Zips exported through a float column come back as "60601.0", and numeric
/// columns drop leading zeros ("601" for "00601"); both are repaired here.
/// Anything that isn't purely numeric (ZIP+4, postal codes) is only trimmed.
pub fn canonical_zip(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);

    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) && trimmed.len() < 5 {
        return Some(format!("{trimmed:0>5}"));
    }

    Some(trimmed.to_string())
}

/// Parses the yes/no style flags used by the Pool/Fireplace/Basement columns.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_zip_keeps_leading_zeros() {
        assert_eq!(canonical_zip("00601"), Some("00601".to_string()));
        assert_eq!(canonical_zip(" 00601 "), Some("00601".to_string()));
    }

    #[test]
    fn canonical_zip_repairs_numeric_exports() {
        assert_eq!(canonical_zip("601"), Some("00601".to_string()));
        assert_eq!(canonical_zip("60601.0"), Some("60601".to_string()));
        assert_eq!(canonical_zip("601.0"), Some("00601".to_string()));
    }

    #[test]
    fn canonical_zip_leaves_other_formats_alone() {
        assert_eq!(canonical_zip("60601-1234"), Some("60601-1234".to_string()));
        assert_eq!(canonical_zip("K1A"), Some("K1A".to_string()));
        assert_eq!(canonical_zip("   "), None);
    }

    #[test]
    fn listing_type_parses_case_insensitively() {
        assert_eq!("rent".parse::<ListingType>(), Ok(ListingType::Rent));
        assert_eq!("BUY".parse::<ListingType>(), Ok(ListingType::Buy));
        assert_eq!("Sale".parse::<ListingType>(), Ok(ListingType::Buy));
        assert!("lease".parse::<ListingType>().is_err());
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("1.0"), Some(true));
        assert_eq!(parse_flag(""), None);
    }
}
