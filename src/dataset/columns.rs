// src/dataset/columns.rs

use crate::domain::property::{canonical_zip, parse_flag, ListingType, PropertyRecord};
use crate::errors::LoadError;
use std::collections::HashMap;

pub const ADDRESS: &str = "Address";
pub const CITY: &str = "City";
pub const STATE: &str = "State";
pub const ZIP: &str = "Correct_ZipCode";
pub const LISTING_TYPE: &str = "RentOrBuy";
pub const HOME_TYPE: &str = "HomeType";
pub const PRICE: &str = "Price";
pub const SIZE: &str = "Size";
pub const BEDROOMS: &str = "Bedrooms";

pub const REQUIRED: [&str; 9] = [
    ADDRESS,
    CITY,
    STATE,
    ZIP,
    LISTING_TYPE,
    HOME_TYPE,
    PRICE,
    SIZE,
    BEDROOMS,
];

/// Header row plus string cells, as read from any supported source.
#[derive(Debug, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

struct Row<'a> {
    index: usize,
    cells: &'a [String],
    columns: &'a HashMap<&'a str, usize>,
}

impl<'a> Row<'a> {
    fn cell(&self, column: &str) -> Option<&'a str> {
        self.columns
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    fn malformed(&self, column: &str, reason: impl Into<String>) -> LoadError {
        LoadError::MalformedRow {
            row: self.index + 1,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    fn required(&self, column: &str) -> Result<&'a str, LoadError> {
        self.cell(column)
            .ok_or_else(|| self.malformed(column, "value is empty"))
    }

    fn required_amount(&self, column: &str) -> Result<f64, LoadError> {
        let raw = self.required(column)?;
        let value = parse_amount(raw)
            .ok_or_else(|| self.malformed(column, format!("'{raw}' is not a number")))?;
        if value < 0.0 {
            return Err(self.malformed(column, format!("{value} is negative")));
        }
        Ok(value)
    }

    fn optional_amount(&self, column: &str) -> Option<f64> {
        self.cell(column).and_then(parse_amount)
    }

    fn optional_flag(&self, column: &str) -> Option<bool> {
        self.cell(column).and_then(parse_flag)
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates the header row and converts every data row to a `PropertyRecord`.
pub fn parse_table(table: &RawTable) -> Result<Vec<PropertyRecord>, LoadError> {
    let columns: HashMap<&str, usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim(), i))
        .collect();

    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|c| !columns.contains_key(*c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { columns: missing });
    }

    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, cells)| {
            parse_row(&Row {
                index,
                cells,
                columns: &columns,
            })
        })
        .collect()
}

fn parse_row(row: &Row<'_>) -> Result<PropertyRecord, LoadError> {
    let listing_type = row
        .required(LISTING_TYPE)?
        .parse::<ListingType>()
        .map_err(|e| row.malformed(LISTING_TYPE, e))?;

    let bedrooms = row.required_amount(BEDROOMS)?;
    if bedrooms.fract() != 0.0 {
        return Err(row.malformed(BEDROOMS, format!("{bedrooms} is not a whole number")));
    }

    Ok(PropertyRecord {
        address: row.required(ADDRESS)?.to_string(),
        city: row.cell(CITY).map(str::to_string),
        state: row.cell(STATE).map(str::to_string),
        zip: row.cell(ZIP).and_then(canonical_zip),
        listing_type,
        home_type: row.required(HOME_TYPE)?.to_string(),
        price: row.required_amount(PRICE)?,
        size_sq_ft: row.required_amount(SIZE)?,
        bedrooms: bedrooms as u32,
        bathrooms: row.optional_amount("Bathroom"),
        lot_size: row.optional_amount("LotSize"),
        garage_size: row.optional_amount("GarageSize"),
        has_pool: row.optional_flag("Pool"),
        has_fireplace: row.optional_flag("Fireplace"),
        has_basement: row.optional_flag("Basement"),
        year_built: row.optional_amount("YearBuilt").map(|v| v as i32),
        days_on_market: row.optional_amount("DaysOnMarket").map(|v| v as u32),
        estimated_value: row.optional_amount("EstimatedValue"),
        price_per_sq_ft: row.optional_amount("PricePerSqFt"),
        walk_score: row.optional_amount("WalkScore"),
        transit_score: row.optional_amount("TransitScore"),
        school_rating: row.optional_amount("SchoolRating"),
        crime_index: row.optional_amount("CrimeIndex"),
    })
}
