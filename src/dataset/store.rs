// src/dataset/store.rs

use crate::dataset::columns::parse_table;
use crate::dataset::sources::{read_csv, read_sqlite};
use crate::domain::filter::{self, FilterCriteria};
use crate::domain::listing::{listing_view, ListingQuery, ListingView};
use crate::domain::property::{ListingType, PropertyRecord};
use crate::domain::summary::{self, CitySummary};
use crate::errors::LoadError;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// The property table, loaded once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct DatasetStore {
    rows: Vec<PropertyRecord>,
}

impl DatasetStore {
    /// Loads a `.csv` file or a SQLite database (`.sqlite`, `.sqlite3`, `.db`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(LoadError::Missing {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let table = match extension.as_deref() {
            Some("csv") => read_csv(path)?,
            Some("sqlite" | "sqlite3" | "db") => read_sqlite(path)?,
            _ => {
                return Err(LoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let rows = parse_table(&table)?;
        let store = Self::from_records(rows);

        info!(
            path = %path.display(),
            rows = store.rows.len(),
            navigable = store.rows.iter().filter(|r| r.is_navigable()).count(),
            "dataset loaded"
        );

        Ok(store)
    }

    pub fn from_records(rows: Vec<PropertyRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PropertyRecord] {
        &self.rows
    }

    fn navigable(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.rows.iter().filter(|r| r.is_navigable())
    }

    pub fn distinct_states(&self) -> Vec<String> {
        collect_sorted(self.navigable().filter_map(|r| r.state.as_deref()))
    }

    pub fn distinct_cities(&self, state: &str) -> Vec<String> {
        collect_sorted(
            self.navigable()
                .filter(|r| r.state.as_deref() == Some(state))
                .filter_map(|r| r.city.as_deref()),
        )
    }

    /// Zip codes sort as strings, so "10001" comes before "9021".
    pub fn distinct_zips(&self, state: &str, city: &str) -> Vec<String> {
        collect_sorted(
            self.navigable()
                .filter(|r| r.state.as_deref() == Some(state) && r.city.as_deref() == Some(city))
                .filter_map(|r| r.zip.as_deref()),
        )
    }

    pub fn distinct_home_types(&self) -> Vec<String> {
        collect_sorted(self.rows.iter().map(|r| r.home_type.as_str()))
    }

    pub fn distinct_listing_types(&self) -> Vec<ListingType> {
        let mut types: Vec<ListingType> = self
            .rows
            .iter()
            .map(|r| r.listing_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        types.sort_by_key(|t| t.as_str());
        types
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&PropertyRecord> {
        filter::apply(&self.rows, criteria)
    }

    /// Filters with `query.criteria` and truncates the rows to `query.limit`.
    pub fn listings(&self, query: &ListingQuery) -> ListingView {
        listing_view(self.filter(&query.criteria), query.limit)
    }

    pub fn summarize(&self, city: &str) -> CitySummary {
        summary::summarize(&self.rows, city)
    }
}

fn collect_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
