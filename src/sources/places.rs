// src/sources/places.rs

use crate::config::PlacesConfig;
use crate::sources::http::{HttpClient, HttpRequest};
use crate::sources::{
    ContextSource, ExternalRecord, FetchFailure, FetchResult, LocationSelection, PlaceRecord,
    SourceKind, NOT_AVAILABLE,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

// results[]
//  ├── name
//  └── location
//       └── formatted_address
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    name: Option<String>,
    location: Option<PlaceLocation>,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    formatted_address: Option<String>,
}

/// Restaurants near a zip code or "City, State" (Foursquare place search).
pub struct PlacesAdapter {
    config: PlacesConfig,
    http: Arc<dyn HttpClient>,
}

impl PlacesAdapter {
    pub fn new(config: PlacesConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    fn request(&self, near: &str) -> HttpRequest {
        HttpRequest::get(&self.config.base_url)
            .header("Authorization", self.config.api_key.as_str())
            .header("Accept", "application/json")
            .query("near", near)
            .query("limit", self.config.limit)
            .query("categories", &self.config.category)
    }
}

impl ContextSource for PlacesAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Places
    }

    fn location_key(&self, selection: &LocationSelection) -> String {
        selection.places_key()
    }

    /// A failed request or a non-2xx status counts as "no places", not as a
    /// failure. Only an unreadable success body is reported as one.
    fn fetch(&self, near: &str) -> FetchResult {
        let resp = match self.http.get(&self.request(near)) {
            Ok(resp) => resp,
            Err(e) => {
                warn!(near, error = %e, "places request failed");
                return Ok(Vec::new());
            }
        };

        if !resp.is_success() {
            warn!(near, status = resp.status, "places search returned no data");
            return Ok(Vec::new());
        }

        let body: SearchResponse = resp
            .json()
            .map_err(|e| FetchFailure::new(SourceKind::Places, e.to_string()))?;

        let records: Vec<ExternalRecord> = body
            .results
            .into_iter()
            .take(self.config.limit as usize)
            .filter_map(|place| {
                let name = place.name.filter(|n| !n.trim().is_empty())?;
                let address = place
                    .location
                    .and_then(|l| l.formatted_address)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                Some(ExternalRecord::Place(PlaceRecord { name, address }))
            })
            .collect();

        debug!(near, count = records.len(), "places fetched");
        Ok(records)
    }
}
