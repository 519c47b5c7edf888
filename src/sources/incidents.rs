// src/sources/incidents.rs

use crate::sources::http::{HttpClient, HttpRequest};
use crate::sources::{
    ContextSource, ExternalRecord, FetchFailure, FetchResult, IncidentRecord, LocationSelection,
    SourceKind, NOT_AVAILABLE,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const INCIDENT_LIMIT: u32 = 5;

/// One row of a Socrata incident feed.
#[derive(Debug, Deserialize)]
struct Incident {
    date: Option<String>,
    primary_type: Option<String>,
    block: Option<String>,
}

/// Most recent incidents from a city's open-data feed.
///
/// Only cities listed in the endpoint table are covered; the aggregator
/// never calls `fetch` for any other city.
pub struct IncidentAdapter {
    endpoints: BTreeMap<String, String>,
    http: Arc<dyn HttpClient>,
}

impl IncidentAdapter {
    pub fn new(endpoints: BTreeMap<String, String>, http: Arc<dyn HttpClient>) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|(city, url)| (normalize_city(&city), url))
            .collect();
        Self { endpoints, http }
    }

    fn endpoint(&self, city: &str) -> Option<&str> {
        self.endpoints.get(&normalize_city(city)).map(String::as_str)
    }
}

fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

fn fail(reason: impl Into<String>) -> FetchFailure {
    FetchFailure::new(SourceKind::Incidents, reason)
}

impl ContextSource for IncidentAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Incidents
    }

    fn covers(&self, selection: &LocationSelection) -> bool {
        self.endpoint(&selection.city).is_some()
    }

    fn location_key(&self, selection: &LocationSelection) -> String {
        selection.city.clone()
    }

    fn fetch(&self, city: &str) -> FetchResult {
        let url = self
            .endpoint(city)
            .ok_or_else(|| fail(format!("no incident feed for {city}")))?;

        let request = HttpRequest::get(url)
            .query("$limit", INCIDENT_LIMIT)
            .query("$order", "date DESC");

        let resp = self.http.get(&request).map_err(|e| fail(e.to_string()))?;
        if !resp.is_success() {
            return Err(fail(format!("HTTP {}", resp.status)));
        }

        let incidents: Vec<Incident> = resp.json().map_err(|e| fail(e.to_string()))?;

        let records: Vec<ExternalRecord> = incidents
            .into_iter()
            .take(INCIDENT_LIMIT as usize)
            .map(|i| {
                ExternalRecord::Incident(IncidentRecord {
                    timestamp: i.date.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    category: i.primary_type.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    location: i.block.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                })
            })
            .collect();

        debug!(city, count = records.len(), "incidents fetched");
        Ok(records)
    }
}
