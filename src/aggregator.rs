// src/aggregator.rs

use crate::config::AppConfig;
use crate::sources::{
    ContextSource, DemographicsAdapter, ExternalRecord, FetchFailure, FetchResult, HttpClient,
    IncidentAdapter, LocationSelection, PlacesAdapter, SourceKind, WeatherAdapter,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, info_span, warn};

const PANICKED: &str = "source panicked";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Ok { records: Vec<ExternalRecord> },
    NoData,
    Failed { failure: FetchFailure },
}

impl From<FetchResult> for SourceOutcome {
    fn from(result: FetchResult) -> Self {
        match result {
            Ok(records) if records.is_empty() => SourceOutcome::NoData,
            Ok(records) => SourceOutcome::Ok { records },
            Err(failure) => SourceOutcome::Failed { failure },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    pub location_key: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceReport {
    pub fn records(&self) -> &[ExternalRecord] {
        match &self.outcome {
            SourceOutcome::Ok { records } => records,
            _ => &[],
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.outcome {
            SourceOutcome::Failed { failure } => Some(failure),
            _ => None,
        }
    }
}

/// Everything the external sources said about one location, in
/// presentation order.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedContext {
    pub selection: LocationSelection,
    pub fetched_at: DateTime<Utc>,
    pub reports: Vec<SourceReport>,
}

impl AggregatedContext {
    pub fn records(&self) -> impl Iterator<Item = &ExternalRecord> {
        self.reports.iter().flat_map(|r| r.records().iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchFailure> {
        self.reports.iter().filter_map(SourceReport::failure)
    }
}

/// Fans a location out to every external source and collects what comes back.
pub struct Aggregator {
    sources: Vec<Arc<dyn ContextSource>>,
}

impl Aggregator {
    /// `sources` are reported in the given order.
    pub fn new(sources: Vec<Arc<dyn ContextSource>>) -> Self {
        Self { sources }
    }

    /// Places, incidents, demographics, weather.
    pub fn from_config(config: &AppConfig, http: Arc<dyn HttpClient>) -> Self {
        let sources: Vec<Arc<dyn ContextSource>> = vec![
            Arc::new(PlacesAdapter::new(config.places.clone(), http.clone())),
            Arc::new(IncidentAdapter::new(config.incident_feeds(), http.clone())),
            Arc::new(DemographicsAdapter::new(config.demographics.clone(), http.clone())),
            Arc::new(WeatherAdapter::new(config.weather.clone(), http)),
        ];
        Self::new(sources)
    }

    /// Queries every source that covers `selection`, each on its own thread.
    /// A failing or panicking source only affects its own report.
    pub fn fetch_context(&self, selection: &LocationSelection) -> AggregatedContext {
        let started = Instant::now();

        let planned: Vec<(&Arc<dyn ContextSource>, String)> = self
            .sources
            .iter()
            .filter(|source| source.covers(selection))
            .map(|source| (source, source.location_key(selection)))
            .collect();

        let reports: Vec<SourceReport> = thread::scope(|scope| {
            let handles: Vec<_> = planned
                .iter()
                .map(|(source, key)| scope.spawn(move || run_source(source, key)))
                .collect();

            handles
                .into_iter()
                .zip(planned.iter())
                .map(|(handle, (source, key))| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(FetchFailure::new(source.kind(), PANICKED)));

                    if let Err(failure) = &result {
                        warn!(source = %failure.source, reason = %failure.reason, "source failed");
                    }

                    SourceReport {
                        source: source.kind(),
                        location_key: key.clone(),
                        outcome: result.into(),
                    }
                })
                .collect()
        });

        let context = AggregatedContext {
            selection: selection.clone(),
            fetched_at: Utc::now(),
            reports,
        };

        info!(
            city = %selection.city,
            state = %selection.state,
            sources = context.reports.len(),
            records = context.records().count(),
            failed = context.failures().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "context aggregated"
        );

        context
    }
}

fn run_source(source: &Arc<dyn ContextSource>, key: &str) -> FetchResult {
    let span = info_span!("source", source = %source.kind(), key);
    let _enter = span.enter();
    source.fetch(key)
}
