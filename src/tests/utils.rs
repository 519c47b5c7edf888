// src/tests/utils.rs

use crate::aggregator::{AggregatedContext, Aggregator, SourceReport};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::dataset::DatasetStore;
use crate::sources::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::sources::{ContextSource, FetchResult, LocationSelection, SourceKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PLACES_URL: &str = "https://api.foursquare.com";
pub const CHICAGO_FEED_URL: &str = "https://data.cityofchicago.org";
pub const CENSUS_URL: &str = "https://api.census.gov";
pub const WEATHER_URL: &str = "https://api.open-meteo.com";

pub const DATASET_CSV: &str = "\
Address,City,State,Correct_ZipCode,RentOrBuy,HomeType,Price,Size,Bedrooms,Bathroom,Pool,YearBuilt
12 Lake St,Chicago,IL,60601,Buy,Condo,350000,1100,2,1.5,No,2004
400 Wacker Dr,Chicago,IL,60601,Buy,Single Family,850000,2600,4,3,Yes,1998
77 Halsted St,Chicago,IL,60614,Rent,Apartment,2400,850,2,1,No,
9 Armitage Ave,Chicago,IL,60614,Buy,Townhouse,520000,1900,3,2.5,No,2011
1 Plaza Rd,Adjuntas,PR,00601,Buy,Single Family,210000,1500,3,2,No,1985
5 Congress Ave,Austin,TX,78701,Buy,Condo,480000,1000,2,2,Yes,2015
15 Orphan Ln,,,,Buy,Condo,300000,900,2,1,No,
";

/// Writes the fixture dataset into `dir` and returns its path.
pub fn write_dataset(dir: &Path) -> PathBuf {
    let path = dir.join("real_estate.csv");
    std::fs::write(&path, DATASET_CSV).unwrap_or_else(|e| panic!("fixture write failed: {e}"));
    path
}

pub fn fixture_store() -> DatasetStore {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path());
    DatasetStore::load(&path).unwrap_or_else(|e| panic!("fixture load failed: {e}"))
}

/// An `AppContext` over the fixture dataset whose adapters talk to `http`.
pub fn test_context(http: Arc<FakeHttp>) -> AppContext {
    let aggregator = Aggregator::from_config(&AppConfig::default(), http);
    AppContext::new(fixture_store(), aggregator)
}

pub trait QueryValue {
    fn query_value(&self, key: &str) -> Option<&str>;
}

impl QueryValue for HttpRequest {
    fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub trait ReportLookup {
    fn report(&self, source: SourceKind) -> Option<&SourceReport>;
}

impl ReportLookup for AggregatedContext {
    fn report(&self, source: SourceKind) -> Option<&SourceReport> {
        self.reports.iter().find(|r| r.source == source)
    }
}

/// Canned HTTP responses matched by URL prefix. Every request is recorded.
#[derive(Default)]
pub struct FakeHttp {
    routes: Vec<(String, Result<HttpResponse, String>)>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url_prefix: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            url_prefix.to_string(),
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        ));
        self
    }

    pub fn fail(mut self, url_prefix: &str, message: &str) -> Self {
        self.routes
            .push((url_prefix.to_string(), Err(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url_prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|r| r.url.starts_with(url_prefix))
            .count()
    }
}

impl HttpClient for FakeHttp {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.lock().unwrap().push(request.clone());

        match self
            .routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
        {
            Some((_, Ok(resp))) => Ok(resp.clone()),
            Some((_, Err(message))) => Err(HttpError::Network(message.clone())),
            None => Err(HttpError::Network(format!("no route for {}", request.url))),
        }
    }
}

/// A source with a scripted result that counts how often it is fetched.
pub struct FakeSource {
    kind: SourceKind,
    only_city: Option<String>,
    result: Box<dyn Fn() -> FetchResult + Send + Sync>,
    fetches: AtomicUsize,
}

impl FakeSource {
    pub fn new(kind: SourceKind, result: impl Fn() -> FetchResult + Send + Sync + 'static) -> Self {
        Self {
            kind,
            only_city: None,
            result: Box::new(result),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn gated_to(mut self, city: &str) -> Self {
        self.only_city = Some(city.to_lowercase());
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ContextSource for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn covers(&self, selection: &LocationSelection) -> bool {
        self.only_city
            .as_deref()
            .map_or(true, |city| selection.city.to_lowercase() == city)
    }

    fn location_key(&self, selection: &LocationSelection) -> String {
        selection.city.clone()
    }

    fn fetch(&self, _location_key: &str) -> FetchResult {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        (self.result)()
    }
}

pub fn chicago() -> LocationSelection {
    LocationSelection::new("Chicago", "IL", None)
}

pub const WEATHER_CLEAR_FREEZING: &str =
    r#"{"current_weather":{"time":"2026-10-16T09:00","temperature":0,"windspeed":10,"weathercode":0}}"#;

pub const PLACES_BODY: &str = r#"{"results":[
    {"name":"Lou Malnati's","location":{"formatted_address":"439 N Wells St, Chicago, IL 60654"}},
    {"name":"Au Cheval","location":{}},
    {"location":{"formatted_address":"nameless"}}
]}"#;

pub const PLACES_MANY_BODY: &str = r#"{"results":[
    {"name":"Diner 1","location":{"formatted_address":"1 State St"}},
    {"name":"Diner 2","location":{"formatted_address":"2 State St"}},
    {"name":"Diner 3","location":{"formatted_address":"3 State St"}},
    {"name":"Diner 4","location":{"formatted_address":"4 State St"}},
    {"name":"Diner 5","location":{"formatted_address":"5 State St"}},
    {"name":"Diner 6","location":{"formatted_address":"6 State St"}},
    {"name":"Diner 7","location":{"formatted_address":"7 State St"}}
]}"#;

pub const INCIDENTS_BODY: &str = r#"[
    {"date":"2026-10-15T23:55:00.000","primary_type":"THEFT","block":"001XX N STATE ST"},
    {"date":"2026-10-15T23:40:00.000","primary_type":"BATTERY"}
]"#;

pub const CENSUS_BODY: &str = r#"[
    ["NAME","POP","DATE_CODE","state","county"],
    ["Cook County, Illinois","5150233","12","17","031"]
]"#;
