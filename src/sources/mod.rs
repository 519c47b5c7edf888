//! Adapters for the third-party data shown next to a location.
//!
//! Every adapter turns one provider's response into [`ExternalRecord`]s, or
//! reports a [`FetchFailure`] value. Nothing in here returns an error that
//! could stop a sibling adapter.

pub mod demographics;
pub mod http;
pub mod incidents;
pub mod places;
pub mod weather;

pub use demographics::DemographicsAdapter;
pub use http::{HttpClient, ReqwestClient};
pub use incidents::IncidentAdapter;
pub use places::PlacesAdapter;
pub use weather::WeatherAdapter;

use serde::Serialize;
use std::fmt;

/// Placeholder used when a provider leaves an optional text field out.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Places,
    Incidents,
    Demographics,
    Weather,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Places => "places",
            SourceKind::Incidents => "incidents",
            SourceKind::Demographics => "demographics",
            SourceKind::Weather => "weather",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentRecord {
    pub timestamp: String,
    pub category: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicField {
    pub name: String,
    pub value: String,
}

/// Header/value pairs in the order the provider returned them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicRecord {
    pub fields: Vec<DemographicField>,
}

impl DemographicRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub observed_at: Option<String>,
    pub temperature_f: i64,
    pub windspeed_mph: i64,
    pub condition_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExternalRecord {
    Place(PlaceRecord),
    Incident(IncidentRecord),
    Demographic(DemographicRecord),
    Weather(WeatherRecord),
}

/// A source that could not deliver data for this request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub source: SourceKind,
    pub reason: String,
}

impl FetchFailure {
    pub fn new(source: SourceKind, reason: impl Into<String>) -> Self {
        Self {
            source,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unavailable: {}", self.source, self.reason)
    }
}

pub type FetchResult = Result<Vec<ExternalRecord>, FetchFailure>;

/// The location the user picked in the navigation lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSelection {
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
}

impl LocationSelection {
    pub fn new(city: impl Into<String>, state: impl Into<String>, zip: Option<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            zip,
        }
    }

    /// The zip when one is selected, otherwise "City, State".
    pub fn places_key(&self) -> String {
        match &self.zip {
            Some(zip) => zip.clone(),
            None => format!("{}, {}", self.city, self.state),
        }
    }
}

/// One external provider.
pub trait ContextSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Gate: whether this source may be queried for `selection` at all.
    fn covers(&self, _selection: &LocationSelection) -> bool {
        true
    }

    /// The key this provider is queried with (a zip, a city, "City, State").
    fn location_key(&self, selection: &LocationSelection) -> String;

    fn fetch(&self, location_key: &str) -> FetchResult;
}
