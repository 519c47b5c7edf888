//! Application settings.
//!
//! Figment merges built-in defaults, `explorer.toml`, `EXPLORER_*` variables
//! (nested with `__`, e.g. `EXPLORER_PLACES__LIMIT`) and the provider keys
//! `FOURSQUARE_API_KEY` / `CENSUS_API_KEY`.
//!
//! The incident feed and weather city tables are not part of the merged
//! defaults: a configured table replaces the built-in one instead of being
//! merged into it.

use crate::errors::ConfigError;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "explorer.toml";
const DOTENV_FILE: &str = ".env";

const CHICAGO_INCIDENT_FEED: &str = "https://data.cityofchicago.org/resource/ijzp-q8t2.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub bind_addr: String,
    pub max_workers: usize,
    pub http_timeout_secs: u64,
    pub places: PlacesConfig,
    pub demographics: DemographicsConfig,
    pub weather: WeatherConfig,
    /// City name -> incident feed endpoint. `None` means the built-in table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub base_url: String,
    pub api_key: String,
    /// Foursquare category id; 13065 is "Restaurant".
    pub category: String,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicsConfig {
    pub base_url: String,
    pub api_key: String,
    pub fields: String,
    pub state_fips: String,
    pub county_fips: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    /// `None` means the built-in 20-city table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cities: Option<BTreeMap<String, Coordinates>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("real_estate.csv"),
            bind_addr: "127.0.0.1:3000".to_string(),
            max_workers: 8,
            http_timeout_secs: 10,
            places: PlacesConfig::default(),
            demographics: DemographicsConfig::default(),
            weather: WeatherConfig::default(),
            incidents: None,
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.foursquare.com/v3/places/search".to_string(),
            api_key: String::new(),
            category: "13065".to_string(),
            limit: 5,
        }
    }
}

impl Default for DemographicsConfig {
    fn default() -> Self {
        // Cook County, IL
        Self {
            base_url: "https://api.census.gov/data/2020/pep/population".to_string(),
            api_key: String::new(),
            fields: "NAME,POP,DATE_CODE".to_string(),
            state_fips: "17".to_string(),
            county_fips: "031".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            cities: None,
        }
    }
}

impl WeatherConfig {
    /// The configured coordinate table, or the built-in one.
    pub fn city_table(&self) -> BTreeMap<String, Coordinates> {
        self.cities.clone().unwrap_or_else(default_city_table)
    }
}

fn default_city_table() -> BTreeMap<String, Coordinates> {
    let table: [(&str, f64, f64); 20] = [
        ("chicago", 41.8781, -87.6298),
        ("new york", 40.7128, -74.0060),
        ("los angeles", 34.0522, -118.2437),
        ("seattle", 47.6062, -122.3321),
        ("houston", 29.7604, -95.3698),
        ("denver", 39.7392, -104.9903),
        ("philadelphia", 39.9526, -75.1652),
        ("phoenix", 33.4484, -112.0740),
        ("san antonio", 29.4241, -98.4936),
        ("san diego", 32.7157, -117.1611),
        ("dallas", 32.7767, -96.7970),
        ("san jose", 37.3382, -121.8863),
        ("austin", 30.2672, -97.7431),
        ("jacksonville", 30.3322, -81.6557),
        ("fort worth", 32.7555, -97.3308),
        ("columbus", 39.9612, -82.9988),
        ("charlotte", 35.2271, -80.8431),
        ("san francisco", 37.7749, -122.4194),
        ("indianapolis", 39.7684, -86.1581),
        ("washington", 38.9072, -77.0369),
    ];

    table
        .into_iter()
        .map(|(name, latitude, longitude)| {
            (
                name.to_string(),
                Coordinates {
                    latitude,
                    longitude,
                },
            )
        })
        .collect()
}

fn default_incident_feeds() -> BTreeMap<String, String> {
    BTreeMap::from([("chicago".to_string(), CHICAGO_INCIDENT_FEED.to_string())])
}

/// Reads `path` into the environment. Returns `Ok(false)` when the file does
/// not exist; a file that exists but can't be parsed is an error.
fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

impl AppConfig {
    pub fn figment(config_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("EXPLORER_").split("__"))
            .merge(
                Env::raw()
                    .only(&["FOURSQUARE_API_KEY"])
                    .map(|_| "places.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&["CENSUS_API_KEY"])
                    .map(|_| "demographics.api_key".into()),
            )
    }

    /// Loads `.env` (if any) into the environment, then extracts the config.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        if let Err(e) = load_env_file(Path::new(DOTENV_FILE)) {
            warn!(file = DOTENV_FILE, error = %e, "ignoring malformed env file");
        }
        Ok(Self::figment(config_path).extract()?)
    }

    /// The configured incident feeds, or the built-in Chicago feed.
    pub fn incident_feeds(&self) -> BTreeMap<String, String> {
        self.incidents.clone().unwrap_or_else(default_incident_feeds)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }
}
