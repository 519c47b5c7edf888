// src/sources/weather.rs

use crate::config::{Coordinates, WeatherConfig};
use crate::sources::http::{HttpClient, HttpRequest};
use crate::sources::{
    ContextSource, ExternalRecord, FetchFailure, FetchResult, LocationSelection, SourceKind,
    WeatherRecord,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub const UNSUPPORTED_CITY: &str = "unsupported city";
pub const NO_WEATHER_DATA: &str = "no weather data returned";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentWeather {
    time: Option<String>,
    temperature: f64,
    windspeed: f64,
    weathercode: f64,
}

/// WMO weather interpretation code to a short label.
pub fn condition_label(code: i64) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Rime fog",
        51 => "Light drizzle",
        53 => "Drizzle",
        55 => "Dense drizzle",
        61 => "Light rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Snow",
        80 => "Rain showers",
        95 => "Thunderstorm",
        _ => "Unknown",
    }
}

/// Codes arrive as JSON numbers; anything that isn't a whole number has no label.
fn label_for_code(code: f64) -> &'static str {
    if code.fract() == 0.0 {
        condition_label(code as i64)
    } else {
        "Unknown"
    }
}

/// Celsius to whole Fahrenheit, halves rounded to even.
pub fn celsius_to_fahrenheit(celsius: f64) -> i64 {
    (celsius * 9.0 / 5.0 + 32.0).round_ties_even() as i64
}

/// km/h to whole mph, halves rounded to even.
pub fn kmh_to_mph(kmh: f64) -> i64 {
    (kmh * 0.621371).round_ties_even() as i64
}

/// Current conditions for a city from Open-Meteo.
///
/// Cities are resolved through a fixed coordinate table; a city outside the
/// table is reported without making a request.
pub struct WeatherAdapter {
    base_url: String,
    cities: BTreeMap<String, Coordinates>,
    http: Arc<dyn HttpClient>,
}

impl WeatherAdapter {
    pub fn new(config: WeatherConfig, http: Arc<dyn HttpClient>) -> Self {
        let cities = config
            .city_table()
            .into_iter()
            .map(|(name, coords)| (name.trim().to_lowercase(), coords))
            .collect();

        Self {
            base_url: config.base_url,
            cities,
            http,
        }
    }

    pub fn coordinates(&self, city: &str) -> Option<Coordinates> {
        self.cities.get(&city.trim().to_lowercase()).copied()
    }
}

fn fail(reason: impl Into<String>) -> FetchFailure {
    FetchFailure::new(SourceKind::Weather, reason)
}

impl ContextSource for WeatherAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Weather
    }

    fn location_key(&self, selection: &LocationSelection) -> String {
        selection.city.clone()
    }

    fn fetch(&self, city: &str) -> FetchResult {
        let coords = self.coordinates(city).ok_or_else(|| fail(UNSUPPORTED_CITY))?;

        let request = HttpRequest::get(&self.base_url)
            .query("latitude", coords.latitude)
            .query("longitude", coords.longitude)
            .query("current_weather", "true")
            .query("timezone", "auto");

        let resp = self.http.get(&request).map_err(|e| fail(e.to_string()))?;
        if !resp.is_success() {
            return Err(fail(format!("HTTP {}", resp.status)));
        }

        let forecast: ForecastResponse = resp.json().map_err(|e| fail(e.to_string()))?;

        // A missing, null or empty object all mean the same thing.
        let current = match forecast.current_weather {
            Some(Value::Object(map)) if !map.is_empty() => Value::Object(map),
            _ => return Err(fail(NO_WEATHER_DATA)),
        };
        let current: CurrentWeather =
            serde_json::from_value(current).map_err(|e| fail(e.to_string()))?;

        let record = WeatherRecord {
            observed_at: current.time,
            temperature_f: celsius_to_fahrenheit(current.temperature),
            windspeed_mph: kmh_to_mph(current.windspeed),
            condition_label: label_for_code(current.weathercode).to_string(),
        };

        debug!(city, ?record, "weather fetched");
        Ok(vec![ExternalRecord::Weather(record)])
    }
}
