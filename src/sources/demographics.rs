// src/sources/demographics.rs

use crate::config::DemographicsConfig;
use crate::sources::http::{HttpClient, HttpRequest};
use crate::sources::{
    ContextSource, DemographicField, DemographicRecord, ExternalRecord, FetchFailure, FetchResult,
    LocationSelection, SourceKind,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Population figures for one configured county (US Census PEP API).
///
/// The API answers with `[[header...], [value...]]`; the two rows are zipped
/// into named fields.
pub struct DemographicsAdapter {
    config: DemographicsConfig,
    http: Arc<dyn HttpClient>,
}

impl DemographicsAdapter {
    pub fn new(config: DemographicsConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }
}

fn fail(reason: impl Into<String>) -> FetchFailure {
    FetchFailure::new(SourceKind::Demographics, reason)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pairs the header row with the first value row.
fn zip_rows(rows: &[Vec<Value>]) -> Result<DemographicRecord, FetchFailure> {
    let (header, values) = match rows {
        [header, values, ..] => (header, values),
        _ => return Err(fail(format!("expected header and value rows, got {} row(s)", rows.len()))),
    };

    let fields = header
        .iter()
        .zip(values.iter())
        .map(|(name, value)| DemographicField {
            name: cell_text(name),
            value: cell_text(value),
        })
        .collect();

    Ok(DemographicRecord { fields })
}

impl ContextSource for DemographicsAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Demographics
    }

    fn location_key(&self, _selection: &LocationSelection) -> String {
        format!("county:{}/state:{}", self.config.county_fips, self.config.state_fips)
    }

    fn fetch(&self, region: &str) -> FetchResult {
        let request = HttpRequest::get(&self.config.base_url)
            .query("get", &self.config.fields)
            .query("for", format!("county:{}", self.config.county_fips))
            .query("in", format!("state:{}", self.config.state_fips))
            .query("key", &self.config.api_key);

        let resp = self.http.get(&request).map_err(|e| fail(e.to_string()))?;
        if !resp.is_success() {
            return Err(fail(format!("HTTP {}: {}", resp.status, resp.body.trim())));
        }

        let rows: Vec<Vec<Value>> = resp.json().map_err(|e| fail(e.to_string()))?;
        let record = zip_rows(&rows)?;

        debug!(
            region,
            name = record.get("NAME").unwrap_or_default(),
            fields = record.fields.len(),
            "demographics fetched"
        );
        Ok(vec![ExternalRecord::Demographic(record)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zips_header_and_values_positionally() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            ["NAME", "POP", "DATE_CODE", "state", "county"],
            ["Cook County, Illinois", "5150233", 12, "17", "031"]
        ]))
        .unwrap();

        let record = zip_rows(&rows).unwrap();
        assert_eq!(record.fields.len(), 5);
        assert_eq!(record.fields[0].name, "NAME");
        assert_eq!(record.get("POP"), Some("5150233"));
        assert_eq!(record.get("DATE_CODE"), Some("12"));
    }

    #[test]
    fn short_value_row_truncates() {
        let rows: Vec<Vec<Value>> =
            serde_json::from_value(json!([["NAME", "POP", "DATE_CODE"], ["Cook County", null]]))
                .unwrap();
        let record = zip_rows(&rows).unwrap();
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.get("POP"), Some(""));
    }

    #[test]
    fn header_only_is_a_failure() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([["NAME"]])).unwrap();
        let failure = zip_rows(&rows).unwrap_err();
        assert_eq!(failure.source, SourceKind::Demographics);
    }
}
