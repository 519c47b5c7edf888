use crate::context::AppContext;
use crate::domain::filter::FilterCriteria;
use crate::domain::listing::{
    wildcard, ListingQuery, DEFAULT_LIMIT, DEFAULT_MIN_BEDROOMS, DEFAULT_PRICE_MAX,
    DEFAULT_PRICE_MIN,
};
use crate::domain::property::ListingType;
use crate::errors::ServerError;
use crate::responses::{json_response, ResultResp};
use crate::sources::LocationSelection;
use astra::Request;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;

type Params = HashMap<String, String>;

pub fn handle(req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let params = parse_query(&req);

    match (method, path) {
        ("GET", "/health") => json_response(&json!({
            "status": "ok",
            "rows": ctx.store.rows().len(),
        })),

        // Navigation lists
        ("GET", "/states") => json_response(&ctx.store.distinct_states()),
        ("GET", "/cities") => {
            let state = required(&params, "state")?;
            json_response(&ctx.store.distinct_cities(state))
        }
        ("GET", "/zips") => {
            let state = required(&params, "state")?;
            let city = required(&params, "city")?;
            json_response(&ctx.store.distinct_zips(state, city))
        }
        ("GET", "/home-types") => json_response(&ctx.store.distinct_home_types()),
        ("GET", "/listing-types") => json_response(&ctx.store.distinct_listing_types()),

        ("GET", "/listings") => {
            let query = listing_query(&params)?;
            json_response(&ctx.store.listings(&query))
        }
        ("GET", "/summary") => {
            let city = required(&params, "city")?;
            json_response(&ctx.store.summarize(city))
        }
        ("GET", "/context") => {
            let selection = LocationSelection::new(
                required(&params, "city")?,
                required(&params, "state")?,
                wildcard(params.get("zip").map(String::as_str)).map(str::to_string),
            );
            json_response(&ctx.aggregator.fetch_context(&selection))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_query(req: &Request) -> Params {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn required<'a>(params: &'a Params, key: &str) -> Result<&'a str, ServerError> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::BadRequest(format!("missing query parameter '{key}'")))
}

fn parsed_or<T: FromStr>(params: &Params, key: &str, default: T) -> Result<T, ServerError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ServerError::BadRequest(format!("invalid value '{raw}' for '{key}'"))),
    }
}

fn listing_query(params: &Params) -> Result<ListingQuery, ServerError> {
    let listing_type = wildcard(params.get("listing_type").map(String::as_str))
        .map(ListingType::from_str)
        .transpose()
        .map_err(ServerError::BadRequest)?;

    let criteria = FilterCriteria {
        state: required(params, "state")?.to_string(),
        city: required(params, "city")?.to_string(),
        zip: wildcard(params.get("zip").map(String::as_str)).map(str::to_string),
        price_min: parsed_or(params, "price_min", DEFAULT_PRICE_MIN)?,
        price_max: parsed_or(params, "price_max", DEFAULT_PRICE_MAX)?,
        min_bedrooms: parsed_or(params, "min_bedrooms", DEFAULT_MIN_BEDROOMS)?,
        home_type: wildcard(params.get("home_type").map(String::as_str)).map(str::to_string),
        listing_type,
    };

    Ok(ListingQuery {
        criteria,
        limit: parsed_or(params, "limit", DEFAULT_LIMIT)?,
    })
}
