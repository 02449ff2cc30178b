/// AquaMonitor backend REST API client.
///
/// Handles URL construction, JSON response parsing and the blocking fetch
/// for the two resources the derivation pipeline consumes:
///   {base}/stations
///   {base}/predictions[?station_id=...]
///
/// The backend has shipped both bare JSON arrays and objects wrapping the
/// array under the resource name; the parsers accept either. See
/// `fixtures.rs` for annotated examples.
///
/// No retries or backoff happen here. A failed fetch is reported to the
/// caller, which decides whether to keep serving the previous snapshot.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::auth::Session;
use crate::model::{Prediction, StationMeasurement};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing backend data.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    /// Non-2xx HTTP response from the backend.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body could not be deserialized.
    #[error("parse error: {0}")]
    Parse(String),
    /// The session carries no bearer token.
    #[error("session has no API token")]
    MissingToken,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the station list URL. Trailing slashes on `base_url` are ignored.
pub fn build_stations_url(base_url: &str) -> String {
    format!("{}/stations", base_url.trim_end_matches('/'))
}

/// Builds the predictions URL, optionally filtered to one station.
///
/// # Example
/// ```
/// use aquamonitor::ingest::api::build_predictions_url;
///
/// let url = build_predictions_url("https://api.example.org/v1/", Some("ST 7"));
/// assert_eq!(url, "https://api.example.org/v1/predictions?station_id=ST%207");
/// ```
pub fn build_predictions_url(base_url: &str, station_id: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match station_id {
        Some(id) => format!(
            "{}/predictions?station_id={}",
            base,
            urlencoding::encode(id)
        ),
        None => format!("{}/predictions", base),
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Unwraps a listing body: either a bare array or `{ "<resource>": [...] }`.
/// Each entry is then deserialized on its own so the error names the entry
/// and the field that failed.
fn parse_listing<T: DeserializeOwned>(json: &str, resource: &str) -> Result<Vec<T>, ApiError> {
    let body: Value = serde_json::from_str(json)
        .map_err(|e| ApiError::Parse(format!("{} body is not valid JSON: {}", resource, e)))?;

    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut wrapper) => match wrapper.remove(resource) {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(ApiError::Parse(format!(
                    "{} body has no '{}' array",
                    resource, resource
                )));
            }
        },
        other => {
            return Err(ApiError::Parse(format!(
                "{} body must be an array or object, got {}",
                resource, other
            )));
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            serde_json::from_value(entry)
                .map_err(|e| ApiError::Parse(format!("{} entry {}: {}", resource, i, e)))
        })
        .collect()
}

/// Parses a `GET /stations` body. An empty list is valid.
///
/// # Errors
/// - `ApiError::Parse`: malformed JSON or a station record missing
///   required fields. A `null` level is not an error; it reads as NaN.
pub fn parse_stations_response(json: &str) -> Result<Vec<StationMeasurement>, ApiError> {
    parse_listing(json, "stations")
}

/// Parses a `GET /predictions` body. An empty list is valid.
///
/// # Errors
/// - `ApiError::Parse`: malformed JSON, bad dates, or missing fields.
pub fn parse_predictions_response(json: &str) -> Result<Vec<Prediction>, ApiError> {
    parse_listing(json, "predictions")
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Where station and prediction payloads come from. `ApiClient` is the
/// production source; tests substitute canned payloads.
pub trait StationSource {
    fn stations(&self, session: &Session) -> Result<Vec<StationMeasurement>, ApiError>;

    fn predictions(
        &self,
        session: &Session,
        station_id: Option<&str>,
    ) -> Result<Vec<Prediction>, ApiError>;
}

/// Blocking client for the backend API.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches every station visible to the session.
    pub fn fetch_stations(&self, session: &Session) -> Result<Vec<StationMeasurement>, ApiError> {
        let body = self.get(&build_stations_url(&self.base_url), session)?;
        parse_stations_response(&body)
    }

    /// Fetches predictions, for one station or for all of them.
    pub fn fetch_predictions(
        &self,
        session: &Session,
        station_id: Option<&str>,
    ) -> Result<Vec<Prediction>, ApiError> {
        let body = self.get(&build_predictions_url(&self.base_url, station_id), session)?;
        parse_predictions_response(&body)
    }

    fn get(&self, url: &str, session: &Session) -> Result<String, ApiError> {
        let token = session.token().ok_or(ApiError::MissingToken)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        response
            .text()
            .map_err(|e| ApiError::Transport(format!("reading body failed: {}", e)))
    }
}

impl StationSource for ApiClient {
    fn stations(&self, session: &Session) -> Result<Vec<StationMeasurement>, ApiError> {
        self.fetch_stations(session)
    }

    fn predictions(
        &self,
        session: &Session,
        station_id: Option<&str>,
    ) -> Result<Vec<Prediction>, ApiError> {
        self.fetch_predictions(session, station_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
