/// HTTP endpoint serving derived station data
///
/// A small read-only JSON API for the dashboard front end and for scripts.
/// Everything it returns comes out of the derivation pipeline; nothing is
/// written back to the backend.
///
/// Endpoints:
/// - GET /health                    - Service health check
/// - GET /stations                  - All station view-models
/// - GET /stations/{id}             - One station view-model
/// - GET /stations/{id}/forecasts   - Past forecast batches, grouped by day

use log::{error, info};
use serde_json::json;

use crate::dashboard::Dashboard;
use crate::ingest::api::{ApiError, StationSource};

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

const ROUTES: [&str; 4] = [
    "/health",
    "/stations",
    "/stations/{id}",
    "/stations/{id}/forecasts",
];

/// Resolves a request path to a status code and JSON body.
///
/// Query strings are ignored.
pub fn route<S: StationSource>(dashboard: &mut Dashboard<S>, url: &str) -> (u16, serde_json::Value) {
    let path = url.split('?').next().unwrap_or(url).trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["health"] => handle_health(dashboard),
        ["stations"] => handle_stations(dashboard),
        ["stations", id] => handle_station(dashboard, &decode(id)),
        ["stations", id, "forecasts"] => handle_forecasts(dashboard, &decode(id)),
        _ => (
            404,
            json!({
                "error": "Not found",
                "available_endpoints": ROUTES,
            }),
        ),
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Handle /health endpoint
///
/// Reports on the snapshot already held; never triggers a backend fetch.
fn handle_health<S: StationSource>(dashboard: &Dashboard<S>) -> (u16, serde_json::Value) {
    let snapshot = dashboard.current_snapshot().map(|s| {
        json!({
            "generation": s.generation,
            "derived_at": s.derived_at,
            "age_secs": dashboard.snapshot_age().map(|age| age.num_seconds()),
            "stations": s.stations.len(),
            "alerting": s.alerting_stations().len(),
            "unreliable_forecasts": s.unreliable_forecasts().len(),
        })
    });

    (
        200,
        json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "authenticated": dashboard.session().token().is_some(),
            "snapshot": snapshot,
        }),
    )
}

/// Handle /stations endpoint
fn handle_stations<S: StationSource>(dashboard: &mut Dashboard<S>) -> (u16, serde_json::Value) {
    match dashboard.snapshot() {
        Ok(snapshot) => (
            200,
            json!({
                "generation": snapshot.generation,
                "derived_at": snapshot.derived_at,
                "stations": snapshot.stations,
            }),
        ),
        Err(e) => upstream_error(e),
    }
}

/// Handle /stations/{id} endpoint
fn handle_station<S: StationSource>(
    dashboard: &mut Dashboard<S>,
    station_id: &str,
) -> (u16, serde_json::Value) {
    let snapshot = match dashboard.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => return upstream_error(e),
    };

    match snapshot.station(station_id) {
        Some(station) => (200, json!(station)),
        None => (
            404,
            json!({
                "error": format!("Station {} not found", station_id),
                "station_id": station_id,
            }),
        ),
    }
}

/// Handle /stations/{id}/forecasts endpoint
fn handle_forecasts<S: StationSource>(
    dashboard: &mut Dashboard<S>,
    station_id: &str,
) -> (u16, serde_json::Value) {
    match dashboard.forecast_history(station_id) {
        Ok(history) => (
            200,
            json!({
                "station_id": station_id,
                "batch_count": history.batch_count(),
                "days": history.days,
            }),
        ),
        Err(e) => upstream_error(e),
    }
}

fn upstream_error(e: ApiError) -> (u16, serde_json::Value) {
    (
        502,
        json!({
            "error": "Backend unavailable",
            "detail": e.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks forever.
pub fn start_endpoint_server<S: StationSource>(
    port: u16,
    mut dashboard: Dashboard<S>,
) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    info!("HTTP endpoint listening on http://0.0.0.0:{}", port);
    for r in ROUTES {
        info!("   GET {}", r);
    }

    for request in server.incoming_requests() {
        let (status, body) = if *request.method() == tiny_http::Method::Get {
            route(&mut dashboard, request.url())
        } else {
            (405, json!({ "error": "Method not allowed" }))
        };

        if let Err(e) = request.respond(create_response(status, &body)) {
            error!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(
    status_code: u16,
    json: &serde_json::Value,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| "{}".to_string());

    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
