/// aquamonitor: station metrics derivation for the AquaMonitor water-level
/// dashboard.
///
/// # Module structure
///
/// ```text
/// aquamonitor
/// ├── model       shared data types (StationMeasurement, Prediction, StationViewModel, ...)
/// ├── analysis
/// │   ├── status      range position + normal/warning/danger
/// │   ├── trend       rising/falling/stable from a forecast batch
/// │   ├── sufficiency forecast data sufficiency (41-day target, 38-day minimum)
/// │   ├── groupings   forecast batch selection and day/batch grouping
/// │   └── view_model  per-station display record assembly
/// ├── auth        explicit session + the single can_edit capability check
/// ├── config      aquamonitor.toml + environment overrides
/// ├── ingest
/// │   ├── api       backend REST API: URL construction, parsing, fetch
/// │   └── fixtures  (test only) representative API payloads
/// ├── monitor     snapshot holder with last-write-wins refreshes
/// ├── dashboard   fetch → derive → snapshot orchestration
/// └── endpoint    read-only JSON HTTP API over derived snapshots
/// ```

pub mod analysis;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod monitor;
