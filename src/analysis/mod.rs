/// Station metrics derivation for the AquaMonitor dashboard.
///
/// Everything under `analysis` is pure: inputs are borrowed snapshots, the
/// outputs are freshly built values, and nothing here logs, allocates
/// shared state, or fails. Malformed numbers (NaN, infinities) flow through
/// to the output untouched; guarding them is the presentation layer's job.
///
/// Submodules:
/// - `status`     : range position and normal/warning/danger classification.
/// - `trend`      : rising/falling/stable from a forecast batch.
/// - `sufficiency`: how much trailing history backs the forecasts.
/// - `groupings`  : forecast batch selection and day/batch grouping.
/// - `view_model` : assembles the per-station display record.

pub mod groupings;
pub mod status;
pub mod sufficiency;
pub mod trend;
pub mod view_model;
