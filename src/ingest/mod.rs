/// Backend data ingestion.
///
/// - `api`     : AquaMonitor REST API: URL construction, JSON parsing, fetch.
/// - `fixtures`: (test only) representative API response payloads.

pub mod api;

#[cfg(test)]
pub(crate) mod fixtures;
