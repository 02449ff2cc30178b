/// Dashboard service: fetch → derive → snapshot.
///
/// Ties a `StationSource` (normally the backend `ApiClient`), the
/// application `Session` and the `SnapshotMonitor` together. Both the HTTP
/// endpoint and the CLI drive the dashboard through this type.
///
/// Refresh policy:
/// 1. A refresh fetches the full station list and all predictions, then runs
///    one derivation pass over everything.
/// 2. Reads serve the current snapshot while it is fresh.
/// 3. A stale or missing snapshot triggers a refresh first. If that fetch
///    fails and an older snapshot exists, the older one is served.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use crate::analysis::groupings::{group_predictions_by_forecast_batch, ForecastHistory};
use crate::analysis::view_model::{build_view_models, DerivationOptions};
use crate::auth::Session;
use crate::ingest::api::{ApiError, StationSource};
use crate::monitor::{Snapshot, SnapshotMonitor};

pub struct Dashboard<S: StationSource> {
    source: S,
    session: Session,
    monitor: SnapshotMonitor,
    options: DerivationOptions,
}

impl<S: StationSource> Dashboard<S> {
    pub fn new(
        source: S,
        session: Session,
        refresh_interval: chrono::Duration,
        options: DerivationOptions,
    ) -> Self {
        Self {
            source,
            session,
            monitor: SnapshotMonitor::new(refresh_interval),
            options,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Latest snapshot without triggering a refresh.
    pub fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.monitor.current()
    }

    pub fn snapshot_age(&self) -> Option<chrono::Duration> {
        self.monitor.age(Utc::now())
    }

    /// Fetches and derives a new snapshot unconditionally.
    pub fn refresh(&mut self) -> Result<Arc<Snapshot>, ApiError> {
        let ticket = self.monitor.begin_refresh(Utc::now());

        let stations = self.source.stations(&self.session)?;
        let predictions = self.source.predictions(&self.session, None)?;
        info!(
            "Refresh #{}: {} stations, {} predictions",
            ticket.generation(),
            stations.len(),
            predictions.len()
        );

        let view_models = build_view_models(&stations, &predictions, self.options);
        self.monitor.complete_refresh(ticket, view_models, Utc::now());

        // A newer refresh may have won; serve whatever is current.
        self.monitor
            .current()
            .ok_or_else(|| ApiError::Transport("no snapshot after refresh".to_string()))
    }

    /// Current snapshot, refreshed first if stale. Falls back to the old
    /// snapshot when the refresh fails.
    pub fn snapshot(&mut self) -> Result<Arc<Snapshot>, ApiError> {
        if !self.monitor.is_stale(Utc::now()) {
            if let Some(snapshot) = self.monitor.current() {
                return Ok(snapshot);
            }
        }

        match self.refresh() {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => match self.monitor.current() {
                Some(old) => {
                    warn!("Refresh failed ({}); serving snapshot #{}", e, old.generation);
                    Ok(old)
                }
                None => Err(e),
            },
        }
    }

    /// Past forecast batches of one station, grouped for browsing.
    ///
    /// Always fetched fresh; forecast history is not part of the snapshot.
    pub fn forecast_history(&self, station_id: &str) -> Result<ForecastHistory, ApiError> {
        let predictions = self.source.predictions(&self.session, Some(station_id))?;
        let own: Vec<_> = predictions
            .into_iter()
            .filter(|p| p.station_id == station_id)
            .collect();
        Ok(group_predictions_by_forecast_batch(&own))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::{Role, User};
    use crate::ingest::api::{parse_predictions_response, parse_stations_response};
    use crate::ingest::fixtures::{fixture_prediction_batches_json, fixture_stations_json};
    use crate::model::{LevelStatus, Prediction, StationMeasurement, Trend};
    use std::cell::Cell;

    /// Serves the JSON fixtures; can be switched to fail, and counts fetches.
    pub(crate) struct FixtureSource {
        pub fail: Cell<bool>,
        pub station_fetches: Cell<usize>,
    }

    impl FixtureSource {
        pub(crate) fn new() -> Self {
            Self {
                fail: Cell::new(false),
                station_fetches: Cell::new(0),
            }
        }
    }

    impl StationSource for FixtureSource {
        fn stations(&self, _session: &Session) -> Result<Vec<StationMeasurement>, ApiError> {
            self.station_fetches.set(self.station_fetches.get() + 1);
            if self.fail.get() {
                return Err(ApiError::Http(503));
            }
            parse_stations_response(fixture_stations_json())
        }

        fn predictions(
            &self,
            _session: &Session,
            station_id: Option<&str>,
        ) -> Result<Vec<Prediction>, ApiError> {
            if self.fail.get() {
                return Err(ApiError::Http(503));
            }
            let all = parse_predictions_response(fixture_prediction_batches_json())?;
            Ok(all
                .into_iter()
                .filter(|p| station_id.is_none_or(|id| p.station_id == id))
                .collect())
        }
    }

    pub(crate) fn test_session() -> Session {
        Session::new(
            "test-token",
            User {
                id: "tester".to_string(),
                role: Role::Viewer,
                municipality_id: None,
            },
        )
    }

    pub(crate) fn dashboard(interval: chrono::Duration) -> Dashboard<FixtureSource> {
        Dashboard::new(
            FixtureSource::new(),
            test_session(),
            interval,
            DerivationOptions::default(),
        )
    }

    #[test]
    fn test_refresh_derives_every_station() {
        let mut dash = dashboard(chrono::Duration::minutes(5));
        let snapshot = dash.refresh().expect("refresh should succeed");

        assert_eq!(snapshot.stations.len(), 3);
        let zagreb = snapshot.station("HR-3015").unwrap();
        assert_eq!(zagreb.status, LevelStatus::Danger);
        // Newest batch (2025-03-02T06:00) has a single -8 cm day.
        assert_eq!(zagreb.trend, Trend::Falling);
        assert_eq!(zagreb.predictions.len(), 1);
    }

    #[test]
    fn test_fresh_snapshot_is_not_refetched() {
        let mut dash = dashboard(chrono::Duration::minutes(5));
        dash.snapshot().expect("first read refreshes");
        dash.snapshot().expect("second read is cached");
        assert_eq!(dash.source.station_fetches.get(), 1);
    }

    #[test]
    fn test_stale_snapshot_is_refetched() {
        let mut dash = dashboard(chrono::Duration::zero());
        dash.snapshot().expect("first read refreshes");
        dash.snapshot().expect("zero interval forces another refresh");
        assert_eq!(dash.source.station_fetches.get(), 2);
    }

    #[test]
    fn test_failed_refresh_serves_previous_snapshot() {
        let mut dash = dashboard(chrono::Duration::zero());
        let first = dash.snapshot().expect("first read refreshes");

        dash.source.fail.set(true);
        let second = dash.snapshot().expect("old snapshot should be served");
        assert_eq!(second.generation, first.generation);
    }

    #[test]
    fn test_failed_refresh_without_snapshot_is_an_error() {
        let mut dash = dashboard(chrono::Duration::minutes(5));
        dash.source.fail.set(true);
        assert_eq!(dash.snapshot().unwrap_err(), ApiError::Http(503));
    }

    #[test]
    fn test_forecast_history_groups_station_batches() {
        let dash = dashboard(chrono::Duration::minutes(5));
        let history = dash.forecast_history("HR-3015").expect("should fetch");
        assert_eq!(history.days.len(), 2);
        assert_eq!(history.batch_count(), 3);
        assert_eq!(history.prediction_count(), 5);

        let empty = dash.forecast_history("HR-3020").expect("should fetch");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_current_snapshot_does_not_fetch() {
        let mut dash = dashboard(chrono::Duration::minutes(5));
        assert!(dash.current_snapshot().is_none());
        assert!(dash.snapshot_age().is_none());
        assert_eq!(dash.source.station_fetches.get(), 0);

        dash.refresh().expect("refresh should succeed");
        let current = dash.current_snapshot().expect("snapshot installed");
        assert_eq!(current.alerting_stations().len(), 1);
        assert_eq!(current.unreliable_forecasts().len(), 3);
        assert!(dash.snapshot_age().expect("age known") >= chrono::Duration::zero());
        assert_eq!(dash.source.station_fetches.get(), 1);
    }
}
