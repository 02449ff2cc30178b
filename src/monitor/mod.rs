/// Snapshot monitoring for derived station view-models.
///
/// ## Refresh model
///
/// A refresh is: fetch stations + predictions, run one derivation pass,
/// install the resulting view-models as the current snapshot. Refreshes are
/// started by a timer tick or an explicit request, and a newer one may begin
/// before an older one finishes.
///
/// **Last write wins:**
/// - `begin_refresh` hands out a `RefreshTicket` with a generation number
///   that only ever increases.
/// - `complete_refresh` installs the result only if no newer ticket has
///   completed already. A stale result is dropped and reported as `false`.
///
/// The snapshot itself is immutable once installed; readers get a shared
/// `Arc` and a refresh replaces it wholesale.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

use crate::model::{DataSufficiency, LevelStatus, StationViewModel};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One complete derivation result.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub generation: u64,
    pub derived_at: DateTime<Utc>,
    pub stations: Vec<StationViewModel>,
}

impl Snapshot {
    pub fn station(&self, id: &str) -> Option<&StationViewModel> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Stations currently at `Warning` or `Danger`.
    pub fn alerting_stations(&self) -> Vec<&StationViewModel> {
        self.stations
            .iter()
            .filter(|s| s.status != LevelStatus::Normal)
            .collect()
    }

    /// Stations whose forecasts should be shown as unavailable.
    pub fn unreliable_forecasts(&self) -> Vec<&StationViewModel> {
        self.stations
            .iter()
            .filter(|s| s.data_sufficiency == DataSufficiency::Insufficient)
            .collect()
    }
}

/// Proof that a refresh was started; needed to complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    started_at: DateTime<Utc>,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Holds the latest snapshot and decides which refresh results to keep.
pub struct SnapshotMonitor {
    refresh_interval: Duration,
    next_generation: u64,
    current: Option<Arc<Snapshot>>,
}

impl SnapshotMonitor {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            next_generation: 1,
            current: None,
        }
    }

    /// Starts a refresh. Any refresh started earlier is superseded once
    /// this one completes.
    pub fn begin_refresh(&mut self, now: DateTime<Utc>) -> RefreshTicket {
        let ticket = RefreshTicket {
            generation: self.next_generation,
            started_at: now,
        };
        self.next_generation += 1;
        ticket
    }

    /// Installs the result of a refresh unless a newer one already landed.
    ///
    /// Returns `true` if the snapshot was installed.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        stations: Vec<StationViewModel>,
        now: DateTime<Utc>,
    ) -> bool {
        if let Some(current) = &self.current {
            if current.generation > ticket.generation {
                warn!(
                    "Dropping refresh #{} started {}: snapshot #{} is newer",
                    ticket.generation, ticket.started_at, current.generation
                );
                return false;
            }
        }

        info!(
            "Installed snapshot #{} with {} stations",
            ticket.generation,
            stations.len()
        );
        self.current = Some(Arc::new(Snapshot {
            generation: ticket.generation,
            derived_at: now,
            stations,
        }));
        true
    }

    /// Latest installed snapshot, if any.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    /// A missing snapshot is always stale; otherwise stale once older than
    /// the refresh interval.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match &self.current {
            Some(snapshot) => now - snapshot.derived_at >= self.refresh_interval,
            None => true,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.current.as_ref().map(|s| now - s.derived_at)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
