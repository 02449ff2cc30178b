/// Forecast data sufficiency.
///
/// The forecast model is fed the trailing `TARGET_DAYS` daily levels of a
/// station. With fewer than `MINIMUM_DAYS` of them the forecasts are not
/// reliable; in between they are usable but degraded. Only the number of
/// entries counts. Gaps in the dates are filled (or not) by the backend.

use std::collections::HashSet;

use crate::model::{DataSufficiency, HistoricalLevel, LevelRange, MINIMUM_DAYS, TARGET_DAYS};

/// Sufficiency classification together with the shortfall shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SufficiencyReport {
    pub classification: DataSufficiency,
    /// `TARGET_DAYS - count`, floored at zero.
    pub missing_days: usize,
}

/// Classifies how much trailing history a station has.
///
/// `range` is the station's 30-day range as reported by the backend. A
/// range of exactly `{0, 0}` is the backend's no-data placeholder and forces
/// `Insufficient` whatever the count says.
pub fn classify_data_sufficiency(
    historical_count: usize,
    range: Option<&LevelRange>,
) -> SufficiencyReport {
    let missing_days = TARGET_DAYS.saturating_sub(historical_count);

    let placeholder_range = range.is_some_and(LevelRange::is_zero_placeholder);

    let classification = if placeholder_range || historical_count < MINIMUM_DAYS {
        DataSufficiency::Insufficient
    } else if historical_count < TARGET_DAYS {
        DataSufficiency::Partial
    } else {
        DataSufficiency::Full
    };

    SufficiencyReport {
        classification,
        missing_days,
    }
}

/// Drops repeated dates from a newest-first history, keeping the first
/// (most recently delivered) entry for each date. Order is preserved.
pub fn dedupe_by_date(levels: &[HistoricalLevel]) -> Vec<HistoricalLevel> {
    let mut seen = HashSet::new();
    levels
        .iter()
        .filter(|level| seen.insert(level.date))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
