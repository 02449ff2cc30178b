/// Forecast trend classification.
///
/// The trend of a station is read off a single forecast batch: each forecast
/// day carries its change from the previous day, and the sum of those changes
/// says where the batch expects the level to go.

use crate::model::{Prediction, Trend, TREND_THRESHOLD_CM};

/// Sums `change_from_last_cm` over a forecast batch.
///
/// The changes are added in ascending order rather than input order, so the
/// result is bit-for-bit identical for any permutation of the same batch.
pub fn total_change_cm(predictions: &[Prediction]) -> f64 {
    let mut changes: Vec<f64> = predictions.iter().map(|p| p.change_from_last_cm).collect();
    changes.sort_by(f64::total_cmp);
    changes.iter().sum()
}

/// Classifies a forecast batch as rising, falling or stable.
///
/// More than +5 cm of summed change is `Rising`, less than -5 cm is
/// `Falling`, anything in between (inclusive) is `Stable`. An empty batch
/// is `Stable`.
pub fn classify_trend(predictions: &[Prediction]) -> Trend {
    let total = total_change_cm(predictions);

    if total > TREND_THRESHOLD_CM {
        Trend::Rising
    } else if total < -TREND_THRESHOLD_CM {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
