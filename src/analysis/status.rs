/// Water level status classification.
///
/// A station's status is decided by where its current level sits inside the
/// station's reference range [min, max], expressed as a percentage:
///
///   percentage = (current - min) / (max - min) * 100
///
/// Boundaries are inclusive: 60 % is already `Warning`, 80 % already
/// `Danger`. The reference range is admin-adjustable and nothing stops the
/// current level from leaving it, so percentages below 0 or above 100 are
/// normal inputs here.

use crate::model::{LevelStatus, RangePosition, DANGER_PERCENT, WARNING_PERCENT};

/// Percentage of the way `value` sits from `min` to `max`, unclamped.
///
/// `max == min` divides by zero and yields an infinity or NaN; that is
/// passed through rather than treated as an error.
pub fn range_percent(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min) * 100.0
}

/// Position of `value` within [min, max] in both display forms: the true
/// percentage for the numeric label, and a [0, 100] clamped bar width.
pub fn percentage_of_range(value: f64, min: f64, max: f64) -> RangePosition {
    let percent = range_percent(value, min, max);
    RangePosition {
        percent,
        bar_width: percent.clamp(0.0, 100.0),
    }
}

/// Classifies a water level against its station's reference range.
///
/// Always returns a label. A NaN percentage fails both comparisons and is
/// reported as `Normal`.
pub fn classify_status(current: f64, min: f64, max: f64) -> LevelStatus {
    let percentage = range_percent(current, min, max);

    if percentage >= DANGER_PERCENT {
        LevelStatus::Danger
    } else if percentage >= WARNING_PERCENT {
        LevelStatus::Warning
    } else {
        LevelStatus::Normal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
