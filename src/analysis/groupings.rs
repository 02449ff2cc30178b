/// Forecast batch grouping and selection.
///
/// The backend returns predictions as a flat list covering every station and
/// every forecast batch it still keeps. A forecast batch is the set of
/// predictions sharing one `forecast_date` (creation timestamp of the model
/// run). This module turns that list into the shapes the rest of the crate
/// needs:
///
/// - `group_by_station` routes predictions to their station.
/// - `latest_batch` picks the newest batch of one station, which drives the
///   trend and the forecast days on the station card.
/// - `group_predictions_by_forecast_batch` builds the two-level
///   day → batch tree used for browsing past forecasts.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::model::Prediction;

// ---------------------------------------------------------------------------
// Grouped forecast history
// ---------------------------------------------------------------------------

/// All predictions of one forecast batch, target date ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBatch {
    pub created_at: DateTime<Utc>,
    pub predictions: Vec<Prediction>,
}

/// The forecast batches created on one calendar day, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBatchDay {
    pub date: NaiveDate,
    pub batches: Vec<ForecastBatch>,
}

/// Past forecasts grouped by creation day, then by creation timestamp.
/// Both levels are ordered newest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ForecastHistory {
    pub days: Vec<ForecastBatchDay>,
}

impl ForecastHistory {
    pub fn batch_count(&self) -> usize {
        self.days.iter().map(|d| d.batches.len()).sum()
    }

    pub fn prediction_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.batches.iter())
            .map(|b| b.predictions.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Groups predictions into a day → batch tree.
///
/// Top level: calendar date (UTC) of the batch creation timestamp. Second
/// level: the exact creation timestamp. Within a batch, predictions are
/// sorted by target date ascending; predictions sharing a target date keep
/// their input order. Every input prediction lands in exactly one batch.
pub fn group_predictions_by_forecast_batch(predictions: &[Prediction]) -> ForecastHistory {
    let mut tree: BTreeMap<NaiveDate, BTreeMap<DateTime<Utc>, Vec<Prediction>>> = BTreeMap::new();

    for prediction in predictions {
        tree.entry(prediction.forecast_date.date_naive())
            .or_default()
            .entry(prediction.forecast_date)
            .or_default()
            .push(prediction.clone());
    }

    let days = tree
        .into_iter()
        .rev()
        .map(|(date, batches)| ForecastBatchDay {
            date,
            batches: batches
                .into_iter()
                .rev()
                .map(|(created_at, mut predictions)| {
                    predictions.sort_by_key(|p| p.prediction_date);
                    ForecastBatch { created_at, predictions }
                })
                .collect(),
        })
        .collect();

    ForecastHistory { days }
}

/// Groups a flat prediction list into a map keyed by station id.
///
/// Input order is preserved within each station.
pub fn group_by_station(predictions: &[Prediction]) -> HashMap<&str, Vec<&Prediction>> {
    let mut grouped: HashMap<&str, Vec<&Prediction>> = HashMap::new();

    for prediction in predictions {
        grouped
            .entry(prediction.station_id.as_str())
            .or_default()
            .push(prediction);
    }

    grouped
}

/// Returns the newest forecast batch among `predictions`, target date
/// ascending. All predictions are assumed to belong to one station.
///
/// Returns `None` for an empty input.
pub fn latest_batch<'a, I>(predictions: I) -> Option<ForecastBatch>
where
    I: IntoIterator<Item = &'a Prediction>,
{
    let all: Vec<&Prediction> = predictions.into_iter().collect();
    let created_at = all.iter().map(|p| p.forecast_date).max()?;

    let mut batch: Vec<Prediction> = all
        .into_iter()
        .filter(|p| p.forecast_date == created_at)
        .cloned()
        .collect();
    batch.sort_by_key(|p| p.prediction_date);

    Some(ForecastBatch {
        created_at,
        predictions: batch,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
