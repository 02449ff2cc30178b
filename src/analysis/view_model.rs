/// Station view-model assembly.
///
/// One derivation pass takes the full station list and the flat prediction
/// list from a single fetch and produces one `StationViewModel` per station.
/// View-models are never patched: every refresh builds a new set.

use crate::analysis::groupings::{group_by_station, latest_batch};
use crate::analysis::status::{classify_status, percentage_of_range};
use crate::analysis::sufficiency::{classify_data_sufficiency, dedupe_by_date};
use crate::analysis::trend::classify_trend;
use crate::model::{
    cm_to_m, ForecastDay, Location, Prediction, StationMeasurement, StationViewModel, Trend,
};

/// Knobs for a derivation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivationOptions {
    /// Collapse repeated historical dates (keep the newest-delivered entry)
    /// before counting history. Off by default: duplicates count separately.
    pub dedupe_historical_dates: bool,
}

/// Builds the view-model of one station from its measurement and its
/// predictions (any number of batches; only the newest is shown).
///
/// Status and range positions use the station's reference range
/// `[min_level_cm, max_level_cm]`. When the payload has no
/// `max_level_cm`, the 30-day range maximum is used instead.
pub fn build_view_model<'a, I>(
    station: &StationMeasurement,
    predictions: I,
    options: DerivationOptions,
) -> StationViewModel
where
    I: IntoIterator<Item = &'a Prediction>,
{
    let min_cm = station.min_level_cm;
    let max_cm = station.effective_max_cm();
    let current_cm = station.current_water_level_cm;

    let batch = latest_batch(predictions);

    let (trend, forecast_days, forecast_created_at) = match &batch {
        Some(batch) => {
            let days = batch
                .predictions
                .iter()
                .map(|p| ForecastDay {
                    date: p.prediction_date,
                    predicted_level: cm_to_m(p.predicted_water_level_cm),
                    position: percentage_of_range(p.predicted_water_level_cm, min_cm, max_cm),
                })
                .collect();
            (classify_trend(&batch.predictions), days, Some(batch.created_at))
        }
        None => (Trend::Stable, Vec::new(), None),
    };

    let historical = if options.dedupe_historical_dates {
        dedupe_by_date(station.historical())
    } else {
        station.historical().to_vec()
    };

    let sufficiency =
        classify_data_sufficiency(historical.len(), Some(&station.last_30_days_range));

    StationViewModel {
        id: station.station_id.clone(),
        name: station.name.clone(),
        location: Location {
            lat: station.latitude,
            lng: station.longitude,
            address: station.address.clone(),
        },
        current_level: cm_to_m(current_cm),
        min_level: cm_to_m(min_cm),
        max_level: cm_to_m(max_cm),
        status: classify_status(current_cm, min_cm, max_cm),
        trend,
        position: percentage_of_range(current_cm, min_cm, max_cm),
        predictions: forecast_days,
        forecast_created_at,
        last_30_days_range: station.last_30_days_range,
        last_30_days_historical: historical,
        data_sufficiency: sufficiency.classification,
        missing_days: sufficiency.missing_days,
        measured_at: station.current_measurement_date,
    }
}

/// Runs one derivation pass over a whole station list.
///
/// Predictions are routed to stations by `station_id`; predictions for
/// unknown stations are ignored. Output order follows `stations`.
pub fn build_view_models(
    stations: &[StationMeasurement],
    predictions: &[Prediction],
    options: DerivationOptions,
) -> Vec<StationViewModel> {
    let by_station = group_by_station(predictions);

    stations
        .iter()
        .map(|station| {
            let own = by_station
                .get(station.station_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            build_view_model(station, own.iter().copied(), options)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
