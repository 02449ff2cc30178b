/// Test fixtures: representative JSON payloads from the AquaMonitor backend.
///
/// These are structurally complete but cut down to what the parsers and the
/// derivation pipeline need. Backend response shapes:
///
///   GET /stations      → [ station, ... ]  or  { "stations": [ ... ] }
///     station.station_id, name, latitude, longitude
///     station.current_water_level_cm / _m
///     station.min_level_cm / _m, max_level_cm / _m (max may be missing)
///     station.last_30_days_range { min_cm, max_cm, min_m, max_m }
///     station.last_30_days_historical[] { date, water_level_cm, water_level_m }
///                                        (newest first, may be missing)
///     station.current_measurement_date  (RFC 3339 or naive UTC)
///
///   GET /predictions   → [ prediction, ... ]  or  { "predictions": [ ... ] }
///     prediction.station_id, prediction_date
///     prediction.predicted_water_level_cm / _m, change_from_last_cm
///     prediction.forecast_date: batch creation timestamp; older backend
///                                builds call it `forecast_created_at`

/// Three stations:
/// - HR-3015 Sava at Zagreb: 85 cm in [20, 100] → 81.25 % → danger.
/// - HR-3020 Kupa at Karlovac: 40 cm in [20, 100] → 25 % → normal.
/// - HR-3100 Sava at Sisak: no history, no max, backend zero-range placeholder.
pub(crate) fn fixture_stations_json() -> &'static str {
    r#"[
      {
        "station_id": "HR-3015",
        "name": "Sava at Zagreb",
        "latitude": 45.7869,
        "longitude": 15.9739,
        "address": "Savska cesta, Zagreb",
        "current_water_level_cm": 85.0,
        "current_water_level_m": 0.85,
        "min_level_cm": 20.0,
        "min_level_m": 0.2,
        "max_level_cm": 100.0,
        "max_level_m": 1.0,
        "last_30_days_range": { "min_cm": 61.0, "max_cm": 88.0, "min_m": 0.61, "max_m": 0.88 },
        "last_30_days_historical": [
          { "date": "2025-03-01", "water_level_cm": 85.0, "water_level_m": 0.85 },
          { "date": "2025-02-28", "water_level_cm": 83.5, "water_level_m": 0.835 },
          { "date": "2025-02-27T00:00:00", "water_level_cm": 80.0, "water_level_m": 0.8 }
        ],
        "current_measurement_date": "2025-03-01T08:00:00+01:00"
      },
      {
        "station_id": "HR-3020",
        "name": "Kupa at Karlovac",
        "latitude": 45.4929,
        "longitude": 15.5553,
        "current_water_level_cm": 40.0,
        "current_water_level_m": 0.4,
        "min_level_cm": 20.0,
        "min_level_m": 0.2,
        "max_level_cm": 100.0,
        "max_level_m": 1.0,
        "last_30_days_range": { "min_cm": 35.0, "max_cm": 52.0, "min_m": 0.35, "max_m": 0.52 },
        "last_30_days_historical": [],
        "current_measurement_date": "2025-03-01 07:30:00"
      },
      {
        "station_id": "HR-3100",
        "name": "Sava at Sisak",
        "latitude": 45.4661,
        "longitude": 16.3783,
        "current_water_level_cm": 120.0,
        "min_level_cm": 50.0,
        "last_30_days_range": { "min_cm": 0.0, "max_cm": 0.0, "min_m": 0.0, "max_m": 0.0 },
        "current_measurement_date": null
      }
    ]"#
}

/// Station list wrapped in an object, as returned by newer backend builds.
pub(crate) fn fixture_wrapped_stations_json() -> &'static str {
    r#"{
      "stations": [
        {
          "station_id": "HR-4001",
          "name": "Drava at Osijek",
          "latitude": 45.5600,
          "longitude": 18.6950,
          "current_water_level_cm": 210.0,
          "min_level_cm": 90.0,
          "max_level_cm": 450.0,
          "last_30_days_range": { "min_cm": 180.0, "max_cm": 240.0 }
        }
      ]
    }"#
}

/// Five predictions for HR-3015 across three forecast batches created on two
/// calendar days:
///   2025-03-01T06:00Z  2 predictions (+3, +4)
///   2025-03-01T18:00Z  2 predictions (+2, +1)
///   2025-03-02T06:00Z  1 prediction  (-8), uses `forecast_created_at`
pub(crate) fn fixture_prediction_batches_json() -> &'static str {
    r#"[
      { "station_id": "HR-3015", "prediction_date": "2025-03-03",
        "predicted_water_level_cm": 92.0, "predicted_water_level_m": 0.92,
        "change_from_last_cm": 4.0, "forecast_date": "2025-03-01T06:00:00Z" },
      { "station_id": "HR-3015", "prediction_date": "2025-03-02",
        "predicted_water_level_cm": 88.0, "predicted_water_level_m": 0.88,
        "change_from_last_cm": 3.0, "forecast_date": "2025-03-01T06:00:00Z" },
      { "station_id": "HR-3015", "prediction_date": "2025-03-02",
        "predicted_water_level_cm": 87.0, "predicted_water_level_m": 0.87,
        "change_from_last_cm": 2.0, "forecast_date": "2025-03-01T18:00:00Z" },
      { "station_id": "HR-3015", "prediction_date": "2025-03-03",
        "predicted_water_level_cm": 88.0, "predicted_water_level_m": 0.88,
        "change_from_last_cm": 1.0, "forecast_date": "2025-03-01T18:00:00Z" },
      { "station_id": "HR-3015", "prediction_date": "2025-03-03",
        "predicted_water_level_cm": 77.0, "predicted_water_level_m": 0.77,
        "change_from_last_cm": -8.0, "forecast_created_at": "2025-03-02T06:00:00" }
    ]"#
}

/// Two stations, the second with a sensor gap: its current level is `null`.
pub(crate) fn fixture_sensor_gap_stations_json() -> &'static str {
    r#"[
      {
        "station_id": "HR-5010",
        "name": "Una at Hrvatska Kostajnica",
        "latitude": 45.2317,
        "longitude": 16.5428,
        "current_water_level_cm": 62.0,
        "min_level_cm": 30.0,
        "max_level_cm": 310.0,
        "last_30_days_range": { "min_cm": 55.0, "max_cm": 71.0 }
      },
      {
        "station_id": "HR-5020",
        "name": "Korana at Slunj",
        "latitude": 45.1150,
        "longitude": 15.5870,
        "current_water_level_cm": null,
        "current_water_level_m": null,
        "min_level_cm": 40.0,
        "max_level_cm": 220.0,
        "last_30_days_range": { "min_cm": 48.0, "max_cm": 60.0 },
        "last_30_days_historical": [
          { "date": "2025-03-01", "water_level_cm": null, "water_level_m": null },
          { "date": "2025-02-28", "water_level_cm": 52.0, "water_level_m": 0.52 }
        ]
      }
    ]"#
}

/// Truncated body, as seen when the proxy cuts a response short.
pub(crate) fn fixture_malformed_json() -> &'static str {
    r#"[ { "station_id": "HR-3015", "name": "Sava at Zag"#
}
