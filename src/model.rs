/// Core data types for the AquaMonitor station metrics service.
///
/// This module defines the shared domain model imported by all other modules:
/// the backend payload shapes (`StationMeasurement`, `Prediction`), the
/// classifications produced by `analysis`, and the `StationViewModel` handed
/// to the presentation layer. Apart from unit conversion it contains no logic
/// and no I/O.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of trailing daily levels the forecast model wants.
pub const TARGET_DAYS: usize = 41;

/// Fewest trailing daily levels for which forecasts are still usable.
pub const MINIMUM_DAYS: usize = 38;

/// Share of the [min, max] range at which a station turns `Warning`.
pub const WARNING_PERCENT: f64 = 60.0;

/// Share of the [min, max] range at which a station turns `Danger`.
pub const DANGER_PERCENT: f64 = 80.0;

/// Summed forecast change (cm) beyond which a trend is rising or falling.
pub const TREND_THRESHOLD_CM: f64 = 5.0;

// ---------------------------------------------------------------------------
// Unit conversion
// ---------------------------------------------------------------------------

/// Converts centimeters to meters, rounded to 3 decimals (millimeters).
pub fn cm_to_m(cm: f64) -> f64 {
    (cm * 10.0).round() / 1000.0
}

/// Converts meters to centimeters. No rounding.
pub fn m_to_cm(m: f64) -> f64 {
    m * 100.0
}

// ---------------------------------------------------------------------------
// Input payloads
// ---------------------------------------------------------------------------

/// Trailing 30-day min/max of a station, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct LevelRange {
    #[serde(deserialize_with = "de_level")]
    pub min_cm: f64,
    #[serde(deserialize_with = "de_level")]
    pub max_cm: f64,
    #[serde(default, deserialize_with = "de_level")]
    pub min_m: f64,
    #[serde(default, deserialize_with = "de_level")]
    pub max_m: f64,
}

impl LevelRange {
    /// The backend writes `{0, 0}` as a placeholder when it has no data.
    pub fn is_zero_placeholder(&self) -> bool {
        self.min_cm == 0.0 && self.max_cm == 0.0
    }
}

/// One daily level in a station's trailing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct HistoricalLevel {
    #[serde(deserialize_with = "de_calendar_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "de_level")]
    pub water_level_cm: f64,
    #[serde(default, deserialize_with = "de_level")]
    pub water_level_m: f64,
}

/// Raw per-station record from `GET /stations`.
///
/// `max_level_cm` is optional in the payload; when absent the 30-day range
/// maximum stands in (see `effective_max_cm`). A `null` in any required
/// numeric field is read as NaN, so one sensor gap does not reject the
/// whole station list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationMeasurement {
    pub station_id: String,
    pub name: String,
    #[serde(deserialize_with = "de_level")]
    pub latitude: f64,
    #[serde(deserialize_with = "de_level")]
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(deserialize_with = "de_level")]
    pub current_water_level_cm: f64,
    #[serde(default)]
    pub current_water_level_m: Option<f64>,
    #[serde(deserialize_with = "de_level")]
    pub min_level_cm: f64,
    #[serde(default)]
    pub min_level_m: Option<f64>,
    #[serde(default)]
    pub max_level_cm: Option<f64>,
    #[serde(default)]
    pub max_level_m: Option<f64>,
    pub last_30_days_range: LevelRange,
    /// Most recent first. Absent and empty are equivalent.
    #[serde(default)]
    pub last_30_days_historical: Option<Vec<HistoricalLevel>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub current_measurement_date: Option<DateTime<Utc>>,
}

impl StationMeasurement {
    pub fn effective_max_cm(&self) -> f64 {
        self.max_level_cm.unwrap_or(self.last_30_days_range.max_cm)
    }

    pub fn historical(&self) -> &[HistoricalLevel] {
        self.last_30_days_historical.as_deref().unwrap_or(&[])
    }
}

/// One forecast day from `GET /predictions`.
///
/// Predictions sharing a `forecast_date` belong to the same forecast batch
/// (one model run).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Prediction {
    pub station_id: String,
    #[serde(deserialize_with = "de_calendar_date")]
    pub prediction_date: NaiveDate,
    #[serde(deserialize_with = "de_level")]
    pub predicted_water_level_cm: f64,
    #[serde(default, deserialize_with = "de_level")]
    pub predicted_water_level_m: f64,
    #[serde(default, deserialize_with = "de_level")]
    pub change_from_last_cm: f64,
    #[serde(alias = "forecast_created_at", deserialize_with = "de_timestamp")]
    pub forecast_date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Classifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    Normal,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

/// How much trailing history backs a station's forecasts.
///
/// - `Insufficient`: forecasts must not be presented as reliable.
/// - `Partial`: forecasts usable but degraded.
/// - `Full`: the whole target window is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSufficiency {
    Insufficient,
    Partial,
    Full,
}

impl std::fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelStatus::Normal => write!(f, "normal"),
            LevelStatus::Warning => write!(f, "warning"),
            LevelStatus::Danger => write!(f, "danger"),
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

impl std::fmt::Display for DataSufficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSufficiency::Insufficient => write!(f, "insufficient"),
            DataSufficiency::Partial => write!(f, "partial"),
            DataSufficiency::Full => write!(f, "full"),
        }
    }
}

/// Where a value sits inside a [min, max] range.
///
/// `percent` is the true computed share and may fall outside [0, 100]; it is
/// what the numeric label shows. `bar_width` is the same value clamped to
/// [0, 100] for drawing. NaN propagates into both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePosition {
    pub percent: f64,
    pub bar_width: f64,
}

// ---------------------------------------------------------------------------
// View-models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
}

/// One forecast day as displayed on a station card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Meters, 3 decimals.
    pub predicted_level: f64,
    pub position: RangePosition,
}

/// Display-ready station record. Rebuilt from scratch on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationViewModel {
    pub id: String,
    pub name: String,
    pub location: Location,
    /// Meters, 3 decimals.
    pub current_level: f64,
    pub min_level: f64,
    pub max_level: f64,
    pub status: LevelStatus,
    pub trend: Trend,
    pub position: RangePosition,
    pub predictions: Vec<ForecastDay>,
    pub forecast_created_at: Option<DateTime<Utc>>,
    pub last_30_days_range: LevelRange,
    pub last_30_days_historical: Vec<HistoricalLevel>,
    pub data_sufficiency: DataSufficiency,
    pub missing_days: usize,
    pub measured_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Field deserialization
// ---------------------------------------------------------------------------

/// Parses a backend timestamp. RFC 3339 is preferred; naive timestamps
/// (`2025-03-01T06:00:00` or with a space separator) are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Parses a calendar date, tolerating a trailing time component.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// A required number that the backend writes as `null` when the sensor
/// reported nothing. Read as NaN; derivation carries it through.
fn de_level<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw))),
    }
}

fn de_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_m_rounds_to_millimeters() {
        assert_eq!(cm_to_m(85.0), 0.85);
        assert_eq!(cm_to_m(123.456), 1.235);
        assert_eq!(cm_to_m(0.0), 0.0);
    }

    #[test]
    fn test_cm_m_cm_round_trip_within_tenth_of_cm() {
        for cm in [0.0, 0.04, 12.3456, 85.0, 99.99, 250.55, 1234.567, -17.891] {
            let back = m_to_cm(cm_to_m(cm));
            assert!(
                (back - cm).abs() <= 0.1,
                "{} cm came back as {} cm",
                cm,
                back
            );
        }
    }

    #[test]
    fn test_zero_placeholder_range() {
        let zero = LevelRange::default();
        assert!(zero.is_zero_placeholder());

        let real = LevelRange { min_cm: 0.0, max_cm: 42.0, min_m: 0.0, max_m: 0.42 };
        assert!(!real.is_zero_placeholder());
    }

    #[test]
    fn test_parse_timestamp_accepts_rfc3339_and_naive() {
        let a = parse_timestamp("2025-03-01T06:00:00+00:00").expect("rfc3339");
        let b = parse_timestamp("2025-03-01T06:00:00").expect("naive T");
        let c = parse_timestamp("2025-03-01 06:00:00.250").expect("naive space");
        assert_eq!(a, b);
        assert_eq!(c.format("%H:%M:%S%.3f").to_string(), "06:00:00.250");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_parse_calendar_date_ignores_time_component() {
        let d = parse_calendar_date("2025-03-04T00:00:00Z").expect("date");
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert!(parse_calendar_date("04/03/2025").is_none());
    }

    #[test]
    fn test_effective_max_falls_back_to_range() {
        let json = r#"{
            "station_id": "ST-1", "name": "Test", "latitude": 45.0, "longitude": 15.0,
            "current_water_level_cm": 50.0, "min_level_cm": 10.0,
            "last_30_days_range": { "min_cm": 20.0, "max_cm": 90.0 }
        }"#;
        let station: StationMeasurement = serde_json::from_str(json).expect("should parse");
        assert_eq!(station.effective_max_cm(), 90.0);
        assert!(station.historical().is_empty());
    }

    #[test]
    fn test_null_level_reads_as_nan() {
        let json = r#"{
            "station_id": "ST-2", "name": "Gap", "latitude": 45.0, "longitude": 15.0,
            "current_water_level_cm": null, "min_level_cm": 10.0,
            "last_30_days_range": { "min_cm": 20.0, "max_cm": 90.0 },
            "last_30_days_historical": [
                { "date": "2025-03-01", "water_level_cm": null }
            ]
        }"#;
        let station: StationMeasurement = serde_json::from_str(json).expect("should parse");
        assert!(station.current_water_level_cm.is_nan());
        assert!(station.historical()[0].water_level_cm.is_nan());
        assert_eq!(station.min_level_cm, 10.0);
    }

    #[test]
    fn test_missing_required_level_is_still_an_error() {
        let json = r#"{
            "station_id": "ST-3", "name": "Short", "latitude": 45.0, "longitude": 15.0,
            "min_level_cm": 10.0,
            "last_30_days_range": { "min_cm": 20.0, "max_cm": 90.0 }
        }"#;
        assert!(serde_json::from_str::<StationMeasurement>(json).is_err());
    }

    #[test]
    fn test_history_and_range_serialize_camel_case() {
        let level = HistoricalLevel {
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            water_level_cm: 85.0,
            water_level_m: 0.85,
        };
        let value = serde_json::to_value(&level).unwrap();
        assert_eq!(value["waterLevelCm"], 85.0);
        assert!(value.get("water_level_cm").is_none());

        let range = LevelRange { min_cm: 20.0, max_cm: 90.0, min_m: 0.2, max_m: 0.9 };
        let value = serde_json::to_value(range).unwrap();
        assert_eq!(value["maxCm"], 90.0);
    }

    #[test]
    fn test_classifications_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&LevelStatus::Danger).unwrap(), "\"danger\"");
        assert_eq!(serde_json::to_string(&Trend::Stable).unwrap(), "\"stable\"");
        assert_eq!(
            serde_json::to_string(&DataSufficiency::Partial).unwrap(),
            "\"partial\""
        );
    }
}
