use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::civil_time::LocalDateTime;

/// Variable id of the PM10 concentration in a time-series item.
pub const VARIABLE_PM10: &str = "PM10";

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

/// A monitoring station. Read-only for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    pub name: String,
    /// Location code used inside record identifiers, e.g. `2CRUCES`.
    pub location_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of the influence circle drawn on the map, in metres.
    pub buffer_radius_m: f64,
    /// Pre-baked record identifier, used by the static record strategy.
    #[serde(default)]
    pub static_record_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Upstream API payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesResponse {
    pub items: Vec<TimeSeriesItem>,
}

/// One time step of a record's time series.
///
/// `time` arrives as RFC 3339 with either `Z` or an explicit offset; an
/// unparseable timestamp fails deserialization of the whole response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeSeriesItem {
    pub time: DateTime<FixedOffset>,
    #[serde(default)]
    pub values: Vec<VariableValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariableValue {
    #[serde(rename = "variableId")]
    pub variable_id: String,
    pub value: Option<f64>,
}

impl TimeSeriesItem {
    /// Value of the first `PM10` entry, if it is present and non-null.
    pub fn pm10(&self) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.variable_id == VARIABLE_PM10)
            .and_then(|v| v.value)
    }
}

// ---------------------------------------------------------------------------
// Derived series
// ---------------------------------------------------------------------------

/// A PM10 concentration (µg/m³) at a local civil time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub time: LocalDateTime,
    pub value: f64,
}

/// Readings split at a cutoff, each half ascending by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedSeries {
    /// Readings at or before the cutoff.
    pub observed: Vec<Reading>,
    /// Readings strictly after the cutoff.
    pub forecast: Vec<Reading>,
}

impl PartitionedSeries {
    /// Highest forecast reading; the earliest one wins a tie.
    pub fn max_forecast(&self) -> Option<&Reading> {
        self.forecast.iter().fold(None, |best: Option<&Reading>, r| match best {
            Some(b) if b.value >= r.value => Some(b),
            _ => Some(r),
        })
    }
}

/// Per-station outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct StationResult {
    pub station: Station,
    pub series: PartitionedSeries,
    /// 0 when there is no forecast.
    pub max_forecast_value: f64,
    pub max_forecast_time: Option<LocalDateTime>,
    /// Set when the station could not be fetched and this is a placeholder.
    pub error: Option<String>,
}

impl StationResult {
    pub fn from_series(station: Station, series: PartitionedSeries) -> Self {
        let (max_forecast_value, max_forecast_time) = series
            .max_forecast()
            .map(|r| (r.value, Some(r.time)))
            .unwrap_or((0.0, None));

        Self {
            station,
            series,
            max_forecast_value,
            max_forecast_time,
            error: None,
        }
    }

    /// Zero-valued entry for a station whose fetch failed.
    pub fn placeholder(station: Station, error: impl Into<String>) -> Self {
        Self {
            station,
            series: PartitionedSeries::default(),
            max_forecast_value: 0.0,
            max_forecast_time: None,
            error: Some(error.into()),
        }
    }

    pub fn n_observed(&self) -> usize {
        self.series.observed.len()
    }

    pub fn n_forecast(&self) -> usize {
        self.series.forecast.len()
    }
}
