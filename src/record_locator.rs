//! Record identifiers for a station's daily forecast record.
//!
//! Identifiers look like
//! `alertdata:<topic>:<dataset>:<model>:<alert-name>:<location_code>:<unix_midnight>`,
//! where `unix_midnight` is local midnight of the current day in the site's
//! civil zone. Nothing checks that the record exists upstream; a missing
//! record shows up as a failed time-series fetch.

use chrono::{DateTime, TimeZone};
use std::fmt;
use std::str::FromStr;

use crate::civil_time::CivilZone;
use crate::fetch_error::FetchError;
use crate::model::Station;

/// The fixed parts of a record identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTemplate {
    pub topic: String,
    pub dataset: String,
    pub model: String,
    pub alert_name: String,
}

impl RecordTemplate {
    pub fn record_code(&self, location_code: &str, midnight_timestamp: i64) -> String {
        format!(
            "alertdata:{}:{}:{}:{}:{}:{}",
            self.topic,
            self.dataset,
            self.model,
            self.alert_name,
            location_code,
            midnight_timestamp
        )
    }
}

impl Default for RecordTemplate {
    fn default() -> Self {
        Self {
            topic: "ai-daily-model".to_string(),
            dataset: "antamina_predictions".to_string(),
            model: "antamina-daily_model-tft".to_string(),
            alert_name: "AlertaPM10_diaria".to_string(),
        }
    }
}

/// How a station's record identifier is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLocator {
    /// Built from the template, the station's location code and today's
    /// local midnight.
    Computed {
        template: RecordTemplate,
        zone: CivilZone,
    },
    /// Taken verbatim from `Station::static_record_code`.
    Static,
}

impl RecordLocator {
    pub fn record_code<Tz: TimeZone>(
        &self,
        station: &Station,
        now: &DateTime<Tz>,
    ) -> Result<String, FetchError> {
        match self {
            RecordLocator::Computed { template, zone } => Ok(template.record_code(
                &station.location_code,
                zone.local_midnight_timestamp(now),
            )),
            RecordLocator::Static => station
                .static_record_code
                .clone()
                .filter(|code| !code.is_empty())
                .ok_or_else(|| FetchError::MissingRecordCode(station.name.clone())),
        }
    }

    pub fn strategy(&self) -> RecordStrategy {
        match self {
            RecordLocator::Computed { .. } => RecordStrategy::Computed,
            RecordLocator::Static => RecordStrategy::Static,
        }
    }
}

/// Configuration-level choice of locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStrategy {
    Computed,
    Static,
}

impl fmt::Display for RecordStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStrategy::Computed => write!(f, "computed"),
            RecordStrategy::Static => write!(f, "static"),
        }
    }
}

impl FromStr for RecordStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "computed" => Ok(RecordStrategy::Computed),
            "static" => Ok(RecordStrategy::Static),
            other => Err(format!(
                "unknown record strategy '{other}' (expected 'computed' or 'static')"
            )),
        }
    }
}
