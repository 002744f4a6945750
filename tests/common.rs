// Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use pm10_monitor::civil_time::CivilZone;
use pm10_monitor::fetcher::TimeSeriesFetcher;
use pm10_monitor::model::Station;
use pm10_monitor::monitor::Monitor;
use pm10_monitor::record_locator::{RecordLocator, RecordTemplate};
use pm10_monitor::severity::SeverityScale;

pub const SITE_ID: &str = "antamina_prediction";
pub const TOPIC: &str = "ai-daily-model";
pub const TOKEN: &str = "test-token";

/// 2026-02-25 20:10 UTC, i.e. 15:10 in Peru. Cutoff is 15:00 local and
/// today's local midnight is 1771995600.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 25, 20, 10, 0).unwrap()
}

pub fn station(name: &str, location_code: &str) -> Station {
    Station {
        name: name.to_string(),
        location_code: location_code.to_string(),
        latitude: -9.55,
        longitude: -77.07,
        buffer_radius_m: 2000.0,
        static_record_code: None,
    }
}

pub fn record_code(location_code: &str) -> String {
    RecordTemplate::default().record_code(location_code, 1_771_995_600)
}

pub fn timeseries_path(record_code: &str) -> String {
    format!("/v3/alertdata/{SITE_ID}/topics/{TOPIC}/records/{record_code}/timeserie")
}

pub fn test_fetcher(base_url: String) -> TimeSeriesFetcher {
    TimeSeriesFetcher::new(
        reqwest::Client::new(),
        base_url,
        SITE_ID.to_string(),
        TOPIC.to_string(),
    )
}

pub fn test_monitor(base_url: String) -> Monitor {
    Monitor::new(
        RecordLocator::Computed {
            template: RecordTemplate::default(),
            zone: CivilZone::peru(),
        },
        test_fetcher(base_url),
        CivilZone::peru(),
        SeverityScale::default(),
    )
}

/// Five time steps around the 15:00 local cutoff, one without PM10.
pub const SAMPLE_SERIES: &str = r#"{
  "items": [
    {"time": "2026-02-25T21:00:00Z", "values": [{"variableId": "PM10", "value": 64.12344}]},
    {"time": "2026-02-25T10:00:00Z", "values": [{"variableId": "PM10", "value": 12.0}, {"variableId": "PM2.5", "value": 4.0}]},
    {"time": "2026-02-25T20:00:00Z", "values": [{"variableId": "PM10", "value": 18.0}]},
    {"time": "2026-02-25T22:00:00Z", "values": [{"variableId": "PM10", "value": null}]},
    {"time": "2026-02-25T18:00:00-05:00", "values": [{"variableId": "PM10", "value": 22.0}]}
  ]
}"#;
