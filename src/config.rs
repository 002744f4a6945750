use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::TokenProvider;
use crate::civil_time::{CivilZone, PERU_UTC_OFFSET_HOURS};
use crate::fetcher::TimeSeriesFetcher;
use crate::model::Station;
use crate::record_locator::{RecordLocator, RecordStrategy, RecordTemplate};
use crate::severity::{ScaleError, SeverityScale};
use crate::stations::{self, StationsError};

pub const DEFAULT_TOKEN_URL: &str =
    "https://sso.meteosim.com/realms/suite/protocol/openid-connect/token";
pub const DEFAULT_API_BASE: &str = "https://api.meteosim.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Invalid value for LOCAL_UTC_OFFSET_HOURS: {0}")]
    InvalidOffset(i32),
    #[error("Invalid value for RECORD_STRATEGY: {0}")]
    InvalidStrategy(String),
    #[error("Invalid value for PM10_THRESHOLDS: {0}")]
    InvalidThresholds(#[from] ScaleError),
    #[error(transparent)]
    Stations(#[from] StationsError),
}

/// Everything a run needs, read once at startup and passed down explicitly.
#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub api_base: String,
    pub site_id: String,
    pub record_template: RecordTemplate,
    pub record_strategy: RecordStrategy,
    pub zone: CivilZone,
    pub severity_scale: SeverityScale,
    pub http_timeout: Duration,
    pub station_concurrency: usize,
    pub stations: Vec<Station>,
    pub output_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let utc_offset_hours = parse_var("LOCAL_UTC_OFFSET_HOURS", PERU_UTC_OFFSET_HOURS)?;
        let zone = CivilZone::from_utc_offset_hours(utc_offset_hours)
            .ok_or(ConfigError::InvalidOffset(utc_offset_hours))?;

        let record_strategy = env::var("RECORD_STRATEGY")
            .unwrap_or_else(|_| "computed".to_string())
            .parse::<RecordStrategy>()
            .map_err(ConfigError::InvalidStrategy)?;

        let severity_scale = match env::var("PM10_THRESHOLDS") {
            Ok(list) => list.parse::<SeverityScale>()?,
            Err(_) => SeverityScale::default(),
        };

        let stations = match env::var("STATIONS_FILE") {
            Ok(path) if !path.trim().is_empty() => {
                stations::load_stations(path.trim().as_ref())?
            }
            _ => stations::default_stations(),
        };

        let defaults = RecordTemplate::default();

        Ok(Config {
            client_id: env::var("METEOSIM_CLIENT_ID")
                .unwrap_or_else(|_| "antamina".to_string()),
            client_secret: env::var("METEOSIM_SECRET").unwrap_or_default(),
            token_url: env::var("METEOSIM_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
            api_base: env::var("METEOSIM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            site_id: env::var("METEOSIM_SITE_ID")
                .unwrap_or_else(|_| "antamina_prediction".to_string()),
            record_template: RecordTemplate {
                topic: env::var("METEOSIM_TOPIC").unwrap_or(defaults.topic),
                dataset: env::var("RECORD_DATASET").unwrap_or(defaults.dataset),
                model: env::var("RECORD_MODEL").unwrap_or(defaults.model),
                alert_name: env::var("RECORD_ALERT_NAME").unwrap_or(defaults.alert_name),
            },
            record_strategy,
            zone,
            severity_scale,
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 5u64)?),
            station_concurrency: parse_var("STATION_CONCURRENCY", 1usize)?.max(1),
            stations,
            output_path: env::var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("index.html")),
        })
    }

    pub fn topic(&self) -> &str {
        &self.record_template.topic
    }

    /// Shared HTTP client with the configured per-request timeout.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder().timeout(self.http_timeout).build()
    }

    pub fn token_provider(&self, client: reqwest::Client) -> TokenProvider {
        TokenProvider::new(
            client,
            self.token_url.clone(),
            self.client_id.clone(),
            self.client_secret.clone(),
        )
    }

    pub fn fetcher(&self, client: reqwest::Client) -> TimeSeriesFetcher {
        TimeSeriesFetcher::new(
            client,
            self.api_base.clone(),
            self.site_id.clone(),
            self.topic().to_string(),
        )
    }

    pub fn record_locator(&self) -> RecordLocator {
        match self.record_strategy {
            RecordStrategy::Computed => RecordLocator::Computed {
                template: self.record_template.clone(),
                zone: self.zone,
            },
            RecordStrategy::Static => RecordLocator::Static,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &if self.client_secret.is_empty() {
                    "<unset>"
                } else {
                    "<redacted>"
                },
            )
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .field("site_id", &self.site_id)
            .field("record_template", &self.record_template)
            .field("record_strategy", &self.record_strategy)
            .field("zone", &self.zone.offset())
            .field("severity_scale", &self.severity_scale.breakpoints())
            .field("http_timeout", &self.http_timeout)
            .field("station_concurrency", &self.station_concurrency)
            .field("stations", &self.stations.len())
            .field("output_path", &self.output_path)
            .finish()
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}
