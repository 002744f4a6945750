//! One monitoring run: every station through locate → fetch → partition →
//! classify.
//!
//! A station that cannot be located, fetched or parsed never aborts the run;
//! it is logged and replaced with a zero-valued placeholder so the report
//! always has one entry per configured station, in configured order.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument};

use crate::civil_time::{CivilZone, LocalDateTime};
use crate::fetch_error::FetchError;
use crate::fetcher::TimeSeriesFetcher;
use crate::model::{Station, StationResult};
use crate::partition::partition;
use crate::record_locator::RecordLocator;
use crate::severity::SeverityScale;

#[derive(Clone)]
pub struct Monitor {
    locator: RecordLocator,
    fetcher: TimeSeriesFetcher,
    zone: CivilZone,
    scale: SeverityScale,
    concurrency: usize,
}

/// Results of a run together with the times they were computed against.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub generated_at: LocalDateTime,
    pub cutoff: LocalDateTime,
    pub results: Vec<StationResult>,
}

impl RunSnapshot {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }
}

impl Monitor {
    pub fn new(
        locator: RecordLocator,
        fetcher: TimeSeriesFetcher,
        zone: CivilZone,
        scale: SeverityScale,
    ) -> Self {
        Self {
            locator,
            fetcher,
            zone,
            scale,
            concurrency: 1,
        }
    }

    /// Number of stations fetched at once. Result order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Process every station against the cutoff derived from `now`.
    pub async fn run(
        &self,
        token: &str,
        stations: &[Station],
        now: DateTime<Utc>,
    ) -> RunSnapshot {
        let generated_at = self.zone.localize(&now);
        let cutoff = self.zone.hour_cutoff(&now);
        info!(
            "Run at {} (local), cutoff {}, {} stations",
            generated_at,
            cutoff.hour_minute(),
            stations.len()
        );

        let results: Vec<StationResult> = stream::iter(stations)
            .map(|station| self.process_station(token, station, now, cutoff))
            .buffered(self.concurrency)
            .collect()
            .await;

        let snapshot = RunSnapshot {
            generated_at,
            cutoff,
            results,
        };

        let failed = snapshot.failed();
        let total = snapshot.results.len();
        if failed == 0 {
            info!("Run complete: {}/{} stations successful", total, total);
        } else {
            error!(
                "Run complete: {}/{} stations successful, {} failed",
                total - failed,
                total,
                failed
            );
        }

        snapshot
    }

    /// Process one station, substituting a placeholder on failure.
    #[instrument(skip(self, token, station, now), fields(station = %station.name))]
    pub async fn process_station(
        &self,
        token: &str,
        station: &Station,
        now: DateTime<Utc>,
        cutoff: LocalDateTime,
    ) -> StationResult {
        match self.try_process_station(token, station, now, cutoff).await {
            Ok(result) => {
                let tier = self.scale.classify(result.max_forecast_value);
                info!(
                    "Obs:{} Forecast:{} Max:{:.2} µg/m³ {} {}",
                    result.n_observed(),
                    result.n_forecast(),
                    result.max_forecast_value,
                    tier.emoji(),
                    tier
                );
                result
            }
            Err(e) => {
                error!("Station failed: {}", e);
                StationResult::placeholder(station.clone(), e.to_string())
            }
        }
    }

    async fn try_process_station(
        &self,
        token: &str,
        station: &Station,
        now: DateTime<Utc>,
        cutoff: LocalDateTime,
    ) -> Result<StationResult, FetchError> {
        let record_code = self.locator.record_code(station, &now)?;
        info!("Record code: {}", record_code);

        let items = self.fetcher.fetch_items(token, &record_code).await?;
        let series = partition(&items, cutoff, &self.zone);
        Ok(StationResult::from_series(station.clone(), series))
    }
}
