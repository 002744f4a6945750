//! Observed/forecast split of a PM10 time series.

use tracing::debug;

use crate::civil_time::{CivilZone, LocalDateTime};
use crate::model::{PartitionedSeries, Reading, TimeSeriesItem};

/// Round to 4 decimal places.
///
/// Rounds the exact binary value, so `2.00005` (stored just below the
/// half-way point) becomes `2.0`. Scaling by 10^4 first would round it up.
/// This is the stored precision of every reading; display formatting to
/// 2 decimals is derived from the stored value.
pub fn round_to_4(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

/// Split raw items at `cutoff`.
///
/// Each item's timestamp is converted to local civil time in `zone` before
/// comparison. Items without a non-null PM10 value are dropped. A reading
/// exactly at the cutoff is observed. Both halves are sorted ascending with a
/// stable sort, so readings with equal timestamps keep their input order.
pub fn partition(
    items: &[TimeSeriesItem],
    cutoff: LocalDateTime,
    zone: &CivilZone,
) -> PartitionedSeries {
    let mut series = PartitionedSeries::default();
    let mut skipped = 0usize;

    for item in items {
        let Some(value) = item.pm10() else {
            skipped += 1;
            continue;
        };

        let reading = Reading {
            time: zone.localize(&item.time),
            value: round_to_4(value),
        };

        if reading.time <= cutoff {
            series.observed.push(reading);
        } else {
            series.forecast.push(reading);
        }
    }

    series.observed.sort_by_key(|r| r.time);
    series.forecast.sort_by_key(|r| r.time);

    if skipped > 0 {
        debug!("Skipped {} items without a PM10 value", skipped);
    }

    series
}
