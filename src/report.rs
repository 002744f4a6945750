//! Self-contained HTML dashboard: a Leaflet map with one circle per station,
//! a Plotly chart per station, and the severity legend.
//!
//! All per-station data is embedded as JSON; the page pulls Leaflet and
//! Plotly from their CDNs and refreshes itself every hour.

use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{info, instrument};

use crate::civil_time::LocalDateTime;
use crate::model::{Reading, StationResult};
use crate::monitor::RunSnapshot;
use crate::severity::SeverityScale;
use crate::stations;

const TEMPLATE: &str = include_str!("report_template.html");

/// Placeholder shown when a station has no forecast maximum.
pub const NO_VALUE: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

/// Chart series of one station, as consumed by the page script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationChart {
    pub name: String,
    pub color: String,
    pub observed: Vec<ChartPoint>,
    /// Forecast line, starting at the last observed point when both exist.
    pub forecast: Vec<ChartPoint>,
    pub max_value: f64,
    pub max_time: Option<String>,
}

/// Map overlay of one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: f64,
    pub color: String,
    pub tooltip: String,
    pub popup_html: String,
}

/// `00:00` .. `23:00`, the fixed x axis of every chart.
pub fn hour_axis() -> Vec<String> {
    (0..24).map(|h| format!("{h:02}:00")).collect()
}

fn points(readings: &[Reading]) -> Vec<ChartPoint> {
    readings
        .iter()
        .map(|r| ChartPoint {
            x: r.time.hour_minute(),
            y: r.value,
        })
        .collect()
}

fn max_time_label(time: Option<LocalDateTime>) -> Option<String> {
    time.map(|t| t.hour_minute())
}

pub fn station_chart(result: &StationResult, scale: &SeverityScale) -> StationChart {
    let observed = points(&result.series.observed);
    let mut forecast = points(&result.series.forecast);
    if let (Some(last), false) = (observed.last(), forecast.is_empty()) {
        forecast.insert(0, last.clone());
    }

    StationChart {
        name: result.station.name.clone(),
        color: scale.classify(result.max_forecast_value).color().to_string(),
        observed,
        forecast,
        max_value: result.max_forecast_value,
        max_time: max_time_label(result.max_forecast_time),
    }
}

pub fn station_marker(result: &StationResult, scale: &SeverityScale) -> StationMarker {
    let tier = scale.classify(result.max_forecast_value);
    let station = &result.station;
    let name = escape_html(&station.name);
    let max_time =
        max_time_label(result.max_forecast_time).unwrap_or_else(|| NO_VALUE.to_string());

    let popup_html = format!(
        "<div class=\"popup\"><b>📍 {name}</b><hr>\
         PM10 Máx: <b>{value:.2} μg/m³</b><br>\
         Categoría: <b style=\"color:{color}\">{emoji} {label}</b><br>\
         Hora máx: <b>{max_time}</b><br>\
         Buffer: <b>{km:.0} km</b></div>",
        value = result.max_forecast_value,
        color = tier.color(),
        emoji = tier.emoji(),
        label = tier.label(),
        km = station.buffer_radius_m / 1000.0,
    );

    StationMarker {
        lat: station.latitude,
        lng: station.longitude,
        radius_m: station.buffer_radius_m,
        color: tier.color().to_string(),
        tooltip: format!(
            "{} · {:.2} μg/m³ · {} {}",
            name,
            result.max_forecast_value,
            tier.emoji(),
            tier.label()
        ),
        popup_html,
    }
}

fn legend_html(scale: &SeverityScale) -> String {
    scale
        .legend()
        .into_iter()
        .map(|(tier, range)| {
            format!(
                "<div class=\"li\"><div class=\"dot\" style=\"background:{}\"></div>\
                 <span>{} μg/m³ {}</span></div>",
                tier.color(),
                escape_html(&range),
                tier.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ")
}

fn buffer_note(results: &[StationResult]) -> String {
    let parts: Vec<String> = results
        .iter()
        .map(|r| {
            format!(
                "{} {:.0} km",
                escape_html(&r.station.name),
                r.station.buffer_radius_m / 1000.0
            )
        })
        .collect();
    format!("Buffer: {}", parts.join(" &nbsp;·&nbsp; "))
}

/// Render the full page for a run.
pub fn render_report(
    snapshot: &RunSnapshot,
    scale: &SeverityScale,
) -> Result<String, serde_json::Error> {
    let charts: Vec<StationChart> = snapshot
        .results
        .iter()
        .map(|r| station_chart(r, scale))
        .collect();
    let markers: Vec<StationMarker> = snapshot
        .results
        .iter()
        .map(|r| station_marker(r, scale))
        .collect();

    let station_list: Vec<_> = snapshot
        .results
        .iter()
        .map(|r| r.station.clone())
        .collect();
    let (center_lat, center_lng) = stations::centroid(&station_list).unwrap_or((0.0, 0.0));

    let cutoff = snapshot.cutoff.hour_minute();
    let html = TEMPLATE
        .replace("__STATION_COUNT__", &snapshot.results.len().to_string())
        .replace("__CUTOFF__", &cutoff)
        .replace("__UPDATED__", &snapshot.generated_at.day_month_year_hm())
        .replace("__SEVERITY_LEGEND__", &legend_html(scale))
        .replace("__BUFFER_NOTE__", &buffer_note(&snapshot.results))
        .replace("__CENTER__", &format!("[{center_lat}, {center_lng}]"))
        .replace("__HOUR_AXIS__", &script_json(&hour_axis())?)
        .replace("__CUTOFF_JSON__", &script_json(&cutoff)?)
        .replace("__CHART_DATA__", &script_json(&charts)?)
        .replace("__MAP_DATA__", &script_json(&markers)?);

    Ok(html)
}

/// Write the page, replacing any previous report.
#[instrument(skip(path, html), fields(path = %path.display(), size = html.len()))]
pub fn write_report(path: &Path, html: &str) -> io::Result<()> {
    std::fs::write(path, html)?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// JSON safe to embed inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PartitionedSeries, Station};
    use chrono::NaiveDate;

    fn at(h: u32) -> LocalDateTime {
        LocalDateTime::from_naive(
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )
    }

    fn reading(h: u32, value: f64) -> Reading {
        Reading { time: at(h), value }
    }

    fn station() -> Station {
        Station {
            name: "Quebrada".to_string(),
            location_code: "QUEBRADA".to_string(),
            latitude: -9.55501,
            longitude: -77.08584,
            buffer_radius_m: 1000.0,
            static_record_code: None,
        }
    }

    fn result() -> StationResult {
        StationResult::from_series(
            station(),
            PartitionedSeries {
                observed: vec![reading(9, 10.0), reading(10, 12.3456)],
                forecast: vec![reading(11, 55.5), reading(12, 30.0)],
            },
        )
    }

    #[test]
    fn test_hour_axis() {
        let axis = hour_axis();
        assert_eq!(axis.len(), 24);
        assert_eq!(axis[0], "00:00");
        assert_eq!(axis[23], "23:00");
    }

    #[test]
    fn test_forecast_line_joins_last_observation() {
        let chart = station_chart(&result(), &SeverityScale::default());
        assert_eq!(chart.observed.len(), 2);
        assert_eq!(chart.forecast.len(), 3);
        assert_eq!(
            chart.forecast[0],
            ChartPoint {
                x: "10:00".to_string(),
                y: 12.3456
            }
        );
        assert_eq!(chart.max_time.as_deref(), Some("11:00"));
        assert_eq!(chart.color, "#f97316");
    }

    #[test]
    fn test_forecast_only_is_not_prefixed() {
        let mut r = result();
        r.series.observed.clear();
        let chart = station_chart(&r, &SeverityScale::default());
        assert_eq!(chart.forecast.len(), 2);
    }

    #[test]
    fn test_marker_for_placeholder_uses_dash() {
        let placeholder = StationResult::placeholder(station(), "HTTP error");
        let marker = station_marker(&placeholder, &SeverityScale::default());
        assert_eq!(marker.color, "#22c55e");
        assert!(marker.popup_html.contains("Hora máx: <b>—</b>"));
        assert!(marker.popup_html.contains("0.00 μg/m³"));
        assert!(marker.popup_html.contains("Buffer: <b>1 km</b>"));
        assert_eq!(marker.tooltip, "Quebrada · 0.00 μg/m³ · 🟢 BAJO");
    }

    #[test]
    fn test_marker_escapes_station_name() {
        let mut r = result();
        r.station.name = "<b>Tucush & Co</b>".to_string();
        let marker = station_marker(&r, &SeverityScale::default());
        assert!(marker.popup_html.contains("&lt;b&gt;Tucush &amp; Co&lt;/b&gt;"));
    }

    #[test]
    fn test_tooltip_escapes_station_name() {
        let mut station = station();
        station.name = "<img src=x onerror=alert(1)>".to_string();
        let placeholder = StationResult::placeholder(station, "HTTP error");
        let marker = station_marker(&placeholder, &SeverityScale::default());
        assert!(!marker.tooltip.contains('<'));
        assert_eq!(
            marker.tooltip,
            "&lt;img src=x onerror=alert(1)&gt; · 0.00 μg/m³ · 🟢 BAJO"
        );
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        let json = script_json("</script><script>alert(1)").unwrap();
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn test_legend_follows_scale() {
        let html = legend_html(&SeverityScale::hourly_alert());
        assert_eq!(html.matches("class=\"li\"").count(), 3);
        assert!(html.contains("&gt; 2 μg/m³ ALTO"));
    }
}
