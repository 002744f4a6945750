use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pm10_monitor::config::Config;
use pm10_monitor::monitor::Monitor;
use pm10_monitor::{report, stations};

#[derive(Parser, Debug)]
#[command(name = "pm10-monitor")]
#[command(about = "Fetch PM10 forecasts for each station and write the HTML dashboard", long_about = None)]
struct Cli {
    /// Where to write the report
    #[arg(long, env = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// JSON station list
    #[arg(long, env = "STATIONS_FILE")]
    stations: Option<PathBuf>,
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pm10_monitor=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.stations {
        config.stations = stations::load_stations(&path)?;
    }
    if let Some(path) = cli.output {
        config.output_path = path;
    }
    info!("Starting PM10 monitor with config: {:?}", config);

    let client = config.http_client()?;

    // Without a token nothing can be fetched; this aborts the run.
    let token = config.token_provider(client.clone()).fetch_token().await?;

    let monitor = Monitor::new(
        config.record_locator(),
        config.fetcher(client),
        config.zone,
        config.severity_scale.clone(),
    )
    .with_concurrency(config.station_concurrency);

    let snapshot = monitor.run(&token, &config.stations, Utc::now()).await;

    let html = report::render_report(&snapshot, &config.severity_scale)?;
    report::write_report(&config.output_path, &html)?;

    info!(
        "Report generated for {} stations, cutoff {}",
        snapshot.results.len(),
        snapshot.cutoff.hour_minute()
    );

    Ok(())
}
