use chrono::Utc;
use clap::Parser;

use pm10_monitor::config::Config;
use pm10_monitor::monitor::Monitor;

#[derive(Parser)]
#[command(name = "check-station")]
#[command(about = "Show today's record code for a station and optionally fetch its series", long_about = None)]
struct Cli {
    /// Station location code (e.g. TUCUSH) or name
    station: String,

    /// Also request a token and fetch the time series
    #[arg(long)]
    fetch: bool,

    /// Client secret
    #[arg(long, env = "METEOSIM_SECRET", hide_env_values = true, default_value = "")]
    secret: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    config.client_secret = cli.secret;

    let station = config
        .stations
        .iter()
        .find(|s| {
            s.location_code.eq_ignore_ascii_case(&cli.station)
                || s.name.eq_ignore_ascii_case(&cli.station)
        })
        .cloned()
        .ok_or_else(|| format!("Unknown station '{}'", cli.station))?;

    let now = Utc::now();
    let locator = config.record_locator();

    println!("Station:   {} ({})", station.name, station.location_code);
    println!("Strategy:  {}", locator.strategy());
    println!("Local now: {}", config.zone.localize(&now));
    println!("Cutoff:    {}", config.zone.hour_cutoff(&now).hour_minute());

    let record_code = locator.record_code(&station, &now)?;
    println!("Record:    {record_code}");

    if !cli.fetch {
        return Ok(());
    }

    let client = config.http_client()?;
    let fetcher = config.fetcher(client.clone());
    println!("URL:       {}", fetcher.timeseries_url(&record_code));

    let token = config.token_provider(client).fetch_token().await?;
    let monitor = Monitor::new(locator, fetcher, config.zone, config.severity_scale.clone());
    let cutoff = config.zone.hour_cutoff(&now);
    let result = monitor.process_station(&token, &station, now, cutoff).await;

    if let Some(error) = &result.error {
        println!("\nFetch failed: {error}");
        return Ok(());
    }

    let tier = config.severity_scale.classify(result.max_forecast_value);
    println!("\nObserved:  {} readings", result.n_observed());
    println!("Forecast:  {} readings", result.n_forecast());
    println!(
        "Max:       {:.2} μg/m³ at {} → {} {} ({})",
        result.max_forecast_value,
        result
            .max_forecast_time
            .map(|t| t.hour_minute())
            .unwrap_or_else(|| "—".to_string()),
        tier.emoji(),
        tier.label(),
        tier
    );

    println!("\nLast observations:");
    for r in result.series.observed.iter().rev().take(5).rev() {
        println!("  {}  {:>10.4}", r.time.hour_minute(), r.value);
    }
    println!("\nForecast:");
    for r in &result.series.forecast {
        println!("  {}  {:>10.4}", r.time.hour_minute(), r.value);
    }

    Ok(())
}
