use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use nimbus_core::{AppError, Config, ConfigError};
use nimbus_weather::render::render_forecast;
use nimbus_weather::{
    CityQuery, ConsoleRegion, FixedGeolocator, FlowOutcome, Page, SharedRegion, SubmitEvent,
    WeatherProvider,
};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::error_mapping::IntoAppError;

mod error_mapping;

#[derive(Subcommand, Debug)]
enum Command {
    /// Read city names from stdin, one lookup per line
    Search,
    /// Show the forecast for a city
    Forecast { city: String },
}

#[derive(Parser, Debug)]
#[command(name = "nimbus", version, about = "Current weather for your position or any city")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Latitude of the current position
    #[arg(long, requires = "lon", allow_negative_numbers = true, global = true)]
    lat: Option<f64>,

    /// Longitude of the current position
    #[arg(long, requires = "lat", allow_negative_numbers = true, global = true)]
    lon: Option<f64>,

    /// City to look up; may be repeated
    #[arg(long = "city")]
    cities: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = nimbus_core::init() {
        eprintln!("{e:#}");
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config = load_config(args.config.as_deref())?;

    let base_url = args.backend.as_deref().unwrap_or(&config.backend.base_url);
    let provider = WeatherProvider::new(base_url, config.backend.request_timeout())
        .map_err(IntoAppError::into_app_error)?;

    let region: SharedRegion = Arc::new(Mutex::new(ConsoleRegion::new(std::io::stdout())));
    let mut page = Page::new(provider.clone(), region.clone());

    let position = args.lat.zip(args.lon).or_else(|| config.location.position());
    if let Some((lat, lon)) = position {
        page = page.with_geolocator(Arc::new(FixedGeolocator::new(lat, lon)));
    }

    match args.command {
        Some(Command::Forecast { city }) => forecast(&provider, &region, city).await,
        Some(Command::Search) => interactive(&page).await,
        None => one_shot(&page, args.cities).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, AppError> {
    if let Some(p) = path {
        if !p.exists() {
            return Err(ConfigError::NotFound(p.display().to_string()).into());
        }
    }

    let config = match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
    .map_err(|e| ConfigError::ParseError(format!("{e:#}")))?;

    let validation = config.validate();
    if !validation.is_valid() {
        return Err(ConfigError::Invalid(validation.error_summary()).into());
    }
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    Ok(config)
}

/// Page load plus one submission per `--city`, then wait for every flow.
///
/// Flow failures are already logged by the flows and do not change the exit
/// status.
async fn one_shot(page: &Page, cities: Vec<String>) -> Result<(), AppError> {
    let mut handles = vec![page.on_load()];
    handles.extend(
        cities
            .into_iter()
            .map(|city| page.on_submit(&mut SubmitEvent::new(city))),
    );

    for handle in handles {
        join(handle).await?;
    }
    Ok(())
}

/// Page load, then every stdin line is a form submission. Lookups are not
/// awaited between lines, so a slow answer can overwrite a newer one.
async fn interactive(page: &Page) -> Result<(), AppError> {
    let mut handles = vec![page.on_load()];

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handles.push(page.on_submit(&mut SubmitEvent::new(line)));
    }

    for handle in handles {
        join(handle).await?;
    }
    Ok(())
}

async fn forecast(
    provider: &WeatherProvider,
    region: &SharedRegion,
    city: String,
) -> Result<(), AppError> {
    let response = provider
        .forecast(&CityQuery::new(city))
        .await
        .map_err(IntoAppError::into_app_error)?;
    render_forecast(&response, &mut *region.lock());
    Ok(())
}

async fn join(handle: JoinHandle<FlowOutcome>) -> Result<FlowOutcome, AppError> {
    let outcome = handle
        .await
        .map_err(|e| anyhow::anyhow!("Weather flow task failed: {}", e))?;
    tracing::debug!(?outcome, "Flow finished");
    Ok(outcome)
}
