use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use skyboard_core::{AppError, Config, ConfigError};
use skyboard_weather::{view, Dashboard, FileStorage, StaticDataClient, WeatherCache, WeatherProvider};

#[derive(Parser)]
#[command(name = "skyboard", about = "Current weather, trends and forecasts for a fixed set of cities")]
struct Cli {
    /// City to highlight (falls back to the first city when unknown)
    #[arg(long, global = true)]
    city: Option<String>,

    /// Never touch the network; use cached or sample data
    #[arg(long, global = true)]
    offline: bool,

    /// Ignore cache freshness and fetch current conditions
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Full report (default)
    Show,
    /// Temperature trends per city
    History,
    /// Forecast for the selected city
    Forecast,
    /// City cards
    Cities,
    /// Print config location and validation result
    Config,
}

fn unreadable(e: anyhow::Error) -> AppError {
    AppError::Config(ConfigError::Unreadable(format!("{:#}", e)))
}

fn print_config() -> Result<(), AppError> {
    let path = Config::config_path().map_err(unreadable)?;
    let config = Config::load().map_err(unreadable)?;
    let validation = config.validate();

    println!("Config file: {}", path.display());
    println!("Cache directory: {}", config.storage.cache_dir.display());
    println!("Cities: {}", config.weather.cities.join(", "));
    for error in &validation.errors {
        println!("error: {}", error);
    }
    for warning in &validation.warnings {
        println!("warning: {}", warning);
    }
    if validation.is_valid() {
        println!("Configuration OK");
    }
    Ok(())
}

fn build_dashboard(config: &Config, offline: bool) -> Result<Dashboard<FileStorage>, AppError> {
    let weather = &config.weather;
    let storage = FileStorage::new(config.storage.cache_dir.clone());
    let cache = WeatherCache::with_window(
        storage,
        Duration::minutes(i64::from(weather.cache_ttl_minutes)),
    );

    let provider = match (offline, weather.resolved_api_key()) {
        (false, Some(key)) => Some(WeatherProvider::with_base_urls(
            key,
            &weather.geo_base_url,
            &weather.weather_base_url,
        )?),
        _ => None,
    };
    let static_client = if offline {
        None
    } else {
        Some(StaticDataClient::new(&weather.static_base_url)?)
    };

    Ok(Dashboard::new(
        cache,
        provider,
        static_client,
        weather.cities.clone(),
    ))
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let command = cli.command.unwrap_or(Command::Show);

    if command == Command::Config {
        return print_config();
    }

    let (config, _) = Config::load_validated()?;

    let mut dashboard = build_dashboard(&config, cli.offline)?;
    let now = Utc::now();
    let source = dashboard.refresh_current(now, cli.refresh).await;
    match dashboard.cache().age(now) {
        Ok(Some(age)) => tracing::info!(
            "Showing {} (cache written {} min ago)",
            source.description(),
            age.num_minutes()
        ),
        _ => tracing::info!("Showing {}", source.description()),
    }

    // After the refresh, so configured cities missing from the sample set can be picked
    if let Some(city) = &cli.city {
        dashboard.select_city(city);
    }
    if command != Command::Cities {
        dashboard.refresh_static().await;
    }

    let output = match command {
        Command::Show => view::render_text(&dashboard),
        Command::History => view::render_history(&dashboard),
        Command::Forecast => view::render_forecast(&dashboard),
        Command::Cities => view::render_cities(&dashboard),
        Command::Config => String::new(),
    };
    print!("{}", output);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skyboard_core::init()?;
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }
    Ok(())
}
