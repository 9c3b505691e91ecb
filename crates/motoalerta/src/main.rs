//! `moto` - CLI for motoalerta
//!
//! This binary provides the command-line interface for reporting stolen
//! motorcycles, searching and recovering reports, and viewing the dashboard.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;

use motoalerta::cli::{
    AnalyzeCommand, Cli, Command, ConfigCommand, DashboardCommand, OutputFormat, RecoverCommand,
    ReportCommand, SearchCommand,
};
use motoalerta::geo::{
    FixedLocationProvider, GeoOptions, IpLocationProvider, LocationProvider, LocationRequest,
};
use motoalerta::incident::validate_plate;
use motoalerta::{
    dashboard, init_logging, Config, IncidentRecord, IncidentStatus, IncidentStore, Location,
    TheftAnalyzer,
};

/// Environment variable consulted for the analysis credential when the
/// config file carries none.
const API_KEY_ENV: &str = "MOTOALERTA_ANALYSIS_API_KEY";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Report(report_cmd) => handle_report(&config, &report_cmd).await,
        Command::Search(search_cmd) => handle_search(&config, &search_cmd),
        Command::Recover(recover_cmd) => handle_recover(&config, &recover_cmd).await,
        Command::Dashboard(dashboard_cmd) => handle_dashboard(&config, &dashboard_cmd),
        Command::Analyze(analyze_cmd) => handle_analyze(&config, &analyze_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

/// Capture a position: manual coordinates when supplied, otherwise the
/// configured ip-geolocation provider with the fixed option set.
async fn capture_location(
    config: &Config,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Option<Location> {
    let options = GeoOptions {
        high_accuracy: config.geolocation.high_accuracy,
        timeout: config.geolocation_timeout(),
        ..GeoOptions::default()
    };

    let provider: Box<dyn LocationProvider> = match (lat, lon) {
        (Some(lat), Some(lon)) => Box::new(FixedLocationProvider::new(Location::new(lat, lon))),
        _ => Box::new(IpLocationProvider::new(&config.geolocation.provider_url)),
    };

    let mut request = LocationRequest::new();
    match request.request(provider.as_ref(), &options).await {
        Ok(location) => Some(location),
        Err(err) => {
            // Retryable: the record set is untouched.
            println!("{err}");
            None
        }
    }
}

async fn handle_report(config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    // Validate the plate up front; no point capturing a location for a
    // report that can never be submitted.
    let plate = match validate_plate(&cmd.plate) {
        Ok(plate) => plate,
        Err(err) => {
            println!("Error: {err}");
            return Ok(());
        }
    };

    let Some(location) = capture_location(config, cmd.lat, cmd.lon).await else {
        return Ok(());
    };

    let record = match IncidentRecord::new(&plate, location) {
        Ok(record) => record,
        Err(err) => {
            println!("Error: {err}");
            return Ok(());
        }
    };

    let mut store = IncidentStore::load(config.store_path())?;
    match store.add(record.clone()) {
        Ok(()) => {
            println!("Motorcycle reported as stolen.");
            print_record(&record);
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    let store = IncidentStore::load(config.store_path())?;

    match store.find(&cmd.plate) {
        Some(record) if cmd.json => println!("{}", serde_json::to_string_pretty(record)?),
        Some(record) => print_record(record),
        None => println!("No report found for plate {}.", cmd.plate.to_uppercase()),
    }
    Ok(())
}

async fn handle_recover(config: &Config, cmd: &RecoverCommand) -> anyhow::Result<()> {
    let mut store = IncidentStore::load(config.store_path())?;

    // Refuse before capturing a location: the recovery action only exists
    // for records that are currently stolen.
    match store.find(&cmd.plate) {
        None => {
            println!("No report found for plate {}.", cmd.plate.to_uppercase());
            return Ok(());
        }
        Some(record) if !record.is_stolen() => {
            println!("Plate {} is already marked as recovered.", record.plate);
            return Ok(());
        }
        Some(_) => {}
    }

    let Some(location) = capture_location(config, cmd.lat, cmd.lon).await else {
        return Ok(());
    };

    match store.mark_recovered(&cmd.plate, location) {
        Ok(updated) => {
            println!("Status updated to recovered.");
            print_record(&updated);
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

fn handle_dashboard(config: &Config, cmd: &DashboardCommand) -> anyhow::Result<()> {
    let store = IncidentStore::load(config.store_path())?;
    let stolen = store.stolen();

    match cmd.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "records": store.records(),
                "plot": dashboard::plot_points(&stolen)
                    .iter()
                    .map(|p| serde_json::json!({
                        "plate": p.plate,
                        "left": p.left,
                        "top": p.top,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Plain => {
            println!("Active theft map");
            print!("{}", dashboard::render_map(&stolen, cmd.width, cmd.height));
            println!();
            println!("Latest reports");
            print!("{}", dashboard::render_table(store.records()));
        }
    }
    Ok(())
}

async fn handle_analyze(config: &Config, _cmd: &AnalyzeCommand) -> anyhow::Result<()> {
    let store = IncidentStore::load(config.store_path())?;
    let stolen = store.stolen();

    let api_key = config
        .analysis
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV).ok());
    let analyzer = TheftAnalyzer::new(&config.analysis.endpoint, &config.analysis.model, api_key);

    match analyzer.summarize(&stolen).await {
        Ok(summary) => {
            println!("Hotspot analysis");
            println!("----------------");
            println!("{summary}");
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!("  Path:          {}", config.store_path().display());
                println!();
                println!("[Geolocation]");
                println!("  Provider URL:  {}", config.geolocation.provider_url);
                println!("  Timeout (s):   {}", config.geolocation.timeout_secs);
                println!("  High accuracy: {}", config.geolocation.high_accuracy);
                println!();
                println!("[Analysis]");
                println!("  Endpoint:      {}", config.analysis.endpoint);
                println!("  Model:         {}", config.analysis.model);
                println!(
                    "  API key:       {}",
                    if config.analysis.api_key.is_some() {
                        "configured"
                    } else {
                        "not set"
                    }
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_record(record: &IncidentRecord) {
    println!("Plate:          {}", record.plate);
    println!("Status:         {}", record.status);
    println!("Reported:       {}", record.theft_date.format("%Y-%m-%d %H:%M:%S"));
    println!("Theft location: {}", record.theft_location);
    if let IncidentStatus::Recovered {
        recovery_location,
        recovery_date,
    } = &record.status
    {
        println!(
            "Recovered:      {}",
            recovery_date.format("%Y-%m-%d %H:%M:%S")
        );
        println!("Recovery loc.:  {recovery_location}");
    }
}
