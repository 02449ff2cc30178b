//! AquaMonitor station metrics service
//!
//! Fetches station measurements and forecast batches from the AquaMonitor
//! backend, derives status, trend and forecast sufficiency per station, and
//! serves or prints the result.
//!
//! Usage:
//!   aquamonitor serve [--port 8080]        # JSON endpoint over derived snapshots
//!   aquamonitor snapshot [--json]          # one fetch + derivation, printed
//!   aquamonitor history <station_id>       # past forecast batches of a station
//!   aquamonitor derive --stations s.json --predictions p.json
//!                                          # offline derivation from saved payloads
//!
//! Environment:
//!   AQUAMONITOR_API_URL   - backend base URL (overrides aquamonitor.toml)
//!   AQUAMONITOR_API_TOKEN - bearer token for backend requests
//!   RUST_LOG              - log filter (default: info)

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use aquamonitor::analysis::view_model::build_view_models;
use aquamonitor::auth::{Role, Session, User};
use aquamonitor::config::{self, Config};
use aquamonitor::dashboard::Dashboard;
use aquamonitor::endpoint;
use aquamonitor::ingest::api::{parse_predictions_response, parse_stations_response, ApiClient};
use aquamonitor::model::StationViewModel;

#[derive(Parser)]
#[command(name = "aquamonitor", version, about = "AquaMonitor station metrics service")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve derived station data over HTTP
    Serve {
        /// Port to listen on (overrides [endpoint] port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch, derive and print one snapshot
    Snapshot {
        /// Print view-models as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print past forecast batches of one station
    History { station_id: String },
    /// Derive view-models from saved backend payloads, without network access
    Derive {
        #[arg(long)]
        stations: PathBuf,
        #[arg(long)]
        predictions: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.endpoint.port);
            let dashboard = connect(&config)?;
            endpoint::start_endpoint_server(port, dashboard).map_err(anyhow::Error::msg)
        }
        Command::Snapshot { json } => {
            let mut dashboard = connect(&config)?;
            let snapshot = dashboard.refresh().context("refreshing snapshot")?;
            print_stations(&snapshot.stations, json)?;
            if !json {
                println!(
                    "\n{} stations, {} alerting, {} with insufficient forecast data",
                    snapshot.stations.len(),
                    snapshot.alerting_stations().len(),
                    snapshot.unreliable_forecasts().len()
                );
            }
            Ok(())
        }
        Command::History { station_id } => {
            let dashboard = connect(&config)?;
            let history = dashboard
                .forecast_history(&station_id)
                .with_context(|| format!("fetching forecasts for {}", station_id))?;

            if history.is_empty() {
                println!("No forecasts for {}", station_id);
            }
            for day in &history.days {
                println!("{}", day.date);
                for batch in &day.batches {
                    println!("  batch created {}", batch.created_at.format("%H:%M:%S UTC"));
                    for p in &batch.predictions {
                        println!(
                            "    {}  {:>8.3} m  ({:+.1} cm)",
                            p.prediction_date,
                            aquamonitor::model::cm_to_m(p.predicted_water_level_cm),
                            p.change_from_last_cm
                        );
                    }
                }
            }
            Ok(())
        }
        Command::Derive { stations, predictions, json } => {
            let station_json = fs::read_to_string(&stations)
                .with_context(|| format!("reading {}", stations.display()))?;
            let stations = parse_stations_response(&station_json)?;

            let predictions = match predictions {
                Some(path) => {
                    let body = fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    parse_predictions_response(&body)?
                }
                None => Vec::new(),
            };

            let view_models = build_view_models(&stations, &predictions, config.derivation_options());
            print_stations(&view_models, json)
        }
    }
}

/// Builds the dashboard for the configured backend. The CLI acts as a
/// read-only service user.
fn connect(config: &Config) -> Result<Dashboard<ApiClient>> {
    let client = ApiClient::new(&config.api.base_url, config.api_timeout())?;

    let user = User {
        id: "aquamonitor-cli".to_string(),
        role: Role::Viewer,
        municipality_id: None,
    };
    let session = match &config.api_token {
        Some(token) => Session::new(token.clone(), user),
        None => Session::anonymous(user),
    };

    let dashboard = Dashboard::new(
        client,
        session,
        config.refresh_interval(),
        config.derivation_options(),
    );

    info!("Backend: {}", dashboard.source().base_url());
    if dashboard.session().token().is_none() {
        warn!("{} is not set; backend requests will fail", config::ENV_API_TOKEN);
    }
    Ok(dashboard)
}

fn print_stations(stations: &[StationViewModel], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stations)?);
        return Ok(());
    }

    println!(
        "{:<12} {:<28} {:>9} {:>8} {:<8} {:<8} {:<13}",
        "ID", "NAME", "LEVEL m", "RANGE %", "STATUS", "TREND", "FORECAST DATA"
    );
    for s in stations {
        let data = if s.missing_days > 0 {
            format!("{} (-{}d)", s.data_sufficiency, s.missing_days)
        } else {
            s.data_sufficiency.to_string()
        };
        println!(
            "{:<12} {:<28} {:>9.3} {:>8.1} {:<8} {:<8} {:<13}",
            s.id,
            s.name,
            s.current_level,
            s.position.percent,
            s.status.to_string(),
            s.trend.to_string(),
            data
        );
    }
    Ok(())
}
