use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use spotter_core::{AppConfig, ExitCode, SpotterError};
use spotter_lookup::{AircraftLookup, AirportLookup, LookupError, RateLimitedClient};
use spotter_tui::{FormOutcome, SightingApp};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "spotter",
    about = "Log aircraft sightings from the terminal",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting SPOTTER_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in a new sighting interactively (the default).
    New,

    /// Search airports by code, name, city or country.
    Airports { query: String },

    /// Show one airport by ICAO or IATA code.
    Airport { code: String },

    /// Search live aircraft, optionally near an airport or coordinates.
    Aircraft {
        #[arg(default_value = "")]
        query: String,
        /// Airport code to search around.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        near: Option<String>,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Show one live aircraft by ICAO24 hex code.
    AircraftInfo { icao24: String },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// ─── Config Actions ──────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Print the config file location.
    Path,
    /// Write a default config file.
    Init {
        #[arg(long)]
        force: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("SPOTTER_JSON").as_deref() == Ok("1");
    let interactive = matches!(cli.command, None | Some(Commands::New));

    if let Err(e) = init_logging(cli.verbose, interactive) {
        eprintln!("warning: logging disabled: {e}");
    }

    if let Err(err) = run(cli, json_output) {
        let code = exit_code_for(&err);
        tracing::error!(error = %err, "command failed");
        if json_output {
            let _ = print_json(&serde_json::json!({
                "status": "error",
                "error": err.to_string(),
                "code": code.code(),
            }));
        } else {
            eprintln!("Error: {err:#}");
        }
        std::process::exit(code.code());
    }
}

fn run(cli: Cli, json_output: bool) -> Result<()> {
    let start = Instant::now();
    let config = AppConfig::load()?;
    let runtime = Runtime::new()?;

    match cli.command {
        None | Some(Commands::New) => {
            let _guard = runtime.enter();
            let mut app = SightingApp::new(&config)?;
            let outcome = spotter_tui::run_tui(&mut app, config.tick_rate())?;
            match outcome {
                FormOutcome::Submitted(request) => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":request}))?;
                    } else {
                        println!("{}", serde_json::to_string_pretty(&request)?);
                    }
                }
                FormOutcome::Cancelled => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"cancelled"}))?;
                    } else {
                        eprintln!("Cancelled.");
                    }
                }
            }
        }

        // ── Lookups ────────────────────────────────────────────────────────
        Some(Commands::Airports { query }) => {
            let lookup = AirportLookup::new(client(&config)?);
            let airports = runtime.block_on(lookup.search(&query))?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_items(&airports, dur)?;
            } else if airports.is_empty() {
                println!("No airports match {query:?}.");
            } else {
                for airport in airports {
                    let option = spotter_lookup::airport_option(airport);
                    println!(
                        "{label:<55}  {sub}",
                        label = option.label,
                        sub = option.sublabel.unwrap_or_default()
                    );
                }
            }
        }

        Some(Commands::Airport { code }) => {
            let lookup = AirportLookup::new(client(&config)?);
            let airport = runtime.block_on(lookup.by_code(&code))?;
            print_record(&airport, json_output, start)?;
        }

        Some(Commands::Aircraft {
            query,
            near,
            lat,
            lon,
        }) => {
            let client = client(&config)?;
            let aircraft = runtime.block_on(async {
                let coordinates = match near {
                    Some(code) => {
                        let airport = AirportLookup::new(Arc::clone(&client)).by_code(&code).await?;
                        if airport.coordinates().is_none() {
                            tracing::warn!(%code, "airport has no coordinates, searching everywhere");
                        }
                        airport.coordinates()
                    }
                    None => lat.zip(lon),
                };
                AircraftLookup::new(client).search_at(&query, coordinates).await
            })?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_items(&aircraft, dur)?;
            } else if aircraft.is_empty() {
                println!("No aircraft found.");
            } else {
                for record in aircraft {
                    let option = spotter_lookup::aircraft_option(record);
                    println!(
                        "{label:<24}  {sub}",
                        label = option.label,
                        sub = option.sublabel.unwrap_or_default()
                    );
                }
            }
        }

        Some(Commands::AircraftInfo { icao24 }) => {
            let lookup = AircraftLookup::new(client(&config)?);
            let aircraft = runtime.block_on(lookup.by_icao24(&icao24))?;
            print_record(&aircraft, json_output, start)?;
        }

        // ── Config ─────────────────────────────────────────────────────────
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":config}))?;
                } else {
                    print!("{}", config.to_toml_string()?);
                }
            }
            ConfigAction::Path => {
                let path = AppConfig::config_path();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path}}))?;
                } else {
                    println!("{}", path.display());
                }
            }
            ConfigAction::Init { force } => {
                let path = AppConfig::config_path();
                init_config(&path, force)?;
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path}}))?;
                } else {
                    println!("Wrote default config to {}", path.display());
                }
            }
        },
    }

    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Plain commands log to stderr; the form logs to a file so the screen
/// stays clean.
fn init_logging(verbose: u8, interactive: bool) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "spotter_core=debug,spotter_lookup=debug,spotter_tui=debug,spotter_cli=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if interactive {
        let dir = AppConfig::log_dir();
        std::fs::create_dir_all(&dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("spotter.log"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}

fn client(config: &AppConfig) -> Result<Arc<RateLimitedClient>> {
    Ok(Arc::new(RateLimitedClient::from_config(&config.backend)?))
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if let Some(e) = err.downcast_ref::<LookupError>() {
        e.exit_code()
    } else if let Some(e) = err.downcast_ref::<SpotterError>() {
        e.exit_code()
    } else {
        ExitCode::GeneralError
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(SpotterError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))
        .into());
    }
    AppConfig::default().save_to(path)?;
    Ok(())
}

fn print_items<T: Serialize>(items: &[T], dur: u128) -> Result<()> {
    print_json(&serde_json::json!({
        "status": "ok",
        "data": { "items": items, "total": items.len() },
        "meta": { "duration_ms": dur }
    }))
}

fn print_record<T: Serialize>(record: &T, json_output: bool, start: Instant) -> Result<()> {
    if json_output {
        let dur = start.elapsed().as_millis();
        print_json(&serde_json::json!({"status":"ok","data":record,"meta":{"duration_ms":dur}}))
    } else {
        println!("{}", serde_json::to_string_pretty(record)?);
        Ok(())
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
