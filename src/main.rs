//! clear-router
//!
//! Command-line front for the route table.
//!
//! # Architecture Overview
//!
//! ```text
//!     ┌──────────────────────────────────────────────────────────────┐
//!     │                        clear-router                          │
//!     │                                                              │
//!     │  ┌─────────┐    ┌──────────────┐    ┌───────────────────┐    │
//!     │  │ config  │───▶│  lifecycle   │───▶│  routing          │    │
//!     │  │ (TOML)  │    │  bootstrap   │    │  table + resolver │    │
//!     │  └─────────┘    └──────────────┘    └─────────┬─────────┘    │
//!     │                                               │              │
//!     │                     ┌─────────────────────────┼──────────┐   │
//!     │                     ▼                         ▼          │   │
//!     │              ┌─────────────┐          ┌──────────────┐   │   │
//!     │              │  history    │          │    http      │   │   │
//!     │              │  navigator  │          │  app front   │   │   │
//!     │              └─────────────┘          └──────────────┘   │   │
//!     │                                                          │   │
//!     │  ┌────────────────────────────────────────────────────┐  │   │
//!     │  │  observability (tracing, metrics)                  │◀─┘   │
//!     │  └────────────────────────────────────────────────────┘      │
//!     └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use clear_router::history::HistoryMode;
use clear_router::lifecycle::{signals, startup, Shutdown};
use clear_router::observability::{logging, metrics};
use clear_router::routing::{Location, Params};
use clear_router::{Addressing, HttpServer};

#[derive(Parser)]
#[command(name = "clear-router")]
#[command(about = "Route table resolver and app front for the CLEAR client", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file (built-in route table when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a navigation target and print the result as JSON
    Resolve {
        target: String,
        /// Address-bar encoding used for the printed href
        #[arg(long, value_enum)]
        mode: Option<HistoryMode>,
    },
    /// Build the path of a named route
    Href {
        name: String,
        /// Route parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// List the route table
    Routes,
    /// Validate the configuration and exit
    Check,
    /// Serve the app front over HTTP
    Serve {
        /// Override server.bind_address
        #[arg(long)]
        bind: Option<String>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::load(cli.config.as_deref())?;
    logging::init_logging(&config.observability)?;
    let startup = startup::from_config(config)?;

    match cli.command {
        Commands::Resolve { target, mode } => {
            let addressing = match mode {
                Some(mode) => Addressing::new(mode, &startup.config.router.base),
                None => startup.addressing(),
            };
            let resolution = startup.resolver.resolve(&target)?;
            let href = addressing.href(&resolution.location);
            let output = serde_json::json!({ "resolution": resolution, "href": href });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Href { name, params } => {
            let params: Params = params.into_iter().collect();
            let path = startup.resolver.href_for(&name, &params)?;
            let href = startup.addressing().href(&Location::parse(&path)?);
            println!("{}", href);
        }
        Commands::Routes => {
            for route in startup.resolver.table().routes() {
                println!(
                    "{:<16} {:<12} {}",
                    route.pattern,
                    route.name.as_deref().unwrap_or("-"),
                    route.target
                );
            }
            if let Some(fallback) = startup.resolver.table().fallback() {
                println!("{:<16} {:<12} view {}", "*", fallback.name, fallback.view);
            }
        }
        Commands::Check => {
            println!(
                "configuration ok: {} routes",
                startup.resolver.table().routes().len()
            );
        }
        Commands::Serve { bind } => {
            let mut config = startup.config.clone();
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }

            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr)?,
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let listener = TcpListener::bind(&config.server.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            let shutdown = Shutdown::new();
            signals::spawn_signal_listener(shutdown.clone());

            let server = HttpServer::new(config, startup.resolver.clone())?;
            server.run(listener, shutdown.subscribe()).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
