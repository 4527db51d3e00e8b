//! # sfc-data-visualizer
//!
//! Plots one numeric value extracted from a directory of JSON sample files.
//!
//! Interactive mode draws a spline chart in the terminal with a timeframe
//! menu. Report mode (or any non-terminal stdout) writes a markdown report
//! with statistics, an inline SVG chart, a sample table and the trend.
//!
//! ## Subcommands
//!
//! - `plot <DIR> <EXPR>`: visualize a directory
//! - `run <CONFIG_NAME>`: visualize the FILE-TARGET directory of a running configuration
//! - `serve`: HTTP report endpoint
//!
//! ## API surface
//!
//! | Method | Path                   | Description                          |
//! |--------|------------------------|--------------------------------------|
//! | GET    | `/healthz`             | Liveness probe                       |
//! | GET    | `/report`              | Report for `?dir=&expr=&seconds=`    |
//! | GET    | `/runs/:config/report` | Report for a running configuration   |

mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::visualizer_service::{VisualizationRequest, VisualizerService};
use crate::domain::timeframe::Timeframe;
use crate::infrastructure::config::{load_visualizer_config, VisualizerConfig};
use crate::infrastructure::json_store::JsonDirectoryStore;
use crate::infrastructure::run_locator::RunLocator;
use crate::infrastructure::terminal::TerminalSurfaceProvider;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, report, run_report};

const DEFAULT_RUN_SECONDS: u64 = 15;

/// Terminal and markdown plots of JSON sample data.
#[derive(Parser)]
#[command(name = "sfc-data-visualizer", version)]
struct Cli {
    /// Path to a config file (defaults to config/visualizer.toml when present).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Visualize the JSON files under a directory.
    Plot {
        /// Directory searched recursively for *.json files.
        dir: PathBuf,
        /// Path expression selecting the value, e.g. `value` or `data.temp`.
        expr: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Visualize the data directory of a running configuration.
    Run {
        config_name: String,
        #[arg(long, default_value = "value")]
        expr: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Run the HTTP report endpoint.
    Serve,
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Only keep samples from the last N seconds.
    #[arg(long, conflicts_with = "minutes")]
    seconds: Option<u64>,
    /// Only keep samples from the last N minutes.
    #[arg(long)]
    minutes: Option<u64>,
    /// Write a markdown report instead of opening the interactive view.
    #[arg(long)]
    report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_visualizer_config(cli.config.as_deref())?;

    // Logs go to stderr so stdout only carries the result
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .init();

    let service = VisualizerService::new(
        Arc::new(JsonDirectoryStore::new()),
        Arc::new(TerminalSurfaceProvider),
        config.clone(),
    );

    match cli.command {
        Commands::Plot { dir, expr, window } => {
            let request = VisualizationRequest {
                source_dir: dir,
                expression: expr,
                window: Timeframe::resolve(window.seconds, window.minutes),
                interactive: !window.report,
            };
            println!("{}", visualize_blocking(service, request).await?);
        }
        Commands::Run {
            config_name,
            expr,
            window,
        } => {
            let locator = RunLocator::new(&config.runs.base_dir);
            let source_dir = match locator.locate(Some(&config_name)) {
                Ok(dir) => dir,
                Err(e) => {
                    println!("{}", e);
                    return Ok(());
                }
            };
            let timeframe = match (window.seconds, window.minutes) {
                (None, None) => Timeframe::Seconds(DEFAULT_RUN_SECONDS),
                (seconds, minutes) => Timeframe::resolve(seconds, minutes),
            };
            let request = VisualizationRequest {
                source_dir,
                expression: expr,
                window: timeframe,
                interactive: !window.report,
            };
            println!("{}", visualize_blocking(service, request).await?);
        }
        Commands::Serve => serve(service, &config).await?,
    }

    Ok(())
}

async fn visualize_blocking(
    service: VisualizerService,
    request: VisualizationRequest,
) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || service.visualize(&request))
        .await
        .context("visualizer task failed")
}

async fn serve(service: VisualizerService, config: &VisualizerConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        visualizer: service,
        runs: RunLocator::new(&config.runs.base_dir),
    });

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/report", get(report))
        .route("/runs/:config/report", get(run_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen))?;
    info!("Starting sfc-data-visualizer on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received SIGINT");
        })
        .await?;

    Ok(())
}
