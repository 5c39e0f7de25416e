//! Edge router for a catalog of single-page apps.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ AppRouter ──▶ decision (redirect / 404 / content)
//!                                        │
//!                                        ▼
//!                                  resource cache ──▶ fetcher ──▶ asset & API origins
//!                                        │             (retry, backoff, deadline)
//!                                        ▼
//!     Client Response ◀──────────── html transform (absolute URLs, injected config)
//!
//!     Cross-cutting: config (TOML + watcher), observability (tracing, metrics),
//!     lifecycle (signals, graceful shutdown)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_router::config::watcher::ConfigWatcher;
use edge_router::config::{load_config, RouterConfig};
use edge_router::fetch::HttpTransport;
use edge_router::lifecycle::signals::listen_for_signals;
use edge_router::lifecycle::Shutdown;
use edge_router::observability::{logging, metrics};
use edge_router::routing::{AppRouter, RouteOptions, RouterSettings};
use edge_router::HttpServer;

#[derive(Parser)]
#[command(name = "edge-router", version)]
#[command(about = "Serves single-page apps from a manifest-driven catalog", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Route a single path and print the response
    Render {
        /// Request path, e.g. /demo/
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cli.config, config).await,
        Commands::Render { path } => render(config, &path).await,
    }
}

async fn serve(
    config_path: Option<PathBuf>,
    config: RouterConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("edge-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        assets_url = %config.upstream.assets_url,
        api_url = %config.upstream.api_url,
        max_attempts = config.fetch.max_attempts,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher stops delivering events once dropped, so it lives until
    // the server returns.
    let (_watcher, config_updates) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.clone());
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(listen_for_signals(shutdown));

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn render(config: RouterConfig, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(HttpTransport::new()?);
    let router = AppRouter::new(RouterSettings::from(&config), transport);

    let response = router
        .route(path, &RouteOptions::from(&config.cache))
        .await;

    println!("{}", response.status_code);
    for (name, value) in &response.headers {
        println!("{name}: {value}");
    }
    if let Some(body) = response.body {
        println!();
        println!("{body}");
    }

    Ok(())
}
