//! CORS Relay entrypoint.
//!
//! Startup order: parse CLI, initialize tracing, load config, bind the
//! listener, install signal handling, then serve until shutdown.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cors_relay::config::loader::load_config;
use cors_relay::lifecycle::signals;
use cors_relay::{HttpServer, RelayConfig, Shutdown};

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "CORS-rewriting forwarding proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cors_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("cors-relay v0.1.0 starting");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        allowed_origins = config.cors.allowed_origins.len(),
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Shutdown coordination: SIGINT/SIGTERM trigger a graceful stop.
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_handler(shutdown);

    // Create and run HTTP server
    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
