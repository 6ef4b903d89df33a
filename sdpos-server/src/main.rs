//! Same Day POS dashboard server
//!
//! Serves the admin dashboard's POS endpoints by calling the partner API
//! through the signed `sdpos-sdk` client.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use sdpos_sdk::client::PartnerClient;
use server::{build_router, run_server};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Same Day POS - dashboard backend for the POS partner API
#[derive(Parser, Debug)]
#[command(name = "sdpos-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (optional)
    #[arg(short, long, env = "SDPOS_CONFIG", default_value = "./sdpos-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, env = "SDPOS_LISTEN")]
    listen: Option<SocketAddr>,

    /// Timeout for each partner API request, in seconds
    #[arg(long, default_value = "30")]
    partner_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting sdpos-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen);
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!(
        partner = %loaded_config.credentials.api_base_url,
        configured = loaded_config.credentials.is_configured(),
        "Configuration loaded"
    );

    // Build the partner client
    let http = reqwest_client(Duration::from_secs(args.partner_timeout))?;
    let partner = PartnerClient::new(&loaded_config.credentials).with_http_client(http);

    // Build the router
    let router = build_router(AppState::new(partner));

    // Run the server
    tracing::info!("Starting HTTP server on {}", loaded_config.listen);
    run_server(router, loaded_config.listen).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn reqwest_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(timeout)
        .build()?)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sdpos_sdk=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
