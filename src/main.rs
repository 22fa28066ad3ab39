use std::sync::Arc;

use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use smash::app_state::AppState;
use smash::config::{AppConfig, Cli};
use smash::routes;
use smash::services::{credentials, hod::HodClient, indexing};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "smash exited with an error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?.with_cli(cli);

    tracing::info!(
        apikey_dir = %config.apikey_dir.display(),
        hod = %config.hod_base_url,
        index = %config.index_name,
        "Initializing smash"
    );

    let prometheus_handle = Arc::new(PrometheusBuilder::new().install_recorder()?);
    routes::metrics::describe();

    let api_key = credentials::load_api_key(&config.apikey_dir)?;
    let hod = HodClient::new(&config.hod_base_url, api_key, config.http_timeout())?;

    indexing::ensure_index(&hod, &config.index_name).await?;

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, Arc::new(hod));
    let app = routes::create_router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
