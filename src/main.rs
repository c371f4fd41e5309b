use std::sync::Arc;

use anyhow::{Context, Result};
use city_explorer::{
    AppState, FjallLocationStore, GatewayConfig, GeocodeResolver, LocationStore, Providers,
    logging, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine, real env vars still apply
    let _ = dotenvy::dotenv();

    let config = GatewayConfig::load()?;
    logging::init(&config.logging)?;
    tracing::info!("Starting city-explorer {}", city_explorer::VERSION);

    let store = Arc::new(
        FjallLocationStore::open(&config.store.path)
            .with_context(|| format!("Failed to open location store at {}", config.store.path))?,
    );
    let providers = Arc::new(Providers::from_config(&config)?);
    let resolver = Arc::new(GeocodeResolver::new(store.clone(), providers.clone()));

    let state = AppState {
        resolver,
        providers,
    };

    let served = web::run(&config.server, state, shutdown_signal()).await;

    store.close().await?;
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
