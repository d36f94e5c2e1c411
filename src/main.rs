use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use contactlist::config::AppConfig;
use contactlist::main_module::{init_logging, init_store, run_axum_server};
use contactlist::shared::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {e:#}");
        e
    })?;
    info!(
        "Starting contactlist {} with {} store",
        env!("CARGO_PKG_VERSION"),
        config.store
    );

    let store = init_store(&config).await.map_err(|e| {
        error!("Failed to initialize store: {e:#}");
        e
    })?;
    let app_state = Arc::new(AppState::new(config, store));

    run_axum_server(app_state).await
}
