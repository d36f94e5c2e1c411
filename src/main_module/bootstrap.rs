//! Logging setup and store construction

use anyhow::Context;
use log::info;
use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::contact_list::{ContactListStore, MemoryStore, PgStore};
use crate::shared::utils::{create_conn, redact_database_url, run_migrations};

/// Initialize env_logger, honouring `RUST_LOG` when set.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Build the store selected by the configuration. For PostgreSQL this creates
/// the pool and applies pending migrations before the server starts.
pub async fn init_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ContactListStore>> {
    match config.store {
        StoreBackend::Memory => {
            info!("Using in-memory contact list store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database
                .url
                .clone()
                .context("DATABASE_URL is required for the postgres store")?;
            let max_connections = config.database.max_connections;
            info!(
                "Connecting to {} (pool size {max_connections})",
                redact_database_url(&url)
            );

            let pool = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
                let pool = create_conn(&url, max_connections)
                    .context("Failed to create database pool")?;
                run_migrations(&pool)?;
                Ok(pool)
            })
            .await
            .context("Database bootstrap task panicked")??;

            info!("Database ready");
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
