//! HTTP server initialization and routing

use axum::{routing::get, Router};
use log::{error, info};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::contact_list::{contact_list_routes, list_owners_handler, upsert_owner_handler};
use crate::shared::state::AppState;

use super::{api_running, health_check, health_check_simple, shutdown_signal};

pub const API_BASE_PATH: &str = "/api/contactList";

pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api_running))
        .route("/health", get(health_check))
        .route("/healthz", get(health_check_simple))
        .nest(API_BASE_PATH, contact_list_routes())
        // Nesting only answers the bare prefix; clients also call it with a
        // trailing slash.
        .route(
            &format!("{API_BASE_PATH}/"),
            get(list_owners_handler).post(upsert_owner_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run_axum_server(app_state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = app_state.config.server.socket_addr()?;
    let app = build_router(app_state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(
                "Failed to bind to {}: {} - is another instance running?",
                addr, e
            );
            return Err(e.into());
        }
    };
    info!("Server started on port {}", addr.port());

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
