// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardController;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_gateway::HttpScoringGateway;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_asset, get_dashboard, health_check, list_assets, remove_asset, scoring_state,
    trigger_scoring, update_efficiency, update_env, update_id, update_type,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create gateway (infrastructure layer)
    let gateway = Arc::new(HttpScoringGateway::new(&config.gateway)?);

    // Create controller (application layer), seeded with the default assets
    let state = Arc::new(AppState {
        controller: DashboardController::new(gateway),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/assets", get(list_assets).post(add_asset))
        .route("/assets/:index", delete(remove_asset))
        .route("/assets/:index/id", put(update_id))
        .route("/assets/:index/type", put(update_type))
        .route("/assets/:index/efficiency", put(update_efficiency))
        .route("/assets/:index/env", put(update_env))
        .route("/scoring/:operation", post(trigger_scoring).get(scoring_state))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!(
        "Starting asset-maintenance-dashboard on {} (scoring at {})",
        listener.local_addr()?,
        config.gateway.base_url
    );

    axum::serve(listener, router).await?;

    Ok(())
}
