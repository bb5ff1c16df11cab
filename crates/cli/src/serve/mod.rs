//! `duel-sim serve` -- HTTP JSON API for simulation records.
//!
//! Runs on `axum` + `tokio`. Every request is independent: one validation
//! and hash, then one INSERT or one SELECT against the store.
//!
//! Endpoints:
//! - POST /api/simulations          - Validate, hash and store a simulation
//! - GET  /api/simulations?id=<id>  - Fetch one stored simulation
//!
//! Any other path is a plain-text 404; any other method on
//! `/api/simulations` is a plain-text 405. Every response, errors included,
//! carries the CORS headers added by [`middleware::cors_middleware`].

mod config;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{middleware as axum_middleware, Json, Router};
use duel_storage::SqliteSimulationStore;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use self::handlers::{handle_not_found, route_simulation};
use self::middleware::{cors_middleware, handle_panic};
use self::state::AppState;

pub(crate) use self::config::ServeConfig;

/// Maximum request body size: 10 MB.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// The only routed path.
const SIMULATIONS_PATH: &str = "/api/simulations";

/// Construct a `{"message": ...}` JSON response with the given status code.
fn json_message(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "message": message }))).into_response()
}

/// Build the application router over the given state.
///
/// Layer order, outermost first: request tracing, CORS, body limit, panic
/// recovery. CORS sits outside panic recovery so recovered 500s are
/// decorated too.
pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(SIMULATIONS_PATH, any(route_simulation))
        .fallback(handle_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect the store and serve until Ctrl+C.
pub(crate) async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteSimulationStore::connect(&config.database_url).await?;
    tracing::info!(database_url = %config.database_url, "simulation store ready");
    tracing::info!(origins = ?config.allowed_origins, "CORS allow-list");

    let state = Arc::new(AppState::new(
        Arc::new(store),
        config.allowed_origins.clone(),
    ));
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("simulations API listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("received shutdown signal");
}
