//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::store::BankStore;

pub use routes::{create_router, AppState};

/// Build the full application: API routes, health check and middleware
pub fn build_app<S: BankStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(create_router::<S>())
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
