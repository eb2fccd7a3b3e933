//! API module
//!
//! HTTP handlers and route assembly. Workflow endpoints return a short
//! human-readable status string; structured bodies are reserved for the
//! agent's own liveness endpoint.

pub mod database;
pub mod deploy;
pub mod health;
pub mod logs;
pub mod stats;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Builds the complete API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness & application health
        .merge(health::router())
        // Deployment workflow
        .merge(deploy::router())
        // Server statistics
        .merge(stats::router())
        // Database seeding
        .merge(database::router())
        // Log analysis
        .merge(logs::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
