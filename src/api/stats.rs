//! Server statistics API
//!
//! Contains the /stats endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::infra::SshSession;
use crate::services;
use crate::state::AppState;

/// Stats query parameters.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Overrides SSH_HOST for this invocation.
    pub target_host: Option<String>,
}

/// Creates the stats routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_server_stats))
}

/// Collects memory, load and disk usage from the target host.
///
/// GET /stats
/// No authentication (read-only diagnostics).
async fn get_server_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> String {
    let target = match state.config.ssh.target(query.target_host.as_deref()) {
        Ok(target) => target,
        Err(e) => return e.to_string(),
    };

    let mut session = match SshSession::open(&target).await {
        Ok(session) => session,
        Err(e) => return e.to_string(),
    };

    let record = services::stats::collect(&mut session).await;
    session.close().await;

    if record.is_empty() {
        return "Failed to retrieve stats.".to_string();
    }
    serde_json::to_string_pretty(&record)
        .unwrap_or_else(|e| format!("Failed to render stats: {e}"))
}
