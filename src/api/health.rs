//! Liveness and application health API
//!
//! Contains the /health and /apps/health endpoints

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::env::constants::VERSION;
use crate::domain::remote::CommandRequest;
use crate::infra::{CommandRunner, SshSession};
use crate::middleware::RequireApiKey;
use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    started_at: String,
    uptime: String,
}

/// Application health-check request.
#[derive(Debug, Deserialize)]
pub struct AppHealthRequest {
    pub app_port: u16,
    pub target_host: Option<String>,
}

/// Creates the health routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/apps/health", post(check_app_health))
}

/// Agent liveness.
///
/// GET /health
/// No authentication.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds();
    let uptime = format!(
        "{}d {}h {}m {}s",
        uptime_secs / 86400,
        (uptime_secs % 86400) / 3600,
        (uptime_secs % 3600) / 60,
        uptime_secs % 60
    );

    Json(HealthResponse {
        status: "ok",
        service: "jar-deploy-agent",
        version: VERSION,
        started_at: state.started_at.to_rfc3339(),
        uptime,
    })
}

/// Probes a deployed application's port from inside the target host.
///
/// POST /apps/health
/// Requires API key.
async fn check_app_health(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AppHealthRequest>,
) -> String {
    let target = match state.config.ssh.target(request.target_host.as_deref()) {
        Ok(target) => target,
        Err(e) => return e.to_string(),
    };

    let mut session = match SshSession::open(&target).await {
        Ok(session) => session,
        Err(e) => return e.to_string(),
    };

    let probe = format!(
        "curl -s -o /dev/null -w '%{{http_code}}' localhost:{}",
        request.app_port
    );
    let result = CommandRunner::run(&mut session, CommandRequest::new(probe)).await;
    session.close().await;

    match result {
        Ok(code) if code == "200" => "Healthy (HTTP 200)".to_string(),
        Ok(code) => format!("Unhealthy. HTTP Status: {code}"),
        Err(e) => format!("Health check error: {e}"),
    }
}
