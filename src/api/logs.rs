//! Log analysis API
//!
//! Contains the /logs/analyze endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::env::constants::{DEFAULT_LOG_LINES, DEFAULT_LOG_PATH};
use crate::infra::SshSession;
use crate::middleware::RequireApiKey;
use crate::services;
use crate::state::AppState;

/// Log analysis request.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_lines")]
    pub lines: u32,
    /// Overrides SSH_HOST for this invocation.
    pub target_host: Option<String>,
}

fn default_log_path() -> String {
    DEFAULT_LOG_PATH.to_string()
}

fn default_lines() -> u32 {
    DEFAULT_LOG_LINES
}

/// Creates the log analysis routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/logs/analyze", post(analyze_logs))
}

/// Fetches recent log lines from the target host and returns the analysis
/// service's health verdict.
///
/// POST /logs/analyze
/// Requires API key.
async fn analyze_logs(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> String {
    let Some(analyzer) = state.analyzer.as_ref() else {
        return "Missing analyzer configuration. Set ANALYZER_API_KEY.".to_string();
    };

    let target = match state.config.ssh.target(request.target_host.as_deref()) {
        Ok(target) => target,
        Err(e) => return e.to_string(),
    };

    let mut session = match SshSession::open(&target).await {
        Ok(session) => session,
        Err(e) => return e.to_string(),
    };

    let logs = services::logs::fetch_logs(&mut session, &request.log_path, request.lines).await;
    session.close().await;

    let logs = match logs {
        Ok(logs) => logs,
        Err(e) => return format!("Log fetch error: {e}"),
    };
    if logs.is_empty() {
        return format!("{} is empty; nothing to analyze.", request.log_path);
    }

    match analyzer.analyze(&logs).await {
        Ok(report) => report,
        Err(e) => e.to_string(),
    }
}
