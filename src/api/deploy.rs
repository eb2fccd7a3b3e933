//! Deployment workflow API
//!
//! Contains the /deploy endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::env::constants::{DEFAULT_APP_PORT, DEFAULT_RUNTIME_VERSION};
use crate::domain::health::PollConfig;
use crate::domain::service::ServiceSpec;
use crate::infra::SshSession;
use crate::middleware::RequireApiKey;
use crate::services::deploy::{run_workflow, DeployOutcome};
use crate::state::AppState;

/// Deployment request.
#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    /// Path of the JAR on the agent host.
    pub local_jar_path: String,
    /// Service name; also names the remote directory and unit.
    pub app_name: String,
    /// Port the application listens on.
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    /// Java major version to ensure.
    #[serde(default = "default_runtime_version")]
    pub runtime_version: u32,
    /// Unit user; defaults to the connecting user.
    pub run_as_user: Option<String>,
    /// Overrides SSH_HOST for this invocation.
    pub target_host: Option<String>,
}

fn default_app_port() -> u16 {
    DEFAULT_APP_PORT
}

fn default_runtime_version() -> u32 {
    DEFAULT_RUNTIME_VERSION
}

/// Creates the deployment routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/deploy", post(deploy_app))
}

/// Deploys a JAR to the target host.
///
/// POST /deploy
/// Requires API key. Returns a status string describing success or the
/// first failure; every failure path closes the session first.
async fn deploy_app(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeployRequest>,
) -> String {
    if !ServiceSpec::is_valid_app_name(&request.app_name) {
        return format!("Invalid app name: {}", request.app_name);
    }

    let target = match state.config.ssh.target(request.target_host.as_deref()) {
        Ok(target) => target,
        Err(e) => return e.to_string(),
    };

    let run_as_user = request
        .run_as_user
        .clone()
        .unwrap_or_else(|| target.username.clone());
    let spec = ServiceSpec::new(
        &request.app_name,
        request.local_jar_path.as_str(),
        request.app_port,
        &run_as_user,
    );

    let mut session = match SshSession::open(&target).await {
        Ok(session) => session,
        Err(e) => return e.to_string(),
    };

    let result = run_workflow(
        &mut session,
        &spec,
        request.runtime_version,
        &PollConfig::default(),
    )
    .await;
    session.close().await;

    match result {
        Ok(DeployOutcome::Deployed) => {
            format!("Successfully deployed {} to {}", spec.app_name, target.host)
        }
        Ok(DeployOutcome::RuntimeInstallFailed) => "Failed to install the Java runtime.".to_string(),
        Ok(DeployOutcome::ServiceUnhealthy) => format!(
            "Deployment finished but {} never answered on port {}.",
            spec.app_name, spec.listen_port
        ),
        Err(e) => format!("Deployment error: {e}"),
    }
}
