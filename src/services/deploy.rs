//! Artifact deployment
//!
//! Uploads the application JAR, registers it as a systemd unit and
//! (re)activates the service. The sequence is deliberately
//! non-transactional: provisioning steps are best-effort and logged, and
//! only the artifact upload aborts the remainder — without the artifact
//! there is nothing to register.

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::health::PollConfig;
use crate::domain::remote::CommandRequest;
use crate::domain::service::ServiceSpec;
use crate::error::AgentError;
use crate::infra::{CommandRunner, RemoteHost};
use crate::services::{health, runtime};

/// Terminal state of one deployment workflow run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Artifact live, service registered, port answering.
    Deployed,
    /// The runtime could not be installed; nothing was deployed.
    RuntimeInstallFailed,
    /// Everything was provisioned but the port never answered.
    ServiceUnhealthy,
}

/// Runs the full workflow for one invocation: runtime check/install,
/// artifact deployment, bounded health poll. Short-circuits when the
/// runtime stage fails.
pub async fn run_workflow(
    host: &mut dyn RemoteHost,
    spec: &ServiceSpec,
    runtime_version: u32,
    poll_config: &PollConfig,
) -> Result<DeployOutcome, AgentError> {
    if !runtime::ensure_runtime(host, runtime_version).await? {
        return Ok(DeployOutcome::RuntimeInstallFailed);
    }

    if deploy(host, spec, poll_config).await? {
        Ok(DeployOutcome::Deployed)
    } else {
        Ok(DeployOutcome::ServiceUnhealthy)
    }
}

/// Transfers the artifact, writes the unit file and restarts the service.
///
/// Returns the health poller's verdict. Only transport-level errors and
/// the artifact upload propagate as `Err`.
pub async fn deploy(
    host: &mut dyn RemoteHost,
    spec: &ServiceSpec,
    poll_config: &PollConfig,
) -> Result<bool, AgentError> {
    let task_id = Uuid::new_v4();
    info!(task_id = %task_id, app = %spec.app_name, "Starting deployment");

    // Application directory, owned by the connecting user so the upload
    // below does not need elevation.
    best_effort(
        host,
        CommandRequest::elevated(format!("mkdir -p {}", spec.remote_directory)),
    )
    .await;
    best_effort(
        host,
        CommandRequest::elevated(format!(
            "chown {user}:{user} {dir}",
            user = spec.run_as_user,
            dir = spec.remote_directory
        )),
    )
    .await;

    info!(
        task_id = %task_id,
        from = %spec.local_artifact_path.display(),
        to = %spec.remote_artifact_path,
        "Uploading artifact"
    );
    host.transfer(&spec.local_artifact_path, &spec.remote_artifact_path)
        .await?;

    // The connecting user cannot write into /etc/systemd/system directly:
    // stage the unit in /tmp, then move it with elevation.
    info!(task_id = %task_id, unit = %spec.unit_file_path, "Registering service unit");
    let escaped_unit = spec.unit_file().replace('\n', "\\n");
    best_effort(
        host,
        CommandRequest::new(format!(
            "echo -e '{}' > {}",
            escaped_unit,
            spec.staging_unit_path()
        )),
    )
    .await;
    best_effort(
        host,
        CommandRequest::elevated(format!(
            "mv {} {}",
            spec.staging_unit_path(),
            spec.unit_file_path
        )),
    )
    .await;

    best_effort(host, CommandRequest::elevated("systemctl daemon-reload")).await;
    best_effort(
        host,
        CommandRequest::elevated(format!("systemctl restart {}", spec.app_name)),
    )
    .await;
    best_effort(
        host,
        CommandRequest::elevated(format!("systemctl enable {}", spec.app_name)),
    )
    .await;

    info!(task_id = %task_id, port = spec.listen_port, "Waiting for service to come up");
    let outcome = health::poll(host, spec.listen_port, poll_config).await;
    Ok(outcome.healthy)
}

/// Runs one provisioning step whose failure is recorded but never aborts
/// the remaining steps.
async fn best_effort(host: &mut dyn RemoteHost, request: CommandRequest) {
    if let Err(e) = CommandRunner::run(host, request).await {
        warn!(error = %e, "Best-effort step failed, continuing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::{failed, ok, ScriptedHost};
    use std::time::Duration;

    const JAVA_17_BANNER: &str = "openjdk version \"17.0.9\" 2023-10-17";

    fn fast_poll() -> PollConfig {
        PollConfig {
            max_attempts: 5,
            interval: Duration::from_millis(1),
        }
    }

    fn spec() -> ServiceSpec {
        ServiceSpec::new("svc", "/tmp/svc.jar", 8080, "deploy")
    }

    #[tokio::test]
    async fn test_workflow_end_to_end_with_slow_service() {
        // Runtime already present; health answers on the third probe.
        let mut host = ScriptedHost::new()
            .on("java -version", ok(JAVA_17_BANNER))
            .on("curl", failed(7, ""))
            .on("curl", failed(7, ""))
            .on("curl", ok(""));

        let outcome = run_workflow(&mut host, &spec(), 17, &fast_poll())
            .await
            .unwrap();

        assert_eq!(outcome, DeployOutcome::Deployed);
        assert_eq!(host.count_containing("apt-get"), 0);
        assert_eq!(host.count_containing("sudo systemctl"), 3);
        assert_eq!(host.count_containing("curl -s localhost:8080"), 3);
        assert_eq!(
            host.transfers,
            vec![("/tmp/svc.jar".into(), "/opt/svc/svc.jar".to_string())]
        );
    }

    #[tokio::test]
    async fn test_transfer_failure_propagates_and_stops_registration() {
        let mut host = ScriptedHost::new().with_failing_transfer();

        let err = deploy(&mut host, &spec(), &fast_poll()).await.unwrap_err();
        assert!(matches!(err, AgentError::Transfer(_)));
        // Directory preparation ran, nothing after the upload did.
        assert_eq!(host.count_containing("mkdir -p /opt/svc"), 1);
        assert_eq!(host.count_containing("systemctl"), 0);
        assert_eq!(host.count_containing("curl"), 0);
    }

    #[tokio::test]
    async fn test_failed_directory_prep_does_not_stop_deploy() {
        let mut host = ScriptedHost::new()
            .on("mkdir", failed(1, "read-only filesystem"))
            .on("curl", ok(""));

        let healthy = deploy(&mut host, &spec(), &fast_poll()).await.unwrap();
        assert!(healthy);
        assert_eq!(host.transfers.len(), 1);
    }

    #[tokio::test]
    async fn test_unhealthy_service_reports_false() {
        let mut host = ScriptedHost::new().on("curl", failed(7, ""));

        let healthy = deploy(
            &mut host,
            &spec(),
            &PollConfig {
                max_attempts: 2,
                interval: Duration::from_millis(1),
            },
        )
        .await
        .unwrap();
        assert!(!healthy);
    }

    #[tokio::test]
    async fn test_workflow_short_circuits_on_runtime_failure() {
        let mut host = ScriptedHost::new()
            .on("java -version", failed(127, ""))
            .on("apt-get install", failed(100, "no candidate"));

        let outcome = run_workflow(&mut host, &spec(), 17, &fast_poll())
            .await
            .unwrap();

        assert_eq!(outcome, DeployOutcome::RuntimeInstallFailed);
        assert!(host.transfers.is_empty());
        assert_eq!(host.count_containing("systemctl"), 0);
    }

    #[tokio::test]
    async fn test_unit_file_reaches_systemd_via_staging_path() {
        let mut host = ScriptedHost::new().on("curl", ok(""));

        deploy(&mut host, &spec(), &fast_poll()).await.unwrap();

        let echo = host
            .commands
            .iter()
            .find(|c| c.starts_with("echo -e"))
            .expect("unit staging command missing");
        assert!(echo.contains("SuccessExitStatus=143"));
        assert!(echo.ends_with("> /tmp/svc.service"));
        assert!(!echo.starts_with("sudo"));

        assert_eq!(
            host.count_containing("sudo mv /tmp/svc.service /etc/systemd/system/svc.service"),
            1
        );
    }
}
