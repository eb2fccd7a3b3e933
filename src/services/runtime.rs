//! Java runtime provisioning

use tracing::{info, warn};

use crate::domain::remote::CommandRequest;
use crate::error::AgentError;
use crate::infra::{CommandRunner, RemoteHost};

/// Ensures an OpenJDK of the requested major version is installed.
///
/// The probe pipes stderr into stdout because the JVM prints its version
/// banner there. The containment check is substring-based: requesting
/// version `1` also matches an installed `11`. That looseness is part of
/// the observed behavior and is kept on purpose (see the version test
/// below); callers pass full major versions in practice.
///
/// Already satisfied means zero mutating commands. Otherwise the package
/// index is refreshed best-effort and the versioned package installed; the
/// install's outcome is the answer. There is no rollback on partial
/// failure.
pub async fn ensure_runtime(host: &mut dyn RemoteHost, version: u32) -> Result<bool, AgentError> {
    info!(version, "Checking for Java runtime");

    let needle = format!("version \"{version}");
    match CommandRunner::run(host, CommandRequest::new("java -version 2>&1")).await {
        Ok(out) if out.contains(&needle) => {
            info!(version, "Runtime already installed");
            return Ok(true);
        }
        Ok(_) => info!(version, "Different runtime installed, replacing"),
        Err(AgentError::CommandFailed { .. }) => info!("No Java runtime found"),
        Err(e) => return Err(e),
    }

    info!(version, "Installing OpenJDK");
    if let Err(e) = CommandRunner::run(host, CommandRequest::elevated("apt-get update")).await {
        warn!(error = %e, "Package index refresh failed, attempting install anyway");
    }

    let install = format!("apt-get install -y openjdk-{version}-jdk");
    match CommandRunner::run(host, CommandRequest::elevated(install)).await {
        Ok(_) => {
            info!(version, "Runtime installed");
            Ok(true)
        }
        Err(AgentError::CommandFailed { code, stderr }) => {
            warn!(code, error = %stderr, "Runtime install failed");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
