//! Remote command execution chokepoint
//!
//! Every component talks to the host through `CommandRunner::run`; the
//! deployer's artifact upload is the single direct-transfer exception.
//! Elevation is applied here and nowhere else.

use tracing::{debug, warn};

use crate::domain::remote::CommandRequest;
use crate::error::AgentError;
use crate::infra::ssh::RemoteHost;

/// Command executor with uniform result shaping.
pub struct CommandRunner;

impl CommandRunner {
    /// Runs one capability-tagged command on the host.
    ///
    /// Exit 0 returns the trimmed stdout; a nonzero exit becomes
    /// `CommandFailed` carrying the exit code and stderr (with a generic
    /// message when stderr was empty). Elevation is pre-authorized on the
    /// target, so a failed elevation is just another nonzero exit.
    pub async fn run(
        host: &mut dyn RemoteHost,
        request: CommandRequest,
    ) -> Result<String, AgentError> {
        let line = request.shell_line();
        debug!(command = %line, "Exec");

        let result = host.execute(&line).await?;
        if result.succeeded {
            return Ok(result.stdout);
        }

        let stderr = if result.stderr.is_empty() {
            format!("command exited with status {}", result.exit_code)
        } else {
            result.stderr
        };
        warn!(command = %line, code = result.exit_code, error = %stderr, "Remote command failed");
        Err(AgentError::CommandFailed {
            code: result.exit_code,
            stderr,
        })
    }
}
