//! Remote host access models

/// Connection coordinates for one deployment target.
///
/// Immutable for the lifetime of a session.
#[derive(Clone, Debug)]
pub struct RemoteTarget {
    pub host: String,
    pub username: String,
    /// Path to the private key used for public-key authentication.
    pub key_path: String,
}

/// A command to run on the remote host, tagged with the privileges it needs.
///
/// Elevation policy lives in one place: the command runner prefixes the
/// elevation mechanism based on this flag, callers never do it themselves.
#[derive(Clone, Debug)]
pub struct CommandRequest {
    pub command: String,
    pub elevate: bool,
}

impl CommandRequest {
    /// A command executed as the connecting user.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            elevate: false,
        }
    }

    /// A command executed through the pre-authorized elevation mechanism.
    pub fn elevated(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            elevate: true,
        }
    }

    /// The shell line actually sent to the host.
    pub fn shell_line(&self) -> String {
        if self.elevate {
            format!("sudo {}", self.command)
        } else {
            self.command.clone()
        }
    }
}

/// Outcome of one remote command, immutable once produced.
#[derive(Clone, Debug)]
pub struct CommandResult {
    pub succeeded: bool,
    pub exit_code: u32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Builds a result from raw captured streams, trimming both.
    pub fn new(exit_code: u32, stdout: &str, stderr: &str) -> Self {
        Self {
            succeeded: exit_code == 0,
            exit_code,
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
        }
    }
}
