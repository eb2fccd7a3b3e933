//! Deployed service models

use std::path::PathBuf;

/// Everything needed to install one application as a managed service.
///
/// All remote paths are derived from the application name at construction;
/// nothing here mutates afterwards.
#[derive(Clone, Debug)]
pub struct ServiceSpec {
    pub app_name: String,
    pub local_artifact_path: PathBuf,
    pub remote_directory: String,
    pub remote_artifact_path: String,
    pub unit_file_path: String,
    pub listen_port: u16,
    pub run_as_user: String,
}

impl ServiceSpec {
    pub fn new(
        app_name: &str,
        local_artifact_path: impl Into<PathBuf>,
        listen_port: u16,
        run_as_user: &str,
    ) -> Self {
        let remote_directory = format!("/opt/{app_name}");
        Self {
            app_name: app_name.to_string(),
            local_artifact_path: local_artifact_path.into(),
            remote_artifact_path: format!("{remote_directory}/{app_name}.jar"),
            unit_file_path: format!("/etc/systemd/system/{app_name}.service"),
            remote_directory,
            listen_port,
            run_as_user: run_as_user.to_string(),
        }
    }

    /// Unprivileged path the unit file is staged at before the elevated move.
    pub fn staging_unit_path(&self) -> String {
        format!("/tmp/{}.service", self.app_name)
    }

    /// Renders the systemd unit descriptor.
    ///
    /// The output is deterministic down to the byte: field order, the
    /// `SuccessExitStatus=143` clean-shutdown marker (SIGTERM) and the
    /// 10-second restart backoff are part of the contract with hosts that
    /// already run units written by this agent.
    pub fn unit_file(&self) -> String {
        format!(
            "[Unit]\n\
             Description={app} Service\n\
             After=network.target\n\
             \n\
             [Service]\n\
             User={user}\n\
             ExecStart=/usr/bin/java -jar {jar}\n\
             SuccessExitStatus=143\n\
             Restart=on-failure\n\
             RestartSec=10\n\
             \n\
             [Install]\n\
             WantedBy=multi-user.target\n",
            app = self.app_name,
            user = self.run_as_user,
            jar = self.remote_artifact_path,
        )
    }

    /// Application names end up in shell lines and unit paths; keep them to
    /// the character set systemd itself accepts for unit names.
    pub fn is_valid_app_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}
