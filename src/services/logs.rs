//! Remote log retrieval

use tracing::info;

use crate::domain::remote::CommandRequest;
use crate::error::AgentError;
use crate::infra::{CommandRunner, RemoteHost};

/// Fetches the last `lines` lines of a remote file.
///
/// Plain unelevated `tail`; the agent reads logs with the privileges of
/// the connecting user.
pub async fn fetch_logs(
    host: &mut dyn RemoteHost,
    log_path: &str,
    lines: u32,
) -> Result<String, AgentError> {
    info!(path = %log_path, lines, "Fetching remote logs");
    CommandRunner::run(host, CommandRequest::new(format!("tail -n {lines} {log_path}"))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::{ok, ScriptedHost};

    #[tokio::test]
    async fn test_fetch_uses_plain_tail() {
        let mut host = ScriptedHost::new().on("tail", ok("line a\nline b"));

        let logs = fetch_logs(&mut host, "/var/log/syslog", 200).await.unwrap();
        assert_eq!(logs, "line a\nline b");
        assert_eq!(host.commands, vec!["tail -n 200 /var/log/syslog".to_string()]);
    }
}
