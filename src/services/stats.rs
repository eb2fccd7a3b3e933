//! Remote server statistics

use tracing::debug;

use crate::domain::remote::CommandRequest;
use crate::domain::stats::{parse_disk, parse_load, parse_memory, StatsRecord};
use crate::infra::{CommandRunner, RemoteHost};

/// Remote pipelines that reduce each metric to one fixed-shape line.
const MEMORY_PROBE: &str = "free -m | grep Mem | awk '{print $3 \"/\" $2}'";
const LOAD_PROBE: &str = "uptime | awk -F'load average:' '{ print $2 }'";
const DISK_PROBE: &str = "df -h / | awk 'NR==2 {print $5}'";

/// Collects memory, load and disk usage from the host.
///
/// The three probes are independent; a failed command or unparseable
/// output costs that one metric and nothing else. Callers inspect
/// `StatsRecord::is_empty` to tell "host unreachable" from "partial data".
pub async fn collect(host: &mut dyn RemoteHost) -> StatsRecord {
    let mut record = StatsRecord::default();

    match CommandRunner::run(host, CommandRequest::new(MEMORY_PROBE)).await {
        Ok(out) => match parse_memory(&out) {
            Some((used, total, percent)) => {
                record.memory_used_mb = Some(used);
                record.memory_total_mb = Some(total);
                record.memory_percent = Some(percent);
            }
            None => debug!(output = %out, "Unparseable memory summary"),
        },
        Err(e) => debug!(error = %e, "Memory probe failed"),
    }

    match CommandRunner::run(host, CommandRequest::new(LOAD_PROBE)).await {
        Ok(out) => match parse_load(&out) {
            Some(load) => record.cpu_load_1min = Some(load),
            None => debug!(output = %out, "Unparseable load summary"),
        },
        Err(e) => debug!(error = %e, "Load probe failed"),
    }

    match CommandRunner::run(host, CommandRequest::new(DISK_PROBE)).await {
        Ok(out) => match parse_disk(&out) {
            Some(disk) => record.disk_usage_percent = Some(disk),
            None => debug!(output = %out, "Unparseable disk summary"),
        },
        Err(e) => debug!(error = %e, "Disk probe failed"),
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::{failed, ok, ScriptedHost};

    #[tokio::test]
    async fn test_collects_all_metrics() {
        let mut host = ScriptedHost::new()
            .on("free -m", ok("1843/7976"))
            .on("uptime", ok(" 0.52, 0.58, 0.59"))
            .on("df -h", ok("42%"));

        let record = collect(&mut host).await;
        assert_eq!(record.memory_used_mb, Some(1843));
        assert_eq!(record.memory_total_mb, Some(7976));
        assert_eq!(record.memory_percent, Some(23.1));
        assert_eq!(record.cpu_load_1min.as_deref(), Some("0.52"));
        assert_eq!(record.disk_usage_percent.as_deref(), Some("42%"));
    }

    #[tokio::test]
    async fn test_malformed_memory_leaves_other_metrics_intact() {
        let mut host = ScriptedHost::new()
            .on("free -m", ok("not numbers at all"))
            .on("uptime", ok(" 1.00, 0.90, 0.80"))
            .on("df -h", ok("87%"));

        let record = collect(&mut host).await;
        assert!(record.memory_used_mb.is_none());
        assert!(record.memory_percent.is_none());
        assert_eq!(record.cpu_load_1min.as_deref(), Some("1.00"));
        assert_eq!(record.disk_usage_percent.as_deref(), Some("87%"));
    }

    #[tokio::test]
    async fn test_failed_probes_never_error() {
        let mut host = ScriptedHost::new()
            .on("free -m", failed(1, "free: command not found"))
            .on("uptime", ok(""))
            .on("df -h", failed(1, ""));

        let record = collect(&mut host).await;
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn test_probes_run_unelevated() {
        let mut host = ScriptedHost::new();

        collect(&mut host).await;
        assert_eq!(host.commands.len(), 3);
        assert_eq!(host.count_containing("sudo"), 0);
    }
}
