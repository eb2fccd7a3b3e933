//! Bounded health polling

use tracing::{debug, info, warn};

use crate::domain::health::{HealthProbeOutcome, PollConfig};
use crate::domain::remote::CommandRequest;
use crate::infra::{CommandRunner, RemoteHost};

/// Polls a loopback port on the remote host until it answers or the
/// attempt budget runs out.
///
/// Fixed linear schedule: sleep one interval, probe, repeat. The first
/// successful probe returns immediately; there is no cancellation hook
/// beyond the budget itself. Probe errors of any kind count as failed
/// attempts.
pub async fn poll(host: &mut dyn RemoteHost, port: u16, config: &PollConfig) -> HealthProbeOutcome {
    let probe = format!("curl -s localhost:{port} > /dev/null");

    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.interval).await;

        match CommandRunner::run(host, CommandRequest::new(probe.clone())).await {
            Ok(_) => {
                info!(port, attempt, "Service is up");
                return HealthProbeOutcome {
                    healthy: true,
                    attempts_used: attempt,
                };
            }
            Err(e) => debug!(port, attempt, error = %e, "Port not answering yet"),
        }
    }

    warn!(port, attempts = config.max_attempts, "Service never became healthy");
    HealthProbeOutcome {
        healthy: false,
        attempts_used: config.max_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::{failed, ok, ScriptedHost};
    use std::time::Duration;

    fn fast(max_attempts: u32) -> PollConfig {
        PollConfig {
            max_attempts,
            interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_exhausts_budget_when_port_never_answers() {
        let mut host = ScriptedHost::new().on("curl", failed(7, "connection refused"));

        let outcome = poll(&mut host, 8080, &fast(3)).await;
        assert!(!outcome.healthy);
        assert_eq!(outcome.attempts_used, 3);
        assert_eq!(host.count_containing("curl -s localhost:8080"), 3);
    }

    #[tokio::test]
    async fn test_returns_on_first_success() {
        let mut host = ScriptedHost::new()
            .on("curl", failed(7, "connection refused"))
            .on("curl", ok(""));

        let outcome = poll(&mut host, 8080, &fast(3)).await;
        assert!(outcome.healthy);
        assert_eq!(outcome.attempts_used, 2);
        assert_eq!(host.count_containing("curl"), 2);
    }

    #[tokio::test]
    async fn test_probe_is_not_elevated() {
        let mut host = ScriptedHost::new();

        poll(&mut host, 9000, &fast(1)).await;
        assert_eq!(host.count_containing("sudo"), 0);
    }
}
