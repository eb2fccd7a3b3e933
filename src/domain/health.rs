//! Health probe models

use std::time::Duration;

/// Attempt budget for the health poll loop.
///
/// The defaults encode the fixed linear schedule (12 probes, 5 seconds
/// apart, worst case one minute). Tests shrink the interval; the schedule
/// stays linear either way.
#[derive(Clone, Debug)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            interval: Duration::from_secs(5),
        }
    }
}

/// Result of one bounded polling run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthProbeOutcome {
    pub healthy: bool,
    pub attempts_used: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let config = PollConfig::default();
        assert_eq!(config.max_attempts, 12);
        assert_eq!(config.interval, Duration::from_secs(5));
    }
}
