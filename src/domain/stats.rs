//! Server statistics models and fixed-shape parsers
//!
//! The remote side pre-filters each metric through a text pipeline, so the
//! local parsers only ever see a small fixed-shape string. Every parse is
//! independent: a malformed metric leaves its field unset and never blocks
//! the others.

use serde::Serialize;

/// Flat metrics record; every field optional by design.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StatsRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_used_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_total_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_load_1min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_usage_percent: Option<String>,
}

impl StatsRecord {
    /// True when not a single metric could be collected.
    pub fn is_empty(&self) -> bool {
        self.memory_used_mb.is_none()
            && self.memory_total_mb.is_none()
            && self.memory_percent.is_none()
            && self.cpu_load_1min.is_none()
            && self.disk_usage_percent.is_none()
    }
}

/// Parses `used/total` megabytes as printed by the memory probe.
///
/// Returns (used, total, percent) with the percent rounded to one decimal.
pub fn parse_memory(raw: &str) -> Option<(u64, u64, f64)> {
    let (used, total) = raw.trim().split_once('/')?;
    let used: u64 = used.trim().parse().ok()?;
    let total: u64 = total.trim().parse().ok()?;
    if total == 0 {
        return None;
    }
    let percent = ((used as f64 / total as f64) * 1000.0).round() / 10.0;
    Some((used, total, percent))
}

/// Extracts the 1-minute load figure from the load-average tail.
pub fn parse_load(raw: &str) -> Option<String> {
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// Root filesystem usage as reported by the disk probe, e.g. `42%`.
pub fn parse_disk(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
