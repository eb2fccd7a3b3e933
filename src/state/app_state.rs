//! Application state

use chrono::{DateTime, Utc};

use crate::config::EnvConfig;
use crate::infra::LogAnalyzer;

/// State shared by every handler.
///
/// Sessions are deliberately not held here: each workflow invocation opens
/// and closes its own, so two requests never share a connection.
pub struct AppState {
    /// API key requests are checked against.
    pub api_key: String,
    /// Environment configuration.
    pub config: EnvConfig,
    /// Text-analysis client, present when a key is configured.
    pub analyzer: Option<LogAnalyzer>,
    /// Agent start time.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        let analyzer = config
            .analyzer
            .api_key
            .as_ref()
            .map(|key| LogAnalyzer::new(key, &config.analyzer.model));

        Self {
            api_key: config.api_key.clone(),
            config,
            analyzer,
            started_at: Utc::now(),
        }
    }
}
