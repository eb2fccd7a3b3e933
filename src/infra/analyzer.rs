//! Text-analysis HTTP client
//!
//! Wraps the external `generateContent` endpoint used for log triage,
//! reusing one pooled client per agent process.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AgentError;

/// Fixed triage instruction sent ahead of the raw log text.
const TRIAGE_PROMPT: &str = "\
You are a senior DevOps engineer. Analyze the following server logs.

Your goal is to:
1. Identify any \"ERROR\", \"CRITICAL\" or \"Exception\" entries.
2. Ignore routine INFO/DEBUG noise.
3. If a problem is found, explain the root cause in plain terms.
4. Suggest a concrete fix for each problem.

Return the output in this format:
- **Status**: [CRITICAL / WARNING / HEALTHY]
- **Found Issues**: [List of issues or \"None\"]
- **Analysis**: [Detailed explanation]
- **Recommended Action**: [Actionable steps]";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Client for the external text-analysis service.
#[derive(Clone)]
pub struct LogAnalyzer {
    client: Client,
    api_key: String,
    model: String,
}

impl LogAnalyzer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(2)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// The full prompt for one batch of log text.
    pub fn build_prompt(log_data: &str) -> String {
        format!("{TRIAGE_PROMPT}\n\nLOG DATA:\n{log_data}")
    }

    /// Submits log text and returns the service's free-text report.
    pub async fn analyze(&self, log_data: &str) -> Result<String, AgentError> {
        info!(model = %self.model, bytes = log_data.len(), "Submitting logs for analysis");

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::build_prompt(log_data),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Analyzer(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AgentError::Analyzer(format!(
                "analysis service returned HTTP {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Analyzer(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AgentError::Analyzer("analysis service returned no report".to_string()))
    }
}
