//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the event pipeline and its reporting client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base URL for the MarketPulse API (e.g., "https://api.marketpulse.io/v2").
    pub api_base_url: String,

    /// Bearer token identifying the marketplace.
    pub bearer_token: String,

    /// Network timeout for a delivery attempt, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.marketpulse.io/v2".to_string(),
            bearer_token: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    /// The fixed events endpoint all aggregated payloads are POSTed to.
    pub fn events_url(&self) -> String {
        format!("{}/events", self.api_base_url.trim_end_matches('/'))
    }
}
