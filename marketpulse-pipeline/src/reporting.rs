//! HTTP reporting client for the events collector.
//!
//! A thin POST-with-bearer-token sender. The pipeline core treats any
//! transport error or non-2xx status as retryable; there is no in-process
//! retry here.

use crate::config::PipelineConfig;
use crate::error::DeliveryError;
use marketpulse_events::AggregatedPayload;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Sends aggregated payloads to the fixed events endpoint.
pub struct ReportingClient {
    client: Client,
    events_url: String,
    bearer_token: String,
}

impl ReportingClient {
    pub fn new(config: &PipelineConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            events_url: config.events_url(),
            bearer_token: config.bearer_token.clone(),
        }
    }

    /// Delivers one aggregated payload. `Err` means the attempt may be
    /// retried against unchanged buffers; duplicates from a lost 2xx are
    /// tolerated via the collector's id-based dedup.
    pub async fn send(&self, payload: &AggregatedPayload) -> Result<(), DeliveryError> {
        debug!(
            events = payload.event_count(),
            url = %self.events_url,
            "delivering aggregated payload"
        );

        let resp = self
            .client
            .post(&self.events_url)
            .bearer_auth(&self.bearer_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status(status.as_u16()))
        }
    }
}
