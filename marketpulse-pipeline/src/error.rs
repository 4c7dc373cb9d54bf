//! Pipeline error types.

use marketpulse_events::EventError;
use marketpulse_store::StoreError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors surfaced through the public store/upload API.
///
/// Delivery failures are not here: they are only visible to the delivery
/// worker, which reports them through its retry/success outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid event: {0}")]
    Validation(#[from] EventError),

    #[error("buffer store error: {0}")]
    Storage(#[from] StoreError),

    #[error("task runner unavailable: {0}")]
    Scheduler(String),
}

/// A failed delivery attempt. Every variant is retryable; the external
/// task runner owns the retry/backoff policy.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("collector returned status {0}")]
    Status(u16),
}
