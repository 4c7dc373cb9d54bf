//! The delivery worker — the unit of retryable work.

use crate::coordinator::FlushCoordinator;
use crate::reporting::ReportingClient;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Terminal outcome of one worker invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Delivered (or nothing to deliver). The job is done.
    Success,
    /// Delivery failed; buffers and flag are untouched. The task runner
    /// schedules the retry under its own backoff policy.
    Retry,
}

/// Aggregates the buffers, sends the payload, and drains on success.
///
/// Re-running the worker against unchanged buffers produces the same
/// aggregated payload and the same outcome, so the host may cancel,
/// reschedule, or re-execute it freely.
pub struct DeliveryWorker {
    coordinator: Arc<FlushCoordinator>,
    /// `None` when the host never configured a collector (e.g. a test
    /// harness without infrastructure). Such runs take the success path
    /// and drain locally.
    reporting: Option<Arc<ReportingClient>>,
}

impl DeliveryWorker {
    pub fn new(coordinator: Arc<FlushCoordinator>, reporting: Option<Arc<ReportingClient>>) -> Self {
        Self {
            coordinator,
            reporting,
        }
    }

    /// Runs one delivery attempt.
    pub async fn run(&self) -> DeliveryOutcome {
        let payload = match self.coordinator.aggregate() {
            Ok(payload) => payload,
            Err(e) => {
                error!("failed to aggregate buffers: {e}");
                return DeliveryOutcome::Retry;
            }
        };

        if payload.is_empty() {
            debug!("nothing buffered, delivery is a no-op");
            return DeliveryOutcome::Success;
        }

        let Some(reporting) = &self.reporting else {
            warn!(
                events = payload.event_count(),
                "no reporting collaborator configured, draining buffers locally"
            );
            return self.drain();
        };

        match reporting.send(&payload).await {
            Ok(()) => {
                info!(events = payload.event_count(), "payload delivered");
                self.drain()
            }
            Err(e) => {
                // No mutation: the retry sees the same or a larger payload.
                warn!("delivery failed, leaving buffers intact: {e}");
                DeliveryOutcome::Retry
            }
        }
    }

    /// The confirmed-delivery step: clear the buffers, then reset the
    /// flush flag so the next append can schedule a new job.
    fn drain(&self) -> DeliveryOutcome {
        if let Err(e) = self.coordinator.clear() {
            error!("failed to clear buffers after delivery: {e}");
            return DeliveryOutcome::Retry;
        }
        self.coordinator.reset_flush_flag();
        DeliveryOutcome::Success
    }
}
