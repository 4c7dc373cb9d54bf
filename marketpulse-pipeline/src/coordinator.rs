//! Flush coordination: the shared flush flag and the buffer read side.
//!
//! The coordinator owns the only mutable shared state in the core: the
//! three buffer keys (through the store) and the flush-requested flag. The
//! flag is set by the first unflushed append and cleared only after a
//! delivery worker run confirms delivery, never at enqueue time, so a job
//! in flight always picks up the latest buffer state rather than a
//! snapshot taken at submission.

use crate::error::PipelineResult;
use crate::scheduler::{SubmitPolicy, TaskRunner};
use marketpulse_events::{
    AggregatedPayload, Click, EventKind, Impression, Purchase, FRAGMENT_SEPARATOR,
};
use marketpulse_store::BufferStore;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Unique name under which the delivery job is submitted to the task
/// runner. Bursts of flush requests collapse onto this one name.
pub const DELIVERY_JOB_NAME: &str = "marketpulse-delivery";

/// Deduplicates flush requests and exposes the read/aggregate/clear
/// operations the delivery job runs against.
pub struct FlushCoordinator {
    store: BufferStore,
    runner: Arc<dyn TaskRunner>,
    flush_requested: AtomicBool,
}

impl FlushCoordinator {
    pub fn new(store: BufferStore, runner: Arc<dyn TaskRunner>) -> Self {
        Self {
            store,
            runner,
            flush_requested: AtomicBool::new(false),
        }
    }

    /// Requests one flush. If a flush is already scheduled this is a
    /// no-op: the pending job reads buffer state at execution time, so the
    /// newly appended events ride along with it.
    ///
    /// The check-and-set is a single compare-exchange; there is no window
    /// in which two producers both observe "unset" and both submit.
    pub async fn request_flush(&self) -> PipelineResult<()> {
        if self
            .flush_requested
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        if let Err(e) = self
            .runner
            .submit_unique(DELIVERY_JOB_NAME, SubmitPolicy::ReplacePending)
            .await
        {
            self.flush_requested.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    /// Submits a delivery job regardless of the flag state, leaving the
    /// flag untouched. Used by the public `upload()` for app-lifecycle
    /// hooks ("going to background"); a no-op run against empty buffers
    /// must not leave a set flag behind to suppress future requests.
    pub async fn force_flush(&self) -> PipelineResult<()> {
        self.runner
            .submit_unique(DELIVERY_JOB_NAME, SubmitPolicy::ReplacePending)
            .await
    }

    /// Whether a flush is currently scheduled or in flight.
    pub fn is_flush_requested(&self) -> bool {
        self.flush_requested.load(Ordering::SeqCst)
    }

    /// Clears the flag. Called by the delivery worker strictly after
    /// delivery confirmation, in the same logical step as `clear()`.
    pub(crate) fn reset_flush_flag(&self) {
        self.flush_requested.store(false, Ordering::SeqCst);
    }

    /// Reads one kind's raw buffer with the trailing separator trimmed.
    pub fn read(&self, kind: EventKind) -> PipelineResult<Option<String>> {
        let raw = self.store.read(kind.buffer_key())?;
        Ok(raw.map(|value| value.trim_matches(FRAGMENT_SEPARATOR).to_string()))
    }

    /// Combines all three buffers into one payload. An absent buffer is an
    /// empty kind, not an error; a kind with nothing parseable is omitted
    /// from the payload.
    pub fn aggregate(&self) -> PipelineResult<AggregatedPayload> {
        Ok(AggregatedPayload {
            impressions: self.parse_kind::<Impression>(EventKind::Impression)?,
            clicks: self.parse_kind::<Click>(EventKind::Click)?,
            purchases: self.parse_kind::<Purchase>(EventKind::Purchase)?,
        })
    }

    /// Removes all three buffer keys. Each key is removed independently;
    /// no cross-key transaction is needed because clear only happens after
    /// confirmed delivery.
    pub fn clear(&self) -> PipelineResult<()> {
        for kind in EventKind::ALL {
            self.store.remove(kind.buffer_key())?;
        }
        Ok(())
    }

    /// Parses one kind's buffer: trim the trailing separator, wrap the
    /// fragments in an array delimiter, deserialize.
    ///
    /// A fragment that is valid JSON but not a valid event is skipped with
    /// a warning; a buffer whose concatenation no longer parses as a JSON
    /// array is skipped as a whole for that kind. One corrupt record never
    /// blocks delivery of the rest.
    fn parse_kind<T: DeserializeOwned>(&self, kind: EventKind) -> PipelineResult<Option<Vec<T>>> {
        let Some(raw) = self.store.read(kind.buffer_key())? else {
            return Ok(None);
        };

        let trimmed = raw.trim_matches(FRAGMENT_SEPARATOR);
        if trimmed.is_empty() {
            return Ok(None);
        }

        let wrapped = format!("[{trimmed}]");
        let values: Vec<serde_json::Value> = match serde_json::from_str(&wrapped) {
            Ok(values) => values,
            Err(e) => {
                warn!(%kind, "buffer no longer parses, dropping kind from payload: {e}");
                return Ok(None);
            }
        };

        let mut events = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<T>(value) {
                Ok(event) => events.push(event),
                Err(e) => warn!(%kind, "skipping unparseable fragment: {e}"),
            }
        }

        if events.is_empty() {
            Ok(None)
        } else {
            Ok(Some(events))
        }
    }
}
