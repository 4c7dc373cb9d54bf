//! The event pipeline service — the surface the reporting facade calls.

use crate::config::PipelineConfig;
use crate::coordinator::FlushCoordinator;
use crate::error::PipelineResult;
use crate::reporting::ReportingClient;
use crate::scheduler::TokioTaskRunner;
use crate::worker::DeliveryWorker;
use marketpulse_events::{
    AggregatedPayload, Click, EventBatch, EventKind, Impression, Purchase,
};
use marketpulse_store::BufferStore;
use std::sync::Arc;
use tracing::debug;

/// Accepts events from concurrent producers and appends them to the
/// durable per-kind buffers.
///
/// One instance per process, constructed by [`create_pipeline`] (or wired
/// by hand around a custom [`TaskRunner`](crate::TaskRunner)) and passed
/// by handle.
pub struct EventPipeline {
    store: BufferStore,
    coordinator: Arc<FlushCoordinator>,
}

impl EventPipeline {
    pub fn new(store: BufferStore, coordinator: Arc<FlushCoordinator>) -> Self {
        Self { store, coordinator }
    }

    /// Appends a batch to its kind's buffer in one transactional write
    /// and, when `should_flush` is set and no flush is already pending,
    /// requests one.
    ///
    /// Resolution of the returned future guarantees persistence, not
    /// delivery. A malformed event fails this call only; buffers are
    /// untouched. Never performs network I/O.
    pub async fn store(&self, batch: EventBatch, should_flush: bool) -> PipelineResult<()> {
        if !batch.is_empty() {
            let fragments = batch.to_fragments()?;
            let kind = batch.kind();
            self.store.append(kind.buffer_key(), &fragments)?;
            debug!(%kind, events = batch.len(), "batch buffered");
        }

        if should_flush {
            self.coordinator.request_flush().await?;
        }
        Ok(())
    }

    pub async fn store_impressions(
        &self,
        impressions: Vec<Impression>,
        should_flush: bool,
    ) -> PipelineResult<()> {
        self.store(EventBatch::Impressions(impressions), should_flush)
            .await
    }

    pub async fn store_clicks(&self, clicks: Vec<Click>, should_flush: bool) -> PipelineResult<()> {
        self.store(EventBatch::Clicks(clicks), should_flush).await
    }

    pub async fn store_purchases(
        &self,
        purchases: Vec<Purchase>,
        should_flush: bool,
    ) -> PipelineResult<()> {
        self.store(EventBatch::Purchases(purchases), should_flush)
            .await
    }

    /// Forces a flush regardless of the flag state. App-lifecycle hook for
    /// "going to background".
    pub async fn upload(&self) -> PipelineResult<()> {
        self.coordinator.force_flush().await
    }

    /// Reads one kind's buffered fragments with the trailing separator
    /// trimmed. Test-harness surface.
    pub fn read(&self, kind: EventKind) -> PipelineResult<Option<String>> {
        self.coordinator.read(kind)
    }

    /// Combines all buffers into the payload a delivery run would send.
    /// Test-harness surface.
    pub fn aggregate(&self) -> PipelineResult<AggregatedPayload> {
        self.coordinator.aggregate()
    }

    /// Removes all buffers and resets the flush flag. Test-harness
    /// surface.
    pub fn clear(&self) -> PipelineResult<()> {
        self.coordinator.clear()?;
        self.coordinator.reset_flush_flag();
        Ok(())
    }
}

/// Wires a complete pipeline onto the in-process task runner: buffer
/// store, flush coordinator, reporting client, delivery worker.
///
/// An empty `api_base_url` means no collector is reachable (e.g. a test
/// harness); delivery runs then drain locally instead of erroring. Must be
/// called from within a tokio runtime.
pub fn create_pipeline(config: PipelineConfig, store: BufferStore) -> EventPipeline {
    let reporting = if config.api_base_url.is_empty() {
        None
    } else {
        Some(Arc::new(ReportingClient::new(&config)))
    };

    let (runner, submit_rx) = TokioTaskRunner::channel();
    let runner = Arc::new(runner);
    let coordinator = Arc::new(FlushCoordinator::new(store.clone(), runner.clone()));
    let worker = Arc::new(DeliveryWorker::new(Arc::clone(&coordinator), reporting));
    runner.start(submit_rx, worker);

    EventPipeline::new(store, coordinator)
}
