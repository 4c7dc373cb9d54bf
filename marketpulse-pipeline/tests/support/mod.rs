//! Shared test helpers: event fixtures and an in-memory task runner fake.

#![allow(dead_code)]

use async_trait::async_trait;
use marketpulse_events::{
    event_now, random_event_id, Click, Entity, Impression, Placement, Purchase, PurchasedItem,
};
use marketpulse_pipeline::{
    DeliveryWorker, EventPipeline, FlushCoordinator, PipelineConfig, PipelineResult,
    ReportingClient, SubmitPolicy, TaskRunner,
};
use marketpulse_store::BufferStore;
use std::sync::{Arc, Once};
use tokio::sync::Mutex;

static TRACING: Once = Once::new();

/// Routes pipeline warnings to the test output when RUST_LOG is set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Task runner fake that records submissions instead of executing them.
pub struct RecordingTaskRunner {
    submissions: Mutex<Vec<(String, SubmitPolicy)>>,
}

impl RecordingTaskRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            submissions: Mutex::new(Vec::new()),
        })
    }

    pub async fn submissions(&self) -> Vec<(String, SubmitPolicy)> {
        self.submissions.lock().await.clone()
    }
}

#[async_trait]
impl TaskRunner for RecordingTaskRunner {
    async fn submit_unique(&self, name: &str, policy: SubmitPolicy) -> PipelineResult<()> {
        self.submissions
            .lock()
            .await
            .push((name.to_string(), policy));
        Ok(())
    }
}

/// An in-memory pipeline whose flush submissions go to a recording fake.
pub struct Harness {
    pub store: BufferStore,
    pub coordinator: Arc<FlushCoordinator>,
    pub pipeline: EventPipeline,
    pub runner: Arc<RecordingTaskRunner>,
}

pub fn harness() -> Harness {
    init_tracing();
    let store = BufferStore::open_in_memory().unwrap();
    let runner = RecordingTaskRunner::new();
    let coordinator = Arc::new(FlushCoordinator::new(store.clone(), runner.clone()));
    let pipeline = EventPipeline::new(store.clone(), Arc::clone(&coordinator));
    Harness {
        store,
        coordinator,
        pipeline,
        runner,
    }
}

/// A delivery worker posting to the given collector URL, or one with no
/// collector at all when `collector_uri` is `None`.
pub fn worker(harness: &Harness, collector_uri: Option<&str>) -> DeliveryWorker {
    let reporting = collector_uri.map(|uri| {
        Arc::new(ReportingClient::new(&PipelineConfig {
            api_base_url: uri.to_string(),
            bearer_token: "test-token".to_string(),
            request_timeout_secs: 5,
        }))
    });
    DeliveryWorker::new(Arc::clone(&harness.coordinator), reporting)
}

pub fn impression_promoted() -> Impression {
    Impression::promoted(
        "bid_1",
        Placement::from_path("/search"),
        "u_1",
        random_event_id(),
        event_now(),
    )
}

pub fn impression_organic() -> Impression {
    Impression::organic(
        Entity::product("p_1"),
        Placement::from_path("/search"),
        "u_1",
        random_event_id(),
        event_now(),
    )
}

pub fn click_promoted() -> Click {
    Click::promoted(
        "bid_2",
        Placement::from_path("/products/p_1"),
        "u_1",
        random_event_id(),
        event_now(),
    )
}

pub fn click_organic() -> Click {
    Click::organic(
        Entity::vendor("v_1"),
        Placement::from_path("/vendors/v_1"),
        "u_1",
        random_event_id(),
        event_now(),
    )
}

pub fn purchase() -> Purchase {
    Purchase::new(
        random_event_id(),
        "u_1",
        event_now(),
        vec![PurchasedItem::new("p_1", 1).with_unit_price(999)],
    )
}
