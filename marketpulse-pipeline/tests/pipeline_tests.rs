mod support;

use marketpulse_events::{EventBatch, EventKind, Impression};
use marketpulse_pipeline::PipelineError;
use pretty_assertions::assert_eq;
use support::{harness, impression_organic, impression_promoted, click_organic, purchase};

fn stored_ids(raw: &str) -> Vec<String> {
    let wrapped = format!("[{raw}]");
    let decoded: Vec<serde_json::Value> = serde_json::from_str(&wrapped).unwrap();
    let mut ids: Vec<String> = decoded
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn impressions_are_batched() {
    let h = harness();
    let batch1 = vec![impression_promoted(), impression_organic()];
    let batch2 = vec![impression_promoted(), impression_organic()];
    let mut expected: Vec<String> = batch1.iter().chain(&batch2).map(|i| i.id.clone()).collect();
    expected.sort();

    h.pipeline.store_impressions(batch1, false).await.unwrap();
    h.pipeline.store_impressions(batch2, false).await.unwrap();

    let raw = h.pipeline.read(EventKind::Impression).unwrap().unwrap();
    assert_eq!(stored_ids(&raw), expected);
}

/// Batches stored from concurrent producers all land in the buffer,
/// order-independent.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stores_lose_nothing() {
    let h = harness();
    let batch1 = vec![impression_promoted(), impression_promoted()];
    let batch2 = vec![impression_organic(), impression_organic()];
    let mut expected: Vec<String> = batch1.iter().chain(&batch2).map(|i| i.id.clone()).collect();
    expected.sort();

    let (r1, r2) = tokio::join!(
        h.pipeline.store_impressions(batch1, false),
        h.pipeline.store_impressions(batch2, false),
    );
    r1.unwrap();
    r2.unwrap();

    let raw = h.pipeline.read(EventKind::Impression).unwrap().unwrap();
    assert_eq!(stored_ids(&raw), expected);
}

#[tokio::test]
async fn aggregate_joins_all_kinds() {
    let h = harness();
    let impressions = vec![impression_promoted(), impression_organic()];
    let clicks = vec![click_organic()];
    let purchases = vec![purchase()];

    h.pipeline
        .store_impressions(impressions.clone(), false)
        .await
        .unwrap();
    h.pipeline.store_clicks(clicks.clone(), false).await.unwrap();
    h.pipeline
        .store_purchases(purchases.clone(), false)
        .await
        .unwrap();

    let payload = h.pipeline.aggregate().unwrap();
    assert_eq!(payload.impressions, Some(impressions));
    assert_eq!(payload.clicks, Some(clicks));
    assert_eq!(payload.purchases, Some(purchases));
}

/// Two unflushed impressions aggregate to a payload with only the
/// impressions key.
#[tokio::test]
async fn aggregate_omits_untouched_kinds() {
    let h = harness();
    h.pipeline
        .store_impressions(vec![impression_organic()], false)
        .await
        .unwrap();
    h.pipeline
        .store_impressions(vec![impression_organic()], false)
        .await
        .unwrap();

    let payload = h.pipeline.aggregate().unwrap();
    assert_eq!(payload.impressions.as_ref().map(Vec::len), Some(2));
    assert_eq!(payload.clicks, None);
    assert_eq!(payload.purchases, None);

    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        value.as_object().unwrap().keys().collect::<Vec<_>>(),
        vec!["impressions"]
    );
}

#[tokio::test]
async fn malformed_event_fails_only_its_call() {
    let h = harness();
    h.pipeline
        .store_clicks(vec![click_organic()], false)
        .await
        .unwrap();

    let mut bad = impression_organic();
    bad.entity = None;
    let err = h
        .pipeline
        .store(EventBatch::Impressions(vec![impression_organic(), bad]), false)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));

    // The failing batch left no partial fragments, and other buffers are
    // untouched.
    assert_eq!(h.pipeline.read(EventKind::Impression).unwrap(), None);
    let payload = h.pipeline.aggregate().unwrap();
    assert_eq!(payload.clicks.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn empty_batch_appends_nothing() {
    let h = harness();
    h.pipeline
        .store(EventBatch::Impressions(Vec::<Impression>::new()), false)
        .await
        .unwrap();
    assert_eq!(h.pipeline.read(EventKind::Impression).unwrap(), None);
}

#[tokio::test]
async fn clear_resets_buffers_and_flag() {
    let h = harness();
    h.pipeline
        .store_impressions(vec![impression_organic()], true)
        .await
        .unwrap();
    assert!(h.coordinator.is_flush_requested());

    h.pipeline.clear().unwrap();
    assert!(h.pipeline.aggregate().unwrap().is_empty());
    assert!(!h.coordinator.is_flush_requested());
}
