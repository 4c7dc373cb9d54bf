//! The durable task runner boundary.
//!
//! The host application owns durable job scheduling (a WorkManager-like
//! primitive on mobile, a supervisor elsewhere). The pipeline core only
//! depends on the [`TaskRunner`] contract: uniquely-named jobs where a
//! burst of submissions collapses onto one pending job. [`TokioTaskRunner`]
//! is an in-process implementation for hosts without such a primitive; it
//! survives connectivity loss through capped-backoff retries but not
//! process death. Durable buffers make redelivery safe either way.

use crate::error::{PipelineError, PipelineResult};
use crate::worker::{DeliveryOutcome, DeliveryWorker};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

/// What to do when a job with the same name is already pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Retarget the pending job: it must observe state as of its
    /// execution, not as of its submission.
    ReplacePending,
    /// Leave the pending job untouched.
    KeepPending,
}

/// A durable job execution service provided by the host.
///
/// Jobs are identified by name. The runner owns retry and backoff policy;
/// the pipeline core only classifies each run as success or retry.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Enqueues the job named `name`, collapsing onto an existing
    /// not-yet-started job of the same name according to `policy`.
    async fn submit_unique(&self, name: &str, policy: SubmitPolicy) -> PipelineResult<()>;
}

const RETRY_BASE_MS: u64 = 500;
// Caps backoff at 500ms << 9 = 256s.
const MAX_BACKOFF_SHIFT: u32 = 9;

/// In-process task runner backed by a tokio task that owns the delivery
/// worker.
///
/// Submitted names feed a channel; the loop runs each dequeued job until
/// it reports success, sleeping with exponential backoff between retries.
/// Dropping the runner closes the channel and stops the loop after the
/// current job.
///
/// Construction is two-phase because the wiring is circular (the
/// coordinator submits to the runner, whose loop runs the worker, which
/// drains through the coordinator): [`TokioTaskRunner::channel`] first,
/// then [`TokioTaskRunner::start`] once the worker exists.
pub struct TokioTaskRunner {
    submit_tx: mpsc::Sender<String>,
    pending: Arc<Mutex<HashSet<String>>>,
}

impl TokioTaskRunner {
    /// Creates the runner handle and the receiving end of its submit
    /// channel.
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (submit_tx, submit_rx) = mpsc::channel(64);
        let runner = Self {
            submit_tx,
            pending: Arc::new(Mutex::new(HashSet::new())),
        };
        (runner, submit_rx)
    }

    /// Spawns the runner loop onto the current tokio runtime.
    pub fn start(&self, submit_rx: mpsc::Receiver<String>, worker: Arc<DeliveryWorker>) {
        tokio::spawn(run_loop(submit_rx, Arc::clone(&self.pending), worker));
    }
}

#[async_trait]
impl TaskRunner for TokioTaskRunner {
    /// Jobs carry no payload snapshot (a pending job always reads buffer
    /// state at execution time), so `ReplacePending` and `KeepPending`
    /// coincide here: an already-pending name is left in place.
    async fn submit_unique(&self, name: &str, _policy: SubmitPolicy) -> PipelineResult<()> {
        {
            let mut pending = self.pending.lock().await;
            if pending.contains(name) {
                return Ok(());
            }
            pending.insert(name.to_string());
        }

        if self.submit_tx.send(name.to_string()).await.is_err() {
            self.pending.lock().await.remove(name);
            return Err(PipelineError::Scheduler(
                "task runner stopped".to_string(),
            ));
        }
        Ok(())
    }
}

async fn run_loop(
    mut submit_rx: mpsc::Receiver<String>,
    pending: Arc<Mutex<HashSet<String>>>,
    worker: Arc<DeliveryWorker>,
) {
    info!("delivery task runner started");

    while let Some(name) = submit_rx.recv().await {
        // Once a job starts it no longer counts as pending; a later
        // submission of the same name enqueues a fresh run.
        pending.lock().await.remove(&name);

        let mut attempt = 0u32;
        loop {
            match worker.run().await {
                DeliveryOutcome::Success => break,
                DeliveryOutcome::Retry => {
                    let backoff = retry_backoff(attempt);
                    attempt += 1;
                    warn!(job = %name, attempt, "delivery failed, retrying in {backoff:?}");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    info!("submit channel closed, delivery task runner stopping");
}

fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BASE_MS << attempt.min(MAX_BACKOFF_SHIFT))
}
