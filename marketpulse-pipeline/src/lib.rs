//! Event pipeline for the MarketPulse analytics core.
//!
//! Accepts events from concurrent producers, appends them to durable
//! per-kind buffers, and coordinates flushing:
//! - Buffered appends with one transactional write per call
//! - Flush dedup through a single atomic flag
//! - Uniquely-named delivery jobs handed to a host task runner
//! - At-least-once delivery with retry classification; the collector
//!   dedups redelivered events by their client-assigned ids
//!
//! The public reporting facade shapes arguments and calls
//! [`EventPipeline::store`]; the host's durable scheduler sits behind the
//! [`TaskRunner`] trait.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod pipeline;
pub mod reporting;
pub mod scheduler;
pub mod worker;

pub use config::PipelineConfig;
pub use coordinator::{FlushCoordinator, DELIVERY_JOB_NAME};
pub use error::{DeliveryError, PipelineError, PipelineResult};
pub use pipeline::{create_pipeline, EventPipeline};
pub use reporting::ReportingClient;
pub use scheduler::{SubmitPolicy, TaskRunner, TokioTaskRunner};
pub use worker::{DeliveryOutcome, DeliveryWorker};
