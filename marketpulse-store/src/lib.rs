//! Durable buffer store for the MarketPulse analytics core.
//!
//! A small SQLite-backed key/value store holding one serialized event
//! buffer per event kind. Every mutation goes through a single atomic
//! read-modify-write primitive: the store, not its callers, is the
//! serialization point for concurrent appends to the same key. There is no
//! cross-key atomicity; buffers are independent keys.

mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::BufferStore;
