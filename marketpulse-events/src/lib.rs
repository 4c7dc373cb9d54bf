//! Event model for the MarketPulse analytics core.
//!
//! Impressions, clicks, and purchases are immutable value types with a
//! fixed JSON wire contract (camelCase field names, optional fields
//! omitted). Promoted events carry the `resolvedBidId` of the auction they
//! won; organic events carry the interacted `entity` instead. Exactly one
//! of the two must be present.

mod error;
mod event;
mod kind;
mod payload;
mod placement;

pub use error::EventError;
pub use event::{Click, Entity, EntityType, Impression, Purchase, PurchasedItem};
pub use kind::{EventBatch, EventKind, FRAGMENT_SEPARATOR};
pub use payload::AggregatedPayload;
pub use placement::Placement;

use chrono::{DateTime, FixedOffset, Utc};

/// Returns the current time as an RFC3339 timestamp with offset, the
/// format required for `occurredAt`.
pub fn event_now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// Generates a random client-assigned event id. The collector dedups
/// redelivered events by this id.
pub fn random_event_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
