//! Event model error types.

use thiserror::Error;

/// Errors raised when validating or encoding events.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event {id}: resolvedBidId and entity are mutually exclusive")]
    ConflictingAttribution { id: String },

    #[error("event {id}: one of resolvedBidId or entity is required")]
    MissingAttribution { id: String },

    #[error("event {id}: additionalAttribution requires resolvedBidId")]
    AdditionalAttributionWithoutBid { id: String },

    #[error("purchase {id}: item list is empty")]
    EmptyItems { id: String },

    #[error("purchase {id}: item {product_id} has zero quantity")]
    InvalidQuantity { id: String, product_id: String },

    #[error("purchase {id}: item {product_id} has zero unit price")]
    InvalidUnitPrice { id: String, product_id: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
