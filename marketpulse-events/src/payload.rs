//! The aggregated wire payload sent to the collector.

use crate::event::{Click, Impression, Purchase};
use serde::{Deserialize, Serialize};

/// All buffered events of every kind, combined into the single JSON object
/// POSTed to the events endpoint. Kinds with nothing to report are omitted
/// from the JSON entirely, never emitted as empty arrays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<Vec<Impression>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<Vec<Click>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchases: Option<Vec<Purchase>>,
}

impl AggregatedPayload {
    /// True when there is nothing to deliver.
    pub fn is_empty(&self) -> bool {
        self.impressions.is_none() && self.clicks.is_none() && self.purchases.is_none()
    }

    /// Total number of events across all kinds.
    pub fn event_count(&self) -> usize {
        self.impressions.as_ref().map_or(0, Vec::len)
            + self.clicks.as_ref().map_or(0, Vec::len)
            + self.purchases.as_ref().map_or(0, Vec::len)
    }
}
