//! Event kinds, buffer keys, and the per-call batch type.

use crate::error::EventError;
use crate::event::{Click, Impression, Purchase};
use serde::Serialize;
use std::fmt;

/// Separator between serialized fragments in a buffer value. Appends leave
/// a trailing separator; readers trim it before wrapping the value in an
/// array delimiter.
pub const FRAGMENT_SEPARATOR: char = ',';

/// The three reportable event kinds, each backed by its own buffer key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Impression,
    Click,
    Purchase,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::Impression,
        EventKind::Click,
        EventKind::Purchase,
    ];

    /// The durable store key holding this kind's buffer.
    pub fn buffer_key(&self) -> &'static str {
        match self {
            EventKind::Impression => "IMPRESSION_EVENTS",
            EventKind::Click => "CLICK_EVENTS",
            EventKind::Purchase => "PURCHASE_EVENTS",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Impression => write!(f, "impression"),
            EventKind::Click => write!(f, "click"),
            EventKind::Purchase => write!(f, "purchase"),
        }
    }
}

/// One caller-submitted batch of events, all of the same kind.
#[derive(Clone, Debug, PartialEq)]
pub enum EventBatch {
    Impressions(Vec<Impression>),
    Clicks(Vec<Click>),
    Purchases(Vec<Purchase>),
}

impl EventBatch {
    pub fn kind(&self) -> EventKind {
        match self {
            EventBatch::Impressions(_) => EventKind::Impression,
            EventBatch::Clicks(_) => EventKind::Click,
            EventBatch::Purchases(_) => EventKind::Purchase,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EventBatch::Impressions(list) => list.len(),
            EventBatch::Clicks(list) => list.len(),
            EventBatch::Purchases(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates every event and serializes the batch into buffer
    /// fragments: one complete JSON object per event, each followed by the
    /// separator. A malformed event fails the whole batch; nothing is
    /// partially encoded.
    pub fn to_fragments(&self) -> Result<String, EventError> {
        let mut out = String::new();
        match self {
            EventBatch::Impressions(list) => {
                for event in list {
                    event.validate()?;
                    push_fragment(&mut out, event)?;
                }
            }
            EventBatch::Clicks(list) => {
                for event in list {
                    event.validate()?;
                    push_fragment(&mut out, event)?;
                }
            }
            EventBatch::Purchases(list) => {
                for event in list {
                    event.validate()?;
                    push_fragment(&mut out, event)?;
                }
            }
        }
        Ok(out)
    }
}

fn push_fragment<T: Serialize>(out: &mut String, event: &T) -> Result<(), EventError> {
    out.push_str(&serde_json::to_string(event)?);
    out.push(FRAGMENT_SEPARATOR);
    Ok(())
}
