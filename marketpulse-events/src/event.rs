//! Impression, click, and purchase value types.

use crate::error::EventError;
use crate::placement::Placement;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Kind of catalog object an organic interaction refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Product,
    Vendor,
}

/// The catalog object involved in an organic (non-promoted) interaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The marketplace's id of the entity.
    pub id: String,
    /// The type of entity.
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl Entity {
    pub fn product(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: EntityType::Product,
        }
    }

    pub fn vendor(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: EntityType::Vendor,
        }
    }
}

/// A promoted or organic render of a listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impression {
    /// The marketplace's id for the impression. The collector dedups
    /// redelivered events by this id.
    pub id: String,

    /// Opaque user id correlating activity across events.
    pub opaque_user_id: String,

    /// RFC3339 timestamp with offset.
    pub occurred_at: DateTime<FixedOffset>,

    pub placement: Placement,

    /// For promoted listings, the id of the auction the listing won.
    /// Mutually exclusive with `entity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_bid_id: Option<String>,

    /// For organic interactions, the object interacted with. Mutually
    /// exclusive with `resolved_bid_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,

    /// Extra marketplace attribution. Legal only alongside
    /// `resolved_bid_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_attribution: Option<String>,
}

impl Impression {
    /// Builds a promoted impression attributed to a winning auction bid.
    pub fn promoted(
        resolved_bid_id: impl Into<String>,
        placement: Placement,
        opaque_user_id: impl Into<String>,
        id: impl Into<String>,
        occurred_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            opaque_user_id: opaque_user_id.into(),
            occurred_at,
            placement,
            resolved_bid_id: Some(resolved_bid_id.into()),
            entity: None,
            additional_attribution: None,
        }
    }

    /// Builds an organic impression attributed to a catalog entity.
    pub fn organic(
        entity: Entity,
        placement: Placement,
        opaque_user_id: impl Into<String>,
        id: impl Into<String>,
        occurred_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            opaque_user_id: opaque_user_id.into(),
            occurred_at,
            placement,
            resolved_bid_id: None,
            entity: Some(entity),
            additional_attribution: None,
        }
    }

    /// Checks the attribution invariant for values not built through the
    /// promoted/organic constructors (e.g. decoded from storage).
    pub fn validate(&self) -> Result<(), EventError> {
        validate_attribution(
            &self.id,
            self.resolved_bid_id.as_deref(),
            self.entity.as_ref(),
            self.additional_attribution.as_deref(),
        )
    }
}

/// A tap or click on a promoted or organic listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    /// The marketplace's id for the click, used for downstream dedup.
    pub id: String,

    /// Opaque user id correlating activity across events.
    pub opaque_user_id: String,

    /// RFC3339 timestamp with offset.
    pub occurred_at: DateTime<FixedOffset>,

    pub placement: Placement,

    /// For promoted listings, the id of the auction the listing won.
    /// Mutually exclusive with `entity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_bid_id: Option<String>,

    /// For organic interactions, the object interacted with. Mutually
    /// exclusive with `resolved_bid_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,

    /// Extra marketplace attribution. Legal only alongside
    /// `resolved_bid_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_attribution: Option<String>,
}

impl Click {
    /// Builds a promoted click attributed to a winning auction bid.
    pub fn promoted(
        resolved_bid_id: impl Into<String>,
        placement: Placement,
        opaque_user_id: impl Into<String>,
        id: impl Into<String>,
        occurred_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            opaque_user_id: opaque_user_id.into(),
            occurred_at,
            placement,
            resolved_bid_id: Some(resolved_bid_id.into()),
            entity: None,
            additional_attribution: None,
        }
    }

    /// Builds an organic click attributed to a catalog entity.
    pub fn organic(
        entity: Entity,
        placement: Placement,
        opaque_user_id: impl Into<String>,
        id: impl Into<String>,
        occurred_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            opaque_user_id: opaque_user_id.into(),
            occurred_at,
            placement,
            resolved_bid_id: None,
            entity: Some(entity),
            additional_attribution: None,
        }
    }

    /// Checks the attribution invariant for values not built through the
    /// promoted/organic constructors.
    pub fn validate(&self) -> Result<(), EventError> {
        validate_attribution(
            &self.id,
            self.resolved_bid_id.as_deref(),
            self.entity.as_ref(),
            self.additional_attribution.as_deref(),
        )
    }
}

/// A completed order.
///
/// Purchases carry no placement and no attribution union; attribution to a
/// promoted listing happens per item via `PurchasedItem::resolved_bid_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    /// The marketplace-assigned id for the order.
    pub id: String,

    /// Opaque user id correlating activity across events.
    pub opaque_user_id: String,

    /// RFC3339 timestamp with offset.
    pub occurred_at: DateTime<FixedOffset>,

    /// Items purchased, in order.
    pub items: Vec<PurchasedItem>,
}

impl Purchase {
    pub fn new(
        id: impl Into<String>,
        opaque_user_id: impl Into<String>,
        occurred_at: DateTime<FixedOffset>,
        items: Vec<PurchasedItem>,
    ) -> Self {
        Self {
            id: id.into(),
            opaque_user_id: opaque_user_id.into(),
            occurred_at,
            items,
        }
    }

    /// Checks the item list: non-empty, quantity >= 1, unit price >= 1
    /// when present.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.items.is_empty() {
            return Err(EventError::EmptyItems {
                id: self.id.clone(),
            });
        }
        for item in &self.items {
            if item.quantity < 1 {
                return Err(EventError::InvalidQuantity {
                    id: self.id.clone(),
                    product_id: item.product_id.clone(),
                });
            }
            if item.unit_price.is_some_and(|p| p < 1) {
                return Err(EventError::InvalidUnitPrice {
                    id: self.id.clone(),
                    product_id: item.product_id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One line item of a purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedItem {
    /// The marketplace id of the product purchased.
    pub product_id: String,

    /// Units purchased, at least 1.
    pub quantity: u32,

    /// Price per unit in minor currency units, at least 1 when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<u32>,

    /// The auction id of the promoted link the consumer clicked before
    /// purchasing, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_bid_id: Option<String>,
}

impl PurchasedItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price: None,
            resolved_bid_id: None,
        }
    }

    pub fn with_unit_price(mut self, unit_price: u32) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_resolved_bid_id(mut self, resolved_bid_id: impl Into<String>) -> Self {
        self.resolved_bid_id = Some(resolved_bid_id.into());
        self
    }
}

fn validate_attribution(
    id: &str,
    resolved_bid_id: Option<&str>,
    entity: Option<&Entity>,
    additional_attribution: Option<&str>,
) -> Result<(), EventError> {
    match (resolved_bid_id, entity) {
        (Some(_), Some(_)) => Err(EventError::ConflictingAttribution { id: id.to_string() }),
        (None, None) => Err(EventError::MissingAttribution { id: id.to_string() }),
        (None, Some(_)) if additional_attribution.is_some() => {
            Err(EventError::AdditionalAttributionWithoutBid { id: id.to_string() })
        }
        _ => Ok(()),
    }
}
