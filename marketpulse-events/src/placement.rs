//! Page/path context attached to every impression and click.

use serde::{Deserialize, Serialize};

/// Where in the marketplace UI an event occurred.
///
/// Only `path` is required. Everything else describes the surrounding
/// component (list position, pagination, search context) and is omitted
/// from the wire format when absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// URL path of the page triggering the event. Mobile apps encode the
    /// current view as a path-like string (e.g. `/categories/:categoryId`).
    pub path: String,

    /// Index of the item within a multi-item component (search results,
    /// similar products).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    /// Page number that triggered the event, for paginated pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Items per result page, for paginated pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Catalog id of the product associated with the page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Catalog ids of the categories associated with the page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<String>>,

    /// The user's search string on the page, if any. Must match the
    /// `searchQuery` sent in the auction request when one was run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    /// Marketplace-defined name for a page part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Placement {
    /// A placement with only the required path set.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            position: None,
            page: None,
            page_size: None,
            product_id: None,
            category_ids: None,
            search_query: None,
            location: None,
        }
    }
}
