//! Product identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when the catalog card carries no name.
pub const UNKNOWN_PRODUCT_NAME: &str = "Name not found";

/// Identifier of one specific product variant.
///
/// Derived once from user input and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw catalog entry as reported by a [`Catalog`](crate::traits::catalog::Catalog).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogProduct {
    pub name: Option<String>,
    pub root_id: Option<u64>,
}

/// Resolved product: the SKU, its variant group, and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub sku: Sku,
    /// Grouping key shared by every color/size variant; keys the feedback feed.
    pub root_id: u64,
    pub display_name: String,
}

/// A catalog search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogListing {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub rating: f64,
    pub feedback_count: u64,
}
