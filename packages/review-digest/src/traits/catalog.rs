//! Catalog lookup and search.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::product::{CatalogListing, CatalogProduct, Sku};

/// Read access to the product catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up the card for a SKU with a single request.
    ///
    /// Returns `Ok(None)` when the catalog answered but listed no product.
    /// Transport failures and non-200 responses are
    /// [`DigestError::Upstream`](crate::DigestError::Upstream).
    async fn product(&self, sku: &Sku) -> Result<Option<CatalogProduct>>;

    /// Popular products matching a free-form query.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogListing>>;
}
