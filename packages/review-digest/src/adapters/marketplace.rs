//! Catalog and feedback mirrors backed by [`marketplace_client`].

use async_trait::async_trait;
use marketplace_client::{Feedback, MarketplaceClient, MarketplaceError, Mirror, SearchProduct};
use tracing::warn;

use crate::error::{DigestError, Result};
use crate::traits::catalog::Catalog;
use crate::traits::feedback::FeedbackMirror;
use crate::types::product::{CatalogListing, CatalogProduct, Sku};
use crate::types::review::{FeedbackPayload, RawReview};

const UNTITLED_LISTING: &str = "Untitled";

fn upstream(e: MarketplaceError) -> DigestError {
    DigestError::Upstream(e.to_string())
}

pub struct MarketplaceCatalog {
    client: MarketplaceClient,
}

impl MarketplaceCatalog {
    pub fn new(client: MarketplaceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Catalog for MarketplaceCatalog {
    async fn product(&self, sku: &Sku) -> Result<Option<CatalogProduct>> {
        let card = self.client.fetch_card(sku.as_str()).await.map_err(upstream)?;
        Ok(card.first_product().map(|p| CatalogProduct {
            name: p.name.clone(),
            root_id: p.root,
        }))
    }

    /// Search failures degrade to an empty result.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogListing>> {
        match self.client.search(query, limit).await {
            Ok(products) => Ok(products.into_iter().map(to_listing).collect()),
            Err(e) => {
                warn!(query, error = %e, "Catalog search failed");
                Ok(Vec::new())
            }
        }
    }
}

fn to_listing(product: SearchProduct) -> CatalogListing {
    CatalogListing {
        id: product.id.unwrap_or_default(),
        name: product.name.unwrap_or_else(|| UNTITLED_LISTING.to_string()),
        price: product.price_u.unwrap_or_default() as f64 / 100.0,
        rating: product.rating.unwrap_or_default(),
        feedback_count: product.feedbacks.unwrap_or_default(),
    }
}

/// One feedback mirror of the marketplace.
pub struct MarketplaceMirror {
    client: MarketplaceClient,
    mirror: Mirror,
    name: String,
}

impl MarketplaceMirror {
    pub fn new(client: MarketplaceClient, mirror: Mirror) -> Self {
        Self {
            client,
            mirror,
            name: mirror.to_string(),
        }
    }

    /// Both mirrors sharing one HTTP client.
    pub fn pair(client: MarketplaceClient) -> (Self, Self) {
        (
            Self::new(client.clone(), Mirror::Primary),
            Self::new(client, Mirror::Secondary),
        )
    }
}

#[async_trait]
impl FeedbackMirror for MarketplaceMirror {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, root_id: u64) -> Result<FeedbackPayload> {
        let feed = self
            .client
            .fetch_feedbacks(self.mirror, root_id)
            .await
            .map_err(upstream)?;

        Ok(FeedbackPayload::new(
            feed.into_feedbacks().into_iter().map(to_review).collect(),
        ))
    }
}

/// A rating-only feedback arrives with `text: null` and becomes an empty review.
fn to_review(feedback: Feedback) -> RawReview {
    RawReview {
        text: feedback.text.unwrap_or_default(),
        sku_tag: feedback.nm_id.map(|id| id.to_string()),
    }
}
