//! Pure marketplace REST client.
//!
//! A minimal client for the public marketplace endpoints used by the review
//! digest: product cards, the two mirrored feedback feeds, and catalog search.
//! It performs single requests and reports failures; failover and filtering
//! policies belong to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use marketplace_client::{MarketplaceClient, Mirror};
//!
//! let client = MarketplaceClient::new()?;
//!
//! let card = client.fetch_card("123456789").await?;
//! let root = card.first_product().and_then(|p| p.root).unwrap();
//! let feed = client.fetch_feedbacks(Mirror::Primary, root).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{MarketplaceError, Result};
pub use types::{
    CardProduct, CardResponse, Feedback, FeedbackResponse, Mirror, SearchProduct, SearchResponse,
};

use serde::de::DeserializeOwned;
use std::time::Duration;

const CARD_BASE_URL: &str = "https://card.wb.ru";
const FEEDBACK_PRIMARY_URL: &str = "https://feedbacks1.wb.ru";
const FEEDBACK_SECONDARY_URL: &str = "https://feedbacks2.wb.ru";
const SEARCH_BASE_URL: &str = "https://search.wb.ru";

/// The upstream rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Base URLs of every endpoint the client talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub card: String,
    pub feedback_primary: String,
    pub feedback_secondary: String,
    pub search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            card: CARD_BASE_URL.to_string(),
            feedback_primary: FEEDBACK_PRIMARY_URL.to_string(),
            feedback_secondary: FEEDBACK_SECONDARY_URL.to_string(),
            search: SEARCH_BASE_URL.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct MarketplaceClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl MarketplaceClient {
    pub fn new() -> Result<Self> {
        Self::with_config(Endpoints::default(), DEFAULT_TIMEOUT)
    }

    /// Create a client against custom endpoints (mirrors, proxies, test servers).
    pub fn with_config(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn card_url(&self, sku: &str) -> String {
        format!(
            "{}/cards/v2/detail?appType=1&curr=rub&dest=-8144334&spp=30&nm={}",
            self.endpoints.card.trim_end_matches('/'),
            sku
        )
    }

    pub fn feedback_url(&self, mirror: Mirror, root_id: u64) -> String {
        let base = match mirror {
            Mirror::Primary => &self.endpoints.feedback_primary,
            Mirror::Secondary => &self.endpoints.feedback_secondary,
        };
        format!("{}/feedbacks/v1/{}", base.trim_end_matches('/'), root_id)
    }

    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/exactmatch/ru/common/v4/search?appType=1&curr=rub&dest=-1257786&lang=ru&locale=ru&query={}&resultset=catalog&sort=popular&spp=0&suppressSpellcheck=false",
            self.endpoints.search.trim_end_matches('/'),
            urlencoding::encode(query.trim())
        )
    }

    /// Fetch the product card for a SKU. One request, no retry.
    pub async fn fetch_card(&self, sku: &str) -> Result<CardResponse> {
        let card: CardResponse = self.get_json(&self.card_url(sku)).await?;
        tracing::debug!(
            sku,
            products = card.data.as_ref().map_or(0, |d| d.products.len()),
            "Fetched product card"
        );
        Ok(card)
    }

    /// Fetch the feedback feed for a root id from one mirror.
    pub async fn fetch_feedbacks(&self, mirror: Mirror, root_id: u64) -> Result<FeedbackResponse> {
        let feed: FeedbackResponse = self.get_json(&self.feedback_url(mirror, root_id)).await?;
        tracing::debug!(
            %mirror,
            root_id,
            count = feed.feedbacks.as_ref().map_or(0, |f| f.len()),
            "Fetched feedback feed"
        );
        Ok(feed)
    }

    /// Search the catalog by popularity and return at most `limit` products.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchProduct>> {
        let resp: SearchResponse = self.get_json(&self.search_url(query)).await?;
        let products: Vec<SearchProduct> = resp
            .data
            .map(|d| d.products)
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .collect();
        tracing::info!(query, count = products.len(), "Catalog search complete");
        Ok(products)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(MarketplaceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MarketplaceClient {
        MarketplaceClient::with_config(
            Endpoints {
                card: "http://card.test/".into(),
                feedback_primary: "http://fb1.test".into(),
                feedback_secondary: "http://fb2.test".into(),
                search: "http://search.test".into(),
            },
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn card_url_carries_sku() {
        let url = client().card_url("123456789");
        assert!(url.starts_with("http://card.test/cards/v2/detail?"));
        assert!(url.ends_with("&nm=123456789"));
    }

    #[test]
    fn feedback_url_selects_mirror() {
        let c = client();
        assert_eq!(c.feedback_url(Mirror::Primary, 77), "http://fb1.test/feedbacks/v1/77");
        assert_eq!(c.feedback_url(Mirror::Secondary, 77), "http://fb2.test/feedbacks/v1/77");
    }

    #[test]
    fn search_query_is_encoded() {
        let url = client().search_url("red shoes");
        assert!(url.contains("query=red%20shoes&"));

        let url = client().search_url("  чай ");
        assert!(url.contains("query=%D1%87%D0%B0%D0%B9&"));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let c = MarketplaceClient::with_config(
            Endpoints {
                card: "http://127.0.0.1:1".into(),
                ..Endpoints::default()
            },
            Duration::from_millis(200),
        )
        .unwrap();

        let err = c.fetch_card("1234567").await.unwrap_err();
        assert!(matches!(err, MarketplaceError::Http(_)));
    }
}
