//! Testing utilities including mock implementations.
//!
//! These let applications exercise the pipeline without network calls.
//! Every mock records its calls for assertions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{BackendError, BackendResult, DigestError, Result};
use crate::traits::backend::GenerationBackend;
use crate::traits::catalog::Catalog;
use crate::traits::feedback::FeedbackMirror;
use crate::types::product::{CatalogListing, CatalogProduct, Sku};
use crate::types::review::{FeedbackPayload, RawReview};

/// A mock catalog with predefined cards per SKU.
///
/// Unknown SKUs answer with an empty product list.
#[derive(Default)]
pub struct MockCatalog {
    products: Arc<RwLock<HashMap<String, CatalogProduct>>>,
    failing: Arc<RwLock<Vec<String>>>,
    listings: Arc<RwLock<Vec<CatalogListing>>>,
    lookups: Arc<RwLock<Vec<String>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product card for `sku`.
    pub fn with_product(self, sku: impl Into<String>, name: impl Into<String>, root_id: u64) -> Self {
        self.products.write().unwrap().insert(
            sku.into(),
            CatalogProduct {
                name: Some(name.into()),
                root_id: Some(root_id),
            },
        );
        self
    }

    /// Add a raw card (e.g., one without a root id).
    pub fn with_card(self, sku: impl Into<String>, product: CatalogProduct) -> Self {
        self.products.write().unwrap().insert(sku.into(), product);
        self
    }

    /// Make lookups of `sku` fail as an upstream error.
    pub fn with_failure(self, sku: impl Into<String>) -> Self {
        self.failing.write().unwrap().push(sku.into());
        self
    }

    pub fn with_listings(self, listings: Vec<CatalogListing>) -> Self {
        *self.listings.write().unwrap() = listings;
        self
    }

    /// SKUs looked up so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.read().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn product(&self, sku: &Sku) -> Result<Option<CatalogProduct>> {
        self.lookups.write().unwrap().push(sku.to_string());
        if self.failing.read().unwrap().iter().any(|s| s == sku.as_str()) {
            return Err(DigestError::Upstream(format!("status 500 for {}", sku)));
        }
        Ok(self.products.read().unwrap().get(sku.as_str()).cloned())
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<CatalogListing>> {
        Ok(self.listings.read().unwrap().iter().take(limit).cloned().collect())
    }
}

/// How a mock mirror answers.
#[derive(Debug, Clone)]
pub enum MirrorBehavior {
    Respond(Vec<RawReview>),
    Fail,
    /// Never answers; the fetcher's timeout has to cut it off.
    Hang,
}

/// A mock feedback mirror with per-root behaviors.
///
/// Unknown roots answer with an empty feed.
pub struct MockMirror {
    name: String,
    feeds: Arc<RwLock<HashMap<u64, MirrorBehavior>>>,
    calls: Arc<RwLock<Vec<u64>>>,
}

impl MockMirror {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feeds: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_reviews(self, root_id: u64, reviews: Vec<RawReview>) -> Self {
        self.with_behavior(root_id, MirrorBehavior::Respond(reviews))
    }

    pub fn with_behavior(self, root_id: u64, behavior: MirrorBehavior) -> Self {
        self.feeds.write().unwrap().insert(root_id, behavior);
        self
    }

    /// Root ids requested so far, in order.
    pub fn calls(&self) -> Vec<u64> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackMirror for MockMirror {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, root_id: u64) -> Result<FeedbackPayload> {
        self.calls.write().unwrap().push(root_id);
        let behavior = self.feeds.read().unwrap().get(&root_id).cloned();
        match behavior {
            Some(MirrorBehavior::Respond(reviews)) => Ok(FeedbackPayload::new(reviews)),
            Some(MirrorBehavior::Fail) => Err(DigestError::Upstream(format!(
                "{} mirror unavailable",
                self.name
            ))),
            Some(MirrorBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(FeedbackPayload::empty()),
        }
    }
}

/// How a mock backend answers.
#[derive(Debug, Clone)]
pub enum BackendBehavior {
    Respond(String),
    Fail(String),
    /// Sleeps far past any reasonable timeout.
    Hang,
}

/// A mock generation backend.
pub struct MockBackend {
    id: String,
    behavior: BackendBehavior,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockBackend {
    pub fn responding(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BackendBehavior::Respond(text.into()))
    }

    pub fn failing(id: impl Into<String>) -> Self {
        Self::new(id, BackendBehavior::Fail("model unavailable".into()))
    }

    pub fn hanging(id: impl Into<String>) -> Self {
        Self::new(id, BackendBehavior::Hang)
    }

    pub fn new(id: impl Into<String>, behavior: BackendBehavior) -> Self {
        Self {
            id: id.into(),
            behavior,
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, prompt: &str, _timeout: Duration) -> BackendResult<String> {
        self.prompts.write().unwrap().push(prompt.to_string());
        match &self.behavior {
            BackendBehavior::Respond(text) => Ok(text.clone()),
            BackendBehavior::Fail(reason) => Err(BackendError::Call(reason.clone())),
            BackendBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(BackendError::Call("woke up".into()))
            }
        }
    }
}

/// `count` reviews for `sku` with lengths `1..=count`.
pub fn reviews_of_increasing_length(sku: &str, count: usize) -> Vec<RawReview> {
    (1..=count).map(|n| RawReview::new("r".repeat(n), sku)).collect()
}
