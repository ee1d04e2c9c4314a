//! Resolver → fetcher → cached engine, for one product.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::cache::AnalysisCache;
use crate::engine::{AnalysisEngine, CachedAnalyzer};
use crate::error::{DigestError, Result};
use crate::fetcher::ReviewFetcher;
use crate::resolver::ProductResolver;
use crate::traits::backend::GenerationBackend;
use crate::traits::catalog::Catalog;
use crate::traits::feedback::FeedbackMirror;
use crate::types::config::DigestConfig;
use crate::types::analysis::AnalysisResult;
use crate::types::product::ProductRecord;
use crate::types::review::ReviewSet;

/// Analysis of one product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDigest {
    pub product: ProductRecord,
    pub review_count: usize,
    pub analysis: AnalysisResult,
}

/// A product with its sampled reviews, ready for analysis.
#[derive(Debug, Clone)]
pub struct GatheredReviews {
    pub product: ProductRecord,
    pub reviews: ReviewSet,
}

pub struct DigestPipeline {
    resolver: ProductResolver,
    fetcher: ReviewFetcher,
    analyzer: Arc<CachedAnalyzer>,
}

impl DigestPipeline {
    pub fn new(resolver: ProductResolver, fetcher: ReviewFetcher, analyzer: Arc<CachedAnalyzer>) -> Self {
        Self {
            resolver,
            fetcher,
            analyzer,
        }
    }

    /// Wire every stage from its upstream seams. The cache is passed in so
    /// several pipelines can share one.
    pub fn assemble(
        config: &DigestConfig,
        catalog: Arc<dyn Catalog>,
        primary: Arc<dyn FeedbackMirror>,
        secondary: Arc<dyn FeedbackMirror>,
        backends: Vec<Arc<dyn GenerationBackend>>,
        cache: Arc<AnalysisCache>,
    ) -> Self {
        let resolver = ProductResolver::new(catalog, config.domain_markers.clone());
        let fetcher = ReviewFetcher::new(primary, secondary, config.mirror_timeout, config.review_cap);
        let engine = AnalysisEngine::new(backends, config.backend_timeout);
        Self::new(resolver, fetcher, Arc::new(CachedAnalyzer::new(engine, cache)))
    }

    /// Resolve the input and sample its reviews. May return an empty set.
    pub async fn gather(&self, input: &str) -> Result<GatheredReviews> {
        let product = self.resolver.resolve(input).await?;
        let reviews = self.fetcher.fetch(&product).await;
        Ok(GatheredReviews { product, reviews })
    }

    /// Analyze gathered reviews. An empty set never reaches the engine.
    pub async fn summarize(&self, gathered: GatheredReviews) -> Result<ProductDigest> {
        if gathered.reviews.is_empty() {
            return Err(DigestError::EmptyReviewSet {
                sku: gathered.product.sku.to_string(),
            });
        }

        let analysis = self.analyzer.analyze(&gathered.reviews).await;
        Ok(ProductDigest {
            review_count: gathered.reviews.len(),
            product: gathered.product,
            analysis,
        })
    }

    /// Full single-product run.
    pub async fn analyze(&self, input: &str) -> Result<ProductDigest> {
        let gathered = self.gather(input).await?;
        let digest = self.summarize(gathered).await?;
        info!(
            sku = %digest.product.sku,
            reviews = digest.review_count,
            backend = ?digest.analysis.backend,
            "Product analyzed"
        );
        Ok(digest)
    }

    pub fn resolver(&self) -> &ProductResolver {
        &self.resolver
    }

    pub fn analyzer(&self) -> &Arc<CachedAnalyzer> {
        &self.analyzer
    }
}
