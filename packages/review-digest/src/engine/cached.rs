//! Memoizing wrapper around the analysis engine.

use std::sync::Arc;
use tracing::debug;

use super::fallback::AnalysisEngine;
use crate::cache::AnalysisCache;
use crate::types::analysis::{AnalysisResult, Fingerprint};
use crate::types::review::ReviewSet;

/// Consults the [`AnalysisCache`] before running the engine.
///
/// A hit costs zero backend calls. Exhausted outcomes are cached as the fixed
/// failure message, like any other result.
pub struct CachedAnalyzer {
    engine: AnalysisEngine,
    cache: Arc<AnalysisCache>,
}

impl CachedAnalyzer {
    pub fn new(engine: AnalysisEngine, cache: Arc<AnalysisCache>) -> Self {
        Self { engine, cache }
    }

    pub async fn analyze(&self, reviews: &ReviewSet) -> AnalysisResult {
        let fingerprint = Fingerprint::of(reviews);

        let (result, lookup) = self
            .cache
            .get_or_compute(fingerprint, || self.engine.analyze_text(reviews))
            .await;

        debug!(sku = %reviews.sku(), ?lookup, backend = ?result.backend, "Analysis ready");
        result
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    pub fn cache(&self) -> &Arc<AnalysisCache> {
        &self.cache
    }
}
