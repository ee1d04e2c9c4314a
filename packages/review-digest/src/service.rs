//! Quota-aware entry points for a hosting application.

use std::sync::Arc;
use tracing::{info, warn};

use crate::comparison::{ComparisonCoordinator, ComparisonReport};
use crate::error::{DigestError, Result};
use crate::pipeline::{DigestPipeline, ProductDigest};
use crate::traits::catalog::Catalog;
use crate::traits::ledger::{AnalysisArchive, QuotaLedger};
use crate::types::product::CatalogListing;
use crate::types::record::{AnalysisRecord, UserId};

/// Cost of a single-product analysis, in attempts.
pub const ANALYSIS_COST: u32 = 1;

/// Cost of a comparison, in attempts.
pub const COMPARISON_COST: u32 = 2;

/// A digest together with the balance left after paying for it.
#[derive(Debug, Clone)]
pub struct ChargedDigest {
    pub digest: ProductDigest,
    pub remaining_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct ChargedComparison {
    pub report: ComparisonReport,
    pub remaining_attempts: u32,
}

/// Runs the pipeline on behalf of a user, charging the quota ledger only for
/// completed work.
pub struct DigestService {
    pipeline: Arc<DigestPipeline>,
    comparisons: ComparisonCoordinator,
    catalog: Arc<dyn Catalog>,
    ledger: Arc<dyn QuotaLedger>,
    archive: Arc<dyn AnalysisArchive>,
    search_limit: usize,
}

impl DigestService {
    pub fn new(
        pipeline: Arc<DigestPipeline>,
        catalog: Arc<dyn Catalog>,
        ledger: Arc<dyn QuotaLedger>,
        archive: Arc<dyn AnalysisArchive>,
        search_limit: usize,
    ) -> Self {
        Self {
            comparisons: ComparisonCoordinator::new(pipeline.clone()),
            pipeline,
            catalog,
            ledger,
            archive,
            search_limit,
        }
    }

    pub async fn analyze_for_user(&self, user: UserId, input: &str) -> Result<ChargedDigest> {
        self.require_attempts(user, ANALYSIS_COST).await?;

        let digest = self.pipeline.analyze(input).await?;

        let remaining_attempts = self.ledger.decrease_attempts(user, ANALYSIS_COST).await?;

        // The user has paid for the digest; a lost history entry must not hide it.
        if let Err(e) = self
            .archive
            .save_analysis(
                user,
                digest.product.sku.as_str(),
                &digest.product.display_name,
                &digest.analysis.text,
            )
            .await
        {
            warn!(user, sku = %digest.product.sku, error = %e, "Failed to archive analysis");
        }

        info!(user, sku = %digest.product.sku, remaining_attempts, "Charged analysis");
        Ok(ChargedDigest {
            digest,
            remaining_attempts,
        })
    }

    /// Compare two products. Both attempts are deducted only after both
    /// analyses have completed.
    pub async fn compare_for_user(&self, user: UserId, input_a: &str, input_b: &str) -> Result<ChargedComparison> {
        self.require_attempts(user, COMPARISON_COST).await?;

        let report = self.comparisons.compare(input_a, input_b).await?;

        let remaining_attempts = self.ledger.decrease_attempts(user, COMPARISON_COST).await?;

        info!(user, remaining_attempts, "Charged comparison");
        Ok(ChargedComparison {
            report,
            remaining_attempts,
        })
    }

    pub async fn last_analysis(&self, user: UserId) -> Result<Option<AnalysisRecord>> {
        self.archive.last_analysis(user).await
    }

    /// Popular catalog products for a query. Free of charge.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogListing>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DigestError::invalid_input("empty search query"));
        }
        self.catalog.search(query, self.search_limit).await
    }

    pub fn pipeline(&self) -> &Arc<DigestPipeline> {
        &self.pipeline
    }

    async fn require_attempts(&self, user: UserId, required: u32) -> Result<()> {
        let available = self.ledger.attempts(user).await?;
        if available < required {
            return Err(DigestError::InsufficientAttempts {
                required,
                available,
            });
        }
        Ok(())
    }
}
