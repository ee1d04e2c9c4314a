//! Side-by-side analysis of two products.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::{DigestError, Result};
use crate::pipeline::{DigestPipeline, ProductDigest};

/// Two product digests combined into one report.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub first: ProductDigest,
    pub second: ProductDigest,
}

impl ComparisonReport {
    pub fn render(&self) -> String {
        format!(
            "📊 Product comparison\n\n\
             🔵 {} (article {})\n\
             🔴 {} (article {})\n\n\
             First product analysis:\n{}\n\n\
             Second product analysis:\n{}\n\n\
             Conclusion:\nBased on the reviews, choose the product that better fits your needs.",
            self.first.product.display_name,
            self.first.product.sku,
            self.second.product.display_name,
            self.second.product.sku,
            self.first.analysis.text,
            self.second.analysis.text,
        )
    }
}

/// Runs two single-product pipelines and merges them.
///
/// Both products are resolved and their reviews gathered before any analysis,
/// so an empty side fails the whole comparison without backend calls.
pub struct ComparisonCoordinator {
    pipeline: Arc<DigestPipeline>,
}

impl ComparisonCoordinator {
    pub fn new(pipeline: Arc<DigestPipeline>) -> Self {
        Self { pipeline }
    }

    pub async fn compare(&self, input_a: &str, input_b: &str) -> Result<ComparisonReport> {
        let a = self.pipeline.gather(input_a).await?;
        let b = self.pipeline.gather(input_b).await?;

        for side in [&a, &b] {
            if side.reviews.is_empty() {
                return Err(DigestError::EmptyReviewSet {
                    sku: side.product.sku.to_string(),
                });
            }
        }

        let first = self.pipeline.summarize(a).await?;
        let second = self.pipeline.summarize(b).await?;

        info!(
            first = %first.product.sku,
            second = %second.product.sku,
            "Products compared"
        );

        Ok(ComparisonReport { first, second })
    }
}
