//! Ordered backend fallback: first success wins.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::prompt::{build_prompt, sanitize};
use crate::error::BackendError;
use crate::traits::backend::GenerationBackend;
use crate::types::analysis::{AnalysisOutcome, AnalysisResult, CandidateFailure};
use crate::types::review::ReviewSet;

/// Obtains an analysis from an ordered list of backend candidates.
///
/// Each candidate gets one call bounded by `timeout`. The first candidate
/// returning non-empty sanitized text wins and the rest are never called.
/// The engine never returns an error; exhaustion is reported as
/// [`AnalysisOutcome::Exhausted`].
pub struct AnalysisEngine {
    candidates: Vec<Arc<dyn GenerationBackend>>,
    timeout: Duration,
}

impl AnalysisEngine {
    pub fn new(candidates: Vec<Arc<dyn GenerationBackend>>, timeout: Duration) -> Self {
        Self { candidates, timeout }
    }

    pub fn candidate_ids(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.id()).collect()
    }

    pub async fn analyze(&self, reviews: &ReviewSet) -> AnalysisOutcome {
        let prompt = build_prompt(reviews);
        debug!(
            sku = %reviews.sku(),
            reviews = reviews.len(),
            prompt_chars = prompt.chars().count(),
            "Built analysis prompt"
        );
        self.generate(&prompt).await
    }

    /// Like [`analyze`](Self::analyze), substituting the fixed failure
    /// message on exhaustion.
    pub async fn analyze_text(&self, reviews: &ReviewSet) -> AnalysisResult {
        self.analyze(reviews).await.into_result()
    }

    async fn generate(&self, prompt: &str) -> AnalysisOutcome {
        let mut failures = Vec::new();

        for candidate in &self.candidates {
            let start = Instant::now();
            match self.call(candidate.as_ref(), prompt).await {
                Ok(text) => {
                    info!(
                        backend = candidate.id(),
                        duration_ms = start.elapsed().as_millis(),
                        skipped_failures = failures.len(),
                        "Analysis generated"
                    );
                    return AnalysisOutcome::Generated(AnalysisResult::generated(
                        text,
                        candidate.id(),
                    ));
                }
                Err(e) => {
                    warn!(backend = candidate.id(), error = %e, "Backend candidate failed");
                    failures.push(CandidateFailure {
                        backend: candidate.id().to_string(),
                        error: e,
                    });
                }
            }
        }

        error!(candidates = failures.len(), "All backend candidates failed");
        AnalysisOutcome::Exhausted { failures }
    }

    async fn call(&self, candidate: &dyn GenerationBackend, prompt: &str) -> Result<String, BackendError> {
        let raw = tokio::time::timeout(self.timeout, candidate.generate(prompt, self.timeout))
            .await
            .map_err(|_| BackendError::Timeout(self.timeout))??;

        let cleaned = sanitize(&raw);
        if cleaned.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(cleaned)
    }
}
