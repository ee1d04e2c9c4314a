//! Analysis results, engine outcomes and cache fingerprints.

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::product::Sku;
use super::review::ReviewSet;
use crate::error::BackendError;

/// Text returned in place of an analysis when every backend candidate failed.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Could not analyze the reviews right now. Please try again later.";

/// Cache key: the SKU plus a digest of the exact review-set text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub sku: Sku,
    pub digest: String,
}

impl Fingerprint {
    pub fn new(sku: &Sku, joined_text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(joined_text.as_bytes());
        Self {
            sku: sku.clone(),
            digest: format!("{:x}", hasher.finalize()),
        }
    }

    pub fn of(reviews: &ReviewSet) -> Self {
        Self::new(reviews.sku(), &reviews.joined_text())
    }
}

/// A structured qualitative summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub text: String,
    /// Backend candidate that produced the text; `None` for the failure message.
    pub backend: Option<String>,
}

impl AnalysisResult {
    pub fn generated(text: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            backend: Some(backend.into()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            text: ANALYSIS_FAILED_MESSAGE.to_string(),
            backend: None,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.backend.is_some()
    }
}

/// Why one candidate did not produce an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    pub backend: String,
    pub error: BackendError,
}

/// What the engine got out of its candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Generated(AnalysisResult),
    /// Every candidate failed, in order.
    Exhausted { failures: Vec<CandidateFailure> },
}

impl AnalysisOutcome {
    /// Collapse to a result, substituting the fixed failure message.
    pub fn into_result(self) -> AnalysisResult {
        match self {
            Self::Generated(result) => result,
            Self::Exhausted { .. } => AnalysisResult::unavailable(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}
