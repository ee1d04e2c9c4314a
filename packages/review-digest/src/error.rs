//! Typed errors for the review digest library.
//!
//! Resolver and fetcher failures surface as [`DigestError`]. Generation
//! backend failures are [`BackendError`] and never leave the analysis engine.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the digest pipeline.
#[derive(Debug, Error)]
pub enum DigestError {
    /// No SKU could be derived from the user's input
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The catalog has no usable product for this SKU
    #[error("product not found: {sku}")]
    ProductNotFound { sku: String },

    /// Transport failure or non-200 from an upstream service
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The product has no reviews for the requested SKU
    #[error("no reviews found for: {sku}")]
    EmptyReviewSet { sku: String },

    /// The quota ledger does not allow this operation
    #[error("not enough attempts: {required} required, {available} available")]
    InsufficientAttempts { required: u32, available: u32 },

    /// Quota ledger or analysis archive failed
    #[error("ledger error: {0}")]
    Ledger(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DigestError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Message shown to end users. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => {
                "Please send a product link or article number."
            }
            Self::EmptyReviewSet { .. } => "No reviews found for this product.",
            Self::InsufficientAttempts { .. } => {
                "You have run out of analysis attempts."
            }
            _ => "Sorry, something went wrong while analyzing the product. Please try again later.",
        }
    }
}

/// Failure of a single generation backend candidate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("call failed: {0}")]
    Call(String),

    #[error("empty response")]
    EmptyResponse,
}

/// Errors from the comparison session state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no comparison in progress")]
    NoActiveSession,

    #[error("not a product link or article number: {input}")]
    InvalidInput { input: String },
}

/// Result type alias for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;

/// Result type alias for a single backend call.
pub type BackendResult<T> = std::result::Result<T, BackendError>;
