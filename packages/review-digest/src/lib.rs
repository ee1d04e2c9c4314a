//! Review digest: retrieve, sample, summarize and compare product reviews.
//!
//! The pipeline turns free-form user input (an article number or a
//! marketplace link) into a structured summary of customer reviews:
//!
//! 1. [`ProductResolver`] derives the SKU and looks up its variant group.
//! 2. [`ReviewFetcher`] reads the group's feedback feed from a primary mirror,
//!    failing over once to a secondary, and keeps the 80 longest reviews of
//!    the exact SKU.
//! 3. [`CachedAnalyzer`] checks the [`AnalysisCache`] and otherwise asks the
//!    [`AnalysisEngine`], which tries its backend candidates in order until
//!    one succeeds.
//!
//! [`ComparisonCoordinator`] runs two pipelines side by side and
//! [`DigestService`] charges a [`QuotaLedger`] for completed work.
//!
//! # Usage
//!
//! ```rust,ignore
//! use review_digest::{AnalysisCache, DigestConfig, DigestPipeline};
//! use review_digest::testing::{MockBackend, MockCatalog, MockMirror};
//!
//! let config = DigestConfig::default();
//! let pipeline = DigestPipeline::assemble(
//!     &config,
//!     Arc::new(MockCatalog::new().with_product("1234567", "Kettle", 42)),
//!     Arc::new(MockMirror::new("primary")),
//!     Arc::new(MockMirror::new("secondary")),
//!     vec![Arc::new(MockBackend::responding("gpt-4", "✅ PROS: ..."))],
//!     Arc::new(AnalysisCache::new(config.cache_capacity)),
//! );
//!
//! let digest = pipeline.analyze("1234567").await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams for the catalog, feedback mirrors, backends and ledger
//! - [`types`] - Products, reviews, results and configuration
//! - [`engine`] - Prompt template and ordered backend fallback
//! - [`adapters`] - Implementations over the marketplace and chat clients
//! - [`stores`] - In-memory ledger and archive
//! - [`testing`] - Mock implementations for testing

pub mod adapters;
pub mod cache;
pub mod comparison;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod resolver;
pub mod service;
pub mod session;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use cache::{AnalysisCache, Lookup};
pub use comparison::{ComparisonCoordinator, ComparisonReport};
pub use engine::{build_prompt, sanitize, AnalysisEngine, CachedAnalyzer};
pub use error::{BackendError, DigestError, SessionError};
pub use fetcher::ReviewFetcher;
pub use pipeline::{DigestPipeline, GatheredReviews, ProductDigest};
pub use resolver::{resolve_input, ProductResolver};
pub use service::{ChargedComparison, ChargedDigest, DigestService};
pub use session::{ComparisonSessions, SessionState, SessionStep};
pub use stores::MemoryLedger;
pub use traits::{
    backend::GenerationBackend,
    catalog::Catalog,
    feedback::FeedbackMirror,
    ledger::{AnalysisArchive, QuotaLedger},
};
pub use types::{
    analysis::{AnalysisOutcome, AnalysisResult, CandidateFailure, Fingerprint, ANALYSIS_FAILED_MESSAGE},
    config::DigestConfig,
    product::{CatalogListing, CatalogProduct, ProductRecord, Sku},
    record::{AnalysisRecord, UserId},
    review::{FeedbackPayload, RawReview, ReviewSet},
};
