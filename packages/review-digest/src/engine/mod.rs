//! Prompt construction and ordered multi-backend generation.

pub mod cached;
pub mod fallback;
pub mod prompt;

pub use cached::CachedAnalyzer;
pub use fallback::AnalysisEngine;
pub use prompt::{build_prompt, sanitize};
