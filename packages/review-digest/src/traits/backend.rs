//! Text generation backends.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::BackendResult;

/// One text-generation candidate (a provider/model pair).
///
/// Adapters report failures as values; the engine decides what to try next.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Stable identifier, recorded on the results this backend produces.
    fn id(&self) -> &str;

    /// Generate text for `prompt`, giving up after `timeout`.
    async fn generate(&self, prompt: &str, timeout: Duration) -> BackendResult<String>;
}
