//! Interfaces of the quota ledger and analysis archive.
//!
//! Both are owned by the hosting application; the pipeline only consumes them.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::record::{AnalysisRecord, UserId};

/// Per-user analysis allowance.
#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Attempts the user has left.
    async fn attempts(&self, user: UserId) -> Result<u32>;

    /// Consume `amount` attempts in one step and return how many remain.
    /// The balance saturates at zero.
    async fn decrease_attempts(&self, user: UserId, amount: u32) -> Result<u32>;
}

/// Storage of completed analyses for later export.
#[async_trait]
pub trait AnalysisArchive: Send + Sync {
    async fn save_analysis(&self, user: UserId, sku: &str, name: &str, text: &str) -> Result<()>;

    /// Most recent analysis saved for the user.
    async fn last_analysis(&self, user: UserId) -> Result<Option<AnalysisRecord>>;
}
