//! In-memory quota ledger and analysis archive for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::ledger::{AnalysisArchive, QuotaLedger};
use crate::types::record::{AnalysisRecord, UserId};

/// Attempts a user starts with before any purchase.
pub const DEFAULT_STARTING_ATTEMPTS: u32 = 3;

/// In-memory ledger and archive.
///
/// Not suitable for production as balances and history are lost on restart.
pub struct MemoryLedger {
    starting_attempts: u32,
    attempts: RwLock<HashMap<UserId, u32>>,
    analyses: RwLock<HashMap<UserId, Vec<AnalysisRecord>>>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_ATTEMPTS)
    }
}

impl MemoryLedger {
    pub fn new(starting_attempts: u32) -> Self {
        Self {
            starting_attempts,
            attempts: RwLock::new(HashMap::new()),
            analyses: RwLock::new(HashMap::new()),
        }
    }

    /// Set a user's balance directly (purchases, admin grants).
    pub fn set_attempts(&self, user: UserId, attempts: u32) {
        self.attempts.write().unwrap().insert(user, attempts);
    }

    pub fn add_attempts(&self, user: UserId, extra: u32) -> u32 {
        let mut attempts = self.attempts.write().unwrap();
        let balance = attempts.entry(user).or_insert(self.starting_attempts);
        *balance = balance.saturating_add(extra);
        *balance
    }

    pub fn analysis_count(&self, user: UserId) -> usize {
        self.analyses.read().unwrap().get(&user).map_or(0, |a| a.len())
    }
}

#[async_trait]
impl QuotaLedger for MemoryLedger {
    async fn attempts(&self, user: UserId) -> Result<u32> {
        Ok(self
            .attempts
            .read()
            .unwrap()
            .get(&user)
            .copied()
            .unwrap_or(self.starting_attempts))
    }

    async fn decrease_attempts(&self, user: UserId, amount: u32) -> Result<u32> {
        let mut attempts = self.attempts.write().unwrap();
        let balance = attempts.entry(user).or_insert(self.starting_attempts);
        *balance = balance.saturating_sub(amount);
        Ok(*balance)
    }
}

#[async_trait]
impl AnalysisArchive for MemoryLedger {
    async fn save_analysis(&self, user: UserId, sku: &str, name: &str, text: &str) -> Result<()> {
        let record = AnalysisRecord {
            user_id: user,
            sku: sku.to_string(),
            product_name: name.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.analyses
            .write()
            .unwrap()
            .entry(user)
            .or_default()
            .push(record);
        Ok(())
    }

    async fn last_analysis(&self, user: UserId) -> Result<Option<AnalysisRecord>> {
        Ok(self
            .analyses
            .read()
            .unwrap()
            .get(&user)
            .and_then(|a| a.last())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_users_get_starting_attempts() {
        let ledger = MemoryLedger::new(3);
        assert_eq!(ledger.attempts(1).await.unwrap(), 3);
        assert_eq!(ledger.decrease_attempts(1, 1).await.unwrap(), 2);
        assert_eq!(ledger.attempts(1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn balance_never_goes_negative() {
        let ledger = MemoryLedger::new(0);
        assert_eq!(ledger.decrease_attempts(1, 1).await.unwrap(), 0);

        let ledger = MemoryLedger::new(3);
        assert_eq!(ledger.decrease_attempts(1, 2).await.unwrap(), 1);
        assert_eq!(ledger.decrease_attempts(1, 2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn last_analysis_is_most_recent() {
        let ledger = MemoryLedger::default();
        ledger.save_analysis(1, "111", "Kettle", "first").await.unwrap();
        ledger.save_analysis(1, "222", "Mug", "second").await.unwrap();

        let last = ledger.last_analysis(1).await.unwrap().unwrap();
        assert_eq!(last.sku, "222");
        assert!(last.export_text().contains("Product: Mug"));
        assert!(ledger.last_analysis(2).await.unwrap().is_none());
        assert_eq!(ledger.analysis_count(1), 2);
    }
}
