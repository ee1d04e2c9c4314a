//! Records exchanged with the quota ledger and analysis archive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the end user in the hosting chat platform.
pub type UserId = i64;

/// A saved analysis, as returned by the archive for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub user_id: UserId,
    pub sku: String,
    pub product_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Plain-text export body.
    pub fn export_text(&self) -> String {
        format!(
            "Product: {}\nArticle: {}\nDate: {}\n\n{}",
            self.product_name,
            self.sku,
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.text
        )
    }
}
