//! Feedback feed mirrors.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::review::FeedbackPayload;

/// One of the equivalent endpoints serving the feedback feed of a root id.
#[async_trait]
pub trait FeedbackMirror: Send + Sync {
    /// Short name used in logs ("primary", "secondary").
    fn name(&self) -> &str;

    /// Fetch every review in the feed for `root_id`.
    async fn fetch(&self, root_id: u64) -> Result<FeedbackPayload>;
}
