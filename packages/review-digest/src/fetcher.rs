//! Review retrieval with a single mirror failover, and sampling.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DigestError, Result};
use crate::traits::feedback::FeedbackMirror;
use crate::types::product::{ProductRecord, Sku};
use crate::types::review::{FeedbackPayload, ReviewSet};

/// Fetches the feedback feed from a primary mirror, falling back once to a
/// secondary, then reduces it to a [`ReviewSet`].
pub struct ReviewFetcher {
    primary: Arc<dyn FeedbackMirror>,
    secondary: Arc<dyn FeedbackMirror>,
    timeout: Duration,
    cap: usize,
}

impl ReviewFetcher {
    pub fn new(
        primary: Arc<dyn FeedbackMirror>,
        secondary: Arc<dyn FeedbackMirror>,
        timeout: Duration,
        cap: usize,
    ) -> Self {
        Self {
            primary,
            secondary,
            timeout,
            cap,
        }
    }

    /// Primary first; error, timeout or an empty feed moves to the secondary.
    /// A failing secondary yields an empty payload.
    pub async fn fetch_raw(&self, root_id: u64) -> FeedbackPayload {
        match self.fetch_from(self.primary.as_ref(), root_id).await {
            Ok(payload) if !payload.is_empty() => return payload,
            Ok(_) => {
                warn!(root_id, mirror = self.primary.name(), "Empty feed, trying next mirror");
            }
            Err(e) => {
                warn!(root_id, mirror = self.primary.name(), error = %e, "Mirror failed, trying next mirror");
            }
        }

        match self.fetch_from(self.secondary.as_ref(), root_id).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(root_id, mirror = self.secondary.name(), error = %e, "Fallback mirror failed");
                FeedbackPayload::empty()
            }
        }
    }

    async fn fetch_from(&self, mirror: &dyn FeedbackMirror, root_id: u64) -> Result<FeedbackPayload> {
        let payload = tokio::time::timeout(self.timeout, mirror.fetch(root_id))
            .await
            .map_err(|_| {
                DigestError::Upstream(format!(
                    "{} mirror timed out after {:?}",
                    mirror.name(),
                    self.timeout
                ))
            })??;

        debug!(root_id, mirror = mirror.name(), count = payload.len(), "Fetched feed");
        Ok(payload)
    }

    pub fn filter_and_cap(&self, payload: FeedbackPayload, sku: &Sku) -> ReviewSet {
        ReviewSet::select(payload, sku, self.cap)
    }

    /// Fetch and sample the reviews of one resolved product.
    pub async fn fetch(&self, record: &ProductRecord) -> ReviewSet {
        let payload = self.fetch_raw(record.root_id).await;
        let fetched = payload.len();
        let set = self.filter_and_cap(payload, &record.sku);

        info!(
            sku = %record.sku,
            root_id = record.root_id,
            fetched,
            kept = set.len(),
            "Selected reviews"
        );

        set
    }
}
