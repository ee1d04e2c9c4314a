//! Configuration for the digest pipeline.

use std::time::Duration;

/// Tunables for resolution, sampling, generation and caching.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Substrings that mark input as a marketplace link (case-insensitive).
    ///
    /// Link input must contain a 7-15 digit run; anything else is taken as
    /// a SKU verbatim. Default: `["wildberries"]`.
    pub domain_markers: Vec<String>,

    /// Maximum reviews kept per product. Default: 80.
    pub review_cap: usize,

    /// Upper bound for one feedback mirror request. Default: 15s.
    pub mirror_timeout: Duration,

    /// Upper bound for one backend candidate call. Default: 30s.
    pub backend_timeout: Duration,

    /// Number of cached analyses. Default: 100.
    pub cache_capacity: usize,

    /// Idle time after which a half-finished comparison is dropped.
    ///
    /// Default: 10 minutes.
    pub session_timeout: Duration,

    /// Catalog search result limit. Default: 10.
    pub search_limit: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            domain_markers: vec!["wildberries".to_string()],
            review_cap: 80,
            mirror_timeout: Duration::from_secs(15),
            backend_timeout: Duration::from_secs(30),
            cache_capacity: 100,
            session_timeout: Duration::from_secs(600),
            search_limit: 10,
        }
    }
}

impl DigestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain_markers(mut self, markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.domain_markers = markers.into_iter().map(|m| m.into()).collect();
        self
    }

    pub fn with_review_cap(mut self, cap: usize) -> Self {
        self.review_cap = cap;
        self
    }

    pub fn with_mirror_timeout(mut self, timeout: Duration) -> Self {
        self.mirror_timeout = timeout;
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }
}
