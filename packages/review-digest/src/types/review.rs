//! Review records and the bounded review sample.

use serde::Serialize;

use super::product::Sku;

/// One review as delivered by a feedback mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawReview {
    pub text: String,
    /// SKU of the variant the review belongs to (`None` when upstream omits it).
    pub sku_tag: Option<String>,
}

impl RawReview {
    pub fn new(text: impl Into<String>, sku_tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sku_tag: Some(sku_tag.into()),
        }
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Everything one mirror returned for a root id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackPayload {
    pub reviews: Vec<RawReview>,
}

impl FeedbackPayload {
    pub fn new(reviews: Vec<RawReview>) -> Self {
        Self { reviews }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }
}

/// Reviews of exactly one SKU, longest first, capped.
///
/// Built only through [`ReviewSet::select`], so the ordering and cap hold for
/// every instance and the joined text is reproducible for identical upstream
/// data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSet {
    sku: Sku,
    reviews: Vec<RawReview>,
}

impl ReviewSet {
    /// Keep the reviews tagged with `sku`, sort by length descending and
    /// truncate to `cap`. The sort is stable: equal lengths keep feed order.
    /// Rating-only reviews (empty text) of the SKU are kept.
    pub fn select(payload: FeedbackPayload, sku: &Sku, cap: usize) -> Self {
        let mut reviews: Vec<RawReview> = payload
            .reviews
            .into_iter()
            .filter(|r| r.sku_tag.as_deref() == Some(sku.as_str()))
            .collect();

        reviews.sort_by_key(|r| std::cmp::Reverse(r.len()));
        reviews.truncate(cap);

        Self {
            sku: sku.clone(),
            reviews,
        }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn reviews(&self) -> &[RawReview] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.reviews.iter().map(|r| r.text.as_str())
    }

    /// Texts joined by newlines; the content half of the cache fingerprint.
    pub fn joined_text(&self) -> String {
        self.texts().collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(len: usize, sku: &str) -> RawReview {
        RawReview::new("x".repeat(len), sku)
    }

    #[test]
    fn select_drops_sibling_variants() {
        let payload = FeedbackPayload::new(vec![
            review(10, "111"),
            review(50, "222"),
            review(20, "111"),
        ]);

        let set = ReviewSet::select(payload, &Sku::new("111"), 80);

        assert_eq!(set.len(), 2);
        assert!(set.reviews().iter().all(|r| r.sku_tag.as_deref() == Some("111")));
    }

    #[test]
    fn select_orders_longest_first_and_caps() {
        let payload = FeedbackPayload::new((1..=85).map(|n| review(n, "7")).collect());

        let set = ReviewSet::select(payload, &Sku::new("7"), 80);

        assert_eq!(set.len(), 80);
        assert_eq!(set.reviews()[0].len(), 85);
        assert_eq!(set.reviews()[79].len(), 6);
        assert!(set.reviews().windows(2).all(|w| w[0].len() >= w[1].len()));
    }

    #[test]
    fn equal_lengths_keep_feed_order() {
        let payload = FeedbackPayload::new(vec![
            RawReview::new("aaa", "1"),
            RawReview::new("bbb", "1"),
            RawReview::new("cccc", "1"),
        ]);

        let set = ReviewSet::select(payload, &Sku::new("1"), 80);

        assert_eq!(set.joined_text(), "cccc\naaa\nbbb");
    }

    #[test]
    fn untagged_reviews_are_skipped() {
        let payload = FeedbackPayload::new(vec![
            RawReview {
                text: "no tag".into(),
                sku_tag: None,
            },
            RawReview::new("kept", "5"),
        ]);

        let set = ReviewSet::select(payload, &Sku::new("5"), 80);

        assert_eq!(set.texts().collect::<Vec<_>>(), vec!["kept"]);
    }

    #[test]
    fn rating_only_reviews_of_the_sku_are_kept() {
        let payload = FeedbackPayload::new(vec![
            RawReview::new("", "1"),
            RawReview::new("", "2"),
            RawReview::new("", "1"),
        ]);

        let set = ReviewSet::select(payload, &Sku::new("1"), 80);

        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert_eq!(set.joined_text(), "\n");
    }

    #[test]
    fn blank_reviews_sort_after_written_ones() {
        let payload = FeedbackPayload::new(vec![
            RawReview::new("", "1"),
            RawReview::new("solid", "1"),
        ]);

        let set = ReviewSet::select(payload, &Sku::new("1"), 80);

        assert_eq!(set.texts().collect::<Vec<_>>(), vec!["solid", ""]);
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(RawReview::new("чай", "1").len(), 3);
    }
}
