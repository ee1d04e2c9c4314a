//! Analysis prompt template and output sanitizing.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::review::ReviewSet;

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

pub const PROS_HEADER: &str = "✅ PROS:";
pub const CONS_HEADER: &str = "❌ CONS:";
pub const RECOMMENDATIONS_HEADER: &str = "💡 RECOMMENDATIONS:";
pub const VERDICT_HEADER: &str = "📝 VERDICT:";

/// Build the generation prompt for a review sample.
///
/// Reviews are separated by a blank line. The four section headers are fixed
/// so downstream formatting can rely on them.
pub fn build_prompt(reviews: &ReviewSet) -> String {
    let reviews_text = reviews.texts().collect::<Vec<_>>().join("\n\n");

    format!(
        r#"Based on the following marketplace customer reviews, write a detailed analysis of the product.
Reviews:
{reviews_text}

Structure the answer exactly as follows:

{PROS_HEADER}
- [briefly list the main advantages that reviewers mention often, as bullet points]

{CONS_HEADER}
- [briefly list the main drawbacks and problems from the reviews, as bullet points]

{RECOMMENDATIONS_HEADER}
- [give 2-3 recommendations to potential buyers]

{VERDICT_HEADER}
[a short conclusion about the product in 1-2 sentences]

Do not add any links or advertising to the answer."#
    )
}

/// Strip URL-shaped substrings and surrounding whitespace from model output.
pub fn sanitize(text: &str) -> String {
    URL.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::Sku;
    use crate::types::review::{FeedbackPayload, RawReview};

    #[test]
    fn prompt_has_all_sections_and_reviews() {
        let payload = FeedbackPayload::new(vec![
            RawReview::new("Fits well", "1"),
            RawReview::new("Colour faded after a wash", "1"),
        ]);
        let set = ReviewSet::select(payload, &Sku::new("1"), 80);

        let prompt = build_prompt(&set);

        for header in [PROS_HEADER, CONS_HEADER, RECOMMENDATIONS_HEADER, VERDICT_HEADER] {
            assert!(prompt.contains(header), "missing {header}");
        }
        assert!(prompt.contains("Colour faded after a wash\n\nFits well"));
        assert!(prompt.contains("Do not add any links"));
    }

    #[test]
    fn sanitize_removes_urls() {
        let cleaned = sanitize("✅ PROS:\n- cheap http://spam.example/buy?x=1 really\nSee https://ads.example");
        assert_eq!(cleaned, "✅ PROS:\n- cheap  really\nSee");
    }

    #[test]
    fn sanitize_keeps_plain_text() {
        assert_eq!(sanitize("  no links here \n"), "no links here");
    }
}
