use serde::Deserialize;

/// Response of the catalog card endpoint: `{ data: { products: [...] } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardResponse {
    pub data: Option<CardData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardData {
    #[serde(default)]
    pub products: Vec<CardProduct>,
}

/// A single product card. Only the fields the digest pipeline reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct CardProduct {
    pub name: Option<String>,
    /// Grouping id shared by every color/size variant of the card.
    pub root: Option<u64>,
}

impl CardResponse {
    /// First product of the card, if the body carried any.
    pub fn first_product(&self) -> Option<&CardProduct> {
        self.data.as_ref().and_then(|d| d.products.first())
    }
}

/// Response of a feedback mirror. The upstream sends `null` instead of `[]`
/// for items without reviews.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackResponse {
    pub feedbacks: Option<Vec<Feedback>>,
}

impl FeedbackResponse {
    pub fn is_empty(&self) -> bool {
        self.feedbacks.as_ref().map_or(true, |f| f.is_empty())
    }

    pub fn into_feedbacks(self) -> Vec<Feedback> {
        self.feedbacks.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feedback {
    pub text: Option<String>,
    /// SKU of the variant the review was written for.
    #[serde(rename = "nmId")]
    pub nm_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    pub data: Option<SearchData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub products: Vec<SearchProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchProduct {
    pub id: Option<u64>,
    pub name: Option<String>,
    /// Price in kopecks.
    #[serde(rename = "priceU")]
    pub price_u: Option<u64>,
    pub rating: Option<f64>,
    pub feedbacks: Option<u64>,
}

/// Which of the two equivalent feedback endpoints to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    Primary,
    Secondary,
}

impl std::fmt::Display for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mirror::Primary => write!(f, "primary"),
            Mirror::Secondary => write!(f, "secondary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_response_parses_nested_products() {
        let body = r#"{"data":{"products":[{"id":123456789,"name":"Kettle","root":555,"brand":"Acme","sizes":[]}]}}"#;
        let card: CardResponse = serde_json::from_str(body).unwrap();
        let product = card.first_product().unwrap();
        assert_eq!(product.root, Some(555));
        assert_eq!(product.name.as_deref(), Some("Kettle"));
    }

    #[test]
    fn card_response_without_products_has_no_first() {
        let card: CardResponse = serde_json::from_str(r#"{"data":{"products":[]}}"#).unwrap();
        assert!(card.first_product().is_none());

        let card: CardResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(card.first_product().is_none());
    }

    #[test]
    fn null_feedbacks_are_empty() {
        let resp: FeedbackResponse = serde_json::from_str(r#"{"feedbacks":null}"#).unwrap();
        assert!(resp.is_empty());
        assert!(resp.into_feedbacks().is_empty());
    }

    #[test]
    fn feedback_reads_nm_id() {
        let resp: FeedbackResponse =
            serde_json::from_str(r#"{"feedbacks":[{"text":"Great","nmId":42,"productValuation":5}]}"#)
                .unwrap();
        let feedbacks = resp.into_feedbacks();
        assert_eq!(feedbacks[0].nm_id, Some(42));
        assert_eq!(feedbacks[0].text.as_deref(), Some("Great"));
    }

    #[test]
    fn rating_only_feedback_parses_with_null_text() {
        let resp: FeedbackResponse = serde_json::from_str(
            r#"{"feedbacks":[{"text":null,"nmId":42,"productValuation":300}]}"#,
        )
        .unwrap();
        let feedbacks = resp.into_feedbacks();
        assert!(feedbacks[0].text.is_none());
        assert_eq!(feedbacks[0].nm_id, Some(42));
    }
}
