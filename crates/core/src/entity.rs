use serde::{Deserialize, Serialize};

/// Semantic category attached to a span by the entity labeler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    ShopName,
    Quantity,
    Price,
    Product,
    Total,
    /// Any tag outside the receipt vocabulary, kept verbatim.
    Other(String),
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityLabel::ShopName => write!(f, "SHOPNAME"),
            EntityLabel::Quantity => write!(f, "QUANTITY"),
            EntityLabel::Price => write!(f, "PRICE"),
            EntityLabel::Product => write!(f, "PRODUCT"),
            EntityLabel::Total => write!(f, "TOTAL"),
            EntityLabel::Other(s) => write!(f, "{s}"),
        }
    }
}

impl std::str::FromStr for EntityLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "SHOPNAME" => EntityLabel::ShopName,
            "QUANTITY" => EntityLabel::Quantity,
            "PRICE" => EntityLabel::Price,
            "PRODUCT" => EntityLabel::Product,
            "TOTAL" => EntityLabel::Total,
            other => EntityLabel::Other(other.to_string()),
        })
    }
}

impl From<String> for EntityLabel {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(label) => label,
            Err(never) => match never {},
        }
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.to_string()
    }
}

/// A contiguous fragment of recognized text tagged with a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSpan {
    pub text: String,
    pub label: EntityLabel,
}

impl LabeledSpan {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self { text: text.into(), label }
    }
}

/// Labeled spans in the reading order of the receipt (top to bottom,
/// left to right within a line).
///
/// Item grouping in [`crate::assemble`] relies on this order: a labeler that
/// reorders its output must restore reading order before building this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabeledSpans(Vec<LabeledSpan>);

impl LabeledSpans {
    /// Wrap spans that are already in reading order.
    pub fn in_reading_order(spans: Vec<LabeledSpan>) -> Self {
        Self(spans)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledSpan> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[LabeledSpan] {
        &self.0
    }
}

impl FromIterator<LabeledSpan> for LabeledSpans {
    fn from_iter<I: IntoIterator<Item = LabeledSpan>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for LabeledSpans {
    type Item = LabeledSpan;
    type IntoIter = std::vec::IntoIter<LabeledSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LabeledSpans {
    type Item = &'a LabeledSpan;
    type IntoIter = std::slice::Iter<'a, LabeledSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_roundtrip_known_tags() {
        for tag in ["SHOPNAME", "QUANTITY", "PRICE", "PRODUCT", "TOTAL"] {
            let label: EntityLabel = tag.parse().unwrap();
            assert!(!matches!(label, EntityLabel::Other(_)), "{tag} parsed as Other");
            assert_eq!(label.to_string(), tag);
        }
    }

    #[test]
    fn unknown_tag_kept_verbatim() {
        let label: EntityLabel = "DATE".parse().unwrap();
        assert_eq!(label, EntityLabel::Other("DATE".into()));
        assert_eq!(label.to_string(), "DATE");
    }

    #[test]
    fn tags_are_case_sensitive() {
        let label: EntityLabel = "total".parse().unwrap();
        assert_eq!(label, EntityLabel::Other("total".into()));
    }

    #[test]
    fn label_serializes_as_tag_string() {
        let span = LabeledSpan::new("ShopCo", EntityLabel::ShopName);
        let json = serde_json::to_value(&span).unwrap();
        assert_eq!(json, serde_json::json!({"text": "ShopCo", "label": "SHOPNAME"}));

        let back: LabeledSpan = serde_json::from_value(json).unwrap();
        assert_eq!(back, span);
    }

    #[test]
    fn spans_preserve_insertion_order() {
        let spans: LabeledSpans = ["a", "b", "c"]
            .into_iter()
            .map(|t| LabeledSpan::new(t, EntityLabel::Product))
            .collect();
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert_eq!(spans.len(), 3);
    }
}
