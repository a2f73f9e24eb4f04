use std::collections::BTreeSet;

use crate::protocol::SearchRequest;

/// The debounced unit of work.
///
/// Languages are a sorted set, so two queries are equal whenever phrase,
/// language filter and per-language budget agree, regardless of the order
/// the filters were toggled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub text: String,
    pub languages: BTreeSet<String>,
    pub words_per_language: usize,
}

impl SearchQuery {
    pub fn new<I, S>(text: impl Into<String>, languages: I, words_per_language: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            languages: languages.into_iter().map(Into::into).collect(),
            words_per_language,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn to_request(&self, projection_id: Option<&str>) -> SearchRequest {
        SearchRequest {
            text: self.text.clone(),
            languages: self.languages.iter().cloned().collect(),
            words_per_language: self.words_per_language,
            projection_id: projection_id.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SearchQuery;

    #[test]
    fn language_order_does_not_matter() {
        let a = SearchQuery::new("cat", ["English", "Spanish"], 20);
        let b = SearchQuery::new("cat", ["Spanish", "English"], 20);
        assert_eq!(a, b);
    }

    #[test]
    fn every_field_participates_in_equality() {
        let base = SearchQuery::new("cat", ["English"], 20);
        assert_ne!(base, SearchQuery::new("cats", ["English"], 20));
        assert_ne!(base, SearchQuery::new("cat", ["English", "French"], 20));
        assert_ne!(base, SearchQuery::new("cat", ["English"], 10));
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        assert!(SearchQuery::new("   ", ["English"], 20).is_blank());
        assert!(!SearchQuery::new(" a ", ["English"], 20).is_blank());
    }
}
