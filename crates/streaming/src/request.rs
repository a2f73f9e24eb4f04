use std::collections::BTreeSet;

use crate::query::SearchQuery;

/// What a fetch asks the embedding service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Initial corpus seed.
    Index,
    Search(SearchQuery),
    Recenter(RecenterQuery),
}

impl FetchRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchRequest::Index => "index",
            FetchRequest::Search(_) => "search",
            FetchRequest::Recenter(_) => "recenter",
        }
    }

    pub fn as_search(&self) -> Option<&SearchQuery> {
        match self {
            FetchRequest::Search(q) => Some(q),
            _ => None,
        }
    }
}

/// Recompute coordinates for the active words plus everything searched so
/// far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecenterQuery {
    pub active: BTreeSet<String>,
    pub history: Vec<String>,
}

impl RecenterQuery {
    /// Every word the response must contain.
    pub fn required(&self) -> BTreeSet<String> {
        self.active
            .iter()
            .chain(self.history.iter())
            .cloned()
            .collect()
    }
}
