//! Embedding service access.
//!
//! `SearchBackend` is the seam between the session and the network. The
//! runtime only ever talks to `dyn SearchBackend`, so tests swap in an
//! in-memory fake.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use streaming::error::FetchError;
use streaming::protocol::{CorpusResponse, RecenterRequest, SearchRequest};
use streaming::request::FetchRequest;

use crate::auth::TokenProvider;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type FetchResult = Result<CorpusResponse, FetchError>;

/// A fetch ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum WireRequest {
    Index,
    Search(SearchRequest),
    Recenter(RecenterRequest),
}

impl WireRequest {
    /// Encodes `request`, echoing the current projection id.
    pub fn from_fetch(request: &FetchRequest, projection_id: Option<&str>) -> Self {
        match request {
            FetchRequest::Index => WireRequest::Index,
            FetchRequest::Search(query) => WireRequest::Search(query.to_request(projection_id)),
            FetchRequest::Recenter(query) => WireRequest::Recenter(RecenterRequest {
                words: query.active.iter().cloned().collect(),
                search_history: query.history.clone(),
                projection_id: projection_id.map(str::to_string),
            }),
        }
    }
}

/// Trait for embedding services.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait SearchBackend: Send + Sync {
    /// Initial corpus seed.
    fn fetch_index(&self) -> BoxFuture<'_, FetchResult>;

    fn search(&self, request: SearchRequest) -> BoxFuture<'_, FetchResult>;

    /// Coordinates for the union of the active words and the search history.
    fn recenter(&self, request: RecenterRequest) -> BoxFuture<'_, FetchResult>;

    fn send(&self, request: WireRequest) -> BoxFuture<'_, FetchResult> {
        match request {
            WireRequest::Index => self.fetch_index(),
            WireRequest::Search(r) => self.search(r),
            WireRequest::Recenter(r) => self.recenter(r),
        }
    }
}

/// JSON-over-HTTP client for the embedding service.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::network(format!("client init: {e}")))?;
        Ok(Self::with_client(client, base_url, tokens))
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route)
    }

    async fn execute(&self, builder: RequestBuilder) -> FetchResult {
        let mut builder = builder.header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.tokens.token().await? {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(format!("reading body: {e}")))?;

        if !status.is_success() {
            tracing::warn!(%status, "embedding service returned an error status");
            return Err(FetchError::Status {
                code: status.as_u16(),
                body,
            });
        }
        CorpusResponse::from_json(&body)
    }
}

impl SearchBackend for HttpBackend {
    fn fetch_index(&self) -> BoxFuture<'_, FetchResult> {
        Box::pin(async move { self.execute(self.client.get(self.url("index"))).await })
    }

    fn search(&self, request: SearchRequest) -> BoxFuture<'_, FetchResult> {
        Box::pin(async move {
            self.execute(self.client.post(self.url("search")).json(&request))
                .await
        })
    }

    fn recenter(&self, request: RecenterRequest) -> BoxFuture<'_, FetchResult> {
        Box::pin(async move {
            self.execute(self.client.post(self.url("pca")).json(&request))
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpBackend, WireRequest};
    use crate::auth::StaticToken;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use streaming::query::SearchQuery;
    use streaming::request::{FetchRequest, RecenterQuery};

    #[test]
    fn search_carries_language_names_and_projection() {
        let query = SearchQuery::new("bed", ["English", "French"], 20);
        match WireRequest::from_fetch(&FetchRequest::Search(query), Some("p7")) {
            WireRequest::Search(r) => {
                assert_eq!(r.text, "bed");
                assert_eq!(r.languages, vec!["English", "French"]);
                assert_eq!(r.projection_id.as_deref(), Some("p7"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn recenter_sends_active_words_and_history() {
        let query = RecenterQuery {
            active: ["cat", "dog"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            history: vec!["bed".into()],
        };
        match WireRequest::from_fetch(&FetchRequest::Recenter(query), None) {
            WireRequest::Recenter(r) => {
                assert_eq!(r.words, vec!["cat", "dog"]);
                assert_eq!(r.search_history, vec!["bed"]);
                assert_eq!(r.projection_id, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn base_url_is_normalised() {
        let backend = HttpBackend::with_client(
            reqwest::Client::new(),
            "http://localhost:8000/api/",
            Arc::new(StaticToken::anonymous()),
        );
        assert_eq!(backend.base_url(), "http://localhost:8000/api");
        assert_eq!(backend.url("search"), "http://localhost:8000/api/search");
    }
}
