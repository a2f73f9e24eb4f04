//! Bearer credential collaborator.

use crate::backend::BoxFuture;
use streaming::error::FetchError;

/// Supplies the bearer token attached to every service call.
///
/// `Ok(None)` means the service is called anonymously.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> BoxFuture<'_, Result<Option<String>, FetchError>>;
}

/// A token fixed at startup (for example from `WORDSPACE_TOKEN`).
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> BoxFuture<'_, Result<Option<String>, FetchError>> {
        let token = self.0.clone();
        Box::pin(async move { Ok(token) })
    }
}
