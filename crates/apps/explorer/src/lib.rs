//! Word-embedding explorer host: session controller, service client and
//! the async loop that drives them.

pub mod auth;
pub mod backend;
pub mod config;
pub mod driver;
pub mod logging;
pub mod session;

pub use auth::{StaticToken, TokenProvider};
pub use backend::{BoxFuture, FetchResult, HttpBackend, SearchBackend, WireRequest};
pub use config::ExplorerConfig;
pub use driver::{ExplorerRuntime, Input};
pub use logging::init_tracing;
pub use session::{RenderSnapshot, RenderedWord, Session, SessionConfig};
