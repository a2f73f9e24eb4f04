use scene::reconcile::ReconcileError;

/// User-facing classification of a failed fetch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    NetworkFailure,
    MalformedResponse,
    ResultMismatch,
}

/// Why a fetch could not be applied.
///
/// Superseded responses are not represented here; the scheduler drops them
/// before they can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure (connection refused, reset, DNS, ...).
    Network { message: String },
    /// The service answered with a non-2xx status.
    Status { code: u16, body: String },
    /// The body was not valid JSON or lacked expected fields.
    Malformed { message: String },
    /// The result did not cover every required word.
    ResultMismatch { missing: Vec<String> },
    /// No answer within the configured request timeout.
    Timeout { after_ms: u64 },
    /// The credential collaborator could not produce a token.
    Auth { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        FetchError::Network {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        FetchError::Malformed {
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            FetchError::Network { .. }
            | FetchError::Status { .. }
            | FetchError::Timeout { .. }
            | FetchError::Auth { .. } => ErrorClass::NetworkFailure,
            FetchError::Malformed { .. } => ErrorClass::MalformedResponse,
            FetchError::ResultMismatch { .. } => ErrorClass::ResultMismatch,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network { message } => write!(f, "request failed: {message}"),
            FetchError::Status { code, body } if body.is_empty() => write!(f, "HTTP {code}"),
            FetchError::Status { code, body } => write!(f, "HTTP {code}: {body}"),
            FetchError::Malformed { message } => write!(f, "malformed response: {message}"),
            FetchError::ResultMismatch { missing } => {
                write!(f, "response is missing words: {}", missing.join(", "))
            }
            FetchError::Timeout { after_ms } => write!(f, "no response after {after_ms} ms"),
            FetchError::Auth { message } => write!(f, "authentication failed: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<ReconcileError> for FetchError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::ResultMismatch { missing } => FetchError::ResultMismatch { missing },
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::malformed(err.to_string())
    }
}
