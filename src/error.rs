use crate::transport::{BoxError, TransportError};

/// Error type returned by [`RequestExecutor::execute`](crate::RequestExecutor::execute).
///
/// Every failed call ends in exactly one of these variants. Nothing is
/// retried or recovered internally; the caller decides what to do next.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Transport-level failure other than lost connectivity.
    #[error("transport session error: {0}")]
    TransportSession(#[source] TransportError),
    /// A 2xx body could not be decoded into the requested type.
    #[error("decoding error: {0}")]
    Decoding(#[source] serde_json::Error),
    /// The transport returned something without a usable HTTP status.
    #[error("invalid response")]
    InvalidResponse,
    /// Server answered 401.
    #[error("unauthorized")]
    Unauthorized,
    /// Server answered 429.
    #[error("rate limited")]
    RateLimited,
    /// The descriptor has no `Authorization` header.
    #[error("missing credential")]
    MissingCredential,
    /// The descriptor did not resolve, or has no `Content-Type` header.
    #[error("invalid request")]
    InvalidRequest,
    /// Any status outside the classified set, including 404.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),
    /// Server answered with a 5xx status.
    #[error("server error")]
    ServerError,
    /// No connectivity, or the connection dropped mid-exchange.
    #[error("network failure")]
    NetworkFailure,
    /// The transport failed with an error it does not recognise.
    #[error("unknown error: {0}")]
    Unknown(#[source] BoxError),
}

impl ExecutorError {
    /// Returns the HTTP status carried by [`ExecutorError::UnexpectedStatus`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Why a [`RequestDescriptor`](crate::RequestDescriptor) could not be
/// turned into an [`HttpRequest`](crate::HttpRequest).
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("request has no url")]
    MissingUrl,
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported url scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("invalid header name '{0}'")]
    InvalidHeaderName(String),
    #[error("invalid value for header '{0}'")]
    InvalidHeaderValue(String),
    #[error("request body could not be produced: {0}")]
    Body(String),
}
