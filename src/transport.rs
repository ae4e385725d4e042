use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;

use crate::{HttpRequest, TransportOptions};

/// Boxed error a [`Transport`] may fail with.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Performs one HTTP round trip.
///
/// Implementations should fail with a [`TransportError`] (or a
/// `reqwest::Error` / `std::io::Error`, which are recognised as well).
/// Any other error type is reported to the caller as
/// [`ExecutorError::Unknown`](crate::ExecutorError::Unknown).
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send;
}

/// Raw response returned by a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// `None` when the transport produced a response that is not HTTP.
    pub status: Option<u16>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }

    pub fn without_status(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: None,
            body: body.into(),
        }
    }
}

/// Cause of a transport failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// No route to the peer: refused, unreachable, or offline.
    NotConnected,
    /// An established connection dropped before the response completed.
    ConnectionLost,
    TimedOut,
    /// The in-flight call was aborted by its runtime.
    Cancelled,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotConnected => "not connected",
            Self::ConnectionLost => "connection lost",
            Self::TimedOut => "timed out",
            Self::Cancelled => "cancelled",
            Self::Other => "transport failure",
        };
        f.write_str(text)
    }
}

/// Failure reported by a transport before any response was obtained.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct TransportError {
    kind: TransportErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    pub fn from_kind(kind: TransportErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// True when the cause is lost or missing connectivity.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::NotConnected | TransportErrorKind::ConnectionLost
        )
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // Connect errors also cover TLS and DNS failures, so connectivity
        // is only inferred from the io error underneath.
        let kind = if err.is_timeout() {
            TransportErrorKind::TimedOut
        } else if err.is_decode() {
            TransportErrorKind::Other
        } else if let Some(kind) = io_kind_in_chain(&err) {
            kind
        } else if err.is_body() {
            TransportErrorKind::ConnectionLost
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, err)
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        let kind = classify_io_kind(err.kind()).unwrap_or(TransportErrorKind::Other);
        Self::new(kind, err)
    }
}

/// Maps a boxed transport failure onto a [`TransportError`], or hands it
/// back untouched when its type is not recognised.
pub(crate) fn recognize(err: BoxError) -> Result<TransportError, BoxError> {
    let err = match err.downcast::<TransportError>() {
        Ok(err) => return Ok(*err),
        Err(err) => err,
    };
    let err = match err.downcast::<reqwest::Error>() {
        Ok(err) => return Ok(TransportError::from(*err)),
        Err(err) => err,
    };
    match err.downcast::<io::Error>() {
        Ok(err) => Ok(TransportError::from(*err)),
        Err(err) => Err(err),
    }
}

fn io_kind_in_chain(err: &(dyn StdError + 'static)) -> Option<TransportErrorKind> {
    let mut cause = err.source();
    while let Some(current) = cause {
        if let Some(io) = current.downcast_ref::<io::Error>() {
            return classify_io_kind(io.kind());
        }
        cause = current.source();
    }
    None
}

fn classify_io_kind(kind: io::ErrorKind) -> Option<TransportErrorKind> {
    match kind {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable => Some(TransportErrorKind::NotConnected),
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => Some(TransportErrorKind::ConnectionLost),
        io::ErrorKind::TimedOut => Some(TransportErrorKind::TimedOut),
        _ => None,
    }
}

/// [`Transport`] backed by `reqwest`.
///
/// Sends exactly one request per call and buffers the whole body. No
/// timeout is applied unless configured through [`TransportOptions`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already configured client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub fn with_options(opts: &TransportOptions) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = opts.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(connect_timeout_ms) = opts.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(connect_timeout_ms));
        }
        if let Some(user_agent) = &opts.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let http = builder
            .build()
            .map_err(|err| TransportError::new(TransportErrorKind::Other, err))?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(TransportError::from)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(TransportError::from)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
