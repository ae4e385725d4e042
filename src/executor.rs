use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    descriptor::{RedactedHeaders, AUTHORIZATION, CONTENT_TYPE},
    logger::{DefaultLogger, Logger},
    transport::{self, BoxError},
    ExecutorError, HttpRequest, HttpResponse, RequestDescriptor, Result, Transport,
};

/// Sends a [`RequestDescriptor`] through a [`Transport`] and decodes the
/// JSON answer into a caller-chosen type.
///
/// Each call runs validate → send → classify → decode once, with no
/// retries and no deadline of its own. The executor keeps no mutable
/// state, so one instance can serve any number of concurrent calls.
/// Dropping the returned future cancels the in-flight transport call.
#[derive(Clone)]
pub struct RequestExecutor<T> {
    transport: T,
    logger: Arc<dyn Logger>,
}

impl<T> fmt::Debug for RequestExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor").finish_non_exhaustive()
    }
}

impl<T> RequestExecutor<T> {
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> RequestExecutor<T> {
    /// Creates an executor logging through `tracing` (or nowhere, without
    /// the `tracing` feature).
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            logger: Arc::new(DefaultLogger::default()),
        }
    }

    /// Replaces the diagnostic sink.
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Executes `descriptor` and decodes a 2xx body into `R`.
    ///
    /// Pre-flight checks run in a fixed order and stop at the first
    /// failure, before any network call:
    /// 1. the descriptor must resolve, else [`ExecutorError::InvalidRequest`];
    /// 2. an `Authorization` header must be present, else
    ///    [`ExecutorError::MissingCredential`];
    /// 3. a `Content-Type` header must be present, else
    ///    [`ExecutorError::InvalidRequest`].
    ///
    /// Header names are matched exactly as written above.
    pub async fn execute<R: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<R> {
        let request = self.validate(descriptor)?;

        self.logger.debug(&format!(
            "sending {} {} headers={:?} body_len={}",
            request.method,
            request.url,
            RedactedHeaders(&request.headers),
            request.body.len()
        ));

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(self.classify_transport_failure(err))),
        };

        self.logger.debug(&format!(
            "received status {:?} body_len={} for {} {}",
            response.status,
            response.body.len(),
            request.method,
            request.url
        ));

        self.classify_response(&response)
            .map_err(|err| self.fail(err))?;

        serde_json::from_slice::<R>(&response.body)
            .map_err(|err| self.fail(ExecutorError::Decoding(err)))
    }

    fn validate(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest> {
        let request = descriptor.resolve().map_err(|err| {
            self.logger.error(&format!("request did not resolve: {err}"));
            ExecutorError::InvalidRequest
        })?;

        if !request.headers.contains_key(AUTHORIZATION) {
            return Err(self.fail(ExecutorError::MissingCredential));
        }
        if !request.headers.contains_key(CONTENT_TYPE) {
            self.logger
                .error(&format!("request to {} has no {CONTENT_TYPE} header", request.url));
            return Err(ExecutorError::InvalidRequest);
        }

        Ok(request)
    }

    fn classify_response(&self, response: &HttpResponse) -> Result<()> {
        let code = response
            .status
            .filter(|code| StatusCode::from_u16(*code).is_ok())
            .ok_or(ExecutorError::InvalidResponse)?;
        classify_status(code)
    }

    fn classify_transport_failure(&self, err: BoxError) -> ExecutorError {
        match transport::recognize(err) {
            Ok(err) if err.is_network_failure() => {
                self.logger.debug(&format!("network unavailable: {err:?}"));
                ExecutorError::NetworkFailure
            }
            Ok(err) => ExecutorError::TransportSession(err),
            Err(err) => ExecutorError::Unknown(err),
        }
    }

    fn fail(&self, err: ExecutorError) -> ExecutorError {
        self.logger.error(&format!("request failed: {err}"));
        err
    }
}

/// Maps an HTTP status code onto the executor's outcome.
///
/// 2xx is success. 401, 429 and 5xx have dedicated variants. Everything
/// else, 404 included, is [`ExecutorError::UnexpectedStatus`].
pub fn classify_status(code: u16) -> std::result::Result<(), ExecutorError> {
    match code {
        200..=299 => Ok(()),
        401 => Err(ExecutorError::Unauthorized),
        429 => Err(ExecutorError::RateLimited),
        500..=599 => Err(ExecutorError::ServerError),
        other => Err(ExecutorError::UnexpectedStatus(other)),
    }
}
