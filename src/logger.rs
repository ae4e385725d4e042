//! Diagnostic sink injected into the executor.
//!
//! Logging is observability only: nothing a logger does can change the
//! outcome of a call.

/// Receives executor diagnostics.
pub trait Logger: Send + Sync {
    /// Request/response metadata.
    fn debug(&self, message: &str);
    /// Failure classification.
    fn error(&self, message: &str);
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

/// Forwards messages to `tracing` under the `request_executor` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "request_executor", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "request_executor", "{message}");
    }
}

#[cfg(feature = "tracing")]
pub(crate) type DefaultLogger = TracingLogger;
#[cfg(not(feature = "tracing"))]
pub(crate) type DefaultLogger = NoopLogger;
