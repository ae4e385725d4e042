//! `request-executor` sends a prepared HTTP request exactly once and turns
//! the result into either a typed value or one [`ExecutorError`] variant.
//!
//! The flow of [`RequestExecutor::execute`] is linear:
//! - resolve the [`RequestDescriptor`] and check its required headers;
//! - send it through the injected [`Transport`];
//! - classify the status code, then decode the JSON body.
//!
//! ```no_run
//! use request_executor::{ReqwestTransport, RequestDescriptor, RequestExecutor};
//!
//! #[derive(serde::Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> request_executor::Result<()> {
//! let executor = RequestExecutor::new(ReqwestTransport::new());
//! let descriptor = RequestDescriptor::new("https://api.example.com/users/1")
//!     .bearer_auth("token")
//!     .header("Content-Type", "application/json");
//! let user: User = executor.execute(&descriptor).await?;
//! # let _ = (user.id, user.name);
//! # Ok(())
//! # }
//! ```

mod descriptor;
mod error;
mod executor;
mod logger;
mod options;
mod transport;

pub use descriptor::{HttpRequest, RequestDescriptor, AUTHORIZATION, CONTENT_TYPE};
pub use error::{ExecutorError, ResolveError};
pub use executor::{classify_status, RequestExecutor};
#[cfg(feature = "tracing")]
pub use logger::TracingLogger;
pub use logger::{Logger, NoopLogger};
pub use options::TransportOptions;
pub use reqwest::Method;
pub use transport::{
    BoxError, HttpResponse, ReqwestTransport, Transport, TransportError, TransportErrorKind,
};

pub type Result<T> = std::result::Result<T, ExecutorError>;
