use std::collections::BTreeMap;
use std::fmt;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::error::ResolveError;

/// Header the executor requires before dispatch.
pub const AUTHORIZATION: &str = "Authorization";
/// Header the executor requires before dispatch.
pub const CONTENT_TYPE: &str = "Content-Type";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum Body {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    /// Serialization failed while building; reported at resolve time.
    Invalid(String),
}

/// Description of a single HTTP call, produced by an endpoint definition.
///
/// Header keys are stored exactly as provided: `Authorization` and
/// `authorization` are distinct keys. The executor only ever reads a
/// descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: Option<String>,
    method: Method,
    headers: BTreeMap<String, String>,
    body: Body,
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &RedactedHeaders(&self.headers))
            .field("body_len", &self.body_bytes().map(<[u8]>::len))
            .finish()
    }
}

impl RequestDescriptor {
    /// Creates a `GET` descriptor for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            method: Method::GET,
            headers: BTreeMap::new(),
            body: Body::Empty,
        }
    }

    /// Creates a descriptor with no target url. It never resolves.
    pub fn without_url() -> Self {
        Self {
            url: None,
            method: Method::GET,
            headers: BTreeMap::new(),
            body: Body::Empty,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets a header, replacing any previous value stored under the exact same key.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets `Authorization: Bearer <token>`.
    ///
    /// If the token already carries a `Bearer ` prefix it is kept as-is.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        let value = normalize_bearer_authorization(token.as_ref());
        self.header(AUTHORIZATION, value)
    }

    /// Sets a raw body. Content type is left to the caller.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type: application/json`.
    ///
    /// A serialization failure does not panic here; it makes the
    /// descriptor fail to resolve.
    pub fn json<B: Serialize + ?Sized>(mut self, value: &B) -> Self {
        self.body = match serde_json::to_vec(value) {
            Ok(bytes) => Body::Bytes(bytes),
            Err(err) => Body::Invalid(err.to_string()),
        };
        self.header(CONTENT_TYPE, "application/json")
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn method_ref(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Looks up a header by its exact, case-sensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns the body bytes, or `None` if the body could not be produced.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Empty => Some(&[]),
            Body::Bytes(bytes) => Some(bytes),
            Body::Invalid(_) => None,
        }
    }

    /// Resolves this descriptor into a concrete request.
    ///
    /// Fails on a missing or malformed url, a non-http(s) scheme, header
    /// names or values that are not legal HTTP, or a body that failed to
    /// serialize.
    pub fn resolve(&self) -> Result<HttpRequest, ResolveError> {
        let raw = self.url.as_deref().ok_or(ResolveError::MissingUrl)?;
        let url = Url::parse(raw).map_err(|source| ResolveError::InvalidUrl {
            url: raw.to_owned(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ResolveError::UnsupportedScheme(url.scheme().to_owned()));
        }

        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ResolveError::InvalidHeaderName(name.clone()))?;
            HeaderValue::from_str(value)
                .map_err(|_| ResolveError::InvalidHeaderValue(name.clone()))?;
        }

        let body = match &self.body {
            Body::Empty => Vec::new(),
            Body::Bytes(bytes) => bytes.clone(),
            Body::Invalid(reason) => return Err(ResolveError::Body(reason.clone())),
        };

        Ok(HttpRequest {
            method: self.method.clone(),
            url,
            headers: self.headers.clone(),
            body,
        })
    }
}

/// A resolved request, ready to be handed to a [`Transport`](crate::Transport).
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &RedactedHeaders(&self.headers))
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Debug view of a header map that hides credential values.
pub(crate) struct RedactedHeaders<'a>(pub(crate) &'a BTreeMap<String, String>);

impl fmt::Debug for RedactedHeaders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.0 {
            if name.eq_ignore_ascii_case(AUTHORIZATION) {
                map.entry(name, &"<redacted>");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
