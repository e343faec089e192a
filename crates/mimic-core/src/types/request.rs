//! Outgoing request as seen by the mock handler.

use crate::types::headers::Headers;
use bytes::Bytes;

/// Request handed to the handler instead of a real transport.
///
/// Only `method` and `uri` take part in key lookup; headers and body are
/// available to layered matchers and travel back on the response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockRequest {
    /// HTTP method, compared exactly
    pub method: String,
    /// Absolute or relative URI. A request without one never matches.
    pub uri: Option<String>,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: Option<Bytes>,
}

impl MockRequest {
    pub fn new(method: impl AsRef<str>, uri: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_string(),
            uri: Some(uri.into()),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Request with a method but no URI.
    pub fn without_uri(method: impl AsRef<str>) -> Self {
        Self {
            method: method.as_ref().to_string(),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Raw query string of the URI, without the leading `?` and any fragment.
    pub fn query(&self) -> Option<&str> {
        let uri = self.uri.as_deref()?;
        let (_, rest) = uri.split_once('?')?;
        Some(rest.split('#').next().unwrap_or(rest))
    }
}
