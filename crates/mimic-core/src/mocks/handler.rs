//! Mock handler: registration, lookup and response dispatch.
//!
//! [`MockHandler`] stands in for a real transport in tests. Responses are
//! registered per (method, URI) and looked up for each outgoing request.

use crate::config::options::HandlerOptions;
use crate::error::{MockError, MockResult};
use crate::mocks::response::respond;
use crate::mocks::scope::ScopeFrame;
use crate::mocks::store::{OptionsState, Registration};
use crate::mocks::Dispatch;
use crate::types::descriptor::ResponseDescriptor;
use crate::types::headers::CONTENT_TYPE;
use crate::types::method::HttpMethod;
use crate::types::request::MockRequest;
use crate::types::response::MockResponse;
use bytes::Bytes;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Content type set by the JSON registration helpers.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// In-process replacement for an HTTP transport.
///
/// Cloning yields an independent handler with a snapshot of the
/// registrations and flags; open scopes are not carried over.
#[derive(Debug, Default)]
pub struct MockHandler {
    pub(crate) state: OptionsState,
    pub(crate) scopes: Vec<ScopeFrame>,
}

impl Clone for MockHandler {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            scopes: Vec::new(),
        }
    }
}

impl MockHandler {
    /// Empty handler with case-insensitive URI matching.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: HandlerOptions) -> Self {
        Self {
            state: OptionsState {
                case_sensitive: options.case_sensitive,
                throw_on_missing_registration: options.throw_on_missing_registration,
                ..OptionsState::default()
            },
            ..Self::default()
        }
    }

    /// Whether URIs are compared case-sensitively. Fixed at construction.
    pub fn case_sensitive(&self) -> bool {
        self.state.case_sensitive
    }

    pub fn throw_on_missing_registration(&self) -> bool {
        self.state.throw_on_missing_registration
    }

    pub fn set_throw_on_missing_registration(&mut self, enabled: bool) {
        self.state.throw_on_missing_registration = enabled;
    }

    /// Register `descriptor` for `method` and `uri`, replacing any registration
    /// under the same key.
    pub fn register(
        &mut self,
        method: impl AsRef<str>,
        uri: impl AsRef<str>,
        descriptor: ResponseDescriptor,
    ) -> MockResult<()> {
        let (method, uri) = (method.as_ref(), uri.as_ref());
        validate_target(method, uri)?;
        descriptor.validate()?;

        let key = self.state.key(method, uri);
        let status = descriptor.status_code();
        let replaced = self.state.registrations.insert(
            key,
            Registration {
                method: method.to_string(),
                uri: uri.to_string(),
                descriptor,
            },
        );
        debug!(method, uri, status, replaced, "Registered mock response");
        Ok(())
    }

    /// Register a content-less response with the given status.
    pub fn register_status(
        &mut self,
        method: impl AsRef<str>,
        uri: impl AsRef<str>,
        status: u16,
    ) -> MockResult<()> {
        self.register(method, uri, ResponseDescriptor::new().status(status))
    }

    /// Register `payload` serialized as JSON.
    ///
    /// Serialization happens once, at registration time. A serializer
    /// failure is returned as [`MockError::ContentProduction`] holding the
    /// `serde_json::Error`, and nothing is registered.
    pub fn register_json<T: Serialize + ?Sized>(
        &mut self,
        method: impl AsRef<str>,
        uri: impl AsRef<str>,
        payload: &T,
        status: u16,
    ) -> MockResult<()> {
        let body =
            serde_json::to_vec(payload).map_err(|e| MockError::ContentProduction(Box::new(e)))?;
        let descriptor = ResponseDescriptor::new()
            .status(status)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(Bytes::from(body));
        self.register(method, uri, descriptor)
    }

    pub fn register_get_json<T: Serialize + ?Sized>(
        &mut self,
        uri: impl AsRef<str>,
        payload: &T,
    ) -> MockResult<()> {
        self.register_json(HttpMethod::Get, uri, payload, 200)
    }

    pub fn register_post_json<T: Serialize + ?Sized>(
        &mut self,
        uri: impl AsRef<str>,
        payload: &T,
    ) -> MockResult<()> {
        self.register_json(HttpMethod::Post, uri, payload, 200)
    }

    /// Remove the registration for `method` and `uri`.
    ///
    /// Returns whether a registration was removed.
    pub fn deregister(&mut self, method: impl AsRef<str>, uri: impl AsRef<str>) -> MockResult<bool> {
        let (method, uri) = (method.as_ref(), uri.as_ref());
        validate_target(method, uri)?;

        let key = self.state.key(method, uri);
        let removed = self.state.registrations.remove(&key).is_some();
        debug!(method, uri, removed, "Deregistered mock response");
        Ok(removed)
    }

    /// Drop every registration. Flags are left as they are.
    pub fn clear(&mut self) {
        self.state.registrations.clear();
        debug!("Cleared mock registrations");
    }

    pub fn len(&self) -> usize {
        self.state.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.registrations.is_empty()
    }

    pub fn contains(&self, method: impl AsRef<str>, uri: impl AsRef<str>) -> bool {
        let key = self.state.key(method.as_ref(), uri.as_ref());
        self.state.registrations.get(&key).is_some()
    }

    /// Registrations in insertion order.
    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.state.registrations.iter()
    }

    /// Descriptor registered for the request's method and URI.
    ///
    /// Requests without a URI never match.
    pub fn match_request(&self, request: &MockRequest) -> Option<&ResponseDescriptor> {
        let uri = request.uri.as_deref()?;
        let key = self.state.key(&request.method, uri);
        self.state
            .registrations
            .get(&key)
            .map(|registration| &registration.descriptor)
    }

    /// Build the registered response for `request`.
    ///
    /// Returns `Ok(None)` on a miss unless throw-on-missing is enabled.
    pub async fn get_response(&self, request: &MockRequest) -> MockResult<Option<MockResponse>> {
        respond(self, request, CancellationToken::new()).await
    }

    /// Like [`get_response`](Self::get_response), handing `cancellation` to async producers.
    pub async fn get_response_with_cancellation(
        &self,
        request: &MockRequest,
        cancellation: CancellationToken,
    ) -> MockResult<Option<MockResponse>> {
        respond(self, request, cancellation).await
    }
}

impl Dispatch for MockHandler {
    fn find(&self, request: &MockRequest) -> Option<&ResponseDescriptor> {
        self.match_request(request)
    }

    fn throw_on_missing_registration(&self) -> bool {
        self.state.throw_on_missing_registration
    }
}

fn validate_target(method: &str, uri: &str) -> MockResult<()> {
    if method.trim().is_empty() {
        return Err(MockError::invalid("method must not be empty"));
    }
    if uri.trim().is_empty() {
        return Err(MockError::invalid("uri must not be empty"));
    }
    Ok(())
}
