//! Dispatcher that narrows a base dispatcher with a chain of matchers.

use crate::error::MockResult;
use crate::matching::RequestMatcher;
use crate::mocks::handler::MockHandler;
use crate::mocks::response::respond;
use crate::mocks::Dispatch;
use crate::types::descriptor::ResponseDescriptor;
use crate::types::request::MockRequest;
use crate::types::response::MockResponse;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Base dispatcher plus an ordered list of extra conditions.
///
/// The base lookup always runs first. A request is answered only when the
/// base finds a registration and every matcher accepts the request; the
/// first failing matcher ends the check. Misses follow the base's
/// throw-on-missing setting.
///
/// Filters nest: a `FilteredHandler<FilteredHandler<MockHandler>>` applies
/// the inner chain before the outer one.
#[derive(Clone)]
pub struct FilteredHandler<D = MockHandler> {
    base: D,
    matchers: Vec<Arc<dyn RequestMatcher>>,
}

impl<D: Dispatch> FilteredHandler<D> {
    pub fn new(base: D) -> Self {
        Self {
            base,
            matchers: Vec::new(),
        }
    }

    /// Append a matcher to the end of the chain.
    pub fn with<M>(mut self, matcher: M) -> Self
    where
        M: RequestMatcher + 'static,
    {
        self.matchers.push(Arc::new(matcher));
        self
    }

    pub fn push<M>(&mut self, matcher: M)
    where
        M: RequestMatcher + 'static,
    {
        self.matchers.push(Arc::new(matcher));
    }

    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    pub fn base(&self) -> &D {
        &self.base
    }

    pub fn into_inner(self) -> D {
        self.base
    }

    /// Base descriptor for `request`, if every matcher accepts it.
    pub fn match_request(&self, request: &MockRequest) -> Option<&ResponseDescriptor> {
        let descriptor = self.base.find(request)?;
        for matcher in &self.matchers {
            if !matcher.matches(request) {
                trace!(
                    matcher = matcher.name(),
                    method = %request.method,
                    "Matcher rejected request"
                );
                return None;
            }
        }
        Some(descriptor)
    }

    pub async fn get_response(&self, request: &MockRequest) -> MockResult<Option<MockResponse>> {
        respond(self, request, CancellationToken::new()).await
    }

    pub async fn get_response_with_cancellation(
        &self,
        request: &MockRequest,
        cancellation: CancellationToken,
    ) -> MockResult<Option<MockResponse>> {
        respond(self, request, cancellation).await
    }
}

impl<D: Dispatch> Dispatch for FilteredHandler<D> {
    fn find(&self, request: &MockRequest) -> Option<&ResponseDescriptor> {
        self.match_request(request)
    }

    fn throw_on_missing_registration(&self) -> bool {
        self.base.throw_on_missing_registration()
    }
}

impl<D> Deref for FilteredHandler<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.base
    }
}

impl<D> DerefMut for FilteredHandler<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.base
    }
}

impl<D: fmt::Debug> fmt::Debug for FilteredHandler<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredHandler")
            .field("base", &self.base)
            .field(
                "matchers",
                &self.matchers.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
