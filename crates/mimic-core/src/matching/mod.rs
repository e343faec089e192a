//! Request matchers layered over the base key lookup.
//!
//! A [`RequestMatcher`] is a predicate over a [`MockRequest`]. Matchers are
//! chained by [`FilteredHandler`], which only consults them after the base
//! dispatcher has found a registration.

mod expression;
mod filter;
mod headers;
mod query;

pub use expression::ExpressionMatcher;
pub use filter::FilteredHandler;
pub use headers::HeaderMatcher;
pub use query::{parse_query_string, QueryMatcher};

use crate::types::request::MockRequest;

/// Extra condition a request must satisfy once its key has matched.
pub trait RequestMatcher: Send + Sync {
    fn matches(&self, request: &MockRequest) -> bool;

    /// Name used in trace output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> RequestMatcher for F
where
    F: Fn(&MockRequest) -> bool + Send + Sync,
{
    fn matches(&self, request: &MockRequest) -> bool {
        self(request)
    }

    fn name(&self) -> &str {
        "predicate"
    }
}
