//! In-process HTTP mocking for tests.
//!
//! [`MockHandler`] takes the place of a real transport: responses are
//! registered per method and URI, then looked up for every request the code
//! under test sends. Registrations can be layered with [scopes](ScopeGuard)
//! and narrowed further with [`FilteredHandler`] and [`RequestMatcher`]s.
//!
//! ```no_run
//! use mimic_core::{MockHandler, MockRequest};
//! use serde_json::json;
//!
//! # async fn demo() -> mimic_core::MockResult<()> {
//! let mut handler = MockHandler::new();
//! handler.register_get_json("https://api.example.com/users", &json!([{"id": 1}]))?;
//!
//! let response = handler
//!     .get_response(&MockRequest::new("GET", "https://api.example.com/users"))
//!     .await?
//!     .expect("registered");
//! assert_eq!(response.status, 200);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod expression;
pub mod matching;
pub mod mocks;
pub mod types;

pub use config::{ConfigError, Fixture, HandlerOptions};
pub use error::{BoxError, MockError, MockResult};
pub use matching::{ExpressionMatcher, FilteredHandler, HeaderMatcher, QueryMatcher, RequestMatcher};
pub use mocks::handler::{MockHandler, JSON_CONTENT_TYPE};
pub use mocks::scope::{ScopeGuard, ScopeToken};
pub use mocks::store::Registration;
pub use mocks::Dispatch;
pub use types::descriptor::{ByteStream, ResponseDescriptor};
pub use types::headers::Headers;
pub use types::method::HttpMethod;
pub use types::request::MockRequest;
pub use types::response::{Content, MockResponse};
