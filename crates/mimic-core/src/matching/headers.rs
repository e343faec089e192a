//! Header subset matching (case-insensitive names).

use crate::error::{MockError, MockResult};
use crate::matching::RequestMatcher;
use crate::types::request::MockRequest;
use regex::Regex;

#[derive(Debug, Clone)]
enum Expected {
    Exact(String),
    Pattern(Regex),
    Present,
}

impl Expected {
    fn accepts(&self, value: &str) -> bool {
        match self {
            Expected::Exact(expected) => value == expected,
            Expected::Pattern(pattern) => pattern.is_match(value),
            Expected::Present => true,
        }
    }
}

/// Requires every listed header to be present with an acceptable value.
///
/// Names compare case-insensitively. A header sent several times passes
/// when any of its values is acceptable.
#[derive(Debug, Clone, Default)]
pub struct HeaderMatcher {
    expected: Vec<(String, Expected)>,
}

impl HeaderMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` with exactly `value`.
    pub fn exact(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.expected
            .push((name.into(), Expected::Exact(value.into())));
        self
    }

    /// Require `name` with a value matching the regular expression `pattern`.
    pub fn pattern(mut self, name: impl Into<String>, pattern: &str) -> MockResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| MockError::invalid(format!("invalid header pattern '{pattern}': {e}")))?;
        self.expected.push((name.into(), Expected::Pattern(regex)));
        Ok(self)
    }

    /// Require `name` with any value.
    pub fn present(mut self, name: impl Into<String>) -> Self {
        self.expected.push((name.into(), Expected::Present));
        self
    }
}

impl RequestMatcher for HeaderMatcher {
    fn matches(&self, request: &MockRequest) -> bool {
        self.expected.iter().all(|(name, expected)| {
            request
                .headers
                .get_all(name)
                .any(|value| expected.accepts(value))
        })
    }

    fn name(&self) -> &str {
        "headers"
    }
}
