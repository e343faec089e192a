//! Query string parsing and subset matching.

use crate::matching::RequestMatcher;
use crate::types::request::MockRequest;
use indexmap::IndexMap;

/// Parse a query string into decoded keys and every value per key.
pub fn parse_query_string(query_str: &str) -> IndexMap<String, Vec<String>> {
    let mut result: IndexMap<String, Vec<String>> = IndexMap::new();

    for pair in query_str.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        result
            .entry(decode(key))
            .or_default()
            .push(decode(value));
    }

    result
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

/// Requires the request URI's query to contain every listed parameter value.
#[derive(Debug, Clone, Default)]
pub struct QueryMatcher {
    expected: Vec<(String, String)>,
}

impl QueryMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.expected.push((key.into(), value.into()));
        self
    }
}

impl RequestMatcher for QueryMatcher {
    fn matches(&self, request: &MockRequest) -> bool {
        if self.expected.is_empty() {
            return true;
        }
        let Some(query) = request.query() else {
            return false;
        };
        let actual = parse_query_string(query);
        self.expected.iter().all(|(key, value)| {
            actual
                .get(key)
                .is_some_and(|values| values.iter().any(|v| v == value))
        })
    }

    fn name(&self) -> &str {
        "query"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("page=1", &[("page", "1")])]
    #[case("page=1&limit=10", &[("page", "1"), ("limit", "10")])]
    #[case("key=value%20with%20spaces", &[("key", "value with spaces")])]
    #[case("q=a+b", &[("q", "a b")])]
    #[case("key%20name=value", &[("key name", "value")])]
    #[case("page=1&limit=10&page=2", &[("page", "1"), ("page", "2"), ("limit", "10")])]
    #[case("page=1&&limit=10&", &[("page", "1"), ("limit", "10")])]
    #[case("page&limit=", &[("page", ""), ("limit", "")])]
    fn test_parse_query_string(#[case] query: &str, #[case] expected: &[(&str, &str)]) {
        let parsed = parse_query_string(query);
        let flattened: Vec<(&str, &str)> = parsed
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect();
        assert_eq!(flattened, expected);
    }

    #[rstest]
    #[case("https://x/a?page=1&limit=10", true)]
    #[case("https://x/a?limit=10&page=1", true)]
    #[case("https://x/a?page=2&page=1&limit=10", true)]
    #[case("https://x/a?page=2&limit=10", false)]
    #[case("https://x/a?page=1", false)]
    #[case("https://x/a", false)]
    fn test_query_matcher(#[case] uri: &str, #[case] expected: bool) {
        let matcher = QueryMatcher::new().param("page", "1").param("limit", "10");
        assert_eq!(matcher.matches(&MockRequest::new("GET", uri)), expected);
    }

    #[rstest]
    fn test_empty_query_matcher_accepts_anything() {
        assert!(QueryMatcher::new().matches(&MockRequest::new("GET", "https://x/a")));
    }
}
