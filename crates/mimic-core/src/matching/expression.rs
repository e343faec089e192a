//! JMESPath expression matcher.

use crate::error::{MockError, MockResult};
use crate::expression::{matches_expression, validate_expression};
use crate::matching::query::parse_query_string;
use crate::matching::RequestMatcher;
use crate::types::request::MockRequest;
use serde_json::{json, Map, Value};

/// Matches when a JMESPath expression is truthy for the request.
///
/// The expression sees `{method, uri, headers, query}`. Header names are
/// lowercased; headers and query parameters with several values are arrays.
#[derive(Debug, Clone)]
pub struct ExpressionMatcher {
    expression: String,
}

impl ExpressionMatcher {
    /// Fails with `InvalidArgument` if the expression does not compile.
    pub fn new(expression: impl Into<String>) -> MockResult<Self> {
        let expression = expression.into();
        validate_expression(&expression).map_err(|e| {
            MockError::invalid(format!("invalid expression '{expression}': {e}"))
        })?;
        Ok(Self { expression })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

fn request_to_value(request: &MockRequest) -> Value {
    let query: Map<String, Value> = request
        .query()
        .map(parse_query_string)
        .unwrap_or_default()
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                Value::String(values.remove(0))
            } else {
                Value::Array(values.into_iter().map(Value::String).collect())
            };
            (key, value)
        })
        .collect();

    json!({
        "method": request.method,
        "uri": request.uri,
        "headers": request.headers.to_value(),
        "query": query,
    })
}

impl RequestMatcher for ExpressionMatcher {
    fn matches(&self, request: &MockRequest) -> bool {
        matches_expression(&self.expression, &request_to_value(request))
    }

    fn name(&self) -> &str {
        &self.expression
    }
}
