//! JMESPath evaluation over JSON request views.

use jmespath::{Rcvar, Variable};
use serde_json::Value;

/// Convert a `serde_json::Value` into a JMESPath variable.
pub fn value_to_variable(value: &Value) -> Rcvar {
    let variable = match value {
        Value::Null => Variable::Null,
        Value::Bool(b) => Variable::Bool(*b),
        Value::Number(n) => Variable::Number(n.clone()),
        Value::String(s) => Variable::String(s.clone()),
        Value::Array(items) => Variable::Array(items.iter().map(value_to_variable).collect()),
        Value::Object(map) => Variable::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_variable(v)))
                .collect(),
        ),
    };
    Rcvar::new(variable)
}

/// Compile `expression`, returning the parser's message on failure.
pub fn validate_expression(expression: &str) -> Result<(), String> {
    jmespath::compile(expression)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Evaluate `expression` against `data` and report whether the result is truthy.
///
/// Compile and runtime errors count as no match.
pub fn matches_expression(expression: &str, data: &Value) -> bool {
    let Ok(compiled) = jmespath::compile(expression) else {
        return false;
    };
    let data = value_to_variable(data);
    compiled
        .search(&data)
        .map(|result| result.is_truthy())
        .unwrap_or(false)
}
