//! Well-known HTTP methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method shorthand for registration and request building.
///
/// Registration and matching work on plain method strings, so any method
/// can be used; this enum only covers the common ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl AsRef<str> for HttpMethod {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(HttpMethod::Get, "GET")]
    #[case(HttpMethod::Post, "POST")]
    #[case(HttpMethod::Put, "PUT")]
    #[case(HttpMethod::Patch, "PATCH")]
    #[case(HttpMethod::Delete, "DELETE")]
    #[case(HttpMethod::Head, "HEAD")]
    #[case(HttpMethod::Options, "OPTIONS")]
    fn test_method_str_matches_serde_name(#[case] method: HttpMethod, #[case] name: &str) {
        assert_eq!(method.as_str(), name);
        assert_eq!(method.to_string(), name);
        let json = serde_json::to_string(&method).expect("Should serialize");
        assert_eq!(json, format!("\"{name}\""));
    }
}
