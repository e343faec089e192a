//! Declarative registrations loaded from YAML/JSON/JSONC files.
//!
//! A fixture file holds a list of entries:
//!
//! ```yaml
//! - method: GET
//!   uri: https://api.example.com/users
//!   status: 200
//!   headers:
//!     X-Total: "2"
//!   body: [{ id: 1 }, { id: 2 }]
//! ```
//!
//! `body` is serialized as JSON and gets a JSON content type. `text` is sent
//! as-is with the default content type. An entry may carry one or neither.

use crate::config::parser::load_all;
use crate::error::{MockError, MockResult};
use crate::mocks::handler::{MockHandler, JSON_CONTENT_TYPE};
use crate::types::descriptor::ResponseDescriptor;
use crate::types::headers::{Headers, CONTENT_TYPE};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// One registration as written in a fixture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub method: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Fixture {
    /// Response descriptor for this entry.
    pub fn to_descriptor(&self) -> MockResult<ResponseDescriptor> {
        let mut descriptor = ResponseDescriptor::new().status(self.status.unwrap_or(200));
        if let Some(headers) = &self.headers {
            descriptor = descriptor.headers(headers.clone());
        }

        match (&self.body, &self.text) {
            (Some(_), Some(_)) => Err(MockError::invalid(format!(
                "fixture {} {} sets both body and text",
                self.method, self.uri
            ))),
            (Some(body), None) => {
                let bytes = serde_json::to_vec(body)
                    .map_err(|e| MockError::ContentProduction(Box::new(e)))?;
                let has_type = self
                    .headers
                    .as_ref()
                    .is_some_and(|headers| headers.contains(CONTENT_TYPE));
                if !has_type {
                    descriptor = descriptor.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
                }
                Ok(descriptor.body(Bytes::from(bytes)))
            }
            (None, Some(text)) => Ok(descriptor.body(text.clone())),
            (None, None) => Ok(descriptor),
        }
    }
}

impl MockHandler {
    /// Register every fixture in the files matching `pattern`.
    ///
    /// Files are read in path order; later entries replace earlier ones with
    /// the same key. Every entry is checked before any is registered, so a
    /// failure leaves the handler untouched. Returns the number of entries.
    pub async fn load_fixtures(&mut self, pattern: &str) -> MockResult<usize> {
        let files: Vec<Vec<Fixture>> = load_all(pattern).await?;

        let mut pending = Vec::new();
        for fixture in files.into_iter().flatten() {
            if fixture.method.trim().is_empty() || fixture.uri.trim().is_empty() {
                return Err(MockError::invalid("fixture method and uri must not be empty"));
            }
            let descriptor = fixture.to_descriptor()?;
            pending.push((fixture.method, fixture.uri, descriptor));
        }

        let count = pending.len();
        for (method, uri, descriptor) in pending {
            self.register(method, uri, descriptor)?;
        }
        info!(pattern, count, "Loaded mock fixtures");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ConfigError;
    use crate::types::request::MockRequest;
    use rstest::rstest;
    use serde_json::json;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mimic-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn entry(body: Option<Value>, text: Option<&str>) -> Fixture {
        Fixture {
            method: "GET".into(),
            uri: "https://x/a".into(),
            status: None,
            headers: None,
            body,
            text: text.map(str::to_string),
        }
    }

    #[rstest]
    fn test_body_gets_json_content_type() {
        let descriptor = entry(Some(json!({"id": 1})), None).to_descriptor().unwrap();
        assert_eq!(descriptor.status_code(), 200);
        assert_eq!(
            descriptor.response_headers().get(CONTENT_TYPE),
            Some(JSON_CONTENT_TYPE)
        );
        assert!(descriptor.has_content());
    }

    #[rstest]
    fn test_explicit_content_type_is_kept() {
        let mut fixture = entry(Some(json!("x")), None);
        fixture.headers = Some([("content-type", "application/vnd.x+json")].into_iter().collect());
        let descriptor = fixture.to_descriptor().unwrap();
        let types: Vec<&str> = descriptor.response_headers().get_all(CONTENT_TYPE).collect();
        assert_eq!(types, vec!["application/vnd.x+json"]);
    }

    #[rstest]
    #[case(None, None, false)]
    #[case(None, Some("plain"), true)]
    fn test_text_and_empty_entries(
        #[case] body: Option<Value>,
        #[case] text: Option<&str>,
        #[case] has_content: bool,
    ) {
        let descriptor = entry(body, text).to_descriptor().unwrap();
        assert_eq!(descriptor.has_content(), has_content);
        assert!(!descriptor.response_headers().contains(CONTENT_TYPE));
    }

    #[rstest]
    fn test_body_and_text_conflict() {
        let err = entry(Some(json!(1)), Some("1")).to_descriptor().unwrap_err();
        assert!(matches!(err, MockError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_load_fixtures_from_files() {
        let dir = fixture_dir("load");
        std::fs::write(
            dir.join("a.yaml"),
            "- method: GET\n  uri: https://x/users\n  body: [{id: 1}]\n- method: DELETE\n  uri: https://x/users/1\n  status: 204\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("b.jsonc"),
            "[\n  // overrides a.yaml\n  {\"method\": \"DELETE\", \"uri\": \"https://x/users/1\", \"status\": 409, \"text\": \"busy\"}\n]",
        )
        .unwrap();

        let mut handler = MockHandler::new();
        let pattern = format!("{}/*", dir.display());
        let count = handler.load_fixtures(&pattern).await.unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(count, 3);
        assert_eq!(handler.len(), 2);

        let users = handler
            .get_response(&MockRequest::new("GET", "https://x/users"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(users.json::<Value>().await.unwrap(), json!([{"id": 1}]));

        let delete = handler
            .get_response(&MockRequest::new("DELETE", "https://x/users/1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delete.status, 409);
        assert_eq!(delete.text().await.unwrap(), "busy");
    }

    #[tokio::test]
    async fn test_invalid_fixture_registers_nothing() {
        let dir = fixture_dir("invalid");
        std::fs::write(
            dir.join("mocks.json"),
            r#"[{"method": "GET", "uri": "https://x/a"}, {"method": "GET", "uri": "https://x/b", "body": 1, "text": "1"}]"#,
        )
        .unwrap();

        let mut handler = MockHandler::new();
        let err = handler
            .load_fixtures(&format!("{}/*.json", dir.display()))
            .await
            .unwrap_err();
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(err, MockError::InvalidArgument { .. }));
        assert!(handler.is_empty());
    }

    #[tokio::test]
    async fn test_load_fixtures_without_matches() {
        let mut handler = MockHandler::new();
        let err = handler
            .load_fixtures("/definitely/not/here/*.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, MockError::Config(ConfigError::NoFiles(_))));
    }
}
