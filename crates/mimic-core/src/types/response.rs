//! Fabricated response returned by the handler.

use crate::error::{BoxError, MockError, MockResult};
use crate::types::descriptor::ByteStream;
use crate::types::headers::{Headers, CONTENT_TYPE};
use crate::types::request::MockRequest;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use std::fmt;

/// Materialized response content.
pub enum Content {
    /// Whole body, possibly empty
    Bytes(Bytes),
    /// Body produced by a stream producer
    Stream(ByteStream),
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Content::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Response built from a matched registration.
#[derive(Debug)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Headers,
    /// `None` when the registration has no content source
    pub content: Option<Content>,
    /// The request this response answers
    pub request: MockRequest,
}

impl MockResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Drain the body into memory. A response without content yields empty bytes.
    ///
    /// Stream item failures surface as [`MockError::ContentProduction`].
    pub async fn bytes(self) -> MockResult<Bytes> {
        match self.content {
            None => Ok(Bytes::new()),
            Some(Content::Bytes(bytes)) => Ok(bytes),
            Some(Content::Stream(stream)) => {
                let buf = stream
                    .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                        buf.extend_from_slice(&chunk);
                        Ok::<_, BoxError>(buf)
                    })
                    .await
                    .map_err(MockError::ContentProduction)?;
                Ok(buf.freeze())
            }
        }
    }

    /// Drain the body and decode it as UTF-8.
    ///
    /// Invalid UTF-8 surfaces as [`MockError::Decode`].
    pub async fn text(self) -> MockResult<String> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| MockError::Decode(Box::new(e)))
    }

    /// Drain the body and deserialize it as JSON.
    ///
    /// Malformed JSON surfaces as [`MockError::Decode`].
    pub async fn json<T: DeserializeOwned>(self) -> MockResult<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| MockError::Decode(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use rstest::rstest;
    use serde_json::{json, Value};
    use std::io;

    fn response(content: Option<Content>) -> MockResponse {
        MockResponse {
            status: 200,
            headers: Headers::new(),
            content,
            request: MockRequest::new("GET", "/"),
        }
    }

    #[tokio::test]
    async fn test_bytes_without_content_is_empty() {
        let bytes = response(None).bytes().await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_stream_is_concatenated() {
        let chunks: Vec<Result<Bytes, BoxError>> =
            vec![Ok(Bytes::from_static(b"{\"a\":")), Ok(Bytes::from_static(b"1}"))];
        let content = Content::Stream(Box::pin(stream::iter(chunks)));
        let value: Value = response(Some(content)).json().await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_stream_failure_keeps_original_error() {
        let chunks: Vec<Result<Bytes, BoxError>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone").into()),
        ];
        let content = Content::Stream(Box::pin(stream::iter(chunks)));
        let err = response(Some(content)).bytes().await.unwrap_err();
        let original = err
            .producer_error()
            .and_then(|e| e.downcast_ref::<io::Error>())
            .unwrap();
        assert_eq!(original.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_text_rejects_invalid_utf8() {
        let content = Content::Bytes(Bytes::from_static(&[0xff, 0xfe]));
        let err = response(Some(content)).text().await.unwrap_err();
        assert!(matches!(err, MockError::Decode(_)));
        assert!(err.producer_error().is_none());
    }

    #[tokio::test]
    async fn test_json_rejects_malformed_body() {
        let content = Content::Bytes(Bytes::from_static(b"{not json"));
        let err = response(Some(content)).json::<Value>().await.unwrap_err();
        let MockError::Decode(source) = err else {
            panic!("expected a decode error, got {err:?}");
        };
        assert!(source.downcast_ref::<serde_json::Error>().is_some());
    }

    #[rstest]
    fn test_content_type_lookup() {
        let mut r = response(None);
        assert_eq!(r.content_type(), None);
        r.headers.append("content-type", "text/plain");
        assert_eq!(r.content_type(), Some("text/plain"));
    }
}
