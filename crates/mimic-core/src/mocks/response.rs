//! Response building from a matched descriptor.

use crate::error::{MockError, MockResult};
use crate::mocks::Dispatch;
use crate::types::descriptor::{ContentProducer, ResponseDescriptor, StreamProducer};
use crate::types::headers::CONTENT_TYPE;
use crate::types::request::MockRequest;
use crate::types::response::{Content, MockResponse};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Content type applied when content exists and none was given explicitly.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Build a response for `request` from `descriptor`.
///
/// Producer failures are returned unchanged inside
/// [`MockError::ContentProduction`].
pub async fn build_response(
    descriptor: &ResponseDescriptor,
    request: &MockRequest,
    cancellation: CancellationToken,
) -> MockResult<MockResponse> {
    let content = produce_content(descriptor, cancellation).await?;

    let mut headers = descriptor.response_headers().clone();
    if content.is_some() && !headers.contains(CONTENT_TYPE) {
        headers.append(CONTENT_TYPE, DEFAULT_CONTENT_TYPE);
    }

    Ok(MockResponse {
        status: descriptor.status_code(),
        headers,
        content,
        request: request.clone(),
    })
}

async fn produce_content(
    descriptor: &ResponseDescriptor,
    cancellation: CancellationToken,
) -> MockResult<Option<Content>> {
    if let Some(producer) = descriptor.content_producer() {
        let produced = match producer {
            ContentProducer::Sync(produce) => produce(),
            ContentProducer::Async(produce) => produce(cancellation).await,
        }
        .map_err(MockError::ContentProduction)?;
        return Ok(Some(Content::Bytes(produced.unwrap_or_default())));
    }

    if let Some(producer) = descriptor.stream_producer() {
        let produced = match producer {
            StreamProducer::Sync(produce) => produce(),
            StreamProducer::Async(produce) => produce(cancellation).await,
        }
        .map_err(MockError::ContentProduction)?;
        let content = match produced {
            Some(stream) => Content::Stream(stream),
            None => Content::Bytes(Bytes::new()),
        };
        return Ok(Some(content));
    }

    Ok(None)
}

/// Shared `get_response` flow for every [`Dispatch`] implementation.
pub(crate) async fn respond<D>(
    dispatcher: &D,
    request: &MockRequest,
    cancellation: CancellationToken,
) -> MockResult<Option<MockResponse>>
where
    D: Dispatch + ?Sized,
{
    if request.method.trim().is_empty() {
        return Err(MockError::invalid("request method must not be empty"));
    }

    match dispatcher.find(request) {
        Some(descriptor) => build_response(descriptor, request, cancellation)
            .await
            .map(Some),
        None => {
            let uri = request.uri.clone().unwrap_or_default();
            debug!(method = %request.method, uri = %uri, "No registration matched request");
            if dispatcher.throw_on_missing_registration() {
                Err(MockError::MissingRegistration {
                    method: request.method.clone(),
                    uri,
                })
            } else {
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::types::descriptor::ByteStream;
    use crate::types::headers::Headers;
    use futures::stream;
    use rstest::rstest;
    use std::io;

    fn request() -> MockRequest {
        MockRequest::new("GET", "https://x/a").header("X-Trace", "1")
    }

    async fn build(descriptor: ResponseDescriptor) -> MockResult<MockResponse> {
        build_response(&descriptor, &request(), CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_status_headers_and_request_are_copied() {
        let headers: Headers = [("a", "b"), ("c", "d"), ("c", "e")].into_iter().collect();
        let response = build(ResponseDescriptor::new().status(418).headers(headers))
            .await
            .unwrap();

        assert_eq!(response.status, 418);
        assert_eq!(response.request, request());
        assert_eq!(response.headers.get_all("c").collect::<Vec<_>>(), vec!["d", "e"]);
        assert!(!response.has_content());
        assert_eq!(response.content_type(), None);
    }

    #[tokio::test]
    async fn test_default_content_type_when_content_exists() {
        let response = build(ResponseDescriptor::new().body("{}")).await.unwrap();
        assert_eq!(response.content_type(), Some(DEFAULT_CONTENT_TYPE));
        assert_eq!(response.bytes().await.unwrap(), Bytes::from_static(b"{}"));
    }

    #[tokio::test]
    async fn test_explicit_content_type_wins() {
        let response = build(
            ResponseDescriptor::new()
                .header("content-type", "text/plain")
                .body("hi"),
        )
        .await
        .unwrap();
        assert_eq!(
            response.headers.get_all(CONTENT_TYPE).collect::<Vec<_>>(),
            vec!["text/plain"]
        );
    }

    #[rstest]
    #[case::sync_content(ResponseDescriptor::new().content(|| Ok(None)))]
    #[case::async_content(
        ResponseDescriptor::new().content_async(|_| async { Ok::<Option<Bytes>, BoxError>(None) })
    )]
    #[case::sync_stream(ResponseDescriptor::new().stream(|| Ok(None)))]
    #[case::async_stream(
        ResponseDescriptor::new().stream_async(|_| async { Ok::<Option<ByteStream>, BoxError>(None) })
    )]
    #[tokio::test]
    async fn test_missing_content_is_empty_but_present(#[case] descriptor: ResponseDescriptor) {
        let response = build(descriptor).await.unwrap();
        assert!(response.has_content());
        assert_eq!(response.content_type(), Some(DEFAULT_CONTENT_TYPE));
        assert!(response.bytes().await.unwrap().is_empty());
    }

    #[rstest]
    #[case::sync_content(ResponseDescriptor::new().content(|| {
        Err(io::Error::new(io::ErrorKind::InvalidData, "bad payload").into())
    }))]
    #[case::async_content(ResponseDescriptor::new().content_async(|_| async {
        Err::<Option<Bytes>, BoxError>(io::Error::new(io::ErrorKind::InvalidData, "bad payload").into())
    }))]
    #[case::sync_stream(ResponseDescriptor::new().stream(|| {
        Err(io::Error::new(io::ErrorKind::InvalidData, "bad payload").into())
    }))]
    #[case::async_stream(ResponseDescriptor::new().stream_async(|_| async {
        Err::<Option<ByteStream>, BoxError>(io::Error::new(io::ErrorKind::InvalidData, "bad payload").into())
    }))]
    #[tokio::test]
    async fn test_producer_failure_propagates_unchanged(#[case] descriptor: ResponseDescriptor) {
        let err = build(descriptor).await.unwrap_err();
        let original = err
            .producer_error()
            .and_then(|e| e.downcast_ref::<io::Error>())
            .expect("producer error should be preserved");
        assert_eq!(original.kind(), io::ErrorKind::InvalidData);
        assert_eq!(original.to_string(), "bad payload");
    }

    #[tokio::test]
    async fn test_stream_content_is_passed_through() {
        let descriptor = ResponseDescriptor::new().stream(|| {
            let chunks: Vec<Result<Bytes, BoxError>> =
                vec![Ok(Bytes::from_static(b"ab")), Ok(Bytes::from_static(b"cd"))];
            let stream: ByteStream = Box::pin(stream::iter(chunks));
            Ok(Some(stream))
        });
        let response = build(descriptor).await.unwrap();
        assert!(matches!(response.content, Some(Content::Stream(_))));
        assert_eq!(response.text().await.unwrap(), "abcd");
    }

    #[tokio::test]
    async fn test_async_producer_sees_cancellation_token() {
        let descriptor = ResponseDescriptor::new().content_async(|token: CancellationToken| async move {
            let body = if token.is_cancelled() { "cancelled" } else { "live" };
            Ok::<Option<Bytes>, BoxError>(Some(Bytes::from(body)))
        });
        let token = CancellationToken::new();
        token.cancel();

        let response = build_response(&descriptor, &request(), token).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "cancelled");
    }

    #[tokio::test]
    async fn test_producer_runs_per_build() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let descriptor = ResponseDescriptor::new().content(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });

        build_response(&descriptor, &request(), CancellationToken::new()).await.unwrap();
        build_response(&descriptor, &request(), CancellationToken::new()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
