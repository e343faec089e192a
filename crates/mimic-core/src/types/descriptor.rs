//! Recorded response for one registration.
//!
//! A [`ResponseDescriptor`] holds a status code, response headers and at most
//! one content source. Content is produced lazily when a response is built,
//! so producers run once per matched request.

use crate::error::{BoxError, MockError, MockResult};
use crate::types::headers::Headers;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Streamed response body.
pub type ByteStream = BoxStream<'static, Result<Bytes, BoxError>>;

type ContentFn = dyn Fn() -> Result<Option<Bytes>, BoxError> + Send + Sync;
type AsyncContentFn =
    dyn Fn(CancellationToken) -> BoxFuture<'static, Result<Option<Bytes>, BoxError>> + Send + Sync;
type StreamFn = dyn Fn() -> Result<Option<ByteStream>, BoxError> + Send + Sync;
type AsyncStreamFn = dyn Fn(CancellationToken) -> BoxFuture<'static, Result<Option<ByteStream>, BoxError>>
    + Send
    + Sync;

/// Producer of a whole response body.
#[derive(Clone)]
pub enum ContentProducer {
    Sync(Arc<ContentFn>),
    Async(Arc<AsyncContentFn>),
}

/// Producer of a streamed response body.
#[derive(Clone)]
pub enum StreamProducer {
    Sync(Arc<StreamFn>),
    Async(Arc<AsyncStreamFn>),
}

impl fmt::Debug for ContentProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentProducer::Sync(_) => f.write_str("ContentProducer::Sync"),
            ContentProducer::Async(_) => f.write_str("ContentProducer::Async"),
        }
    }
}

impl fmt::Debug for StreamProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamProducer::Sync(_) => f.write_str("StreamProducer::Sync"),
            StreamProducer::Async(_) => f.write_str("StreamProducer::Async"),
        }
    }
}

/// Status, headers and content source recorded for a registration.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    status: u16,
    headers: Headers,
    content: Option<ContentProducer>,
    stream: Option<StreamProducer>,
}

impl Default for ResponseDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDescriptor {
    /// 200 with no headers and no content.
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Headers::new(),
            content: None,
            stream: None,
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Append a response header value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Append all values of `headers`, keeping their order.
    pub fn headers(mut self, headers: Headers) -> Self {
        for (name, values) in headers.iter() {
            self.headers.extend_values(name, values.iter().cloned());
        }
        self
    }

    /// Synchronous body producer. `Ok(None)` yields an empty body.
    pub fn content<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Result<Option<Bytes>, BoxError> + Send + Sync + 'static,
    {
        self.content = Some(ContentProducer::Sync(Arc::new(producer)));
        self
    }

    /// Asynchronous body producer, given the caller's cancellation token.
    pub fn content_async<F, Fut>(mut self, producer: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Bytes>, BoxError>> + Send + 'static,
    {
        self.content = Some(ContentProducer::Async(Arc::new(move |token: CancellationToken| {
            producer(token).boxed()
        })));
        self
    }

    /// Synchronous stream producer. `Ok(None)` yields an empty body.
    pub fn stream<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Result<Option<ByteStream>, BoxError> + Send + Sync + 'static,
    {
        self.stream = Some(StreamProducer::Sync(Arc::new(producer)));
        self
    }

    /// Asynchronous stream producer, given the caller's cancellation token.
    pub fn stream_async<F, Fut>(mut self, producer: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<ByteStream>, BoxError>> + Send + 'static,
    {
        self.stream = Some(StreamProducer::Async(Arc::new(move |token: CancellationToken| {
            producer(token).boxed()
        })));
        self
    }

    /// Fixed body returned on every match.
    pub fn body(self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.content(move || Ok(Some(body.clone())))
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn response_headers(&self) -> &Headers {
        &self.headers
    }

    pub fn content_producer(&self) -> Option<&ContentProducer> {
        self.content.as_ref()
    }

    pub fn stream_producer(&self) -> Option<&StreamProducer> {
        self.stream.as_ref()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some() || self.stream.is_some()
    }

    /// Reject descriptors carrying both a body and a stream producer.
    pub fn validate(&self) -> MockResult<()> {
        if self.content.is_some() && self.stream.is_some() {
            return Err(MockError::invalid(
                "content producer and stream producer are mutually exclusive",
            ));
        }
        Ok(())
    }
}
