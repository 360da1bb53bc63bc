//! The terminal function of the send pipeline.
//!
//! An [`HttpClientEngine`] performs the actual exchange once every
//! interceptor has had its say. [`MockEngine`] answers from a handler and
//! records what it was sent, which keeps tests deterministic and offline.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::ClientError;
use super::request::HttpRequestData;
use super::response::{HttpClientCall, HttpResponse};

/// Performs a single HTTP exchange.
#[async_trait]
pub trait HttpClientEngine: Send + Sync {
    /// Sends `request` and returns the completed call.
    async fn execute(&self, request: HttpRequestData) -> Result<HttpClientCall, ClientError>;
}

type MockHandler = dyn Fn(&HttpRequestData) -> Result<HttpResponse, ClientError> + Send + Sync;

/// An engine that answers from a handler without network I/O.
///
/// # Examples
///
/// ```
/// use chain_pipeline::client::{HttpClientEngine, HttpRequestData, HttpResponse, MockEngine};
/// use http::StatusCode;
///
/// # futures::executor::block_on(async {
/// let engine = MockEngine::new(|_request| Ok(HttpResponse::new(StatusCode::NO_CONTENT)));
///
/// let request = HttpRequestData::get("http://a.test/").unwrap();
/// let call = engine.execute(request).await.unwrap();
///
/// assert_eq!(call.response.status, StatusCode::NO_CONTENT);
/// assert_eq!(engine.request_count(), 1);
/// # });
/// ```
pub struct MockEngine {
    handler: Box<MockHandler>,
    requests: Mutex<Vec<HttpRequestData>>,
}

impl MockEngine {
    /// Creates an engine that answers every request with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequestData) -> Result<HttpResponse, ClientError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequestData> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Forgets all recorded requests.
    pub fn clear(&self) {
        self.requests.lock().clear();
    }
}

impl std::fmt::Debug for MockEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEngine")
            .field("requests", &self.request_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpClientEngine for MockEngine {
    async fn execute(&self, request: HttpRequestData) -> Result<HttpClientCall, ClientError> {
        self.requests.lock().push(request.clone());
        tracing::trace!(method = %request.method, url = %request.url, "mock engine request");

        let response = (self.handler)(&request)?;
        Ok(HttpClientCall { request, response })
    }
}
