//! Mock HTTP client for testing.
//!
//! A scripted [`HttpClient`] that returns configured responses per URL and
//! records every request for verification, so controller and client flows
//! run without a network.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, HttpClient, HttpError, HttpResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// What the mock should answer for a URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A buffered response
    Success(HttpResponse),
    /// A request-level error
    Error(HttpError),
    /// A chunk stream; each item is delivered as one transport chunk,
    /// errors included, then the stream closes
    Stream(Vec<Result<Bytes, HttpError>>),
    /// A chunk stream that delivers its items and then never closes,
    /// for exercising the idle-timeout fail-safe
    StreamThenHang(Vec<Bytes>),
    /// The request itself never completes: the server accepts the
    /// connection but no response ever arrives
    Hang,
}

/// Scripted HTTP client for tests.
///
/// Responses are matched by exact URL first, then by prefix, then fall back
/// to the default response (if any). Unmatched requests fail with
/// [`HttpError::Other`].
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a URL (exact or prefix match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// All requests made so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests made to URLs containing `fragment`.
    pub fn requests_to(&self, fragment: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.contains(fragment))
            .collect()
    }

    fn record(&self, method: &str, url: &str, body: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            body,
        });
    }

    fn lookup(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }
        responses
            .iter()
            .find(|(pattern, _)| url.starts_with(pattern.as_str()))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.record("GET", url, None);
        match self.lookup(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(error)) => Err(error),
            Some(MockResponse::Hang) => std::future::pending().await,
            Some(_) => Err(HttpError::Other(format!(
                "mock: stream response scripted for GET {}",
                url
            ))),
            None => Err(HttpError::Other(format!("mock: no response for {}", url))),
        }
    }

    async fn post_stream(&self, url: &str, body: &str) -> Result<ByteStream, HttpError> {
        self.record("POST", url, Some(body.to_string()));
        match self.lookup(url) {
            Some(MockResponse::Stream(items)) => Ok(Box::pin(stream::iter(items))),
            Some(MockResponse::StreamThenHang(chunks)) => {
                let delivered = stream::iter(chunks.into_iter().map(Ok));
                Ok(Box::pin(delivered.chain(stream::pending())))
            }
            Some(MockResponse::Error(error)) => Err(error),
            Some(MockResponse::Hang) => std::future::pending().await,
            Some(MockResponse::Success(_)) => Err(HttpError::Other(format!(
                "mock: buffered response scripted for POST {}",
                url
            ))),
            None => Err(HttpError::Other(format!("mock: no response for {}", url))),
        }
    }
}
