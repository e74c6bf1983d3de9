//! HTTP client trait abstraction.
//!
//! Two operations cover everything the Gamma client needs: a buffered GET
//! for the read APIs and a streaming POST for the chat endpoint. Both
//! requests carry JSON bodies and expect JSON (or record-framed) responses,
//! so content negotiation lives in the adapter, not in the trait.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// A lazily-pulled response body: one `Bytes` item per transport chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// A fully-buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The response body as text, lossy on invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level errors.
#[derive(Debug, Clone)]
pub enum HttpError {
    /// Connection could not be established
    ConnectionFailed(String),
    /// Request timed out
    Timeout(String),
    /// Server rejected the request before a body stream was opened
    Status { status: u16, message: String },
    /// The body stream broke mid-transfer
    Io(String),
    /// Other transport error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::Status { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the HTTP operations the Gamma client performs.
///
/// Implementations include the production reqwest-based adapter and a
/// scripted mock for tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and buffer the whole response.
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;

    /// Perform a POST request with a JSON body and return the response body
    /// as a chunk stream.
    ///
    /// A non-2xx status is reported as [`HttpError::Status`] with the error
    /// body as its message; the stream is only returned once the server has
    /// accepted the request.
    async fn post_stream(&self, url: &str, body: &str) -> Result<ByteStream, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        assert!(HttpResponse::new(200, Bytes::new()).is_success());
        assert!(HttpResponse::new(204, Bytes::new()).is_success());
        assert!(HttpResponse::new(299, Bytes::new()).is_success());
        assert!(!HttpResponse::new(301, Bytes::new()).is_success());
        assert!(!HttpResponse::new(404, Bytes::new()).is_success());
        assert!(!HttpResponse::new(500, Bytes::new()).is_success());
    }

    #[test]
    fn test_response_text_lossy() {
        let response = HttpResponse::new(200, Bytes::from_static(b"ok \xff"));
        assert_eq!(response.text(), "ok \u{fffd}");
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Probe {
            status: String,
        }
        let response = HttpResponse::new(200, Bytes::from(r#"{"status":"healthy"}"#));
        let probe: Probe = response.json().unwrap();
        assert_eq!(probe.status, "healthy");
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::Status {
                status: 502,
                message: "bad gateway".to_string()
            }
            .to_string(),
            "Server error (502): bad gateway"
        );
        assert_eq!(
            HttpError::Io("reset".to_string()).to_string(),
            "IO error: reset"
        );
    }
}
