//! Gamma API client.
//!
//! HTTP client for the agent endpoints of the Gamma backend: the streaming
//! chat POST plus the conversation and message read APIs. The chat response
//! body is decoded incrementally into [`StreamEvent`]s by a [`FrameDecoder`]
//! owned by the returned stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::models::{ChatMessage, ChatRequest, Conversation};
use crate::sse::{FrameDecoder, StreamEvent};
use crate::traits::{ByteStream, HttpClient, HttpError};

/// A pinned, boxed stream of decoded chat events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, ApiError>> + Send>>;

/// Error type for Gamma API operations.
#[derive(Debug)]
pub enum ApiError {
    /// The transport failed (connection, timeout, broken body stream)
    Transport(HttpError),
    /// The server answered with a non-success status
    Status { status: u16, message: String },
    /// A response body failed to serialize or deserialize
    Json(serde_json::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "Transport error: {}", e),
            ApiError::Status { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ApiError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Json(e) => Some(e),
            ApiError::Status { .. } => None,
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Status { status, message } => ApiError::Status { status, message },
            other => ApiError::Transport(other),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Json(e)
    }
}

/// Client for the Gamma agent API.
pub struct GammaClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
}

impl GammaClient {
    /// Create a client backed by the production reqwest adapter.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: Arc::new(ReqwestHttpClient::new()),
        }
    }

    /// Create a client over a caller-provided transport, for tests or
    /// custom adapters.
    pub fn with_http(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    /// The configured backend base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The configured idle window for stalled streams.
    pub fn idle_timeout(&self) -> std::time::Duration {
        self.config.idle_timeout()
    }

    /// Start an agent chat exchange.
    ///
    /// Sends `POST /agent/chat/{project_id}` and returns a lazy stream of
    /// decoded events. The stream yields deltas and the terminal `done`
    /// event in arrival order; unrecognized records in the body never
    /// surface. A fresh decoder is created per call and owned by the
    /// returned stream, so its buffers are never shared across exchanges.
    pub async fn chat_stream(
        &self,
        project_id: &str,
        request: &ChatRequest,
    ) -> Result<EventStream, ApiError> {
        let url = format!("{}/agent/chat/{}", self.config.base_url, project_id);
        let body = serde_json::to_string(request)?;

        tracing::debug!(%url, "opening chat stream");
        let bytes = self.http.post_stream(&url, &body).await?;

        Ok(decode_event_stream(bytes))
    }

    /// List conversations for a project.
    pub async fn list_conversations(&self, project_id: &str) -> Result<Vec<Conversation>, ApiError> {
        let url = format!("{}/agent/conversations/{}", self.config.base_url, project_id);
        self.get_json(&url).await
    }

    /// Fetch the authoritative message list for a conversation.
    pub async fn conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let url = format!(
            "{}/agent/conversations/{}/messages",
            self.config.base_url, conversation_id
        );
        self.get_json(&url).await
    }

    /// Check if the backend is reachable and healthy.
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let url = format!("{}/health", self.config.base_url);
        let response = self.http.get(&url).await?;
        Ok(response.is_success())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.http.get(url).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                message: response.text(),
            });
        }
        response.json().map_err(ApiError::Json)
    }
}

/// State threaded through the unfold that turns a byte stream into events.
struct DecodeState {
    bytes: ByteStream,
    /// Taken (and flushed) when the transport closes; `None` afterwards
    decoder: Option<FrameDecoder>,
    /// Events decoded but not yet yielded
    queue: VecDeque<StreamEvent>,
}

/// Wrap a raw byte stream in an incremental decoder.
fn decode_event_stream(bytes: ByteStream) -> EventStream {
    let state = DecodeState {
        bytes,
        decoder: Some(FrameDecoder::new()),
        queue: VecDeque::new(),
    };

    let events = stream::unfold(state, |mut st| async move {
        loop {
            if let Some(event) = st.queue.pop_front() {
                return Some((Ok(event), st));
            }
            // Decoder gone means the transport closed and the final flush
            // has already been queued and drained.
            st.decoder.as_ref()?;

            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    if let Some(decoder) = st.decoder.as_mut() {
                        st.queue.extend(decoder.feed(&chunk));
                    }
                }
                Some(Err(e)) => {
                    st.decoder = None;
                    return Some((Err(ApiError::from(e)), st));
                }
                None => {
                    if let Some(decoder) = st.decoder.take() {
                        st.queue.extend(decoder.close());
                    }
                }
            }
        }
    });

    Box::pin(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::HttpResponse;
    use bytes::Bytes;

    fn mock_client(mock: &MockHttpClient) -> GammaClient {
        GammaClient::with_http(
            ClientConfig::new().with_base_url("http://test"),
            Arc::new(mock.clone()),
        )
    }

    async fn collect(mut stream: EventStream) -> Vec<Result<StreamEvent, ApiError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 503,
            message: "unavailable".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("503"));
        assert!(display.contains("unavailable"));
    }

    #[test]
    fn test_api_error_from_status_http_error() {
        let err: ApiError = HttpError::Status {
            status: 404,
            message: "Conversation not found".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[test]
    fn test_api_error_from_transport_http_error() {
        let err: ApiError = HttpError::Io("reset".to_string()).into();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_chat_stream_decodes_events() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/agent/chat/p-1",
            MockResponse::Stream(vec![
                Ok(Bytes::from_static(b"data: {\"text\":\"Hel")),
                Ok(Bytes::from_static(b"lo\"}\n")),
                Ok(Bytes::from_static(
                    b"data: {\"done\":true,\"conversation_id\":\"abc123\"}\n",
                )),
            ]),
        );
        let client = mock_client(&mock);

        let stream = client
            .chat_stream("p-1", &ChatRequest::new("hi"))
            .await
            .unwrap();
        let events: Vec<_> = collect(stream).await.into_iter().map(Result::unwrap).collect();

        assert_eq!(
            events,
            vec![
                StreamEvent::Delta {
                    text: "Hello".to_string()
                },
                StreamEvent::Done {
                    conversation_id: "abc123".to_string()
                },
            ]
        );

        // The request body carries explicit nulls for a new conversation.
        let posted = &mock.requests_to("/agent/chat/")[0];
        let body: serde_json::Value = serde_json::from_str(posted.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["message"], "hi");
        assert!(body["conversation_id"].is_null());
        assert!(body["training_job_id"].is_null());
    }

    #[tokio::test]
    async fn test_chat_stream_flushes_unterminated_final_record() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/agent/chat/p-1",
            MockResponse::Stream(vec![Ok(Bytes::from_static(
                b"data: {\"text\":\"a\"}\ndata: {\"done\":true,\"conversation_id\":\"c\"}",
            ))]),
        );
        let client = mock_client(&mock);

        let stream = client
            .chat_stream("p-1", &ChatRequest::new("hi"))
            .await
            .unwrap();
        let events: Vec<_> = collect(stream).await.into_iter().map(Result::unwrap).collect();
        assert_eq!(events.len(), 2);
        assert!(events[1].is_terminal());
    }

    #[tokio::test]
    async fn test_chat_stream_server_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/agent/chat/p-1",
            MockResponse::Error(HttpError::Status {
                status: 404,
                message: "Project not found".to_string(),
            }),
        );
        let client = mock_client(&mock);

        let result = client.chat_stream("p-1", &ChatRequest::new("hi")).await;
        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_chat_stream_surfaces_mid_stream_transport_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/agent/chat/p-1",
            MockResponse::Stream(vec![
                Ok(Bytes::from_static(b"data: {\"text\":\"a\"}\n")),
                Err(HttpError::Io("connection reset".to_string())),
            ]),
        );
        let client = mock_client(&mock);

        let stream = client
            .chat_stream("p-1", &ChatRequest::new("hi"))
            .await
            .unwrap();
        let items = collect(stream).await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_list_conversations() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/agent/conversations/p-1",
            MockResponse::Success(HttpResponse::new(
                200,
                Bytes::from(
                    r#"[{"id":"c-1","project_id":"p-1","created_at":"2026-02-01T12:00:00Z"}]"#,
                ),
            )),
        );
        let client = mock_client(&mock);

        let conversations = client.list_conversations("p-1").await.unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].id, "c-1");
    }

    #[tokio::test]
    async fn test_conversation_messages_error_status() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/agent/conversations/c-1/messages",
            MockResponse::Success(HttpResponse::new(
                404,
                Bytes::from(r#"{"detail":"Conversation not found"}"#),
            )),
        );
        let client = mock_client(&mock);

        let result = client.conversation_messages("c-1").await;
        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/health",
            MockResponse::Success(HttpResponse::new(200, Bytes::from(r#"{"status":"ok"}"#))),
        );
        let client = mock_client(&mock);
        assert!(client.health_check().await.unwrap());
    }
}
