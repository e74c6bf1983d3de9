//! Common test utilities for integration tests.
//!
//! Helpers for standing up a wiremock backend that speaks the agent
//! endpoints: the streaming chat POST plus the conversation read APIs.

use std::sync::Once;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gamma_client::prelude::*;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary, honoring
/// `RUST_LOG`, so `--nocapture` runs show the client's debug output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A chat response body: newline-delimited `data:` records ending in a
/// terminal `done` record.
pub fn stream_body(deltas: &[&str], conversation_id: &str) -> String {
    let mut body = String::new();
    for delta in deltas {
        body.push_str(&format!(
            "data: {}\n",
            serde_json::json!({ "text": delta })
        ));
    }
    body.push_str(&format!(
        "data: {}\n",
        serde_json::json!({ "done": true, "conversation_id": conversation_id })
    ));
    body
}

/// Mount a chat endpoint that answers with the given stream body.
pub async fn mount_chat(server: &MockServer, project_id: &str, body: String) {
    Mock::given(method("POST"))
        .and(path(format!("/agent/chat/{}", project_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.into_bytes(), "text/event-stream"),
        )
        .mount(server)
        .await;
}

/// Mount the conversation-list and message-history endpoints with a single
/// conversation containing the given persisted messages.
pub async fn mount_reads(
    server: &MockServer,
    project_id: &str,
    conversation_id: &str,
    messages: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/agent/conversations/{}/messages",
            conversation_id
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/agent/conversations/{}", project_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": conversation_id,
                "project_id": project_id,
                "created_at": "2026-02-01T12:00:00Z"
            }
        ])))
        .mount(server)
        .await;
}

/// A client pointed at the mock server, with test logging installed.
pub fn client_for(server: &MockServer) -> GammaClient {
    init_tracing();
    GammaClient::new(ClientConfig::new().with_base_url(server.uri()))
}
