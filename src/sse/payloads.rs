//! Internal payload deserialization structs.

use serde::Deserialize;

/// Raw JSON payload of a `data: ` record.
///
/// The backend interleaves two shapes on one stream: `{"text": "..."}` for
/// deltas and `{"done": true, "conversation_id": "..."}` for completion.
/// Unknown fields are ignored so the decoder tolerates additive changes on
/// the server side.
#[derive(Debug, Deserialize)]
pub(crate) struct FramePayload {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}
