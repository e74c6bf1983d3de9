//! Updates surfaced by stream and refresh tasks.

use crate::models::{ChatMessage, Conversation};
use crate::session::StreamError;

/// One notification from a spawned task, applied to the controller by the
/// caller's update pump.
///
/// Stream-scoped variants carry the epoch of the exchange that produced
/// them; [`crate::session::ChatController::apply`] drops updates whose
/// epoch no longer matches, so a late event from an abandoned stream never
/// corrupts the current session.
#[derive(Debug)]
pub enum SessionUpdate {
    /// The response body opened; the exchange is streaming
    Opened { epoch: u64 },
    /// Incremental assistant text
    Delta { epoch: u64, text: String },
    /// The exchange completed; carries the conversation id from the
    /// terminal record
    Completed { epoch: u64, conversation_id: String },
    /// The exchange failed; partial text is discarded
    Failed { epoch: u64, error: StreamError },
    /// Authoritative message list fetched from the backend
    MessagesLoaded {
        conversation_id: String,
        messages: Vec<ChatMessage>,
    },
    /// Conversation list fetched from the backend
    ConversationsLoaded { conversations: Vec<Conversation> },
}

impl SessionUpdate {
    /// Variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionUpdate::Opened { .. } => "opened",
            SessionUpdate::Delta { .. } => "delta",
            SessionUpdate::Completed { .. } => "completed",
            SessionUpdate::Failed { .. } => "failed",
            SessionUpdate::MessagesLoaded { .. } => "messages_loaded",
            SessionUpdate::ConversationsLoaded { .. } => "conversations_loaded",
        }
    }
}
