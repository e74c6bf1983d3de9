//! Stream event types.
//!
//! Contains the StreamEvent enum with the event variants the Gamma agent
//! chat endpoint emits.

use serde::{Deserialize, Serialize};

/// Typed events decoded from the agent chat response stream.
///
/// The wire contract recognizes exactly two record shapes; every other line
/// in the stream (blank keep-alives, malformed JSON) is noise and never
/// becomes an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamEvent {
    /// Incremental assistant text to append to the in-progress reply
    Delta { text: String },
    /// Terminal event ending the exchange; carries the server-assigned
    /// (or reused) conversation identifier
    Done { conversation_id: String },
}

impl StreamEvent {
    /// Returns the event type name as a string for logging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Delta { .. } => "delta",
            StreamEvent::Done { .. } => "done",
        }
    }

    /// Whether this event terminates the exchange.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done { .. })
    }
}
