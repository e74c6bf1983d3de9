//! Wire types shared with the Gamma backend.
//!
//! These mirror the backend rows for agent conversations and messages, plus
//! the chat request body. Read models are fetched snapshots: the session
//! controller never mutates them, it only appends provisional local copies
//! during an active stream and replaces them with the authoritative fetch
//! once the exchange completes.

mod conversation;
mod message;
mod request;

pub use conversation::Conversation;
pub use message::{ChatMessage, MessageRole};
pub use request::ChatRequest;
