//! Convenience re-exports for typical callers.

pub use crate::client::{ApiError, EventStream, GammaClient};
pub use crate::config::ClientConfig;
pub use crate::models::{ChatMessage, ChatRequest, Conversation, MessageRole};
pub use crate::session::{ChatController, SessionPhase, SessionUpdate, StreamError};
pub use crate::sse::{FrameDecoder, StreamEvent};
