//! Chat request body.

use serde::{Deserialize, Serialize};

/// Body of `POST /agent/chat/{project_id}`.
///
/// `conversation_id` and `training_job_id` serialize as explicit `null`s:
/// the backend treats a null conversation id as "start a new conversation"
/// and assigns the id itself, returning it in the terminal `done` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
    pub training_job_id: Option<String>,
}

impl ChatRequest {
    /// Create a request that starts a new conversation.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
            training_job_id: None,
        }
    }

    /// Continue an existing conversation (builder pattern).
    pub fn with_conversation(mut self, conversation_id: Option<String>) -> Self {
        self.conversation_id = conversation_id;
        self
    }

    /// Scope the exchange to a training job (builder pattern).
    pub fn with_training_job(mut self, training_job_id: Option<String>) -> Self {
        self.training_job_id = training_job_id;
        self
    }
}
