//! Conversation list entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One agent conversation, as listed per project.
///
/// Read-only snapshot from the backend; `training_job_id` is set when the
/// conversation was opened from a training job page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub training_job_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Whether this conversation is attached to a training job.
    pub fn is_job_scoped(&self) -> bool {
        self.training_job_id.is_some()
    }
}
