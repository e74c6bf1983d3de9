//! Chat session controller.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::client::GammaClient;
use crate::models::{ChatMessage, ChatRequest, Conversation, MessageRole};
use crate::session::{SessionUpdate, StreamError};
use crate::sse::StreamEvent;

/// Where the session is in the request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No exchange in flight
    Idle,
    /// Request sent, response body not yet open
    Sending,
    /// Response body open, deltas arriving
    Streaming,
}

/// State machine for one agent chat session.
///
/// The controller owns the conversation state and mutates it only in
/// [`apply`](Self::apply). `send`, `select_conversation`, and the refresh
/// after completion spawn tasks that report back as [`SessionUpdate`]s;
/// the caller drains them with [`next_update`](Self::next_update) and
/// feeds each one to `apply`.
///
/// Every `send` and `new_conversation` bumps the session epoch, and
/// stream-scoped updates are stamped with the epoch of the exchange that
/// produced them. `apply` drops updates from any other epoch, so events
/// from an abandoned stream cannot touch the current session.
pub struct ChatController {
    client: Arc<GammaClient>,
    project_id: String,
    /// Set when the session is scoped to a training job's agent
    training_job_id: Option<String>,
    /// `None` until the first exchange completes and the terminal event
    /// carries the server-assigned id
    conversation_id: Option<String>,
    conversations: Vec<Conversation>,
    messages: Vec<ChatMessage>,
    phase: SessionPhase,
    /// Assistant text assembled from deltas during the active exchange
    assembled: String,
    epoch: u64,
    last_error: Option<StreamError>,
    update_tx: mpsc::UnboundedSender<SessionUpdate>,
    update_rx: mpsc::UnboundedReceiver<SessionUpdate>,
}

impl ChatController {
    /// Create an idle controller for a project, optionally scoped to a
    /// training job.
    pub fn new(
        client: Arc<GammaClient>,
        project_id: impl Into<String>,
        training_job_id: Option<String>,
    ) -> Self {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        Self {
            client,
            project_id: project_id.into(),
            training_job_id,
            conversation_id: None,
            conversations: Vec::new(),
            messages: Vec::new(),
            phase: SessionPhase::Idle,
            assembled: String::new(),
            epoch: 0,
            last_error: None,
            update_tx,
            update_rx,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Messages in the current conversation, local appends included.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Known conversations for the project.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// The current conversation id, if one has been assigned or selected.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Assistant text assembled so far in the active exchange.
    pub fn streaming_text(&self) -> &str {
        &self.assembled
    }

    /// The error from the most recent failed exchange, cleared on the
    /// next send.
    pub fn last_error(&self) -> Option<&StreamError> {
        self.last_error.as_ref()
    }

    /// Wait for the next update from a spawned task.
    ///
    /// Returns `None` only if the controller's own sender has been
    /// dropped, which cannot happen while the controller is alive.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        self.update_rx.recv().await
    }

    /// Take a pending update without waiting.
    pub fn try_next_update(&mut self) -> Option<SessionUpdate> {
        self.update_rx.try_recv().ok()
    }

    /// Start an exchange with the agent.
    ///
    /// No-op while another exchange is in flight or when the input is
    /// blank. Appends the user message locally right away; the assistant
    /// reply is committed only when the stream's terminal event arrives.
    pub fn send(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.phase != SessionPhase::Idle {
            tracing::debug!(phase = ?self.phase, "send ignored: exchange in flight");
            return;
        }
        if text.trim().is_empty() {
            return;
        }

        self.last_error = None;
        self.epoch += 1;
        self.assembled.clear();
        self.messages
            .push(ChatMessage::local(MessageRole::User, text.clone()));
        self.phase = SessionPhase::Sending;

        let request = ChatRequest::new(text)
            .with_conversation(self.conversation_id.clone())
            .with_training_job(self.training_job_id.clone());

        let client = Arc::clone(&self.client);
        let project_id = self.project_id.clone();
        let epoch = self.epoch;
        let idle_timeout = self.client.idle_timeout();
        let tx = self.update_tx.clone();
        tokio::spawn(async move {
            Self::run_stream(client, project_id, request, epoch, idle_timeout, tx).await;
        });
    }

    /// Drive one exchange's stream, forwarding events as updates.
    async fn run_stream(
        client: Arc<GammaClient>,
        project_id: String,
        request: ChatRequest,
        epoch: u64,
        idle_timeout: Duration,
        tx: mpsc::UnboundedSender<SessionUpdate>,
    ) {
        // The open phase (request send + response headers) is bounded by
        // the same idle window as the reads; a server that accepts the
        // connection but never answers must not wedge the session.
        let opened =
            tokio::time::timeout(idle_timeout, client.chat_stream(&project_id, &request)).await;
        let mut stream = match opened {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                let _ = tx.send(SessionUpdate::Failed {
                    epoch,
                    error: StreamError::Api(e),
                });
                return;
            }
            Err(_) => {
                let _ = tx.send(SessionUpdate::Failed {
                    epoch,
                    error: StreamError::IdleTimeout {
                        secs: idle_timeout.as_secs(),
                    },
                });
                return;
            }
        };

        let _ = tx.send(SessionUpdate::Opened { epoch });

        loop {
            let next = tokio::time::timeout(idle_timeout, stream.next()).await;
            let update = match next {
                Err(_) => SessionUpdate::Failed {
                    epoch,
                    error: StreamError::IdleTimeout {
                        secs: idle_timeout.as_secs(),
                    },
                },
                Ok(None) => SessionUpdate::Failed {
                    epoch,
                    error: StreamError::ClosedWithoutDone,
                },
                Ok(Some(Err(e))) => SessionUpdate::Failed {
                    epoch,
                    error: StreamError::Api(e),
                },
                Ok(Some(Ok(StreamEvent::Delta { text }))) => {
                    let _ = tx.send(SessionUpdate::Delta { epoch, text });
                    continue;
                }
                Ok(Some(Ok(StreamEvent::Done { conversation_id }))) => SessionUpdate::Completed {
                    epoch,
                    conversation_id,
                },
            };
            let _ = tx.send(update);
            return;
        }
    }

    /// Apply one update to the session state.
    pub fn apply(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::Opened { epoch } => {
                if !self.owns(epoch) {
                    return;
                }
                self.phase = SessionPhase::Streaming;
            }
            SessionUpdate::Delta { epoch, text } => {
                if !self.owns(epoch) {
                    return;
                }
                self.phase = SessionPhase::Streaming;
                self.assembled.push_str(&text);
            }
            SessionUpdate::Completed {
                epoch,
                conversation_id,
            } => {
                if !self.owns(epoch) {
                    return;
                }
                let content = mem::take(&mut self.assembled);
                self.messages
                    .push(ChatMessage::local(MessageRole::Assistant, content));
                if self.conversation_id.is_none() {
                    self.conversation_id = Some(conversation_id.clone());
                }
                self.phase = SessionPhase::Idle;
                self.spawn_refresh(conversation_id);
            }
            SessionUpdate::Failed { epoch, error } => {
                if !self.owns(epoch) {
                    return;
                }
                tracing::warn!(%error, "chat exchange failed");
                self.assembled.clear();
                self.phase = SessionPhase::Idle;
                self.last_error = Some(error);
            }
            SessionUpdate::MessagesLoaded {
                conversation_id,
                messages,
            } => {
                // A fetch for a conversation we have since switched away
                // from must not clobber the current one.
                if self.conversation_id.as_deref() == Some(conversation_id.as_str()) {
                    self.messages = messages;
                }
            }
            SessionUpdate::ConversationsLoaded { conversations } => {
                self.conversations = conversations;
            }
        }
    }

    fn owns(&self, epoch: u64) -> bool {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "dropping stale stream update");
            return false;
        }
        true
    }

    /// After completion, replace local appends with the authoritative
    /// message list and refresh the conversation list.
    fn spawn_refresh(&self, conversation_id: String) {
        let client = Arc::clone(&self.client);
        let project_id = self.project_id.clone();
        let tx = self.update_tx.clone();
        tokio::spawn(async move {
            match client.conversation_messages(&conversation_id).await {
                Ok(messages) => {
                    let _ = tx.send(SessionUpdate::MessagesLoaded {
                        conversation_id,
                        messages,
                    });
                }
                Err(e) => tracing::warn!(%e, "message refresh failed"),
            }
            match client.list_conversations(&project_id).await {
                Ok(conversations) => {
                    let _ = tx.send(SessionUpdate::ConversationsLoaded { conversations });
                }
                Err(e) => tracing::warn!(%e, "conversation refresh failed"),
            }
        });
    }

    /// Switch to an existing conversation and load its history.
    ///
    /// No-op while an exchange is in flight.
    pub fn select_conversation(&mut self, conversation_id: impl Into<String>) {
        if self.phase != SessionPhase::Idle {
            tracing::debug!("select_conversation ignored: exchange in flight");
            return;
        }
        let conversation_id = conversation_id.into();
        self.conversation_id = Some(conversation_id.clone());
        self.messages.clear();
        self.last_error = None;

        let client = Arc::clone(&self.client);
        let tx = self.update_tx.clone();
        tokio::spawn(async move {
            match client.conversation_messages(&conversation_id).await {
                Ok(messages) => {
                    let _ = tx.send(SessionUpdate::MessagesLoaded {
                        conversation_id,
                        messages,
                    });
                }
                Err(e) => tracing::warn!(%e, "failed to load conversation"),
            }
        });
    }

    /// Reset to a fresh unsaved conversation.
    ///
    /// Also the abandonment path: bumping the epoch means updates from
    /// any exchange still in flight no longer match and are dropped.
    pub fn new_conversation(&mut self) {
        self.epoch += 1;
        self.conversation_id = None;
        self.messages.clear();
        self.assembled.clear();
        self.phase = SessionPhase::Idle;
        self.last_error = None;
    }

    /// Refresh the project's conversation list in the background.
    pub fn refresh_conversations(&self) {
        let client = Arc::clone(&self.client);
        let project_id = self.project_id.clone();
        let tx = self.update_tx.clone();
        tokio::spawn(async move {
            match client.list_conversations(&project_id).await {
                Ok(conversations) => {
                    let _ = tx.send(SessionUpdate::ConversationsLoaded { conversations });
                }
                Err(e) => tracing::warn!(%e, "failed to list conversations"),
            }
        });
    }
}
