//! One request/response cycle per user submission.
//!
//! The cycle is split into [`begin_submit`] and [`finish_submit`] so a caller
//! that must keep rendering (the terminal view) can run the network call on a
//! separate task and hand the result back. [`submit`] composes both for callers
//! that can simply await.
//!
//! Failures never escape as `Err`: they are logged and reported through
//! [`SubmitOutcome::Failed`], and the loading flag is always reset.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{ChatReply, ChatRequest};
use crate::core::message::Message;
use crate::core::store::ChatStore;

pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:8000/api/chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request never produced a response (connection refused, reset, ...).
    Transport(String),
    /// The endpoint answered with a non-success status.
    Status { status: u16, body: String },
    /// The body was not a JSON object carrying a `response` string.
    Decode(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Transport(reason) => write!(f, "chat request failed: {reason}"),
            RequestError::Status { status, body } if body.is_empty() => {
                write!(f, "chat endpoint returned status {status}")
            }
            RequestError::Status { status, body } => {
                write!(f, "chat endpoint returned status {status}: {body}")
            }
            RequestError::Decode(reason) => write!(f, "could not decode chat reply: {reason}"),
        }
    }
}

impl std::error::Error for RequestError {}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, RequestError>;
}

/// Posts the conversation as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatBackend {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, RequestError> {
        debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| RequestError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RequestError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        serde_json::from_str::<ChatReply>(&body).map_err(|err| RequestError::Decode(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input was blank; nothing changed and nothing was sent.
    Skipped,
    /// The assistant reply that was appended to the store.
    Replied(Message),
    /// The request failed; no assistant message was appended.
    Failed(RequestError),
}

impl SubmitOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SubmitOutcome::Skipped)
    }

    pub fn error(&self) -> Option<&RequestError> {
        match self {
            SubmitOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Appends the user turn, raises the loading flag and snapshots the request.
///
/// Returns `None` without touching the store when `input` is blank. The
/// trimmed text is what gets stored and sent.
pub fn begin_submit(store: &mut ChatStore, input: &str) -> Option<ChatRequest> {
    let content = input.trim();
    if content.is_empty() {
        return None;
    }

    store.add_message(Message::user(content));
    store.set_loading(true);

    Some(ChatRequest {
        messages: store.messages().to_vec(),
        model: store.model().to_string(),
    })
}

/// Applies the endpoint result and lowers the loading flag on every path.
pub fn finish_submit(
    store: &mut ChatStore,
    result: Result<ChatReply, RequestError>,
) -> SubmitOutcome {
    let outcome = match result {
        Ok(reply) => {
            let message = Message::assistant(reply.response);
            store.add_message(message.clone());
            SubmitOutcome::Replied(message)
        }
        Err(err) => {
            warn!(error = %err, "chat turn dropped");
            SubmitOutcome::Failed(err)
        }
    };

    store.set_loading(false);
    outcome
}

/// Runs a full cycle against `backend`.
pub async fn submit(
    store: &mut ChatStore,
    backend: &dyn ChatBackend,
    input: &str,
) -> SubmitOutcome {
    let Some(request) = begin_submit(store, input) else {
        return SubmitOutcome::Skipped;
    };

    // Lowers the flag if this future is dropped or unwinds mid-request.
    let guard = LoadingGuard { store };
    let result = backend.complete(&request).await;
    finish_submit(&mut *guard.store, result)
}

struct LoadingGuard<'a> {
    store: &'a mut ChatStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.store.is_loading() {
            self.store.set_loading(false);
        }
    }
}
