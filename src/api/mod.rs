use serde::{Deserialize, Serialize};

use crate::core::message::Message;

/// Body posted to the chat endpoint: the full history plus the selected model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
}

/// Body returned by the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}
