//! Conversation state and its observers.
//!
//! [`ChatStore`] is an owned value handed to whoever drives the conversation.
//! Every mutation notifies subscribers synchronously, in the order they
//! subscribed, after the state has been updated.

use crate::core::message::Message;
use crate::core::models::DEFAULT_MODEL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub model: String,
    pub is_loading: bool,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            model: DEFAULT_MODEL.to_string(),
            is_loading: false,
        }
    }
}

/// Which mutation produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    MessageAdded,
    ModelChanged,
    LoadingChanged,
    MessagesCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&ConversationState, StoreEvent) + Send>;

pub struct ChatStore {
    state: ConversationState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ChatStore {
    pub fn new() -> Self {
        Self::with_model(DEFAULT_MODEL)
    }

    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            state: ConversationState {
                model: model.into(),
                ..ConversationState::default()
            },
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn model(&self) -> &str {
        &self.state.model
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Appends `message` to the end of the conversation.
    pub fn add_message(&mut self, message: Message) {
        self.state.messages.push(message);
        self.notify(StoreEvent::MessageAdded);
    }

    /// Replaces the active model identifier. Any string is accepted.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.state.model = model.into();
        self.notify(StoreEvent::ModelChanged);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
        self.notify(StoreEvent::LoadingChanged);
    }

    pub fn clear_messages(&mut self) {
        self.state.messages.clear();
        self.notify(StoreEvent::MessagesCleared);
    }

    /// Registers an observer that runs after every mutation.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&ConversationState, StoreEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes an observer. Returns `false` when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        let state = &self.state;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(state, event);
        }
    }
}
