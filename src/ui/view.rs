//! Interaction state of the chat screen and its key map.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::ChatRequest;
use crate::core::chat_request::{begin_submit, SubmitOutcome};
use crate::core::models::{next_model, previous_model};
use crate::core::store::ChatStore;
use crate::utils::input::InputLine;

/// What the event loop should do after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Redraw,
    /// A user turn was recorded; the request must be sent.
    Submit(ChatRequest),
    Quit,
}

#[derive(Debug, Default)]
pub struct ChatView {
    pub input: InputLine,
    /// One-line notice shown above the input; cleared by the next edit.
    pub status: Option<String>,
    /// Rows scrolled up from the newest message.
    pub scroll_from_bottom: u16,
}

impl ChatView {
    pub fn handle_key(&mut self, store: &mut ChatStore, key: KeyEvent) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('c') if ctrl => return KeyOutcome::Quit,
            KeyCode::PageUp => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(5);
                return KeyOutcome::Redraw;
            }
            KeyCode::PageDown => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(5);
                return KeyOutcome::Redraw;
            }
            _ => {}
        }

        // The form is disabled while a reply is pending.
        if store.is_loading() {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Enter => self.submit(store),
            KeyCode::Tab => {
                store.set_model(next_model(store.model()));
                KeyOutcome::Redraw
            }
            KeyCode::BackTab => {
                store.set_model(previous_model(store.model()));
                KeyOutcome::Redraw
            }
            KeyCode::Char('l') if ctrl => {
                store.clear_messages();
                self.status = None;
                self.scroll_from_bottom = 0;
                KeyOutcome::Redraw
            }
            KeyCode::Backspace => {
                self.input.backspace();
                self.status = None;
                KeyOutcome::Redraw
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.insert_char(c);
                self.status = None;
                KeyOutcome::Redraw
            }
            _ => KeyOutcome::Ignored,
        }
    }

    pub fn paste(&mut self, store: &ChatStore, text: &str) -> KeyOutcome {
        if store.is_loading() {
            return KeyOutcome::Ignored;
        }
        self.input.insert_str(text);
        self.status = None;
        KeyOutcome::Redraw
    }

    /// Records the outcome of a finished request.
    pub fn apply_outcome(&mut self, outcome: &SubmitOutcome) {
        if let Some(err) = outcome.error() {
            self.status = Some(format!("Request failed: {err}"));
        }
        self.scroll_from_bottom = 0;
    }

    fn submit(&mut self, store: &mut ChatStore) -> KeyOutcome {
        if self.input.as_str().trim().is_empty() {
            return KeyOutcome::Ignored;
        }

        let text = self.input.take();
        match begin_submit(store, &text) {
            Some(request) => {
                self.status = None;
                self.scroll_from_bottom = 0;
                KeyOutcome::Submit(request)
            }
            None => KeyOutcome::Ignored,
        }
    }
}
