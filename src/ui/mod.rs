//! Terminal chat screen.
//!
//! - [`view`]: input field, status line and the key map that drives the
//!   submit lifecycle in [`crate::core::chat_request`].
//! - [`renderer`]: frame layout for a [`crate::core::store::ConversationState`].
//! - [`chat_loop`]: terminal setup and the event loop. Requests run on spawned
//!   tasks and their results come back over a channel, so the screen keeps
//!   redrawing while a reply is pending.

pub mod chat_loop;
pub mod renderer;
pub mod view;
