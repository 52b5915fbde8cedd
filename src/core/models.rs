//! Model identifiers offered by the chat view.
//!
//! The catalog only drives the selector; the store accepts any identifier and
//! nothing here is used to validate one.

pub const DEFAULT_MODEL: &str = "anthropic/claude-2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub display_name: &'static str,
}

pub const MODEL_CATALOG: &[ModelOption] = &[
    ModelOption {
        id: "anthropic/claude-2",
        display_name: "Claude 2",
    },
    ModelOption {
        id: "anthropic/claude-instant-v1",
        display_name: "Claude Instant",
    },
    ModelOption {
        id: "google/palm-2-chat-bison",
        display_name: "PaLM 2",
    },
    ModelOption {
        id: "meta-llama/llama-2-70b-chat",
        display_name: "Llama 2 70B",
    },
];

pub fn find_model(id: &str) -> Option<&'static ModelOption> {
    MODEL_CATALOG.iter().find(|option| option.id == id)
}

/// Display label for an identifier, falling back to the raw id for models
/// outside the catalog.
pub fn display_name(id: &str) -> &str {
    find_model(id).map_or(id, |option| option.display_name)
}

/// The catalog entry after `current`, wrapping around. An identifier outside
/// the catalog moves to the first entry.
pub fn next_model(current: &str) -> &'static str {
    let next = MODEL_CATALOG
        .iter()
        .position(|option| option.id == current)
        .map_or(0, |index| (index + 1) % MODEL_CATALOG.len());
    MODEL_CATALOG[next].id
}

/// The catalog entry before `current`, wrapping around. An identifier outside
/// the catalog moves to the last entry.
pub fn previous_model(current: &str) -> &'static str {
    let len = MODEL_CATALOG.len();
    let previous = MODEL_CATALOG
        .iter()
        .position(|option| option.id == current)
        .map_or(len - 1, |index| (index + len - 1) % len);
    MODEL_CATALOG[previous].id
}
