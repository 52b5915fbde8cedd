//! TUI-less "say" command

use std::io::{self, Write};

use crate::core::chat_request::{submit, ChatBackend, SubmitOutcome};
use crate::core::store::ChatStore;

/// Runs one submit cycle and writes the reply to `out`.
///
/// Returns the process exit code: 0 when a reply was printed, 1 for blank
/// input or a failed request.
pub async fn run_say<W: Write>(
    prompt: &[String],
    model: &str,
    backend: &dyn ChatBackend,
    out: &mut W,
) -> io::Result<i32> {
    let prompt = prompt.join(" ");
    let mut store = ChatStore::with_model(model);

    match submit(&mut store, backend, &prompt).await {
        SubmitOutcome::Replied(message) => {
            writeln!(out, "{}", message.content)?;
            Ok(0)
        }
        SubmitOutcome::Skipped => {
            eprintln!("Usage: coders say <prompt>");
            Ok(1)
        }
        SubmitOutcome::Failed(err) => {
            eprintln!("❌ {err}");
            Ok(1)
        }
    }
}
