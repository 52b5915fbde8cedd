use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Where diagnostic output goes.
pub enum LogTarget<'a> {
    /// Standard error; used by the gateway and the one-shot commands.
    Stderr,
    /// Appended to a file; used by the terminal view so the screen stays clean.
    File(&'a Path),
    /// Dropped entirely.
    Discard,
}

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing(target: LogTarget<'_>) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        LogTarget::Discard => (BoxMakeWriter::new(io::sink), false),
    };

    // A subscriber may already be installed (tests, embedding); keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init();
    Ok(())
}
