//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod say;
pub mod settings;

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::cli::settings::{set_at_path, unset_at_path, SettingRegistry};
use crate::core::chat_request::HttpChatBackend;
use crate::core::config::env::load_dotenv;
use crate::core::config::Config;
use crate::core::store::ChatStore;
use crate::gateway::{handlers_from_settings, serve};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LogTarget};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    "\ndescribe: ",
    env!("VERGEN_GIT_DESCRIBE"),
    "\nbuilt: ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    "\nrustc: ",
    env!("VERGEN_RUSTC_SEMVER"),
);

#[derive(Parser)]
#[command(name = "coders")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Terminal AI chat and MCP tool gateway")]
#[command(
    long_about = "Coders is a terminal chat client that posts the conversation to a chat \
endpoint and shows the assistant's reply, plus a small HTTP gateway that mounts the \
memory, filesystem and GitHub tool servers under one port.\n\n\
Environment Variables:\n\
  CODERS_CHAT_ENDPOINT  Chat endpoint URL (default http://localhost:8000/api/chat)\n\
  MCP_PORT              Gateway port (default 3001)\n\
  MCP_ALLOWED_PATHS     Directories the filesystem server may touch\n\
  GITHUB_TOKEN          Token handed to the GitHub server\n\
  MCP_MEMORY_URL, MCP_FILESYSTEM_URL, MCP_GITHUB_URL  Tool server base URLs\n\n\
Controls:\n\
  Enter             Send the message\n\
  Tab/Shift+Tab     Change model\n\
  PgUp/PgDn         Scroll the conversation\n\
  Ctrl+L            Clear the conversation\n\
  Esc/Ctrl+C        Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostics for the chat view to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// The message to send (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Run the MCP gateway until interrupted
    Gateway {
        /// Port to listen on (overrides MCP_PORT and the config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List the models offered by the chat view
    Models,
    /// Set configuration values, or show them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

/// The chat view owns the terminal, so it logs to `--log` or nowhere; every
/// other command logs to stderr.
fn log_target<'a>(command: &Commands, log: Option<&'a Path>) -> LogTarget<'a> {
    match (command, log) {
        (Commands::Chat, Some(path)) => LogTarget::File(path),
        (Commands::Chat, None) => LogTarget::Discard,
        _ => LogTarget::Stderr,
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    // Tracing first so problems reading `.env` are reported.
    init_tracing(log_target(&command, args.log.as_deref()))?;
    load_dotenv();

    match command {
        Commands::Chat => {
            let settings = Config::load()?.chat_settings();
            let model = args.model.unwrap_or(settings.default_model);
            let backend = Arc::new(HttpChatBackend::new(
                reqwest::Client::new(),
                settings.endpoint,
            ));
            run_chat(ChatStore::with_model(model), backend).await
        }
        Commands::Say { prompt } => {
            let settings = Config::load()?.chat_settings();
            let model = args.model.unwrap_or(settings.default_model);
            let backend = HttpChatBackend::new(reqwest::Client::new(), settings.endpoint);
            let code = run_say(&prompt, &model, &backend, &mut io::stdout()).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Gateway { port } => {
            let mut settings = Config::load()?.gateway_settings();
            if let Some(port) = port {
                settings.port = port;
            }

            let handlers = handlers_from_settings(&settings, &reqwest::Client::new());
            let shutdown = CancellationToken::new();
            let signal_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, shutting down");
                }
                signal_token.cancel();
            });

            serve(&settings, handlers, shutdown).await?;
            Ok(())
        }
        Commands::Models => {
            let settings = Config::load()?.chat_settings();
            list_models(&settings.default_model);
            Ok(())
        }
        Commands::Set { key, value } => {
            let registry = SettingRegistry::new();
            let Some(key) = key else {
                for line in registry.describe(&Config::load()?) {
                    println!("{line}");
                }
                return Ok(());
            };

            let config_path = Config::get_config_path()?;
            match set_at_path(&registry, &config_path, &key, &value) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let registry = SettingRegistry::new();
            let config_path = Config::get_config_path()?;
            match unset_at_path(&registry, &config_path, &key) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}
