//! Environment overrides layered over the config file.
//!
//! Lookups go through a closure so resolution can be tested without touching
//! the process environment. Empty values count as unset.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::data::{ChatSettings, Config, GatewaySettings};

pub const ENV_GATEWAY_PORT: &str = "MCP_PORT";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_ALLOWED_PATHS: &str = "MCP_ALLOWED_PATHS";
pub const ENV_MEMORY_URL: &str = "MCP_MEMORY_URL";
pub const ENV_FILESYSTEM_URL: &str = "MCP_FILESYSTEM_URL";
pub const ENV_GITHUB_URL: &str = "MCP_GITHUB_URL";
pub const ENV_CHAT_ENDPOINT: &str = "CODERS_CHAT_ENDPOINT";

/// Loads `.env` from the working directory or its parents, if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "ignoring unreadable environment file"),
    }
}

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn chat_settings(&self) -> ChatSettings {
        self.chat_settings_with(process_env)
    }

    pub fn chat_settings_with<F>(&self, lookup: F) -> ChatSettings
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ChatSettings::default();
        ChatSettings {
            endpoint: non_empty(&lookup, ENV_CHAT_ENDPOINT)
                .or_else(|| self.chat.endpoint.clone())
                .unwrap_or(defaults.endpoint),
            default_model: self
                .chat
                .default_model
                .clone()
                .unwrap_or(defaults.default_model),
        }
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        self.gateway_settings_with(process_env)
    }

    pub fn gateway_settings_with<F>(&self, lookup: F) -> GatewaySettings
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GatewaySettings::default();
        let file = &self.gateway;

        let port = match non_empty(&lookup, ENV_GATEWAY_PORT) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(err) => {
                    warn!(value = %raw, error = %err, "ignoring unparsable {ENV_GATEWAY_PORT}");
                    None
                }
            },
            None => None,
        }
        .or(file.port)
        .unwrap_or(defaults.port);

        let allowed_paths = match non_empty(&lookup, ENV_ALLOWED_PATHS) {
            Some(raw) => std::env::split_paths(&raw).collect::<Vec<PathBuf>>(),
            None if !file.allowed_paths.is_empty() => file.allowed_paths.clone(),
            None => defaults.allowed_paths,
        };

        GatewaySettings {
            port,
            allowed_paths,
            github_token: non_empty(&lookup, ENV_GITHUB_TOKEN).or_else(|| file.github_token.clone()),
            memory_upstream: non_empty(&lookup, ENV_MEMORY_URL)
                .or_else(|| file.memory_upstream.clone()),
            filesystem_upstream: non_empty(&lookup, ENV_FILESYSTEM_URL)
                .or_else(|| file.filesystem_upstream.clone()),
            github_upstream: non_empty(&lookup, ENV_GITHUB_URL)
                .or_else(|| file.github_upstream.clone()),
        }
    }
}
