use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::chat_request::DEFAULT_CHAT_ENDPOINT;
use crate::core::models::DEFAULT_MODEL;

pub const DEFAULT_GATEWAY_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_PATH: &str = "/workspaces/Coders";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "ChatConfig::is_empty")]
    pub chat: ChatConfig,
    #[serde(default, skip_serializing_if = "GatewayConfig::is_empty")]
    pub gateway: GatewayConfig,
}

/// `[chat]` table: where the chat view sends requests and which model it
/// starts with.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub endpoint: Option<String>,
    pub default_model: Option<String>,
}

/// `[gateway]` table. Every field can be overridden from the environment.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_paths: Vec<PathBuf>,
    pub github_token: Option<String>,
    /// Base URL of the memory server requests under `/mcp/memory` go to.
    pub memory_upstream: Option<String>,
    pub filesystem_upstream: Option<String>,
    pub github_upstream: Option<String>,
}

impl ChatConfig {
    pub fn is_empty(&self) -> bool {
        self == &ChatConfig::default()
    }
}

impl GatewayConfig {
    pub fn is_empty(&self) -> bool {
        self == &GatewayConfig::default()
    }
}

/// Chat settings after defaults and environment overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub endpoint: String,
    pub default_model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Gateway settings after defaults and environment overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub port: u16,
    pub allowed_paths: Vec<PathBuf>,
    pub github_token: Option<String>,
    pub memory_upstream: Option<String>,
    pub filesystem_upstream: Option<String>,
    pub github_upstream: Option<String>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_GATEWAY_PORT,
            allowed_paths: vec![PathBuf::from(DEFAULT_ALLOWED_PATH)],
            github_token: None,
            memory_upstream: None,
            filesystem_upstream: None,
            github_upstream: None,
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
