//! Settings management for CLI set/unset commands.
//!
//! Each persisted key has a [`SettingHandler`]; [`SettingRegistry`] maps the
//! key typed on the command line to its handler.

pub mod error;
pub mod handlers;

use std::collections::HashMap;
use std::path::Path;

pub use error::SettingError;

use crate::core::config::data::path_display;
use crate::core::config::Config;
use handlers::{ChatEndpointHandler, DefaultModelHandler};

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Update `config` from the arguments after the key and return a
    /// success message.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the built-in default applies again.
    fn unset(&self, config: &mut Config) -> Result<String, SettingError>;

    /// Format the current value for display in `coders set` output.
    fn format(&self, config: &Config) -> String;
}

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(DefaultModelHandler));
        registry.register(Box::new(ChatEndpointHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// One line per key followed by the gateway table, which is edited by hand
    /// or overridden from the environment.
    pub fn describe(&self, config: &Config) -> Vec<String> {
        let mut lines = vec!["Current configuration:".to_string()];
        for key in self.keys_display_order() {
            if let Some(handler) = self.get(key) {
                lines.push(handler.format(config));
            }
        }

        let gateway = &config.gateway;
        lines.push("Gateway (config file):".to_string());
        lines.push(format!(
            "  port: {}",
            gateway
                .port
                .map_or_else(|| "(unset)".to_string(), |port| port.to_string())
        ));
        if gateway.allowed_paths.is_empty() {
            lines.push("  allowed_paths: (unset)".to_string());
        } else {
            let paths: Vec<String> = gateway.allowed_paths.iter().map(path_display).collect();
            lines.push(format!("  allowed_paths: {}", paths.join(", ")));
        }
        lines
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `key = args` to the file at `config_path` and returns the success
/// message.
pub fn set_at_path(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
    args: &[String],
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config_at(config_path, |config| handler.set(args, config))
}

pub fn unset_at_path(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config_at(config_path, |config| handler.unset(config))
}

/// Load, modify and save; nothing is written when `f` fails.
fn mutate_config_at<F>(config_path: &Path, f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut config = Config::load_from_path(config_path)
        .map_err(|err| SettingError::ConfigError(err.to_string()))?;
    let message = f(&mut config)?;
    config
        .save_to_path(config_path)
        .map_err(|err| SettingError::ConfigError(err.to_string()))?;
    Ok(message)
}
