use crate::cli::settings::{SettingError, SettingHandler};
use crate::core::chat_request::DEFAULT_CHAT_ENDPOINT;
use crate::core::config::Config;
use crate::core::models::{find_model, DEFAULT_MODEL};

fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

/// Handler for the `default-model` setting.
pub struct DefaultModelHandler;

impl SettingHandler for DefaultModelHandler {
    fn key(&self) -> &'static str {
        "default-model"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(model) = args.first().map(|arg| arg.trim()).filter(|m| !m.is_empty()) else {
            return Err(SettingError::MissingArgs {
                hint: "To set a default model, provide its identifier:",
                example: "coders set default-model anthropic/claude-instant-v1",
            });
        };

        config.chat.default_model = Some(model.to_string());
        let mut message = success_set(self.key(), model);
        // Any identifier is accepted; the catalog only feeds the selector.
        if find_model(model).is_none() {
            message.push_str(" (not in the built-in model list)");
        }
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.chat.default_model = None;
        Ok(format!("✅ Unset default-model (will use {DEFAULT_MODEL})"))
    }

    fn format(&self, config: &Config) -> String {
        match &config.chat.default_model {
            Some(model) => format!("  default-model: {model}"),
            None => format!("  default-model: (unset, default: {DEFAULT_MODEL})"),
        }
    }
}

/// Handler for the `chat-endpoint` setting.
pub struct ChatEndpointHandler;

impl SettingHandler for ChatEndpointHandler {
    fn key(&self) -> &'static str {
        "chat-endpoint"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(endpoint) = args.first().map(|arg| arg.trim()).filter(|e| !e.is_empty()) else {
            return Err(SettingError::MissingArgs {
                hint: "To set the chat endpoint, provide its URL:",
                example: "coders set chat-endpoint http://localhost:8000/api/chat",
            });
        };

        let url = reqwest::Url::parse(endpoint).map_err(|err| SettingError::InvalidValue {
            key: "chat-endpoint",
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingError::InvalidValue {
                key: "chat-endpoint",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        config.chat.endpoint = Some(endpoint.to_string());
        Ok(success_set(self.key(), endpoint))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.chat.endpoint = None;
        Ok(format!(
            "✅ Unset chat-endpoint (will use {DEFAULT_CHAT_ENDPOINT})"
        ))
    }

    fn format(&self, config: &Config) -> String {
        match &config.chat.endpoint {
            Some(endpoint) => format!("  chat-endpoint: {endpoint}"),
            None => format!("  chat-endpoint: (unset, default: {DEFAULT_CHAT_ENDPOINT})"),
        }
    }
}
