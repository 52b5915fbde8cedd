use super::data::{Config, GatewayConfig, DEFAULT_ALLOWED_PATH, DEFAULT_GATEWAY_PORT};
use super::env::{
    ENV_ALLOWED_PATHS, ENV_CHAT_ENDPOINT, ENV_GATEWAY_PORT, ENV_GITHUB_TOKEN, ENV_MEMORY_URL,
};
use super::io::ConfigError;
use crate::core::chat_request::DEFAULT_CHAT_ENDPOINT;
use crate::core::models::DEFAULT_MODEL;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.chat.default_model = Some("meta-llama/llama-2-70b-chat".to_string());
    config.gateway.port = Some(4100);
    config.gateway.allowed_paths = vec![PathBuf::from("/srv/projects")];
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    loaded.save_to_path(&config_path).expect("Failed to overwrite config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to reload config");
    assert_eq!(reloaded, config);
}

#[test]
fn test_parses_documented_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[chat]
endpoint = "http://127.0.0.1:9000/api/chat"

[gateway]
port = 3005
allowed_paths = ["/a", "/b"]
memory_upstream = "http://127.0.0.1:4001"
"#,
    )
    .expect("write config");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(
        config.chat.endpoint.as_deref(),
        Some("http://127.0.0.1:9000/api/chat")
    );
    assert_eq!(config.chat.default_model, None);
    assert_eq!(
        config.gateway,
        GatewayConfig {
            port: Some(3005),
            allowed_paths: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            memory_upstream: Some("http://127.0.0.1:4001".to_string()),
            ..GatewayConfig::default()
        }
    );
}

#[test]
fn test_parse_errors_name_the_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("broken.toml");
    std::fs::write(&config_path, "[gateway\nport = ").expect("write config");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_defaults_apply_without_file_or_env() {
    let config = Config::default();

    let chat = config.chat_settings_with(lookup_from(&[]));
    assert_eq!(chat.endpoint, DEFAULT_CHAT_ENDPOINT);
    assert_eq!(chat.default_model, DEFAULT_MODEL);

    let gateway = config.gateway_settings_with(lookup_from(&[]));
    assert_eq!(gateway.port, DEFAULT_GATEWAY_PORT);
    assert_eq!(gateway.allowed_paths, vec![PathBuf::from(DEFAULT_ALLOWED_PATH)]);
    assert_eq!(gateway.github_token, None);
    assert_eq!(gateway.memory_upstream, None);
}

#[test]
fn test_environment_overrides_file_values() {
    let mut config = Config::default();
    config.chat.endpoint = Some("http://file/api/chat".to_string());
    config.gateway.port = Some(4000);
    config.gateway.github_token = Some("file-token".to_string());
    config.gateway.memory_upstream = Some("http://file-memory".to_string());

    let env = lookup_from(&[
        (ENV_CHAT_ENDPOINT, "http://env/api/chat"),
        (ENV_GATEWAY_PORT, "5000"),
        (ENV_GITHUB_TOKEN, "env-token"),
        (ENV_MEMORY_URL, "http://env-memory"),
    ]);

    assert_eq!(config.chat_settings_with(&env).endpoint, "http://env/api/chat");
    let gateway = config.gateway_settings_with(&env);
    assert_eq!(gateway.port, 5000);
    assert_eq!(gateway.github_token.as_deref(), Some("env-token"));
    assert_eq!(gateway.memory_upstream.as_deref(), Some("http://env-memory"));
}

#[test]
fn test_unparsable_port_falls_back_and_empty_values_are_unset() {
    let mut config = Config::default();
    config.gateway.port = Some(4000);
    config.gateway.github_token = Some("file-token".to_string());

    let gateway = config.gateway_settings_with(lookup_from(&[
        (ENV_GATEWAY_PORT, "not-a-port"),
        (ENV_GITHUB_TOKEN, "   "),
    ]));

    assert_eq!(gateway.port, 4000);
    assert_eq!(gateway.github_token.as_deref(), Some("file-token"));
}

#[cfg(unix)]
#[test]
fn test_allowed_paths_split_on_separator() {
    let gateway = Config::default()
        .gateway_settings_with(lookup_from(&[(ENV_ALLOWED_PATHS, "/one:/two")]));
    assert_eq!(
        gateway.allowed_paths,
        vec![PathBuf::from("/one"), PathBuf::from("/two")]
    );
}
