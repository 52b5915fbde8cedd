pub mod data;
pub mod env;
pub mod io;

#[cfg(test)]
pub mod tests;

pub use data::{ChatConfig, ChatSettings, Config, GatewayConfig, GatewaySettings};
pub use io::ConfigError;
