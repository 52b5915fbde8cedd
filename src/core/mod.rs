pub mod chat_request;
pub mod config;
pub mod message;
pub mod models;
pub mod store;
