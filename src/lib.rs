//! Coders is a terminal chat client and a small MCP tool gateway.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation store, the model catalog, the submit
//!   lifecycle that talks to the chat endpoint, and configuration.
//! - [`ui`] renders the terminal chat screen and runs its event loop.
//! - [`gateway`] serves the health check and mounts the memory, filesystem and
//!   GitHub tool servers under their prefixes.
//! - [`api`] defines the JSON bodies exchanged with the chat endpoint.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod gateway;
pub mod ui;
pub mod utils;
