//! The boundary between the gateway and the tool servers it mounts.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

/// Failure raised by a mounted handler. The gateway turns it into a 500 whose
/// body carries [`HandlerError::message`].
#[derive(Debug)]
pub struct HandlerError {
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for HandlerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

/// One protocol surface mounted under a path prefix.
///
/// The request reaches the handler with the mount prefix already stripped, so
/// `GET /mcp/memory/tools` arrives as `GET /tools`. A handler either produces
/// the complete response or fails.
#[async_trait]
pub trait McpHandler: Send + Sync {
    async fn handle(&self, request: Request) -> Result<Response, HandlerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mount {
    Memory,
    Filesystem,
    Github,
}

impl Mount {
    pub const ALL: [Mount; 3] = [Mount::Memory, Mount::Filesystem, Mount::Github];

    pub fn prefix(self) -> &'static str {
        match self {
            Mount::Memory => "/mcp/memory",
            Mount::Filesystem => "/mcp/filesystem",
            Mount::Github => "/mcp/github",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mount::Memory => "memory",
            Mount::Filesystem => "filesystem",
            Mount::Github => "github",
        }
    }
}

impl fmt::Display for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three handlers the gateway mounts.
#[derive(Clone)]
pub struct Handlers {
    pub memory: Arc<dyn McpHandler>,
    pub filesystem: Arc<dyn McpHandler>,
    pub github: Arc<dyn McpHandler>,
}

impl Handlers {
    pub fn get(&self, mount: Mount) -> Arc<dyn McpHandler> {
        match mount {
            Mount::Memory => Arc::clone(&self.memory),
            Mount::Filesystem => Arc::clone(&self.filesystem),
            Mount::Github => Arc::clone(&self.github),
        }
    }
}

/// Stands in for a mount with no backing server; every request fails.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredHandler {
    mount: Mount,
}

impl UnconfiguredHandler {
    pub fn new(mount: Mount) -> Self {
        Self { mount }
    }
}

#[async_trait]
impl McpHandler for UnconfiguredHandler {
    async fn handle(&self, _request: Request) -> Result<Response, HandlerError> {
        Err(HandlerError::new(format!(
            "{} handler is not configured",
            self.mount
        )))
    }
}
