//! Gateway server errors.

use super::config::ConfigError;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors starting or stopping the HTTP server.
#[derive(Debug, Error)]
pub enum GatewayServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP server is disabled in configuration")]
    Disabled,

    #[error("gateway is already running")]
    AlreadyRunning,

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(String),
}
