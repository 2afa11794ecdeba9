//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Mirror client could not be built
    #[error("failed to create mirror client for '{destination}': {message}")]
    MirrorCreation {
        destination: String,
        message: String,
    },

    /// Sink error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Mirror dispatch failure. Logged by the dispatch task, never returned to a
/// request handler.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Connection, timeout or request build failure
    #[error("error posting to mirror: {0}")]
    Request(#[source] reqwest::Error),

    /// Mirror answered with a non-success status
    #[error("mirror responded with status {status}")]
    Status { status: u16 },

    /// Response body could not be read
    #[error("error reading mirror response: {0}")]
    ReadBody(#[source] reqwest::Error),
}
