//! Ingestion error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contracts::{ContractError, SerializationMode};
use thiserror::Error;

/// Failure turning a request body into lines
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is not valid JSON for the active mode
    #[error("malformed {mode} body: {source}")]
    Json {
        /// Active serialization mode
        mode: SerializationMode,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// Collector record carries an empty `values` array
    #[error("record {index} has no values")]
    MissingValue {
        /// Position of the record in the batch
        index: usize,
    },

    /// Record fields cannot form a three-field line
    #[error("record {index} cannot be rendered as a line: {source}")]
    InvalidLine {
        /// Position of the record in the batch
        index: usize,
        /// Offending field
        #[source]
        source: ContractError,
    },
}

/// Forwarding buffer has no consumer left
#[derive(Debug, Clone, Copy, Error)]
#[error("forwarding buffer closed")]
pub struct BufferClosed;

/// Request-level failure
#[derive(Debug, Error)]
pub enum IngestError {
    /// Request body could not be read
    #[error("error reading body: {0}")]
    BodyRead(String),

    /// Request body could not be decoded
    #[error("error decoding body: {0}")]
    Decode(#[from] DecodeError),

    /// Relay is gone (shutdown)
    #[error(transparent)]
    BufferClosed(#[from] BufferClosed),
}

impl IngestError {
    /// HTTP status reported to the client
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BodyRead(_) | Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::BufferClosed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestError>;
