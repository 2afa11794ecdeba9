//! Ingestion handler (HTTP boundary)
//!
//! `POST /metric` decodes the body with the configured mode, pushes every line
//! into the forwarding buffer, then hands the raw body to the mirror. Any
//! other method or path is answered with an empty `200 OK`.

use std::fmt;
use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap};
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use contracts::{BodyMirror, SerializationMode};
use tracing::{error, instrument};

use crate::buffer::LineProducer;
use crate::decode::decode;
use crate::error::{IngestError, Result};

/// Ingest route
pub const METRIC_PATH: &str = "/metric";

/// Shared handler state, resolved once at startup
#[derive(Clone)]
pub struct IngestState {
    mode: SerializationMode,
    producer: LineProducer,
    mirror: Option<Arc<dyn BodyMirror>>,
}

impl IngestState {
    /// Create state without mirroring
    pub fn new(mode: SerializationMode, producer: LineProducer) -> Self {
        Self {
            mode,
            producer,
            mirror: None,
        }
    }

    /// Enable mirroring
    pub fn with_mirror(mut self, mirror: Arc<dyn BodyMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Active serialization mode
    pub fn mode(&self) -> SerializationMode {
        self.mode
    }

    /// Check whether mirroring is enabled
    pub fn is_mirroring(&self) -> bool {
        self.mirror.is_some()
    }
}

impl fmt::Debug for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestState")
            .field("mode", &self.mode)
            .field("producer", &self.producer)
            .field("mirror", &self.mirror.as_ref().map(|m| m.destination()))
            .finish()
    }
}

/// Build the ingestion router
///
/// # Arguments
/// * `state` - Handler state
/// * `max_body_bytes` - Request body limit; larger bodies are read failures
pub fn build_router(state: IngestState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(METRIC_PATH, post(ingest_metrics).fallback(ignore))
        .fallback(ignore)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Unmatched method or path: empty default response
async fn ignore() {}

#[instrument(name = "ingest_metrics", skip_all, fields(mode = %state.mode))]
async fn ingest_metrics(
    State(state): State<IngestState>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<()> {
    let body = body.map_err(|e| {
        error!(error = %e, "error reading body");
        IngestError::BodyRead(e.body_text())
    })?;

    let lines = decode(&body, state.mode).map_err(|e| {
        error!(error = %e, bytes = body.len(), "error decoding body");
        IngestError::from(e)
    })?;

    state.producer.push_all(lines).await.map_err(|e| {
        error!(error = %e, "error forwarding lines");
        IngestError::from(e)
    })?;

    if let Some(ref mirror) = state.mirror {
        mirror.mirror(body, headers.get(header::CONTENT_TYPE).cloned());
    }

    Ok(())
}
