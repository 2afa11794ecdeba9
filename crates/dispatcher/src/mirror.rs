//! HttpMirror - fire-and-forget replication of raw request bodies
//!
//! Every call to [`BodyMirror::mirror`] spawns a detached task that POSTs the
//! exact bytes to the destination. Failures are logged inside the task and
//! never reach the request handler.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use contracts::BodyMirror;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, error, instrument, Instrument};

use crate::error::{DispatcherError, MirrorError};

/// Response bytes read back from the mirror before the connection is dropped
const MAX_RESPONSE_DRAIN: usize = 64 * 1024;

struct MirrorTarget {
    client: Client,
    destination: String,
}

/// Mirror dispatcher backed by a shared `reqwest::Client`
///
/// Cloning is cheap; clones share the client and its connection pool.
#[derive(Clone)]
pub struct HttpMirror {
    inner: Arc<MirrorTarget>,
}

impl HttpMirror {
    /// Create a mirror posting to `destination`
    ///
    /// `timeout` bounds each mirror request end to end.
    pub fn new(destination: impl Into<String>, timeout: Duration) -> Result<Self, DispatcherError> {
        let destination = destination.into();
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            DispatcherError::MirrorCreation {
                destination: destination.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            inner: Arc::new(MirrorTarget {
                client,
                destination,
            }),
        })
    }

    /// POST `body` to the destination and wait for the outcome
    ///
    /// The response body is discarded as it streams in. Up to
    /// `MAX_RESPONSE_DRAIN` bytes are read so the connection can be reused;
    /// past that the connection is dropped.
    pub async fn send(
        &self,
        body: Bytes,
        content_type: Option<HeaderValue>,
    ) -> Result<(), MirrorError> {
        let mut request = self.inner.client.post(&self.inner.destination).body(body);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }

        let mut response = request.send().await.map_err(MirrorError::Request)?;
        let status = response.status();

        let mut drained = 0usize;
        while let Some(chunk) = response.chunk().await.map_err(MirrorError::ReadBody)? {
            drained += chunk.len();
            if drained >= MAX_RESPONSE_DRAIN {
                debug!(drained, "mirror response truncated");
                break;
            }
        }

        if !status.is_success() {
            return Err(MirrorError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl BodyMirror for HttpMirror {
    fn destination(&self) -> &str {
        &self.inner.destination
    }

    #[instrument(name = "mirror_dispatch", skip_all, fields(destination = %self.inner.destination, bytes = body.len()))]
    fn mirror(&self, body: Bytes, content_type: Option<HeaderValue>) {
        let mirror = self.clone();
        let task = async move {
            match mirror.send(body, content_type).await {
                Ok(()) => debug!("mirror accepted body"),
                Err(e) => error!(
                    destination = %mirror.inner.destination,
                    error = %e,
                    "error posting to mirror"
                ),
            }
        };
        tokio::spawn(task.in_current_span());
    }
}

impl std::fmt::Debug for HttpMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMirror")
            .field("destination", &self.inner.destination)
            .finish()
    }
}
