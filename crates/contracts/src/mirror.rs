//! BodyMirror trait - best-effort replication of raw request bodies

use bytes::Bytes;
use http::HeaderValue;

/// Fire-and-forget replication of a request body to a secondary destination.
///
/// Implementations must return immediately; the outcome is never reported to
/// the caller.
pub trait BodyMirror: Send + Sync {
    /// Destination the body is replicated to (for logging)
    fn destination(&self) -> &str;

    /// Schedule replication of `body`, preserving `content_type` byte for
    /// byte when present
    fn mirror(&self, body: Bytes, content_type: Option<HeaderValue>);
}
