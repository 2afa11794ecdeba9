//! # Ingestion
//!
//! HTTP metric ingestion.
//!
//! Responsibilities:
//! - Decode request bodies into `CanonicalLine`s per `SerializationMode`
//! - Bounded forwarding buffer with blocking backpressure (no drop policy)
//! - `POST /metric` handler that feeds the buffer and triggers the mirror
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{build_router, ForwardingBuffer, IngestState};
//!
//! let (producer, consumer) = ForwardingBuffer::bounded(config.buffer_size);
//! let router = build_router(
//!     IngestState::new(config.serialization, producer),
//!     config.max_body_bytes,
//! );
//! // hand `consumer` to the relay loop, serve `router`
//! ```

mod buffer;
pub mod decode;
mod error;
mod handler;

// Re-exports
pub use buffer::{ForwardingBuffer, LineConsumer, LineProducer};
pub use contracts::{CanonicalLine, SerializationMode};
pub use decode::decode;
pub use error::{BufferClosed, DecodeError, IngestError, Result};
pub use handler::{build_router, IngestState, METRIC_PATH};
