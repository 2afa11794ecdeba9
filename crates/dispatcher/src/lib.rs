//! # Dispatcher
//!
//! Moves decoded lines out of the proxy.
//!
//! - `Relay` drains the forwarding buffer into a transmitter intake, in order
//! - `HttpMirror` replicates raw request bodies to a secondary endpoint
//! - `sinks` holds the bundled transmitters (log, UDP, channel)

pub mod error;
pub mod metrics;
pub mod mirror;
pub mod relay;
pub mod sinks;

pub use contracts::{CanonicalLine, LineSink};
pub use error::{DispatcherError, MirrorError};
pub use metrics::{MetricsSnapshot, RelayMetrics};
pub use mirror::HttpMirror;
pub use relay::{spawn_relay, Relay, RelayHandle};
pub use sinks::{ChannelSink, LogSink, UdpSink};

/// Final relay counters, returned once the buffer has drained
pub type RelayStats = MetricsSnapshot;
