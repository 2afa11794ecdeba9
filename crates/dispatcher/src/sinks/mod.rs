//! Transmitter sinks
//!
//! Contains LogSink, UdpSink, and ChannelSink.

mod channel;
mod log;
mod udp;

pub use self::channel::ChannelSink;
pub use self::log::LogSink;
pub use self::udp::UdpSink;
