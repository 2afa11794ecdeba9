//! ProxyConfig - Config Loader output
//!
//! Process-wide settings, resolved once at startup.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::SerializationMode;

/// Default forwarding buffer capacity
pub const DEFAULT_BUFFER_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => unreachable!(),
};

/// Default request body limit (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Complete proxy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// JSON shape accepted on `/metric`
    pub serialization: SerializationMode,

    /// Forwarding buffer capacity
    pub buffer_size: NonZeroUsize,

    /// Mirror destination (None or empty = mirroring disabled)
    pub mirror_url: Option<String>,

    /// Mirror request timeout in seconds
    pub mirror_timeout_secs: u64,

    /// HTTP listen address
    pub listen_addr: SocketAddr,

    /// Request body limit in bytes
    pub max_body_bytes: usize,

    /// Transmitter fed by the relay loop
    pub transmitter: TransmitterKind,

    /// Target address for the UDP transmitter
    pub transmitter_addr: SocketAddr,

    /// Upper bound on the relay drain at shutdown, in seconds
    pub shutdown_drain_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            serialization: SerializationMode::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            mirror_url: None,
            mirror_timeout_secs: 5,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9109)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            transmitter: TransmitterKind::default(),
            transmitter_addr: SocketAddr::from(([127, 0, 0, 1], 2003)),
            shutdown_drain_secs: 5,
        }
    }
}

impl ProxyConfig {
    /// Mirror destination, if mirroring is enabled
    pub fn mirror_destination(&self) -> Option<&str> {
        self.mirror_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Mirror request timeout
    pub fn mirror_timeout(&self) -> Duration {
        Duration::from_secs(self.mirror_timeout_secs)
    }

    /// Relay drain bound at shutdown
    pub fn shutdown_drain(&self) -> Duration {
        Duration::from_secs(self.shutdown_drain_secs)
    }
}

/// Transmitter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransmitterKind {
    /// Log every relayed line via tracing
    #[default]
    Log,
    /// Send every relayed line as a UDP datagram
    Udp,
}

impl TransmitterKind {
    /// Parse a setting value (case-insensitive)
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "log" => Some(Self::Log),
            "udp" => Some(Self::Udp),
            _ => None,
        }
    }
}
