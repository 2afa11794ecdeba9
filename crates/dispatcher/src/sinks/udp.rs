//! UdpSink - Graphite plaintext over UDP, fire-and-forget

use std::net::SocketAddr;

use contracts::{CanonicalLine, ContractError, LineSink};
use tokio::net::UdpSocket;
use tracing::{debug, instrument};

/// Sink that sends every line as one newline-terminated datagram
pub struct UdpSink {
    name: String,
    target: SocketAddr,
    socket: Option<UdpSocket>,
}

impl UdpSink {
    /// Create a new UdpSink connected to `target`
    #[instrument(name = "udp_sink_new", skip(name))]
    pub async fn new(name: impl Into<String>, target: SocketAddr) -> std::io::Result<Self> {
        let name = name.into();
        let bind_addr: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(target).await?;

        debug!(sink = %name, target = %target, "UdpSink connected");

        Ok(Self {
            name,
            target,
            socket: Some(socket),
        })
    }

    /// Target address
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    fn socket(&self) -> Result<&UdpSocket, ContractError> {
        self.socket
            .as_ref()
            .ok_or_else(|| ContractError::sink_connection(&self.name, "socket not connected"))
    }

    fn encode(line: &CanonicalLine) -> Vec<u8> {
        let mut datagram = Vec::with_capacity(line.len() + 1);
        datagram.extend_from_slice(line.as_bytes());
        datagram.push(b'\n');
        datagram
    }
}

impl LineSink for UdpSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&mut self, line: CanonicalLine) -> Result<(), ContractError> {
        let socket = self.socket()?;
        let datagram = Self::encode(&line);
        // Best-effort: no retry, the relay counts the failure and moves on
        socket.send(&datagram).await.map_err(|e| {
            ContractError::sink_write(&self.name, format!("send to {} failed: {e}", self.target))
        })?;
        Ok(())
    }

    #[instrument(name = "udp_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // UDP doesn't buffer
        Ok(())
    }

    #[instrument(name = "udp_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.socket = None;
        debug!(sink = %self.name, "UdpSink closed");
        Ok(())
    }
}
