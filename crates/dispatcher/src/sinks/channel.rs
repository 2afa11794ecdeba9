//! ChannelSink - hands lines to an in-process transmitter over a tokio channel

use contracts::{CanonicalLine, ContractError, LineSink};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Sink backed by a bounded `mpsc` sender
///
/// `publish` waits while the channel is full, so a slow transmitter pushes
/// back on the relay and, through it, on the forwarding buffer.
pub struct ChannelSink {
    name: String,
    tx: Option<mpsc::Sender<CanonicalLine>>,
}

impl ChannelSink {
    /// Wrap the intake sender of an external transmitter
    pub fn new(name: impl Into<String>, tx: mpsc::Sender<CanonicalLine>) -> Self {
        Self {
            name: name.into(),
            tx: Some(tx),
        }
    }
}

impl LineSink for ChannelSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&mut self, line: CanonicalLine) -> Result<(), ContractError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| ContractError::sink_connection(&self.name, "channel closed"))?;
        tx.send(line)
            .await
            .map_err(|_| ContractError::sink_connection(&self.name, "transmitter dropped its intake"))
    }

    #[instrument(name = "channel_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "channel_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        // Dropping the sender lets the transmitter see end-of-stream
        self.tx = None;
        debug!(sink = %self.name, "ChannelSink closed");
        Ok(())
    }
}
