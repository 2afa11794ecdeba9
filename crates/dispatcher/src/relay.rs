//! Relay - main loop draining the forwarding buffer into the transmitter

use std::net::SocketAddr;
use std::sync::Arc;

use contracts::{LineSink, TransmitterKind};
use ingestion::LineConsumer;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::error::DispatcherError;
use crate::metrics::{MetricsSnapshot, RelayMetrics};
use crate::sinks::{LogSink, UdpSink};

/// Single perpetual task moving lines from the buffer to a sink, in order
pub struct Relay<S> {
    consumer: LineConsumer,
    sink: S,
    metrics: Arc<RelayMetrics>,
}

impl<S: LineSink + Send + 'static> Relay<S> {
    /// Create a relay over `consumer` feeding `sink`
    pub fn new(consumer: LineConsumer, sink: S) -> Self {
        Self {
            consumer,
            sink,
            metrics: Arc::new(RelayMetrics::new()),
        }
    }

    /// Shared counters, readable while the relay runs
    pub fn metrics(&self) -> Arc<RelayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the relay main loop
    ///
    /// Publishes every line in dequeue order. Returns only after every
    /// producer is dropped and the buffer is drained, then flushes and closes
    /// the sink.
    #[instrument(name = "relay_run", skip(self), fields(sink = %self.sink.name()))]
    pub async fn run(mut self) -> MetricsSnapshot {
        let name = self.sink.name().to_string();
        info!(sink = %name, "Relay started");

        while let Some(line) = self.consumer.pop().await {
            match self.sink.publish(line.clone()).await {
                Ok(()) => {
                    self.metrics.inc_relayed_count();
                }
                Err(e) => {
                    self.metrics.inc_failure_count();
                    error!(sink = %name, line = %line, error = %e, "Publish failed");
                    // Keep relaying
                }
            }

            let relayed = self.metrics.relayed_count();
            if relayed > 0 && relayed.is_multiple_of(1000) {
                debug!(sink = %name, relayed, "Relay progress");
            }
        }

        info!(sink = %name, "Relay input closed, buffer drained");

        if let Err(e) = self.sink.flush().await {
            error!(sink = %name, error = %e, "Flush failed on shutdown");
        }
        if let Err(e) = self.sink.close().await {
            error!(sink = %name, error = %e, "Close failed on shutdown");
        }

        let snapshot = self.metrics.snapshot();
        info!(
            sink = %name,
            relayed = snapshot.relayed_count,
            failed = snapshot.failure_count,
            "Relay stopped"
        );
        snapshot
    }

    /// Spawn the relay as a background task
    pub fn spawn(self) -> JoinHandle<MetricsSnapshot> {
        tokio::spawn(self.run())
    }
}

/// Handle to a spawned relay
pub struct RelayHandle {
    /// Sink name
    pub sink_name: String,
    /// Shared counters
    pub metrics: Arc<RelayMetrics>,
    /// Relay task
    pub task: JoinHandle<MetricsSnapshot>,
}

/// Build the configured transmitter and spawn a relay feeding it
#[instrument(name = "relay_spawn_configured", skip(consumer))]
pub async fn spawn_relay(
    kind: TransmitterKind,
    addr: SocketAddr,
    consumer: LineConsumer,
) -> Result<RelayHandle, DispatcherError> {
    match kind {
        TransmitterKind::Log => Ok(start(Relay::new(consumer, LogSink::new("log")))),
        TransmitterKind::Udp => {
            let sink = UdpSink::new("udp", addr)
                .await
                .map_err(|e| DispatcherError::sink_creation("udp", e.to_string()))?;
            Ok(start(Relay::new(consumer, sink)))
        }
    }
}

fn start<S: LineSink + Send + 'static>(relay: Relay<S>) -> RelayHandle {
    let sink_name = relay.sink.name().to_string();
    let metrics = relay.metrics();
    RelayHandle {
        sink_name,
        metrics,
        task: relay.spawn(),
    }
}
