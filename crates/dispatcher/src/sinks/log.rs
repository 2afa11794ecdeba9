//! LogSink - logs every relayed line via tracing

use contracts::{CanonicalLine, ContractError, LineSink};
use tracing::{info, instrument};

/// Sink that logs lines, for running without a downstream transmitter
pub struct LogSink {
    name: String,
    published: u64,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            published: 0,
        }
    }

    /// Lines logged so far
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl LineSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&mut self, line: CanonicalLine) -> Result<(), ContractError> {
        self.published += 1;
        info!(
            sink = %self.name,
            path = line.path(),
            value = line.value(),
            timestamp = line.timestamp(),
            "metric line"
        );
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, published = self.published, "LogSink closed");
        Ok(())
    }
}
