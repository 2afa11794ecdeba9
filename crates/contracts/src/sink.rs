//! LineSink trait - transmitter intake used by the relay loop

use crate::{CanonicalLine, ContractError};

/// Downstream line-protocol intake
///
/// The relay loop hands lines to the sink one at a time, in buffer order.
/// `publish` may wait when the intake is itself bounded.
#[trait_variant::make(LineSink: Send)]
pub trait LocalLineSink {
    /// Sink name (used for logging)
    fn name(&self) -> &str;

    /// Accept one line
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn publish(&mut self, line: CanonicalLine) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
