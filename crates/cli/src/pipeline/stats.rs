//! Proxy run statistics.

use std::time::Duration;

/// Statistics from a proxy run
#[derive(Debug, Clone, Default)]
pub struct ProxyStats {
    /// Lines accepted by the transmitter
    pub relayed: u64,

    /// Lines the transmitter rejected
    pub failed: u64,

    /// Whether the relay drained the buffer before the drain bound elapsed
    pub drained: bool,

    /// Transmitter name
    pub transmitter: String,

    /// Time between bind and shutdown completion
    pub uptime: Duration,
}

impl ProxyStats {
    /// Lines per second over the whole run
    pub fn lines_per_sec(&self) -> f64 {
        if self.uptime.as_secs_f64() > 0.0 {
            self.relayed as f64 / self.uptime.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== metric-proxy statistics ===\n");
        println!("  Uptime: {:.2}s", self.uptime.as_secs_f64());
        println!("  Transmitter: {}", self.transmitter);
        println!("  Lines relayed: {}", self.relayed);
        println!("  Lines failed: {}", self.failed);
        println!("  Lines/s: {:.2}", self.lines_per_sec());
        if !self.drained {
            println!("  Buffer NOT fully drained before shutdown");
        }
        println!();
    }
}
