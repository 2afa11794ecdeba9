//! Proxy orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::ProxyServer;
pub use stats::ProxyStats;
