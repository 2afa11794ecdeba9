//! # Contracts
//!
//! Interface contracts shared by every crate in the proxy.
//! Business crates depend on this crate only, never on each other.
//!
//! ## Data Model
//! - `CanonicalLine` is the unit that travels from the decoder, through the
//!   forwarding buffer, into the transmitter intake
//! - `SerializationMode` selects the JSON shape accepted on `/metric`
//! - `ProxyConfig` is resolved once at startup and passed down explicitly

mod error;
mod line;
mod mirror;
mod mode;
mod proxy_config;
mod sink;

pub use error::*;
pub use line::CanonicalLine;
pub use mirror::BodyMirror;
pub use mode::SerializationMode;
pub use proxy_config::*;
pub use sink::*;
