//! Environment-style overrides
//!
//! Every recognized variable is kept as the raw string the operator supplied;
//! `apply` turns them into typed settings on top of a base configuration.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::str::FromStr;

use contracts::{
    ContractError, ProxyConfig, SerializationMode, TransmitterKind, DEFAULT_BUFFER_SIZE,
};

/// Recognized variable names
pub mod vars {
    pub const SERIALIZATION: &str = "SERIALIZATION";
    pub const METRIC_BUFFER_SIZE: &str = "METRIC_BUFFER_SIZE";
    pub const MIRROR_URL: &str = "MIRROR_URL";
    pub const MIRROR_TIMEOUT_SECS: &str = "MIRROR_TIMEOUT_SECS";
    pub const LISTEN_ADDR: &str = "LISTEN_ADDR";
    pub const MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
    pub const TRANSMITTER: &str = "TRANSMITTER";
    pub const TRANSMITTER_ADDR: &str = "TRANSMITTER_ADDR";
    pub const SHUTDOWN_DRAIN_SECS: &str = "SHUTDOWN_DRAIN_SECS";
}

/// Raw override values (None = not set)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub serialization: Option<String>,
    pub buffer_size: Option<String>,
    pub mirror_url: Option<String>,
    pub mirror_timeout_secs: Option<String>,
    pub listen_addr: Option<String>,
    pub max_body_bytes: Option<String>,
    pub transmitter: Option<String>,
    pub transmitter_addr: Option<String>,
    pub shutdown_drain_secs: Option<String>,
}

impl Overrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary lookup function
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            serialization: lookup(vars::SERIALIZATION),
            buffer_size: lookup(vars::METRIC_BUFFER_SIZE),
            mirror_url: lookup(vars::MIRROR_URL),
            mirror_timeout_secs: lookup(vars::MIRROR_TIMEOUT_SECS),
            listen_addr: lookup(vars::LISTEN_ADDR),
            max_body_bytes: lookup(vars::MAX_BODY_BYTES),
            transmitter: lookup(vars::TRANSMITTER),
            transmitter_addr: lookup(vars::TRANSMITTER_ADDR),
            shutdown_drain_secs: lookup(vars::SHUTDOWN_DRAIN_SECS),
        }
    }

    /// Apply overrides on top of `base`
    ///
    /// `SERIALIZATION` and `METRIC_BUFFER_SIZE` never fail: unrecognized
    /// values fall back to the string-batch mode and a capacity of 100.
    ///
    /// # Errors
    /// Returns `ConfigValidation` when any other value does not parse.
    pub fn apply(&self, mut base: ProxyConfig) -> Result<ProxyConfig, ContractError> {
        if let Some(ref value) = self.serialization {
            base.serialization = SerializationMode::from_setting(Some(value));
        }
        if let Some(ref value) = self.buffer_size {
            base.buffer_size = parse_buffer_size(value);
        }
        if let Some(ref value) = self.mirror_url {
            base.mirror_url = Some(value.trim().to_string());
        }
        if let Some(ref value) = self.mirror_timeout_secs {
            base.mirror_timeout_secs = parse_typed(vars::MIRROR_TIMEOUT_SECS, value)?;
        }
        if let Some(ref value) = self.listen_addr {
            base.listen_addr = parse_typed::<SocketAddr>(vars::LISTEN_ADDR, value)?;
        }
        if let Some(ref value) = self.max_body_bytes {
            base.max_body_bytes = parse_typed(vars::MAX_BODY_BYTES, value)?;
        }
        if let Some(ref value) = self.transmitter {
            base.transmitter = TransmitterKind::from_setting(value).ok_or_else(|| {
                ContractError::config_validation(
                    vars::TRANSMITTER,
                    format!("unknown transmitter '{value}', expected 'log' or 'udp'"),
                )
            })?;
        }
        if let Some(ref value) = self.transmitter_addr {
            base.transmitter_addr = parse_typed::<SocketAddr>(vars::TRANSMITTER_ADDR, value)?;
        }
        if let Some(ref value) = self.shutdown_drain_secs {
            base.shutdown_drain_secs = parse_typed(vars::SHUTDOWN_DRAIN_SECS, value)?;
        }
        Ok(base)
    }
}

/// Buffer capacity; anything but a positive integer yields the default
pub fn parse_buffer_size(value: &str) -> NonZeroUsize {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .unwrap_or(DEFAULT_BUFFER_SIZE)
}

fn parse_typed<T>(field: &str, value: &str) -> Result<T, ContractError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        ContractError::config_validation(field, format!("invalid value '{value}': {e}"))
    })
}
