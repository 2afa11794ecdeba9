//! Configuration validation
//!
//! Rules:
//! - a non-empty mirror URL is an absolute http(s) URL
//! - mirror timeout > 0
//! - body limit > 0

use contracts::{ContractError, ProxyConfig};

/// Validate a resolved ProxyConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ProxyConfig) -> Result<(), ContractError> {
    validate_mirror(config)?;
    validate_limits(config)?;
    Ok(())
}

/// Validate mirror destination and timeout
fn validate_mirror(config: &ProxyConfig) -> Result<(), ContractError> {
    let Some(url) = config.mirror_destination() else {
        return Ok(());
    };

    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| {
            ContractError::config_validation(
                "mirror_url",
                format!("'{url}' must start with http:// or https://"),
            )
        })?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(ContractError::config_validation(
            "mirror_url",
            format!("'{url}' has no host"),
        ));
    }

    if config.mirror_timeout_secs == 0 {
        return Err(ContractError::config_validation(
            "mirror_timeout_secs",
            "mirror timeout must be > 0",
        ));
    }

    Ok(())
}

/// Validate size limits
fn validate_limits(config: &ProxyConfig) -> Result<(), ContractError> {
    if config.max_body_bytes == 0 {
        return Err(ContractError::config_validation(
            "max_body_bytes",
            "body limit must be > 0",
        ));
    }
    Ok(())
}
