//! # Config Loader
//!
//! Configuration loading and resolution.
//!
//! Responsibilities:
//! - Parse optional TOML/JSON configuration files
//! - Apply environment-style overrides (`SERIALIZATION`, `METRIC_BUFFER_SIZE`, ...)
//! - Validate the result
//! - Produce a `ProxyConfig` once, at startup
//!
//! # Example
//!
//! ```no_run
//! use config_loader::{ConfigLoader, Overrides};
//!
//! let config = ConfigLoader::resolve(None, &Overrides::from_env()).unwrap();
//! println!("mode: {}", config.serialization);
//! ```

mod overrides;
mod parser;
mod validator;

pub use contracts::ProxyConfig;
pub use overrides::{parse_buffer_size, vars, Overrides};
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files, strings and
/// overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the final configuration
    ///
    /// Starts from the file at `path` (or defaults when `None`), applies
    /// `overrides`, then validates.
    ///
    /// # Errors
    /// - File read or parse failure
    /// - Override parse failure
    /// - Validation failure
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<ProxyConfig, ContractError> {
        let base = match path {
            Some(path) => Self::read_and_parse(path)?,
            None => ProxyConfig::default(),
        };
        let config = overrides.apply(base)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ProxyConfig, ContractError> {
        let config = Self::read_and_parse(path)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<ProxyConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize ProxyConfig to TOML string
    pub fn to_toml(config: &ProxyConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize ProxyConfig to JSON string
    pub fn to_json(config: &ProxyConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_and_parse(path: &Path) -> Result<ProxyConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        parser::parse(&content, format)
    }
}
