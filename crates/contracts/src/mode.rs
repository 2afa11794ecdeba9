//! Serialization mode selector

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON shape accepted by the ingestion handler.
///
/// Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerializationMode {
    /// `SFIA`: array of `{path: string, value: float, timestamp: int}`
    #[serde(rename = "SFIA")]
    ScalarBatch,
    /// `SSSS`: a single `{path, value, timestamp}` object, all strings
    #[serde(rename = "SSSS")]
    StringSingle,
    /// `SCDF`: array of collectd JSON records
    #[serde(rename = "SCDF")]
    CollectorBatch,
    /// Array of string-typed records
    #[default]
    #[serde(rename = "default", alias = "")]
    StringBatch,
}

impl SerializationMode {
    /// Resolve from the `SERIALIZATION` setting.
    ///
    /// Unset or unrecognized values fall back to `StringBatch`.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("SFIA") => Self::ScalarBatch,
            Some("SSSS") => Self::StringSingle,
            Some("SCDF") => Self::CollectorBatch,
            _ => Self::StringBatch,
        }
    }

    /// Setting value that selects this mode
    pub fn as_setting(&self) -> &'static str {
        match self {
            Self::ScalarBatch => "SFIA",
            Self::StringSingle => "SSSS",
            Self::CollectorBatch => "SCDF",
            Self::StringBatch => "default",
        }
    }
}

impl fmt::Display for SerializationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_setting())
    }
}
