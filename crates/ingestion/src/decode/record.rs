//! Metric record trait

use contracts::CanonicalLine;
use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// One wire-format metric record
///
/// Implement this for every JSON shape the decoder accepts. A record turns
/// into exactly one line or fails.
pub trait MetricRecord: DeserializeOwned {
    /// Render as a canonical line
    ///
    /// # Arguments
    /// * `index` - Position of the record in its batch (for error reporting)
    fn to_line(&self, index: usize) -> Result<CanonicalLine, DecodeError>;
}

/// Fixed-point rendering with six fractional digits (`1.5` -> `1.500000`)
#[inline]
pub fn fixed_point(value: f64) -> String {
    format!("{value:.6}")
}

/// Build a line, tagging field errors with the record index
#[inline]
pub fn build_line(
    index: usize,
    path: &str,
    value: &str,
    timestamp: &str,
) -> Result<CanonicalLine, DecodeError> {
    CanonicalLine::new(path, value, timestamp)
        .map_err(|source| DecodeError::InvalidLine { index, source })
}
