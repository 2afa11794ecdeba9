//! `SSSS` records: every field a string, emitted verbatim

use contracts::CanonicalLine;
use serde::Deserialize;

use super::record::{build_line, MetricRecord};
use crate::error::DecodeError;

/// String-typed metric record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StringRecord {
    /// Metric path
    pub path: String,
    /// Value, verbatim
    pub value: String,
    /// Timestamp, verbatim
    pub timestamp: String,
}

impl MetricRecord for StringRecord {
    fn to_line(&self, index: usize) -> Result<CanonicalLine, DecodeError> {
        build_line(index, &self.path, &self.value, &self.timestamp)
    }
}
