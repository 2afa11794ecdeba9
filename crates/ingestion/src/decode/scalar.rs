//! `SFIA` records: string path, float value, integer timestamp

use contracts::CanonicalLine;
use serde::Deserialize;

use super::record::{build_line, fixed_point, MetricRecord};
use crate::error::DecodeError;

/// Scalar metric record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScalarRecord {
    /// Metric path
    pub path: String,
    /// Metric value
    pub value: f64,
    /// Unix seconds
    pub timestamp: i64,
}

impl MetricRecord for ScalarRecord {
    fn to_line(&self, index: usize) -> Result<CanonicalLine, DecodeError> {
        build_line(
            index,
            &self.path,
            &fixed_point(self.value),
            &self.timestamp.to_string(),
        )
    }
}
