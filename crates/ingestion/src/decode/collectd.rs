//! `SCDF` records: collectd `write_http` JSON
//!
//! Path layout: `hosts.<host>.<plugin>[-<plugin_instance>].<type>[-<type_instance>]`
//! with `.` in the type instance replaced by `_`. Only `values[0]` is emitted;
//! collectd writes `null` for a NaN value, which is emitted as `0`.

use contracts::CanonicalLine;
use serde::Deserialize;

use super::record::{build_line, fixed_point, MetricRecord};
use crate::error::DecodeError;

const NANOS_PER_SEC: f64 = 1e9;

/// collectd value list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectdRecord {
    /// Values, one per data source (`null` = NaN)
    pub values: Vec<Option<f64>>,
    /// Data source types (gauge, derive, ...)
    #[serde(default)]
    pub dstypes: Vec<String>,
    /// Data source names
    #[serde(default)]
    pub dsnames: Vec<String>,
    /// Unix time with fractional seconds
    pub time: f64,
    /// Collection interval in seconds
    #[serde(default)]
    pub interval: f64,
    /// Host name
    pub host: String,
    /// Plugin name
    pub plugin: String,
    /// Plugin instance (empty = none)
    #[serde(default)]
    pub plugin_instance: String,
    /// Type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Type instance (empty = none)
    #[serde(default)]
    pub type_instance: String,
}

impl CollectdRecord {
    /// Synthesized metric path
    pub fn metric_path(&self) -> String {
        let mut path = format!("hosts.{}.{}", self.host, self.plugin);
        if !self.plugin_instance.is_empty() {
            path.push('-');
            path.push_str(&self.plugin_instance);
        }
        path.push('.');
        path.push_str(&self.type_name);
        if !self.type_instance.is_empty() {
            path.push('-');
            path.push_str(&self.type_instance.replace('.', "_"));
        }
        path
    }

    /// Whole unix seconds of `time`
    pub fn unix_seconds(&self) -> i64 {
        unix_seconds(self.time)
    }
}

impl MetricRecord for CollectdRecord {
    fn to_line(&self, index: usize) -> Result<CanonicalLine, DecodeError> {
        let value = self
            .values
            .first()
            .copied()
            .ok_or(DecodeError::MissingValue { index })?
            .unwrap_or_default();

        build_line(
            index,
            &self.metric_path(),
            &fixed_point(value),
            &self.unix_seconds().to_string(),
        )
    }
}

/// Split into whole seconds and a nanosecond remainder, then normalize so the
/// remainder is non-negative. Positive times truncate; negative fractional
/// times move to the earlier second.
fn unix_seconds(time: f64) -> i64 {
    let whole = time.trunc();
    let nanos = ((time - whole) * NANOS_PER_SEC) as i64;
    let secs = whole as i64;
    if nanos < 0 {
        secs.saturating_sub(1)
    } else {
        secs
    }
}
