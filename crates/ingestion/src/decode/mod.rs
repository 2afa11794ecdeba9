//! Metric decoder
//!
//! Turns a raw request body into canonical lines according to the configured
//! `SerializationMode`. Decoding is all-or-nothing: any bad record rejects the
//! whole body.

mod collectd;
mod record;
mod scalar;
mod string;

pub use collectd::CollectdRecord;
pub use record::MetricRecord;
pub use scalar::ScalarRecord;
pub use string::StringRecord;

use contracts::{CanonicalLine, SerializationMode};

use crate::error::DecodeError;

/// Decode a request body
///
/// # Errors
/// Returns `DecodeError` if the body is not the JSON shape `mode` expects or
/// any record cannot be rendered as a line.
pub fn decode(body: &[u8], mode: SerializationMode) -> Result<Vec<CanonicalLine>, DecodeError> {
    match mode {
        SerializationMode::ScalarBatch => decode_batch::<ScalarRecord>(body, mode),
        SerializationMode::StringSingle => decode_single::<StringRecord>(body, mode),
        SerializationMode::CollectorBatch => decode_batch::<CollectdRecord>(body, mode),
        SerializationMode::StringBatch => decode_batch::<StringRecord>(body, mode),
    }
}

/// Decode a JSON array of records, preserving order
///
/// A top-level `null` is an empty batch.
pub fn decode_batch<R: MetricRecord>(
    body: &[u8],
    mode: SerializationMode,
) -> Result<Vec<CanonicalLine>, DecodeError> {
    let records: Option<Vec<R>> =
        serde_json::from_slice(body).map_err(|source| DecodeError::Json { mode, source })?;
    let records = records.unwrap_or_default();

    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.to_line(index))
        .collect()
}

/// Decode exactly one JSON object
pub fn decode_single<R: MetricRecord>(
    body: &[u8],
    mode: SerializationMode,
) -> Result<Vec<CanonicalLine>, DecodeError> {
    let record: R =
        serde_json::from_slice(body).map_err(|source| DecodeError::Json { mode, source })?;
    Ok(vec![record.to_line(0)?])
}
