//! CanonicalLine - the normalized `<path> <value> <timestamp>` record
//!
//! Uses Arc<str> internally so the relay and any fan-out can clone it cheaply.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::ContractError;

/// One metric observation in line-protocol form.
///
/// Always exactly three single-space separated fields, none of them empty and
/// none of them containing whitespace. Immutable once built.
///
/// # Examples
/// ```
/// use contracts::CanonicalLine;
///
/// let line = CanonicalLine::new("a.b", "1", "1000").unwrap();
/// assert_eq!(line.as_str(), "a.b 1 1000");
/// assert!(CanonicalLine::new("a b", "1", "1000").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalLine(Arc<str>);

impl CanonicalLine {
    /// Build a line from its three fields.
    ///
    /// # Errors
    /// Returns `ContractError::InvalidLineField` if a field is empty or
    /// contains whitespace.
    pub fn new(path: &str, value: &str, timestamp: &str) -> Result<Self, ContractError> {
        check_field("path", path)?;
        check_field("value", value)?;
        check_field("timestamp", timestamp)?;
        Ok(Self(Arc::from(format!("{path} {value} {timestamp}"))))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Metric path (first field).
    pub fn path(&self) -> &str {
        self.fields().0
    }

    /// Value field exactly as rendered.
    pub fn value(&self) -> &str {
        self.fields().1
    }

    /// Timestamp field exactly as rendered.
    pub fn timestamp(&self) -> &str {
        self.fields().2
    }

    fn fields(&self) -> (&str, &str, &str) {
        // Construction guarantees exactly two separators.
        let mut parts = self.0.splitn(3, ' ');
        let path = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        let timestamp = parts.next().unwrap_or_default();
        (path, value, timestamp)
    }
}

fn check_field(field: &'static str, raw: &str) -> Result<(), ContractError> {
    if raw.is_empty() {
        return Err(ContractError::InvalidLineField {
            field,
            message: "must not be empty".to_string(),
        });
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(ContractError::InvalidLineField {
            field,
            message: format!("{raw:?} contains whitespace"),
        });
    }
    Ok(())
}

impl Deref for CanonicalLine {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for CanonicalLine {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CanonicalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalLine({:?})", &*self.0)
    }
}

impl PartialEq<str> for CanonicalLine {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for CanonicalLine {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
