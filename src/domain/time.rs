use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DomainError;
use crate::impl_validated_str;

/// A timezone-aware instant pinned to UTC.
///
/// Wrapping [`DateTime<Utc>`] keeps naive timestamps out of the model at
/// the type level; the parse path additionally accepts any RFC 3339
/// string with an explicit offset and normalizes it to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtcDatetime(DateTime<Utc>);

impl UtcDatetime {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Parse an RFC 3339 timestamp. Naive strings (no offset) are refused.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| DomainError::Timestamp(format!("'{raw}' ({e})")))
    }

    /// Wall-clock now. For activity and runtime code only — workflow
    /// logic must use the logical clock on its context.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    #[inline]
    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    /// RFC 3339 rendering with explicit offset, microsecond precision.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl From<DateTime<Utc>> for UtcDatetime {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UtcDatetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// Natural key used to deduplicate side effects across activity retries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdempotencyKey(String);
impl_validated_str!(IdempotencyKey);

impl IdempotencyKey {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::EmptyIdempotencyKey);
        }
        Ok(Self(raw.to_string()))
    }
}
