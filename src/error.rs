use rust_decimal::Decimal;
use strum::{Display, EnumString};
use thiserror::Error;

pub type DeskResult<T> = Result<T, DeskError>;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Errors from validated value types and record invariants.
///
/// Every diagnostic names the type whose predicate was violated, so a
/// failure deep inside a nested construction still points at the culprit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("LEI must be 20 characters, got {0}")]
    LeiLength(usize),

    #[error("LEI must be alphanumeric, got '{0}'")]
    LeiCharset(String),

    #[error("UTI must be non-empty")]
    UtiEmpty,

    #[error("UTI must be at most 52 characters, got {0}")]
    UtiLength(usize),

    #[error("UTI first 20 chars must be alphanumeric, got '{0}'")]
    UtiPrefix(String),

    #[error("ISIN must be 12 characters, got {0}")]
    IsinLength(usize),

    #[error("ISIN country code must be 2 uppercase letters, got '{0}'")]
    IsinCountry(String),

    #[error("ISIN body must be uppercase alphanumeric, got '{0}'")]
    IsinBody(String),

    #[error("ISIN check digit must be numeric, got '{0}'")]
    IsinCheckChar(char),

    #[error("ISIN check digit invalid for '{0}'")]
    IsinLuhn(String),

    #[error("NonEmptyStr must be non-empty")]
    EmptyString,

    #[error("PositiveDecimal must be > 0, got {0}")]
    NotPositive(Decimal),

    #[error("NonNegativeDecimal must be >= 0, got {0}")]
    NegativeDecimal(Decimal),

    #[error("NonZeroDecimal must be non-zero")]
    ZeroDecimal,

    #[error("CurrencyCode must be 3 uppercase ASCII letters, got '{0}'")]
    CurrencyCode(String),

    #[error("UtcDatetime must carry an explicit UTC offset: {0}")]
    Timestamp(String),

    #[error("IdempotencyKey must be non-empty")]
    EmptyIdempotencyKey,

    #[error("FrozenMap keys must be unique, duplicate '{0}'")]
    DuplicateKey(String),

    #[error("{type_name}.{field}: {source}")]
    Field {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: Box<DomainError>,
    },

    #[error("{type_name}: {message}")]
    Invariant {
        type_name: &'static str,
        message: String,
    },
}

impl DomainError {
    /// Attach record/field context to a nested validation failure.
    pub fn in_field(self, type_name: &'static str, field: &'static str) -> Self {
        DomainError::Field {
            type_name,
            field,
            source: Box::new(self),
        }
    }

    pub fn invariant(type_name: &'static str, message: impl Into<String>) -> Self {
        DomainError::Invariant {
            type_name,
            message: message.into(),
        }
    }
}

/// Errors from the tagged JSON wire codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Type path '{0}' is not on the decode allow-list")]
    DisallowedType(String),

    #[error("Expected tag '{expected}', found '{found}'")]
    TagMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Missing required field '{field}' while decoding {type_name}")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("Invalid value for {context}: {message}")]
    InvalidValue {
        context: &'static str,
        message: String,
    },

    #[error("Unknown enum value '{value}' for {type_name}")]
    UnknownEnumValue {
        type_name: &'static str,
        value: String,
    },

    #[error("Decoded value violates a domain invariant: {0}")]
    Domain(#[from] DomainError),

    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the process-wide check / pricer / mapper registries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is frozen; registration is only allowed during worker init")]
    Frozen(&'static str),

    #[error("No pricer registered for instrument kind {0}")]
    NoPricer(String),

    #[error("No product mapper registered for instrument kind {0}")]
    NoMapper(String),
}

/// Semantic failure kinds the retry machinery dispatches on.
///
/// These are deliberately coarse: a retry policy cares whether an error is
/// worth another attempt, not which subsystem produced it.
#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input violates a data-model invariant. Never retried.
    Validation,
    /// Upstream pricing math failed. Never retried by policy.
    Pricing,
    /// Model calibration failed. Never retried by policy.
    Calibration,
    /// The trade state machine refused the transition. Never retried.
    IllegalTransition,
    /// Delivery, network, or storage hiccup. Retried under the step policy.
    TransientIo,
    /// An attempt exceeded its start-to-close or heartbeat deadline.
    Timeout,
    /// The wire codec refused a payload.
    Decode,
}

/// A failed activity attempt, tagged with the semantic kind that retry
/// policies match against.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ActivityError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ActivityError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransientIo, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }
}

impl From<CodecError> for ActivityError {
    fn from(err: CodecError) -> Self {
        ActivityError::new(ErrorKind::Decode, err.to_string())
    }
}

/// Errors raised by the workflow engine and its runtime substrate.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// An activity failed terminally (retries exhausted or non-retryable).
    #[error("Activity '{name}' failed: {source}")]
    ActivityFailed {
        name: &'static str,
        #[source]
        source: ActivityError,
    },

    /// Recorded history disagrees with the code path taken on replay.
    /// This means the workflow logic is not deterministic.
    #[error("History mismatch at event {seq}: {message}")]
    HistoryMismatch { seq: u64, message: String },

    #[error("Workflow was cancelled")]
    Cancelled,

    /// A value required after a success branch was absent. Programmer bug;
    /// aborts the workflow rather than producing a bogus outcome.
    #[error("Workflow state invariant violated: {0}")]
    StateInvariant(&'static str),

    #[error("Signal payload rejected: {0}")]
    BadSignal(#[source] CodecError),

    #[error("Workflow '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Workflow '{0}' is no longer running")]
    Finished(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_diagnostics_name_the_type() {
        assert!(DomainError::LeiLength(19).to_string().contains("LEI"));
        assert!(
            DomainError::NotPositive(Decimal::ZERO)
                .to_string()
                .contains("PositiveDecimal")
        );
        assert!(DomainError::ZeroDecimal.to_string().contains("NonZeroDecimal"));
        assert!(DomainError::EmptyString.to_string().contains("NonEmptyStr"));
    }

    #[test]
    fn field_context_chains() {
        let err = DomainError::EmptyString.in_field("Party", "name");
        assert_eq!(err.to_string(), "Party.name: NonEmptyStr must be non-empty");
    }

    #[test]
    fn error_kind_round_trips_through_strings() {
        let kind: ErrorKind = "Calibration".parse().unwrap();
        assert_eq!(kind, ErrorKind::Calibration);
        assert_eq!(ErrorKind::IllegalTransition.to_string(), "IllegalTransition");
    }
}
