use rust_decimal::Decimal;

use crate::codec::{self, WireEncode};
use crate::domain::{FrozenMap, NonEmptyStr, UtcDatetime};

/// How much weight a value carries, and why.
///
/// `Firm` values were observed directly from an authoritative source.
/// `Derived` values came out of a model; they carry the method, its
/// configuration reference, and fit-quality metrics.
#[derive(Debug, Clone, PartialEq)]
pub enum Confidence {
    Firm {
        source: NonEmptyStr,
        attestation_ref: NonEmptyStr,
    },
    Derived {
        method: NonEmptyStr,
        config_ref: NonEmptyStr,
        fit_quality: FrozenMap<Decimal>,
    },
}

/// A value bound to its provenance: who produced it, when, with what
/// confidence, and which prior attestations it builds on.
///
/// The attestation id is derived from the content hash of the encoded
/// value, so two attestations of the same value by the same source at
/// the same instant collapse to the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct Attestation<T> {
    attestation_id: NonEmptyStr,
    value: T,
    confidence: Confidence,
    source: NonEmptyStr,
    timestamp: UtcDatetime,
    provenance: Vec<NonEmptyStr>,
}

impl<T: WireEncode> Attestation<T> {
    pub fn attest(
        value: T,
        confidence: Confidence,
        source: NonEmptyStr,
        timestamp: UtcDatetime,
        provenance: Vec<NonEmptyStr>,
    ) -> Self {
        let content = value.encode();
        let digest = codec::content_hash(&content);
        // 32 hex chars of content hash keeps ids short but collision-safe
        // at desk volumes.
        let attestation_id = NonEmptyStr::parse(&format!("att-{}", &digest[..32]))
            .expect("att- prefix makes the id non-empty");
        Self {
            attestation_id,
            value,
            confidence,
            source,
            timestamp,
            provenance,
        }
    }
}

impl<T> Attestation<T> {
    pub fn attestation_id(&self) -> &NonEmptyStr {
        &self.attestation_id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn confidence(&self) -> &Confidence {
        &self.confidence
    }

    pub fn source(&self) -> &NonEmptyStr {
        &self.source
    }

    pub fn timestamp(&self) -> UtcDatetime {
        self.timestamp
    }

    pub fn provenance(&self) -> &[NonEmptyStr] {
        &self.provenance
    }
}
