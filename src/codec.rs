//! Tagged JSON wire codec.
//!
//! Every value that crosses the durable boundary (workflow inputs,
//! signals, recorded activity outputs, query snapshots) goes through this
//! codec, which preserves exact type identity: decimals stay decimals,
//! dates stay dates, validated newtypes re-validate on the way back in.
//!
//! Encoding rules:
//! - `null | bool | number | string` pass through.
//! - `Decimal` → `{"__decimal__": "<string>"}`.
//! - date-only → `{"__date__": "YYYY-MM-DD"}`.
//! - UTC datetime → RFC 3339 string with offset.
//! - `Duration` → `{"__timedelta_s__": <seconds as f64>}`.
//! - enum → its wire string.
//! - unordered string set → `{"__frozenset__": [sorted]}`.
//! - record → object with `"__type__": "<dotted path>"` plus fields.
//! - sequence → array; map → object with string keys.
//!
//! Decoding routes `__type__` tags through a closed registry of decode
//! functions ([`registry`]); a tag outside the allow-list is refused, so
//! an adversarial payload cannot make the process materialize arbitrary
//! types. Missing optional fields fall back to their defaults and unknown
//! fields are ignored, which is what lets old payloads decode against
//! newer schemas.

pub mod decode;
pub mod encode;
mod impls;
pub mod registry;

use serde_json::Value;
use sha2::{Digest, Sha256};

pub use decode::WireDecode;
pub use encode::WireEncode;
pub use registry::decode_checked;

/// Canonical JSON rendering: object keys in sorted order, no whitespace.
/// Two encodings of the same value are byte-identical.
pub fn canonical_json(value: &Value) -> String {
    // serde_json maps are BTreeMap-backed, so serialization is already
    // key-sorted and deterministic.
    value.to_string()
}

/// Lowercase SHA-256 hex digest of the canonical JSON rendering.
pub fn content_hash(value: &Value) -> String {
    use std::fmt::Write;

    let mut hasher = Sha256::new();
    hasher.update(canonical_json(value).as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Encode a value and render it canonically in one step.
pub fn to_canonical_string<T: WireEncode>(value: &T) -> String {
    canonical_json(&value.encode())
}
