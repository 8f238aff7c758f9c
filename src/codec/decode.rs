use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::domain::UtcDatetime;
use crate::error::CodecError;

/// Conversion back from the tagged wire representation. Implementations
/// must route through the type's validating constructor so that a decoded
/// value is indistinguishable from a freshly built one.
pub trait WireDecode: Sized {
    fn decode(value: &Value) -> Result<Self, CodecError>;
}

/// The `__type__` tag of a record payload, if any.
pub fn tag_of(value: &Value) -> Option<&str> {
    value.get("__type__").and_then(Value::as_str)
}

/// Field access over a tagged record that has already passed its tag
/// check. Unknown fields in the payload are simply never asked for.
#[derive(Debug)]
pub struct Fields<'a> {
    type_name: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Verify the payload is an object tagged `wire_type` and open it.
    pub fn expect(value: &'a Value, wire_type: &'static str) -> Result<Self, CodecError> {
        let map = value
            .as_object()
            .ok_or_else(|| CodecError::TagMismatch {
                expected: wire_type,
                found: format!("non-object value {value}"),
            })?;
        match tag_of(value) {
            Some(tag) if tag == wire_type => Ok(Self {
                type_name: short_name(wire_type),
                map,
            }),
            Some(tag) => Err(CodecError::TagMismatch {
                expected: wire_type,
                found: tag.to_string(),
            }),
            None => Err(CodecError::TagMismatch {
                expected: wire_type,
                found: "<untagged object>".to_string(),
            }),
        }
    }

    pub fn required(&self, name: &'static str) -> Result<&'a Value, CodecError> {
        match self.map.get(name) {
            Some(Value::Null) | None => Err(CodecError::MissingField {
                type_name: self.type_name,
                field: name,
            }),
            Some(v) => Ok(v),
        }
    }

    /// Null and absent both mean "default".
    pub fn optional(&self, name: &'static str) -> Option<&'a Value> {
        match self.map.get(name) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }
}

/// Last segment of a dotted wire path, for diagnostics.
pub fn short_name(wire_type: &'static str) -> &'static str {
    wire_type.rsplit('.').next().unwrap_or(wire_type)
}

/// `{"__decimal__": s}` primary; bare strings and numbers accepted for
/// payloads produced by less strict peers.
pub fn decimal(value: &Value, context: &'static str) -> Result<Decimal, CodecError> {
    let raw = match value {
        Value::Object(map) => map.get("__decimal__").and_then(Value::as_str).map(str::to_string),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| CodecError::InvalidValue {
            context,
            message: format!("expected a decimal, got {value}"),
        })
}

/// `{"__date__": iso}` primary; a bare ISO string without `T` decodes as
/// a date when the field is statically date-typed.
pub fn date(value: &Value, context: &'static str) -> Result<NaiveDate, CodecError> {
    let raw = match value {
        Value::Object(map) => map.get("__date__").and_then(Value::as_str),
        Value::String(s) if !s.contains('T') => Some(s.as_str()),
        _ => None,
    };
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .ok_or_else(|| CodecError::InvalidValue {
            context,
            message: format!("expected a date, got {value}"),
        })
}

/// An ISO-8601 string containing `T` decodes as an offset-aware instant.
pub fn datetime(value: &Value, context: &'static str) -> Result<UtcDatetime, CodecError> {
    match value {
        Value::String(s) if s.contains('T') => {
            UtcDatetime::parse(s).map_err(|e| CodecError::InvalidValue {
                context,
                message: e.to_string(),
            })
        }
        _ => Err(CodecError::InvalidValue {
            context,
            message: format!("expected an RFC 3339 datetime string, got {value}"),
        }),
    }
}

/// `{"__timedelta_s__": f64}`.
pub fn duration(value: &Value, context: &'static str) -> Result<Duration, CodecError> {
    value
        .get("__timedelta_s__")
        .and_then(Value::as_f64)
        .filter(|secs| *secs >= 0.0 && secs.is_finite())
        .map(Duration::from_secs_f64)
        .ok_or_else(|| CodecError::InvalidValue {
            context,
            message: format!("expected a tagged duration, got {value}"),
        })
}

/// `{"__frozenset__": [..]}` reconstructs as an ordered set; the wire
/// carries the elements sorted, and the set keeps them that way.
pub fn string_set(
    value: &Value,
    context: &'static str,
) -> Result<std::collections::BTreeSet<String>, CodecError> {
    let items = value
        .get("__frozenset__")
        .and_then(Value::as_array)
        .ok_or_else(|| CodecError::InvalidValue {
            context,
            message: format!("expected a tagged set, got {value}"),
        })?;
    items
        .iter()
        .map(|item| string(item, context).map(str::to_string))
        .collect()
}

pub fn string<'a>(value: &'a Value, context: &'static str) -> Result<&'a str, CodecError> {
    value.as_str().ok_or_else(|| CodecError::InvalidValue {
        context,
        message: format!("expected a string, got {value}"),
    })
}

pub fn u32(value: &Value, context: &'static str) -> Result<u32, CodecError> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| CodecError::InvalidValue {
            context,
            message: format!("expected an unsigned integer, got {value}"),
        })
}

pub fn array<'a>(value: &'a Value, context: &'static str) -> Result<&'a [Value], CodecError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CodecError::InvalidValue {
            context,
            message: format!("expected an array, got {value}"),
        })
}
