use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use crate::domain::UtcDatetime;

/// Conversion into the tagged wire representation.
pub trait WireEncode {
    fn encode(&self) -> Value;
}

/// `Decimal` → `{"__decimal__": "<string>"}`. String-carried so no
/// precision is lost to float coercion.
pub fn decimal(d: Decimal) -> Value {
    json!({ "__decimal__": d.to_string() })
}

/// Date-only → `{"__date__": "YYYY-MM-DD"}`.
pub fn date(d: NaiveDate) -> Value {
    json!({ "__date__": d.format("%Y-%m-%d").to_string() })
}

/// UTC datetime → RFC 3339 string. The embedded `T` is what tells the
/// decoder this is a datetime rather than a date.
pub fn datetime(ts: UtcDatetime) -> Value {
    Value::String(ts.to_rfc3339())
}

/// `Duration` → `{"__timedelta_s__": seconds}` as a float.
pub fn duration(d: Duration) -> Value {
    json!({ "__timedelta_s__": d.as_secs_f64() })
}

/// Unordered string set → `{"__frozenset__": [..]}` with sorted elements,
/// so set identity encodes deterministically.
pub fn string_set<I: IntoIterator<Item = String>>(items: I) -> Value {
    let mut sorted: Vec<String> = items.into_iter().collect();
    sorted.sort_unstable();
    json!({ "__frozenset__": sorted })
}

/// Builder for tagged record objects: `__type__` plus encoded fields.
pub struct RecordBuilder {
    map: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new(wire_type: &'static str) -> Self {
        let mut map = Map::new();
        map.insert("__type__".to_string(), Value::String(wire_type.to_string()));
        Self { map }
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.map.insert(name.to_string(), value);
        self
    }

    /// Absent options encode as explicit nulls; the decoder treats null
    /// and absent identically.
    pub fn opt(self, name: &str, value: Option<Value>) -> Self {
        self.field(name, value.unwrap_or(Value::Null))
    }

    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}
