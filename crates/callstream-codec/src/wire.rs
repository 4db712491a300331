//! Conversion between JSON values and typed field values.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::CodecError;

/// Arbitrary key/value data carried alongside declared fields.
pub type Custom = IndexMap<String, Value>;

/// A value that can sit in a record field.
///
/// Scalars report failures through [`CodecError::mismatch`]; containers
/// re-anchor element failures so the final error names the full path.
pub trait WireValue: Sized {
    /// Label used in mismatch messages (`"string"`, `"object"`, ...).
    const EXPECTED: &'static str;

    fn from_wire(value: &Value) -> Result<Self, CodecError>;

    fn to_wire(&self) -> Value;
}

impl WireValue for String {
    const EXPECTED: &'static str = "string";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))
    }

    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }
}

impl WireValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        value
            .as_bool()
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))
    }

    fn to_wire(&self) -> Value {
        Value::Bool(*self)
    }
}

impl WireValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        value
            .as_i64()
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))
    }

    fn to_wire(&self) -> Value {
        Value::Number(Number::from(*self))
    }
}

impl WireValue for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        value
            .as_u64()
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))
    }

    fn to_wire(&self) -> Value {
        Value::Number(Number::from(*self))
    }
}

impl WireValue for u32 {
    const EXPECTED: &'static str = "u32";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))
    }

    fn to_wire(&self) -> Value {
        Value::Number(Number::from(*self))
    }
}

impl WireValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        value
            .as_f64()
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))
    }

    fn to_wire(&self) -> Value {
        // Non-finite floats have no JSON form.
        Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }
}

/// Timestamps travel as RFC 3339 strings with a `Z` offset.
impl WireValue for DateTime<Utc> {
    const EXPECTED: &'static str = "RFC 3339 timestamp";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        value
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))
    }

    fn to_wire(&self) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// Opaque sub-document, passed through untouched.
impl WireValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        Ok(value.clone())
    }

    fn to_wire(&self) -> Value {
        self.clone()
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    const EXPECTED: &'static str = "array";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        let items = value
            .as_array()
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::from_wire(item).map_err(|err| err.at_index(index)))
            .collect()
    }

    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(WireValue::to_wire).collect())
    }
}

impl<T: WireValue> WireValue for IndexMap<String, T> {
    const EXPECTED: &'static str = "object";

    fn from_wire(value: &Value) -> Result<Self, CodecError> {
        let object = value
            .as_object()
            .ok_or_else(|| CodecError::mismatch(Self::EXPECTED, value))?;
        object
            .iter()
            .map(|(key, item)| {
                T::from_wire(item)
                    .map(|decoded| (key.clone(), decoded))
                    .map_err(|err| {
                        let record = err.record().to_owned();
                        err.within(&record, key)
                    })
            })
            .collect()
    }

    fn to_wire(&self) -> Value {
        let object: Map<String, Value> = self
            .iter()
            .map(|(key, item)| (key.clone(), item.to_wire()))
            .collect();
        Value::Object(object)
    }
}

/// Feeds `value` into `state` consistently with `Value` equality. Object keys
/// are visited in sorted order and `-0.0` hashes like `0.0`.
pub fn hash_json<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => state.write_u8(0),
        Value::Bool(flag) => {
            state.write_u8(1);
            flag.hash(state);
        }
        Value::Number(number) => {
            state.write_u8(2);
            if let Some(n) = number.as_u64() {
                state.write_u8(0);
                n.hash(state);
            } else if let Some(n) = number.as_i64() {
                state.write_u8(1);
                n.hash(state);
            } else if let Some(n) = number.as_f64() {
                state.write_u8(2);
                (n + 0.0).to_bits().hash(state);
            }
        }
        Value::String(text) => {
            state.write_u8(3);
            text.hash(state);
        }
        Value::Array(items) => {
            state.write_u8(4);
            state.write_usize(items.len());
            for item in items {
                hash_json(item, state);
            }
        }
        Value::Object(object) => {
            state.write_u8(5);
            let mut entries: Vec<_> = object.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            state.write_usize(entries.len());
            for (key, item) in entries {
                key.hash(state);
                hash_json(item, state);
            }
        }
    }
}
