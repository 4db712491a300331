//! Error types for the structured value codec.

use serde_json::Value;
use thiserror::Error;

/// Field-level failure while decoding a record.
///
/// `record` names the outermost record being decoded and `field` is the wire
/// path from that record to the offending value (`call.created_by.id`,
/// `members[2].role`). Both are empty for a bare scalar that failed outside
/// of any record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("{record}: missing required field `{field}`")]
    MissingField { record: String, field: String },
    #[error("{record}: field `{field}` expected {expected}, found {actual}")]
    TypeMismatch {
        record: String,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl CodecError {
    pub fn missing(record: &str, field: &str) -> Self {
        Self::MissingField {
            record: record.to_owned(),
            field: field.to_owned(),
        }
    }

    /// Mismatch for a value not yet attached to any field.
    pub fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            record: String::new(),
            field: String::new(),
            expected,
            actual: json_kind(found),
        }
    }

    /// Wire path of the failing field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::TypeMismatch { field, .. } => field,
        }
    }

    pub fn record(&self) -> &str {
        match self {
            Self::MissingField { record, .. } | Self::TypeMismatch { record, .. } => record,
        }
    }

    /// Re-anchor an error raised below `key` onto the enclosing record.
    pub fn within(self, record: &str, key: &str) -> Self {
        self.rebase(record, key)
    }

    /// Re-anchor an error raised inside element `index` of an array.
    pub fn at_index(self, index: usize) -> Self {
        let segment = format!("[{index}]");
        let record = self.record().to_owned();
        self.rebase(&record, &segment)
    }

    fn rebase(self, record: &str, segment: &str) -> Self {
        let join = |inner: String| {
            if inner.is_empty() {
                segment.to_owned()
            } else if inner.starts_with('[') {
                format!("{segment}{inner}")
            } else {
                format!("{segment}.{inner}")
            }
        };
        match self {
            Self::MissingField { field, .. } => Self::MissingField {
                record: record.to_owned(),
                field: join(field),
            },
            Self::TypeMismatch {
                field,
                expected,
                actual,
                ..
            } => Self::TypeMismatch {
                record: record.to_owned(),
                field: join(field),
                expected,
                actual,
            },
        }
    }
}

/// Name of the JSON type of `value`, as used in mismatch messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
