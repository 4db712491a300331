//! Shape descriptors and the record encode/decode contract.
//!
//! A [`Shape`] is the static schema of a record: its name and an ordered list
//! of fields with their wire keys and presence rules. [`ObjectReader`] and
//! [`ObjectWriter`] apply those rules to a JSON object; the [`record!`]
//! macro generates the glue for each concrete record type.
//!
//! [`record!`]: crate::record

use serde_json::{Map, Value};

use crate::error::{CodecError, json_kind};
use crate::field::Field;
use crate::wire::{Custom, WireValue};

/// How a field behaves when its key is missing from the wire object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Missing → [`CodecError::MissingField`].
    Required,
    /// Missing or `null` is preserved as [`Field::Absent`] / [`Field::Null`].
    Optional,
    /// Missing or `null` decodes to a fixed default; always written back.
    Defaulted,
    /// Collects every key the shape does not declare.
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name.
    pub name: &'static str,
    /// Key used on the wire. Empty for [`Presence::Rest`].
    pub wire_key: &'static str,
    pub presence: Presence,
    /// Expected JSON type label, from [`WireValue::EXPECTED`].
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Shape {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn wire_key(&self, name: &str) -> Option<&'static str> {
        self.field(name).map(|spec| spec.wire_key)
    }

    /// Whether `key` is claimed by a declared field.
    pub fn declares(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|spec| spec.presence != Presence::Rest && spec.wire_key == key)
    }

    pub fn required_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|spec| spec.presence == Presence::Required)
            .map(|spec| spec.wire_key)
    }

    /// Whether the shape keeps undeclared keys for re-encoding.
    pub fn is_extensible(&self) -> bool {
        self.fields
            .iter()
            .any(|spec| spec.presence == Presence::Rest)
    }
}

/// A named record with a static shape.
///
/// Implemented by [`record!`](crate::record); hand-written impls must keep
/// `read`/`write` consistent with `SHAPE`.
pub trait Record: Sized {
    const SHAPE: &'static Shape;

    fn read(reader: &ObjectReader<'_>) -> Result<Self, CodecError>;

    fn write(&self, writer: &mut ObjectWriter);

    fn decode(value: &Value) -> Result<Self, CodecError> {
        let object = value
            .as_object()
            .ok_or_else(|| CodecError::TypeMismatch {
                record: Self::SHAPE.name.to_owned(),
                field: String::new(),
                expected: "object",
                actual: json_kind(value),
            })?;
        Self::decode_object(object)
    }

    fn decode_object(object: &Map<String, Value>) -> Result<Self, CodecError> {
        Self::read(&ObjectReader::new(Self::SHAPE, object))
    }

    fn encode(&self) -> Value {
        Value::Object(self.encode_object())
    }

    fn encode_object(&self) -> Map<String, Value> {
        let mut writer = ObjectWriter::new();
        self.write(&mut writer);
        writer.finish()
    }
}

/// Read side of a record decode: typed access to one JSON object.
#[derive(Debug)]
pub struct ObjectReader<'a> {
    shape: &'static Shape,
    object: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    pub fn new(shape: &'static Shape, object: &'a Map<String, Value>) -> Self {
        Self { shape, object }
    }

    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// A present key holding `null` is a type mismatch, not a missing field.
    pub fn required<T: WireValue>(&self, key: &str) -> Result<T, CodecError> {
        let value = self
            .object
            .get(key)
            .ok_or_else(|| CodecError::missing(self.shape.name, key))?;
        T::from_wire(value).map_err(|err| err.within(self.shape.name, key))
    }

    pub fn optional<T: WireValue>(&self, key: &str) -> Result<Field<T>, CodecError> {
        match self.object.get(key) {
            None => Ok(Field::Absent),
            Some(Value::Null) => Ok(Field::Null),
            Some(value) => T::from_wire(value)
                .map(Field::Value)
                .map_err(|err| err.within(self.shape.name, key)),
        }
    }

    pub fn defaulted<T: WireValue>(
        &self,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, CodecError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(default()),
            Some(value) => T::from_wire(value).map_err(|err| err.within(self.shape.name, key)),
        }
    }

    /// Every key/value pair the shape does not declare.
    pub fn rest(&self) -> Custom {
        self.object
            .iter()
            .filter(|(key, _)| !self.shape.declares(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Write side of a record encode.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    object: Map<String, Value>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required<T: WireValue>(&mut self, key: &str, value: &T) {
        self.object.insert(key.to_owned(), value.to_wire());
    }

    pub fn optional<T: WireValue>(&mut self, key: &str, value: &Field<T>) {
        match value {
            Field::Absent => {}
            Field::Null => {
                self.object.insert(key.to_owned(), Value::Null);
            }
            Field::Value(inner) => {
                self.object.insert(key.to_owned(), inner.to_wire());
            }
        }
    }

    pub fn defaulted<T: WireValue>(&mut self, key: &str, value: &T) {
        self.required(key, value);
    }

    /// Declared fields win over bag entries with the same key.
    pub fn rest(&mut self, extra: &Custom) {
        for (key, value) in extra {
            if !self.object.contains_key(key) {
                self.object.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn finish(self) -> Map<String, Value> {
        self.object
    }
}
