//! The mutable value tree filled in by the argument engine.
//!
//! Ownership is strictly tree shaped: a [`MessageValue`] owns its field
//! values, a repeated field owns its elements. Fields are created lazily, so
//! a field missing from the map is unset.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

/// An enum leaf, kept with both its declared name and number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// One typed element of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Double(f64),
    Bool(bool),
    String(String),
    Enum(EnumValue),
    Message(MessageValue),
}

impl Value {
    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            Value::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the message held here, replacing any other content with an
    /// empty message of `type_name` first.
    pub(crate) fn message_mut(&mut self, type_name: &str) -> &mut MessageValue {
        if !matches!(self, Value::Message(_)) {
            *self = Value::Message(MessageValue::new(type_name));
        }
        match self {
            Value::Message(message) => message,
            _ => unreachable!("value was just set to a message"),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Int32(v) => JsonValue::from(*v),
            Value::Int64(v) => JsonValue::from(*v),
            Value::Uint32(v) => JsonValue::from(*v),
            Value::Uint64(v) => JsonValue::from(*v),
            Value::Double(v) if v.is_nan() => JsonValue::from("NaN"),
            Value::Double(v) if v.is_infinite() => JsonValue::from(if *v > 0.0 { "Infinity" } else { "-Infinity" }),
            Value::Double(v) => JsonValue::from(*v),
            Value::Bool(v) => JsonValue::from(*v),
            Value::String(v) => JsonValue::from(v.as_str()),
            Value::Enum(v) => JsonValue::from(v.name.as_str()),
            Value::Message(message) => message.to_json(),
        }
    }
}

/// The content of one set field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(Value),
    Repeated(Vec<Value>),
}

impl FieldValue {
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::Repeated(_) => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[Value]> {
        match self {
            FieldValue::Repeated(values) => Some(values),
            FieldValue::Single(_) => None,
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Single(value) => value.to_json(),
            FieldValue::Repeated(values) => JsonValue::Array(values.iter().map(Value::to_json).collect()),
        }
    }
}

/// A message instance: its type name plus the fields set so far.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageValue {
    type_name: String,
    fields: BTreeMap<String, FieldValue>,
}

impl MessageValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Shorthand for the value of a singular field
    pub fn single(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(FieldValue::as_single)
    }

    /// Shorthand for the elements of a repeated field
    pub fn repeated(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(FieldValue::as_repeated)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get or create the nested message stored in singular field `name`.
    pub(crate) fn message_mut(&mut self, name: &str, type_name: &str) -> &mut MessageValue {
        let slot = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::Single(Value::Message(MessageValue::new(type_name))));
        if !matches!(slot, FieldValue::Single(_)) {
            *slot = FieldValue::Single(Value::Message(MessageValue::new(type_name)));
        }
        match slot {
            FieldValue::Single(value) => value.message_mut(type_name),
            FieldValue::Repeated(_) => unreachable!("slot was just set to a single value"),
        }
    }

    /// Get or create the element sequence of repeated field `name`.
    pub(crate) fn list_mut(&mut self, name: &str) -> &mut Vec<Value> {
        let slot = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::Repeated(Vec::new()));
        if !matches!(slot, FieldValue::Repeated(_)) {
            *slot = FieldValue::Repeated(Vec::new());
        }
        match slot {
            FieldValue::Repeated(values) => values,
            FieldValue::Single(_) => unreachable!("slot was just set to a repeated value"),
        }
    }

    /// Render the tree as JSON, keyed by field name.
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        JsonValue::Object(map)
    }
}
