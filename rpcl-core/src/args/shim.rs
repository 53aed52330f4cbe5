//! Single-string encodings for whole messages.
//!
//! A shim takes over assignment for a message type: the engine hands it the
//! entire raw value and skips field-by-field recursion. A shim only applies
//! when the resolved message declares the scalar fields it writes, so a
//! redefined well-known type falls back to plain recursion. The registry is
//! an explicit value passed to [`super::ArgsEngine::new`], never global state.

use std::collections::HashMap;

use chrono::DateTime;

use crate::error::{ArgErrorKind, ParseCause};
use crate::schema::{
    FieldKind, FieldType, MessageDescriptor, ScalarKind, BOOL_VALUE, DOUBLE_VALUE, INT32_VALUE,
    INT64_VALUE, STRING_VALUE, TIMESTAMP, UINT32_VALUE, UINT64_VALUE,
};
use crate::value::{FieldValue, MessageValue, Value};

use super::scalar::coerce_scalar;

/// Sets a target message from one raw string.
pub type ShimFn = fn(raw: &str, target: &mut MessageValue) -> Result<(), ArgErrorKind>;

/// A shim plus the singular scalar fields it writes.
#[derive(Debug, Clone, Copy)]
pub struct Shim {
    fields: &'static [(&'static str, ScalarKind)],
    apply: ShimFn,
}

impl Shim {
    pub const fn new(fields: &'static [(&'static str, ScalarKind)], apply: ShimFn) -> Self {
        Self { fields, apply }
    }

    /// Whether `descriptor` declares every field this shim writes, with the same kind.
    pub fn accepts(&self, descriptor: &MessageDescriptor) -> bool {
        self.fields.iter().all(|&(name, kind)| {
            descriptor
                .field(name)
                .is_some_and(|field| field.field_type() == FieldType::Single(FieldKind::Scalar(kind)))
        })
    }

    pub fn apply(&self, raw: &str, target: &mut MessageValue) -> Result<(), ArgErrorKind> {
        (self.apply)(raw, target)
    }
}

/// Shims keyed by message full name.
#[derive(Debug, Clone)]
pub struct ShimRegistry {
    shims: HashMap<String, Shim>,
}

impl ShimRegistry {
    pub fn empty() -> Self {
        Self {
            shims: HashMap::new(),
        }
    }

    /// Wrapper types and `google.protobuf.Timestamp`
    pub fn well_known() -> Self {
        Self::empty()
            .with(
                STRING_VALUE,
                Shim::new(&[("value", ScalarKind::String)], |raw, target| wrap(ScalarKind::String, raw, target)),
            )
            .with(
                INT32_VALUE,
                Shim::new(&[("value", ScalarKind::Int32)], |raw, target| wrap(ScalarKind::Int32, raw, target)),
            )
            .with(
                INT64_VALUE,
                Shim::new(&[("value", ScalarKind::Int64)], |raw, target| wrap(ScalarKind::Int64, raw, target)),
            )
            .with(
                UINT32_VALUE,
                Shim::new(&[("value", ScalarKind::Uint32)], |raw, target| wrap(ScalarKind::Uint32, raw, target)),
            )
            .with(
                UINT64_VALUE,
                Shim::new(&[("value", ScalarKind::Uint64)], |raw, target| wrap(ScalarKind::Uint64, raw, target)),
            )
            .with(
                DOUBLE_VALUE,
                Shim::new(&[("value", ScalarKind::Double)], |raw, target| wrap(ScalarKind::Double, raw, target)),
            )
            .with(
                BOOL_VALUE,
                Shim::new(&[("value", ScalarKind::Bool)], |raw, target| wrap(ScalarKind::Bool, raw, target)),
            )
            .with(
                TIMESTAMP,
                Shim::new(&[("seconds", ScalarKind::Int64), ("nanos", ScalarKind::Int32)], timestamp),
            )
    }

    pub fn with(mut self, type_name: impl Into<String>, shim: Shim) -> Self {
        self.register(type_name, shim);
        self
    }

    /// Add or replace the shim for `type_name`.
    pub fn register(&mut self, type_name: impl Into<String>, shim: Shim) -> Option<Shim> {
        self.shims.insert(type_name.into(), shim)
    }

    pub fn get(&self, type_name: &str) -> Option<Shim> {
        self.shims.get(type_name).copied()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.shims.contains_key(type_name)
    }

    /// The shim registered for `descriptor`, if its declared fields fit it.
    pub fn for_message(&self, descriptor: &MessageDescriptor) -> Option<Shim> {
        self.get(descriptor.full_name()).filter(|shim| shim.accepts(descriptor))
    }
}

impl Default for ShimRegistry {
    fn default() -> Self {
        Self::well_known()
    }
}

fn wrap(kind: ScalarKind, raw: &str, target: &mut MessageValue) -> Result<(), ArgErrorKind> {
    let value = coerce_scalar(kind, raw)?;
    target.set("value", FieldValue::Single(value));
    Ok(())
}

fn timestamp(raw: &str, target: &mut MessageValue) -> Result<(), ArgErrorKind> {
    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|e| ArgErrorKind::parse("timestamp", raw, e))?;
    // chrono reports a leap second as nanos past 1e9
    let nanos = i32::try_from(parsed.timestamp_subsec_nanos())
        .ok()
        .filter(|nanos| *nanos < 1_000_000_000)
        .ok_or_else(|| ArgErrorKind::parse("timestamp", raw, ParseCause::OutOfRange("timestamp")))?;
    target.set("seconds", FieldValue::Single(Value::Int64(parsed.timestamp())));
    target.set("nanos", FieldValue::Single(Value::Int32(nanos)));
    Ok(())
}
