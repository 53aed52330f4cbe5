//! Recursive path assignment against a schema.
//!
//! The engine walks one dot separated path at a time, creating nested
//! messages and repeated elements on demand, and hands the raw string to a
//! shim or to leaf coercion at the end of the path.

use std::collections::HashSet;

use crate::error::{ArgError, ArgErrorKind};
use crate::schema::{FieldKind, FieldType, MessageId, Schema};
use crate::value::{FieldValue, MessageValue, Value};

use super::scalar::{coerce_enum, coerce_scalar, parse_index};
use super::shim::ShimRegistry;
use super::split::split_raw;

/// Converts flat `key=value` arguments into message values of one schema.
pub struct ArgsEngine<'a> {
    schema: &'a Schema,
    shims: ShimRegistry,
}

impl<'a> ArgsEngine<'a> {
    pub fn new(schema: &'a Schema, shims: ShimRegistry) -> Self {
        Self { schema, shims }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn shims(&self) -> &ShimRegistry {
        &self.shims
    }

    /// Build a fresh value of `message` from raw arguments.
    ///
    /// Fails on the first bad argument; no partial tree is returned.
    pub fn unmarshal<S: AsRef<str>>(&self, message: MessageId, args: &[S]) -> Result<MessageValue, ArgError> {
        let mut dest = MessageValue::new(self.schema.message(message).full_name());
        self.unmarshal_into(&mut dest, message, args)?;
        Ok(dest)
    }

    /// Apply raw arguments to an existing tree.
    ///
    /// On error the tree may be partially written and must be discarded.
    pub fn unmarshal_into<S: AsRef<str>>(
        &self,
        dest: &mut MessageValue,
        message: MessageId,
        args: &[S],
    ) -> Result<(), ArgError> {
        let mut seen = HashSet::new();

        for arg in split_raw(args) {
            if !seen.insert(arg.key.clone()) {
                let kind = ArgErrorKind::DuplicateArg { key: arg.key.clone() };
                return Err(ArgError::new(arg.key, arg.value, kind));
            }

            let result = self.assign(dest, message, &arg.path(), &arg.value);
            if let Err(kind) = result {
                return Err(ArgError::new(arg.key, arg.value, kind));
            }
        }

        Ok(())
    }

    /// Assign `raw` at `path` below `target`, a value of type `message`.
    pub fn assign(
        &self,
        target: &mut MessageValue,
        message: MessageId,
        path: &[&str],
        raw: &str,
    ) -> Result<(), ArgErrorKind> {
        let descriptor = self.schema.message(message);

        // Shims consume the whole raw value; leftover segments are ignored.
        if let Some(shim) = self.shims.for_message(descriptor) {
            return shim.apply(raw, target);
        }

        let Some((name, rest)) = path.split_first() else {
            return Err(ArgErrorKind::LeafOnMessage);
        };

        let field = descriptor.field(name).ok_or_else(|| ArgErrorKind::UnknownField {
            name: name.to_string(),
        })?;

        match field.field_type() {
            FieldType::Repeated(kind) => self.assign_element(target, field.name(), kind, rest, raw),
            FieldType::Single(FieldKind::Message(nested)) => {
                let type_name = self.schema.message(nested).full_name();
                let child = target.message_mut(field.name(), type_name);
                self.assign(child, nested, rest, raw)
            }
            FieldType::Single(kind) => {
                let value = self.leaf(kind, rest, raw)?;
                target.set(field.name(), FieldValue::Single(value));
                Ok(())
            }
        }
    }

    fn assign_element(
        &self,
        target: &mut MessageValue,
        field_name: &str,
        kind: FieldKind,
        path: &[&str],
        raw: &str,
    ) -> Result<(), ArgErrorKind> {
        let Some((token, rest)) = path.split_first() else {
            return Err(ArgErrorKind::MissingIndexSegment);
        };
        let index = parse_index(token).map_err(|_| ArgErrorKind::InvalidIndex {
            token: token.to_string(),
        })?;

        let elements = target.list_mut(field_name);
        let len = elements.len();
        if index > len {
            return Err(ArgErrorKind::MissingIndex { index });
        }

        match kind {
            FieldKind::Message(nested) => {
                let type_name = self.schema.message(nested).full_name();
                if index == len {
                    elements.push(Value::Message(MessageValue::new(type_name)));
                }
                let child = elements[index].message_mut(type_name);
                self.assign(child, nested, rest, raw)
            }
            FieldKind::Scalar(_) | FieldKind::Enum(_) => {
                let value = self.leaf(kind, rest, raw)?;
                if index == len {
                    elements.push(value);
                } else {
                    elements[index] = value;
                }
                Ok(())
            }
        }
    }

    /// Coerce a leaf once the path is fully consumed.
    fn leaf(&self, kind: FieldKind, rest: &[&str], raw: &str) -> Result<Value, ArgErrorKind> {
        if let Some(segment) = rest.first() {
            return Err(ArgErrorKind::NestedFieldOnScalar {
                segment: segment.to_string(),
            });
        }

        match kind {
            FieldKind::Scalar(scalar) => coerce_scalar(scalar, raw),
            FieldKind::Enum(id) => coerce_enum(self.schema.enumeration(id), raw),
            FieldKind::Message(_) => Err(ArgErrorKind::LeafOnMessage),
        }
    }
}
