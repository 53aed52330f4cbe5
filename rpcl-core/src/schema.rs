//! Schema types for rpcl.
//!
//! A schema is loaded once per process from a JSON descriptor file. Loading
//! resolves every type reference up front, so the argument engine only ever
//! matches on closed enums and never looks types up by string on its hot path.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};

/// Scalar leaf kinds a field can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Double,
    Bool,
    String,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Double => "double",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int32" => Some(ScalarKind::Int32),
            "int64" => Some(ScalarKind::Int64),
            "uint32" => Some(ScalarKind::Uint32),
            "uint64" => Some(ScalarKind::Uint64),
            "double" => Some(ScalarKind::Double),
            "bool" => Some(ScalarKind::Bool),
            "string" => Some(ScalarKind::String),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable handle to a message descriptor inside a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(usize);

/// Stable handle to an enum descriptor inside a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumId(usize);

/// What a single element of a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Enum(EnumId),
    Message(MessageId),
}

/// Cardinality wrapped around a [`FieldKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Single(FieldKind),
    Repeated(FieldKind),
}

impl FieldType {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldType::Single(kind) | FieldType::Repeated(kind) => *kind,
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, FieldType::Repeated(_))
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    full_name: String,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
}

impl MessageDescriptor {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Exact, case-sensitive field lookup
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    full_name: String,
    values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn values(&self) -> &[EnumValueDescriptor] {
        &self.values
    }

    /// Exact, case-sensitive value lookup
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValueDescriptor> {
        self.values.iter().find(|value| value.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    name: String,
    input: MessageId,
    output: MessageId,
}

impl MethodDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> MessageId {
        self.input
    }

    pub fn output(&self) -> MessageId {
        self.output
    }
}

#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    full_name: String,
    methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// On-disk descriptor file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorFile {
    #[serde(default)]
    pub messages: Vec<MessageDef>,

    #[serde(default)]
    pub enums: Vec<EnumDef>,

    #[serde(default)]
    pub services: Vec<ServiceDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDef {
    /// Fully qualified name, e.g. `test.Simple`
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,

    /// Scalar kind name or the full name of a message or enum
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub repeated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<EnumValueDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValueDef {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDef {
    pub name: String,

    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub input: String,
    pub output: String,
}

/// Well-known message types every schema carries.
pub const STRING_VALUE: &str = "google.protobuf.StringValue";
pub const INT32_VALUE: &str = "google.protobuf.Int32Value";
pub const INT64_VALUE: &str = "google.protobuf.Int64Value";
pub const UINT32_VALUE: &str = "google.protobuf.UInt32Value";
pub const UINT64_VALUE: &str = "google.protobuf.UInt64Value";
pub const DOUBLE_VALUE: &str = "google.protobuf.DoubleValue";
pub const BOOL_VALUE: &str = "google.protobuf.BoolValue";
pub const TIMESTAMP: &str = "google.protobuf.Timestamp";

fn well_known_messages() -> Vec<MessageDef> {
    let wrapper = |name: &str, kind: ScalarKind| MessageDef {
        name: name.to_string(),
        fields: vec![FieldDef {
            name: "value".to_string(),
            type_name: kind.name().to_string(),
            repeated: false,
        }],
    };

    vec![
        wrapper(STRING_VALUE, ScalarKind::String),
        wrapper(INT32_VALUE, ScalarKind::Int32),
        wrapper(INT64_VALUE, ScalarKind::Int64),
        wrapper(UINT32_VALUE, ScalarKind::Uint32),
        wrapper(UINT64_VALUE, ScalarKind::Uint64),
        wrapper(DOUBLE_VALUE, ScalarKind::Double),
        wrapper(BOOL_VALUE, ScalarKind::Bool),
        MessageDef {
            name: TIMESTAMP.to_string(),
            fields: vec![
                FieldDef {
                    name: "seconds".to_string(),
                    type_name: "int64".to_string(),
                    repeated: false,
                },
                FieldDef {
                    name: "nanos".to_string(),
                    type_name: "int32".to_string(),
                    repeated: false,
                },
            ],
        },
    ]
}

#[derive(Debug, Clone, Copy)]
enum TypeRef {
    Message(MessageId),
    Enum(EnumId),
}

/// An immutable, fully resolved set of messages, enums and services.
#[derive(Debug, Clone)]
pub struct Schema {
    messages: Vec<MessageDescriptor>,
    enums: Vec<EnumDescriptor>,
    services: Vec<ServiceDescriptor>,
    types: HashMap<String, TypeRef>,
}

impl Schema {
    /// Load and resolve a descriptor file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Schema> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Schema> {
        let file: DescriptorFile = serde_json::from_str(content)?;
        Self::from_descriptor(file)
    }

    /// Resolve a parsed descriptor file.
    ///
    /// Well-known types are added first unless the file defines a message
    /// with the same name, in which case the file's definition is used.
    pub fn from_descriptor(file: DescriptorFile) -> Result<Schema> {
        let mut message_defs: Vec<MessageDef> = well_known_messages()
            .into_iter()
            .filter(|known| !file.messages.iter().any(|m| m.name == known.name))
            .collect();
        message_defs.extend(file.messages);

        let mut types = HashMap::new();
        for (index, def) in message_defs.iter().enumerate() {
            if types.insert(def.name.clone(), TypeRef::Message(MessageId(index))).is_some() {
                return Err(SchemaError::DuplicateType(def.name.clone()));
            }
        }

        let mut enums = Vec::with_capacity(file.enums.len());
        for (index, def) in file.enums.into_iter().enumerate() {
            if types.insert(def.name.clone(), TypeRef::Enum(EnumId(index))).is_some() {
                return Err(SchemaError::DuplicateType(def.name));
            }
            enums.push(Self::resolve_enum(def)?);
        }

        let mut messages = Vec::with_capacity(message_defs.len());
        for def in message_defs {
            messages.push(Self::resolve_message(def, &types)?);
        }

        let mut services = Vec::with_capacity(file.services.len());
        for def in file.services {
            services.push(Self::resolve_service(def, &types)?);
        }

        debug!(
            "Loaded schema with {} messages, {} enums, {} services",
            messages.len(),
            enums.len(),
            services.len()
        );

        Ok(Schema {
            messages,
            enums,
            services,
            types,
        })
    }

    fn resolve_enum(def: EnumDef) -> Result<EnumDescriptor> {
        let mut values: Vec<EnumValueDescriptor> = Vec::with_capacity(def.values.len());
        for value in def.values {
            if values.iter().any(|existing| existing.name == value.name) {
                return Err(SchemaError::DuplicateEnumValue {
                    enumeration: def.name,
                    value: value.name,
                });
            }
            values.push(EnumValueDescriptor {
                name: value.name,
                number: value.number,
            });
        }

        Ok(EnumDescriptor {
            full_name: def.name,
            values,
        })
    }

    fn resolve_message(def: MessageDef, types: &HashMap<String, TypeRef>) -> Result<MessageDescriptor> {
        let mut fields = Vec::with_capacity(def.fields.len());
        let mut by_name = HashMap::new();

        for field in def.fields {
            let kind = match ScalarKind::from_name(&field.type_name) {
                Some(scalar) => FieldKind::Scalar(scalar),
                None => match types.get(&field.type_name) {
                    Some(TypeRef::Message(id)) => FieldKind::Message(*id),
                    Some(TypeRef::Enum(id)) => FieldKind::Enum(*id),
                    None => {
                        return Err(SchemaError::UnknownFieldType {
                            message: def.name,
                            field: field.name,
                            type_name: field.type_name,
                        });
                    }
                },
            };

            if by_name.insert(field.name.clone(), fields.len()).is_some() {
                return Err(SchemaError::DuplicateField {
                    message: def.name,
                    field: field.name,
                });
            }

            let field_type = if field.repeated {
                FieldType::Repeated(kind)
            } else {
                FieldType::Single(kind)
            };
            fields.push(FieldDescriptor {
                name: field.name,
                field_type,
            });
        }

        Ok(MessageDescriptor {
            full_name: def.name,
            fields,
            by_name,
        })
    }

    fn resolve_service(def: ServiceDef, types: &HashMap<String, TypeRef>) -> Result<ServiceDescriptor> {
        let lookup = |method: &str, type_name: &str| match types.get(type_name) {
            Some(TypeRef::Message(id)) => Ok(*id),
            _ => Err(SchemaError::UnknownMethodType {
                method: format!("{}.{}", def.name, method),
                type_name: type_name.to_string(),
            }),
        };

        let mut methods = Vec::with_capacity(def.methods.len());
        for method in &def.methods {
            methods.push(MethodDescriptor {
                name: method.name.clone(),
                input: lookup(&method.name, &method.input)?,
                output: lookup(&method.name, &method.output)?,
            });
        }

        Ok(ServiceDescriptor {
            full_name: def.name,
            methods,
        })
    }

    pub fn message(&self, id: MessageId) -> &MessageDescriptor {
        &self.messages[id.0]
    }

    pub fn enumeration(&self, id: EnumId) -> &EnumDescriptor {
        &self.enums[id.0]
    }

    pub fn find_message(&self, full_name: &str) -> Option<MessageId> {
        match self.types.get(full_name) {
            Some(TypeRef::Message(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn find_enum(&self, full_name: &str) -> Option<EnumId> {
        match self.types.get(full_name) {
            Some(TypeRef::Enum(id)) => Some(*id),
            _ => None,
        }
    }

    /// Services in declaration order
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn find_service(&self, full_name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|service| service.full_name == full_name)
    }
}
