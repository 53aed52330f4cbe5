//! Core types and functionality for rpcl.
//!
//! This crate turns flat `field.sub.field=value` command line tokens into a
//! typed request value, guided by a schema loaded from a descriptor file. It
//! also provides command routing, usage text and completion suggestions on
//! top of the same schema, plus the seam through which a built request is
//! handed to a transport.

pub mod args;
mod command;
mod complete;
mod error;
mod invoke;
mod schema;
mod usage;
mod value;

// Re-export core types
pub use args::{ArgsEngine, Shim, ShimFn, ShimRegistry};
pub use command::{parse_command, resolve_method, CommandRequest};
pub use complete::{suggest, COMMANDS};
pub use error::{ArgError, ArgErrorKind, CommandError, InvokeError, ParseCause, Result, SchemaError};
pub use invoke::{CallRequest, DryRunInvoker, Invoker};
pub use schema::{
    DescriptorFile, EnumDef, EnumDescriptor, EnumId, EnumValueDef, EnumValueDescriptor, FieldDef,
    FieldDescriptor, FieldKind, FieldType, MessageDef, MessageDescriptor, MessageId, MethodDef,
    MethodDescriptor, Schema, ScalarKind, ServiceDef, ServiceDescriptor,
};
pub use usage::{type_label, usage_args};
pub use value::{EnumValue, FieldValue, MessageValue, Value};

/// Full names of the well-known message types every schema carries
pub mod well_known {
    pub use crate::schema::{
        BOOL_VALUE, DOUBLE_VALUE, INT32_VALUE, INT64_VALUE, STRING_VALUE, TIMESTAMP, UINT32_VALUE,
        UINT64_VALUE,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
