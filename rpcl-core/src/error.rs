//! Error types for the rpcl core.
//!
//! Schema loading, argument assignment, command routing and invocation each
//! have their own error enum. Assignment failures are always reported through
//! [`ArgError`], which pins the failure to the `key=value` token that caused it.

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a descriptor file into a [`crate::Schema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("cannot open descriptor file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse descriptor file")]
    Json(#[from] serde_json::Error),

    #[error("type {0} is defined more than once")]
    DuplicateType(String),

    #[error("field {field} is defined more than once in message {message}")]
    DuplicateField { message: String, field: String },

    #[error("value {value} is defined more than once in enum {enumeration}")]
    DuplicateEnumValue { enumeration: String, value: String },

    #[error("unknown type {type_name} for field {field} of message {message}")]
    UnknownFieldType {
        message: String,
        field: String,
        type_name: String,
    },

    #[error("unknown message type {type_name} for method {method}")]
    UnknownMethodType { method: String, type_name: String },
}

/// Result type alias for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Underlying cause of a leaf [`ArgErrorKind::Parse`] failure.
#[derive(Debug, Error)]
pub enum ParseCause {
    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error(transparent)]
    Timestamp(#[from] chrono::ParseError),

    #[error("value out of range for {0}")]
    OutOfRange(&'static str),

    #[error("invalid sign in numeric literal")]
    InvalidSign,
}

/// What went wrong while assigning one argument.
#[derive(Debug, Error)]
pub enum ArgErrorKind {
    #[error("duplicate arg {key}")]
    DuplicateArg { key: String },

    #[error("unknown field {name}")]
    UnknownField { name: String },

    #[error("missing index on array")]
    MissingIndexSegment,

    #[error("invalid index array {token}")]
    InvalidIndex { token: String },

    #[error("missing index {index} in array")]
    MissingIndex { index: usize },

    #[error("cannot set nested field {segment}")]
    NestedFieldOnScalar { segment: String },

    #[error("trying to set a value to a message not a field")]
    LeafOnMessage,

    #[error("unknown enum value {value}")]
    UnknownEnumValue { value: String },

    #[error("{value} is not a valid boolean value")]
    InvalidBoolean { value: String },

    #[error("cannot parse {value:?} as {expected}")]
    Parse {
        expected: &'static str,
        value: String,
        #[source]
        source: ParseCause,
    },
}

impl ArgErrorKind {
    pub(crate) fn parse(expected: &'static str, value: &str, source: impl Into<ParseCause>) -> Self {
        ArgErrorKind::Parse {
            expected,
            value: value.to_string(),
            source: source.into(),
        }
    }
}

/// An assignment failure tied to the raw argument that produced it.
#[derive(Debug, Error)]
#[error("invalid arg {key} with value {value:?}")]
pub struct ArgError {
    pub key: String,
    pub value: String,
    #[source]
    pub kind: ArgErrorKind,
}

impl ArgError {
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: ArgErrorKind) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind,
        }
    }
}

/// Errors raised while routing a command to a schema method.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown service {0}")]
    UnknownService(String),

    #[error("unknown method {method} in service {service}")]
    UnknownMethod { service: String, method: String },

    #[error(transparent)]
    Args(#[from] ArgError),
}

/// Errors raised by an [`crate::Invoker`].
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("cannot encode call")]
    Encode(#[from] serde_json::Error),

    #[error("call failed: {0}")]
    Failed(String),
}
