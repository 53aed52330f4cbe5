//! Invocation seam.
//!
//! Sending a request over the network is left to an [`Invoker`]
//! implementation. The crate ships a dry-run invoker that performs no I/O.

use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use crate::error::InvokeError;
use crate::value::MessageValue;

/// Everything an invoker needs to dispatch one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    /// Method path in `/service/method` form
    pub method: String,

    /// Connection target, if one was configured
    pub target: Option<String>,

    /// Metadata sent along with the call
    pub metadata: BTreeMap<String, Vec<String>>,

    pub request: MessageValue,
}

/// Dispatches a built request and returns the response rendered as JSON.
pub trait Invoker {
    fn invoke(&self, call: &CallRequest) -> Result<JsonValue, InvokeError>;
}

/// Echoes the call back instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunInvoker;

impl Invoker for DryRunInvoker {
    fn invoke(&self, call: &CallRequest) -> Result<JsonValue, InvokeError> {
        Ok(json!({
            "method": call.method,
            "target": call.target,
            "metadata": call.metadata,
            "request": call.request.to_json(),
        }))
    }
}
