//! Command routing for rpcl.
//!
//! Resolves a service and method by name, then builds the method's request
//! value from the remaining `key=value` arguments.

use tracing::debug;

use crate::args::{ArgsEngine, ShimRegistry};
use crate::error::CommandError;
use crate::schema::{MethodDescriptor, Schema};
use crate::value::MessageValue;

/// A type alias for the command parser result.
pub type Result<T> = std::result::Result<T, CommandError>;

/// A routed command with its request built.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    /// Service full name, e.g. `test.Api`
    pub service: String,

    /// Method name within the service
    pub method: String,

    /// Request value for the method's input type
    pub request: MessageValue,
}

impl CommandRequest {
    /// Method path in `/service/method` form
    pub fn method_path(&self) -> String {
        format!("/{}/{}", self.service, self.method)
    }
}

/// Find a method by service full name and method name.
pub fn resolve_method<'s>(schema: &'s Schema, service: &str, method: &str) -> Result<&'s MethodDescriptor> {
    let service_descriptor = schema
        .find_service(service)
        .ok_or_else(|| CommandError::UnknownService(service.to_string()))?;

    service_descriptor
        .method(method)
        .ok_or_else(|| CommandError::UnknownMethod {
            service: service.to_string(),
            method: method.to_string(),
        })
}

/// Route `service`/`method` and build its request from `args`.
pub fn parse_command<S: AsRef<str>>(
    schema: &Schema,
    shims: ShimRegistry,
    service: &str,
    method: &str,
    args: &[S],
) -> Result<CommandRequest> {
    let descriptor = resolve_method(schema, service, method)?;
    debug!(
        "Routing {} args to {}/{} with input {}",
        args.len(),
        service,
        method,
        schema.message(descriptor.input()).full_name()
    );

    let request = ArgsEngine::new(schema, shims).unmarshal(descriptor.input(), args)?;

    Ok(CommandRequest {
        service: service.to_string(),
        method: method.to_string(),
        request,
    })
}
