//! Completion suggestions for the command line.
//!
//! Suggestions are plain strings in schema declaration order. Rendering them
//! into a particular shell's completion protocol is left to the caller.

use crate::args::{parse_index, ShimRegistry};
use crate::command::resolve_method;
use crate::schema::{FieldDescriptor, FieldKind, FieldType, MessageId, ScalarKind, Schema};

/// Top-level commands that take a service name.
pub const COMMANDS: &[&str] = &["rpc", "describe"];

fn filter<'w>(candidates: impl IntoIterator<Item = &'w str>, current: &str) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.starts_with(current))
        .map(str::to_string)
        .collect()
}

/// Suggest completions for `current` given the words typed before it.
///
/// `words` excludes the binary name: `["rpc", "test.Api", "Echo"]`.
pub fn suggest(schema: &Schema, shims: &ShimRegistry, words: &[&str], current: &str) -> Vec<String> {
    match words {
        [] => filter(COMMANDS.iter().copied(), current),
        [command] if COMMANDS.contains(command) => filter(
            schema.services().iter().map(|service| service.full_name()),
            current,
        ),
        [command, service] if COMMANDS.contains(command) => schema
            .find_service(service)
            .map(|service| filter(service.methods().iter().map(|method| method.name()), current))
            .unwrap_or_default(),
        ["rpc", service, method, ..] => resolve_method(schema, service, method)
            .map(|method| suggest_args(schema, shims, method.input(), current))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn suggest_args(schema: &Schema, shims: &ShimRegistry, root: MessageId, current: &str) -> Vec<String> {
    if let Some((key, partial)) = current.split_once('=') {
        return suggest_values(schema, shims, root, key, partial);
    }

    let (prefix, partial) = match current.rfind('.') {
        Some(dot) => (&current[..=dot], &current[dot + 1..]),
        None => ("", current),
    };
    let segments: Vec<&str> = match prefix.strip_suffix('.') {
        Some(parents) => parents.split('.').collect(),
        None => Vec::new(),
    };
    let Some(message) = resolve_message(schema, shims, root, &segments) else {
        return Vec::new();
    };

    schema
        .message(message)
        .fields()
        .iter()
        .filter(|field| field.name().starts_with(partial))
        .map(|field| {
            let suffix = match field.field_type() {
                FieldType::Repeated(_) => ".",
                FieldType::Single(FieldKind::Message(id)) if shims.for_message(schema.message(id)).is_none() => ".",
                FieldType::Single(_) => "=",
            };
            format!("{prefix}{}{suffix}", field.name())
        })
        .collect()
}

fn suggest_values(schema: &Schema, shims: &ShimRegistry, root: MessageId, key: &str, partial: &str) -> Vec<String> {
    let Some(field) = resolve_leaf(schema, shims, root, key) else {
        return Vec::new();
    };

    let candidates: Vec<&str> = match field.field_type().kind() {
        FieldKind::Scalar(ScalarKind::Bool) => vec!["true", "false"],
        FieldKind::Enum(id) => schema
            .enumeration(id)
            .values()
            .iter()
            .map(|value| value.name.as_str())
            .collect(),
        _ => Vec::new(),
    };

    filter(candidates, partial)
        .into_iter()
        .map(|value| format!("{key}={value}"))
        .collect()
}

/// Walk message-typed fields, skipping the index after a repeated field.
///
/// Shimmed messages take a single value, so nothing below them resolves.
fn resolve_message(schema: &Schema, shims: &ShimRegistry, root: MessageId, segments: &[&str]) -> Option<MessageId> {
    let mut current = root;
    let mut segments = segments.iter();

    while let Some(name) = segments.next() {
        let field = schema.message(current).field(name)?;
        current = match field.field_type() {
            FieldType::Single(FieldKind::Message(id)) => id,
            FieldType::Repeated(FieldKind::Message(id)) => {
                parse_index(segments.next()?).ok()?;
                id
            }
            _ => return None,
        };
        if shims.for_message(schema.message(current)).is_some() {
            return None;
        }
    }

    Some(current)
}

fn resolve_leaf<'s>(schema: &'s Schema, shims: &ShimRegistry, root: MessageId, key: &str) -> Option<&'s FieldDescriptor> {
    let mut segments: Vec<&str> = key.split('.').collect();
    if segments.len() > 1 && segments.last().is_some_and(|last| parse_index(last).is_ok()) {
        segments.pop();
    }

    let (name, parents) = segments.split_last()?;
    let message = resolve_message(schema, shims, root, parents)?;
    schema.message(message).field(name)
}
