//! Usage text for method arguments.

use crate::schema::{FieldKind, FieldType, MessageId, Schema};

/// Human readable type of a field, e.g. `repeated enum(LOW, HIGH)`.
pub fn type_label(schema: &Schema, field_type: FieldType) -> String {
    let base = match field_type.kind() {
        FieldKind::Scalar(scalar) => scalar.name().to_string(),
        FieldKind::Enum(id) => {
            let names: Vec<&str> = schema
                .enumeration(id)
                .values()
                .iter()
                .map(|value| value.name.as_str())
                .collect();
            format!("enum({})", names.join(", "))
        }
        FieldKind::Message(id) => schema.message(id).full_name().to_string(),
    };

    if field_type.is_repeated() {
        format!("repeated {base}")
    } else {
        base
    }
}

/// One line per field: the name padded to a shared column, then its type.
pub fn usage_args(schema: &Schema, message: MessageId) -> String {
    let fields = schema.message(message).fields();
    let width = fields.iter().map(|field| field.name().len()).max().unwrap_or(0);

    fields
        .iter()
        .map(|field| {
            format!(
                "  {:<width$}   {}",
                field.name(),
                type_label(schema, field.field_type()),
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aligns_names_and_labels_types() {
        let schema = Schema::from_json(
            &json!({
                "messages": [{ "name": "u.Req", "fields": [
                    { "name": "id", "type": "uint64" },
                    { "name": "level", "type": "u.Level" },
                    { "name": "labels", "type": "google.protobuf.StringValue", "repeated": true }
                ]}],
                "enums": [{ "name": "u.Level", "values": [
                    { "name": "LOW", "number": 0 },
                    { "name": "HIGH", "number": 1 }
                ]}]
            })
            .to_string(),
        )
        .unwrap();

        let usage = usage_args(&schema, schema.find_message("u.Req").unwrap());
        assert_eq!(
            usage,
            "  id       uint64\n  level    enum(LOW, HIGH)\n  labels   repeated google.protobuf.StringValue"
        );
    }

    #[test]
    fn empty_message_has_no_lines() {
        let schema = Schema::from_json(r#"{ "messages": [{ "name": "u.Empty" }] }"#).unwrap();
        assert_eq!(usage_args(&schema, schema.find_message("u.Empty").unwrap()), "");
    }
}
