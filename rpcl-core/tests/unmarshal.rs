use rpcl_core::{ArgErrorKind, ArgsEngine, MessageValue, Schema, ShimRegistry, Value};
use serde_json::{json, Value as JsonValue};

fn schema() -> Schema {
    Schema::from_json(include_str!("../testdata/test.json")).expect("test schema")
}

fn unmarshal(args: &[&str]) -> Result<MessageValue, rpcl_core::ArgError> {
    let schema = schema();
    let simple = schema.find_message("test.Simple").expect("test.Simple");
    ArgsEngine::new(&schema, ShimRegistry::well_known()).unmarshal(simple, args)
}

fn run(args: &[&str]) -> JsonValue {
    unmarshal(args).expect("unmarshal").to_json()
}

#[test]
fn simple() {
    let value = run(&[
        "str=abc",
        "int32=32",
        "int64=64",
        "uint32=32",
        "uint64=64",
        "double=6.4",
        "bool=true",
        "enum=enum_value2",
        "nested.str=nested_abc",
        "nested.strs.0=nested_str_1",
        "nested.strs.1=nested_str_2",
        "wrapper_str=wrapper_str",
    ]);

    assert_eq!(
        value,
        json!({
            "str": "abc",
            "int32": 32,
            "int64": 64,
            "uint32": 32,
            "uint64": 64,
            "double": 6.4,
            "bool": true,
            "enum": "enum_value2",
            "nested": {
                "str": "nested_abc",
                "strs": ["nested_str_1", "nested_str_2"]
            },
            "wrapper_str": { "value": "wrapper_str" }
        })
    );
}

#[test]
fn repeated() {
    let value = run(&[
        "strs.0=abc1",
        "strs.1=abc2",
        "enums.0=enum_value1",
        "enums.1=enum_value2",
        "nesteds.0.str=nested_abc_1",
        "nesteds.1.str=nested_abc_2",
        "nesteds.0.strs.0=nested_abc_nested_1",
        "nesteds.1.strs.0=nested_abc_nested_2",
        "wrapper_strs.0=wrapper_str_1",
        "wrapper_strs.1=wrapper_str_2",
    ]);

    assert_eq!(
        value,
        json!({
            "strs": ["abc1", "abc2"],
            "enums": ["enum_value1", "enum_value2"],
            "nesteds": [
                { "str": "nested_abc_1", "strs": ["nested_abc_nested_1"] },
                { "str": "nested_abc_2", "strs": ["nested_abc_nested_2"] }
            ],
            "wrapper_strs": [
                { "value": "wrapper_str_1" },
                { "value": "wrapper_str_2" }
            ]
        })
    );
}

#[test]
fn typed_leaves() {
    let value = unmarshal(&["int64=-0x40", "double=-1.5e2", "int64_wrapper=017"]).unwrap();
    assert_eq!(value.single("int64"), Some(&Value::Int64(-64)));
    assert_eq!(value.single("double"), Some(&Value::Double(-150.0)));
    let wrapper = value.single("int64_wrapper").and_then(Value::as_message).unwrap();
    assert_eq!(wrapper.single("value"), Some(&Value::Int64(15)));
}

#[test]
fn timestamp() {
    let value = run(&["created_at=2024-02-29T12:00:00.000000042Z"]);
    assert_eq!(
        value,
        json!({ "created_at": { "seconds": 1_709_208_000, "nanos": 42 } })
    );
}

#[test]
fn index_contiguity() {
    let err = unmarshal(&["strs.0=a", "strs.2=c"]).unwrap_err();
    assert_eq!(err.key, "strs.2");
    assert!(matches!(err.kind, ArgErrorKind::MissingIndex { index: 2 }));

    let value = unmarshal(&["strs.0=a", "strs.1=b", "strs.0x0=z"]).unwrap();
    let strs: Vec<&str> = value
        .repeated("strs")
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(strs, vec!["z", "b"]);
}

#[test]
fn duplicate_key_fails_even_with_same_value() {
    for (first, second) in [("str=a", "str=a"), ("str=a", "str=b"), ("nested.str=a", "nested.str")] {
        let err = unmarshal(&[first, second]).unwrap_err();
        match err.kind {
            ArgErrorKind::DuplicateArg { key } => assert_eq!(key, err.key),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn unknown_field() {
    let err = unmarshal(&["bogus=1"]).unwrap_err();
    assert_eq!(err.to_string(), "invalid arg bogus with value \"1\"");
    assert_eq!(err.kind.to_string(), "unknown field bogus");
}

#[test]
fn non_finite_double() {
    assert_eq!(run(&["double=NaN"]), json!({ "double": "NaN" }));
    assert_eq!(run(&["double=-inf"]), json!({ "double": "-Infinity" }));
}

#[test]
fn leap_second_timestamp_fails() {
    let err = unmarshal(&["created_at=2016-12-31T23:59:60.5Z"]).unwrap_err();
    assert_eq!(err.key, "created_at");
    assert!(matches!(err.kind, ArgErrorKind::Parse { expected: "timestamp", .. }));
}
