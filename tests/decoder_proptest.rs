//! Property-based tests for the integer restoring decoder

use proptest::prelude::*;
use serde_json::{json, Value};

use bind_stats::stats::decoder::coerce_integers;

// Strategy for metric names
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_!-]{0,15}"
}

// Strategy for strings that are never integer literals
fn non_integer_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z .+_!-]{0,12}[A-Za-z .+_!]"
}

// Strategy for arbitrary JSON trees with stringly typed leaves
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(|n| json!(n.to_string())),
        any::<u64>().prop_map(|n| json!(n.to_string())),
        non_integer_strategy().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
        any::<i32>().prop_map(Value::from),
    ];

    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map(name_strategy(), inner, 0..8)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn test_signed_integers_roundtrip(n in any::<i64>()) {
        prop_assert_eq!(coerce_integers(&json!(n.to_string())), json!(n));
    }

    #[test]
    fn test_unsigned_integers_roundtrip(n in any::<u64>()) {
        prop_assert_eq!(coerce_integers(&json!(n.to_string())), json!(n));
    }

    #[test]
    fn test_nested_integers_roundtrip(
        n in any::<i64>(),
        view in name_strategy(),
        metric in name_strategy(),
    ) {
        let input = json!({"views": {view.clone(): {metric.clone(): n.to_string()}}, "list": [[n.to_string()]]});
        let expected = json!({"views": {view: {metric: n}}, "list": [[n]]});
        prop_assert_eq!(coerce_integers(&input), expected);
    }

    #[test]
    fn test_non_integer_strings_unchanged(s in non_integer_strategy()) {
        prop_assert_eq!(coerce_integers(&json!(s.clone())), json!(s));
    }

    #[test]
    fn test_idempotent(value in json_strategy()) {
        let once = coerce_integers(&value);
        let twice = coerce_integers(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_shape_preserved(value in json_strategy()) {
        let decoded = coerce_integers(&value);
        prop_assert_eq!(shape(&value), shape(&decoded));
    }
}

/// Structure with leaves erased
fn shape(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(shape).collect()),
        Value::Object(fields) => Value::Object(
            fields.iter().map(|(k, v)| (k.clone(), shape(v))).collect(),
        ),
        _ => Value::Null,
    }
}
