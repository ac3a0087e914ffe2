//! Generators for arbitrary record trees, shared by the property tests.

use proptest::prelude::*;
use serde_json::Value;

use crate::value::{Decimal, Record, RecordValue};

fn arb_decimal() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        any::<i64>().prop_map(|n| n.to_string()),
        (-1.0e6f64..1.0e6).prop_map(|f| format!("{f}")),
        (0u32..1000, 0u32..1000).prop_map(|(int, frac)| format!("{int}.{frac:03}")),
    ]
    .prop_map(|text| Decimal::parse(&text).expect("generated literal is valid"))
}

fn arb_leaf() -> impl Strategy<Value = RecordValue> {
    prop_oneof![
        Just(RecordValue::Null),
        any::<bool>().prop_map(RecordValue::Bool),
        (-1.0e9f64..1.0e9).prop_map(RecordValue::Number),
        arb_decimal().prop_map(RecordValue::Decimal),
        "[a-zé ]{0,8}".prop_map(RecordValue::Text),
    ]
}

/// Nested values up to four levels deep. Keys never contain `_`, so
/// flattened paths cannot collide.
pub(crate) fn arb_value() -> impl Strategy<Value = RecordValue> {
    arb_leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(RecordValue::Sequence),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|fields| RecordValue::Mapping(fields.into_iter().collect())),
        ]
    })
}

pub(crate) fn arb_record() -> impl Strategy<Value = Record> {
    prop::collection::btree_map("[a-z]{1,3}", arb_value(), 0..5)
        .prop_map(|fields| fields.into_iter().collect())
}

/// Same containers with the same lengths and keys; leaves may differ.
pub(crate) fn same_shape(left: &RecordValue, right: &RecordValue) -> bool {
    match (left, right) {
        (RecordValue::Sequence(a), RecordValue::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_shape(x, y))
        }
        (RecordValue::Mapping(a), RecordValue::Mapping(b)) => {
            a.keys().eq(b.keys())
                && a.values().zip(b.values()).all(|(x, y)| same_shape(x, y))
        }
        (RecordValue::Sequence(_) | RecordValue::Mapping(_), _)
        | (_, RecordValue::Sequence(_) | RecordValue::Mapping(_)) => false,
        _ => true,
    }
}

/// JSON equality with numbers compared by value rather than spelling.
pub(crate) fn json_equivalent(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equivalent(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_equivalent(x, y)))
        }
        _ => left == right,
    }
}
