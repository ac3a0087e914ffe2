use crate::value::{Record, RecordValue};

/// Replace every stored decimal in the tree with its nearest double.
///
/// Shape is preserved: sequences keep their order and length, mappings keep
/// their keys. Every other leaf passes through untouched. The conversion is
/// lossy by nature and never fails.
pub fn normalize(value: RecordValue) -> RecordValue {
    match value {
        RecordValue::Decimal(decimal) => RecordValue::Number(decimal.to_f64()),
        RecordValue::Sequence(items) => {
            RecordValue::Sequence(items.into_iter().map(normalize).collect())
        }
        RecordValue::Mapping(record) => RecordValue::Mapping(normalize_record(record)),
        leaf @ (RecordValue::Null
        | RecordValue::Bool(_)
        | RecordValue::Number(_)
        | RecordValue::Text(_)) => leaf,
    }
}

/// [`normalize`] applied to each field of a record.
pub fn normalize_record(record: Record) -> Record {
    record
        .into_iter()
        .map(|(key, value)| (key, normalize(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Decimal;

    fn dec(text: &str) -> RecordValue {
        RecordValue::Decimal(Decimal::parse(text).expect("valid decimal"))
    }

    #[test]
    fn decimals_become_floats_at_every_depth() {
        let record = Record::new()
            .with("rating", dec("4.5"))
            .with(
                "location",
                Record::new()
                    .with("lat", dec("48.8566"))
                    .with("tags", vec![dec("1"), RecordValue::from("x")]),
            )
            .with("name", "Chez Nous");

        let normalized = normalize_record(record.clone());

        assert_eq!(normalized.get("rating"), Some(&RecordValue::Number(4.5)));
        let location = normalized.get("location").and_then(RecordValue::as_mapping).unwrap();
        assert_eq!(location.get("lat"), Some(&RecordValue::Number(48.8566)));
        assert_eq!(
            location.get("tags"),
            Some(&RecordValue::Sequence(vec![
                RecordValue::Number(1.0),
                RecordValue::Text("x".into())
            ]))
        );
        assert_eq!(normalized.get("name"), Some(&RecordValue::Text("Chez Nous".into())));

        let before = RecordValue::Mapping(record);
        let after = RecordValue::Mapping(normalized);
        assert!(!after.contains_decimal());
        assert_eq!(before.leaf_count(), after.leaf_count());
    }

    #[test]
    fn non_decimal_leaves_pass_through() {
        for leaf in [
            RecordValue::Null,
            RecordValue::Bool(false),
            RecordValue::Number(-2.25),
            RecordValue::Text(String::new()),
        ] {
            assert_eq!(normalize(leaf.clone()), leaf);
        }
    }

    #[test]
    fn precision_loss_stays_within_double_rounding() {
        let high_precision = "3.14159265358979323846264338327950288";
        let normalized = normalize(dec(high_precision));
        let RecordValue::Number(value) = normalized else {
            panic!("expected a float leaf");
        };
        let expected: f64 = high_precision.parse().unwrap();
        assert_eq!(value, expected);
        assert!((value - std::f64::consts::PI).abs() <= f64::EPSILON * 4.0);
    }

    #[test]
    fn empty_containers_keep_shape() {
        assert_eq!(
            normalize(RecordValue::Sequence(vec![])),
            RecordValue::Sequence(vec![])
        );
        assert_eq!(
            normalize(RecordValue::Mapping(Record::new())),
            RecordValue::Mapping(Record::new())
        );
    }

    mod properties {
        use super::*;
        use crate::strategies::{arb_record, arb_value, same_shape};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn no_decimal_survives(value in arb_value()) {
                prop_assert!(!normalize(value).contains_decimal());
            }

            #[test]
            fn shape_and_leaf_count_are_preserved(value in arb_value()) {
                let normalized = normalize(value.clone());
                prop_assert_eq!(normalized.leaf_count(), value.leaf_count());
                prop_assert!(same_shape(&value, &normalized));
            }

            #[test]
            fn normalizing_twice_changes_nothing(record in arb_record()) {
                let once = normalize_record(record);
                prop_assert_eq!(normalize_record(once.clone()), once);
            }
        }
    }
}
