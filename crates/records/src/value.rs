//! Record value tree.
//!
//! Stored reviews are semi-structured: any field may hold text, a number, a
//! boolean, null, a nested mapping, or a sequence of any of those. Numbers
//! come out of the store as arbitrary-precision decimals and stay that way
//! until [`normalize`](crate::normalize) turns them into plain floats.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::TransformError;

/// Arbitrary-precision numeric as stored, kept as validated decimal text.
///
/// Accepted grammar: optional sign, digits with an optional fractional part
/// (either side of the point may be empty but not both), optional exponent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    pub fn parse(text: &str) -> Result<Self, TransformError> {
        let trimmed = text.trim();
        if is_decimal_literal(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(TransformError::InvalidDecimal(text.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Nearest double to the stored value. Magnitudes beyond `f64` range
    /// become infinities.
    pub fn to_f64(&self) -> f64 {
        // The literal was validated at construction, so parsing cannot fail.
        self.0.parse::<f64>().unwrap_or(f64::NAN)
    }

    /// The stored value rewritten as a JSON number literal, digit for digit.
    ///
    /// JSON is stricter than the stored grammar: no leading `+`, no leading
    /// zeros, and digits on both sides of a decimal point.
    pub fn json_literal(&self) -> String {
        let (sign, rest) = match self.0.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", self.0.strip_prefix('+').unwrap_or(&self.0)),
        };
        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        let (int, frac) = match mantissa.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (mantissa, None),
        };
        let int = match int.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        };

        let mut out = String::with_capacity(self.0.len() + 2);
        out.push_str(sign);
        out.push_str(int);
        if let Some(frac) = frac {
            out.push('.');
            out.push_str(if frac.is_empty() { "0" } else { frac });
        }
        out.push_str(exponent);
        out
    }
}

impl FromStr for Decimal {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::parse(s)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut idx = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }

    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let int_digits = idx - int_start;

    let mut frac_digits = 0;
    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        let frac_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        frac_digits = idx - frac_start;
    }
    if int_digits + frac_digits == 0 {
        return false;
    }

    if idx < bytes.len() && matches!(bytes[idx], b'e' | b'E') {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        let exp_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == exp_start {
            return false;
        }
    }

    idx == bytes.len()
}

/// One value inside a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Null,
    Bool(bool),
    /// Plain double, produced by normalization.
    Number(f64),
    /// Arbitrary-precision numeric as stored.
    Decimal(Decimal),
    Text(String),
    Sequence(Vec<RecordValue>),
    Mapping(Record),
}

impl RecordValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Record> {
        match self {
            RecordValue::Mapping(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RecordValue::Null)
    }

    /// Build a decimal leaf from text, validating the literal.
    pub fn decimal(text: &str) -> Result<Self, TransformError> {
        Decimal::parse(text).map(RecordValue::Decimal)
    }

    /// Number of non-container leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            RecordValue::Sequence(items) => items.iter().map(RecordValue::leaf_count).sum(),
            RecordValue::Mapping(record) => record.values().map(RecordValue::leaf_count).sum(),
            _ => 1,
        }
    }

    /// True when any leaf in this subtree is still a stored decimal.
    pub fn contains_decimal(&self) -> bool {
        match self {
            RecordValue::Decimal(_) => true,
            RecordValue::Sequence(items) => items.iter().any(RecordValue::contains_decimal),
            RecordValue::Mapping(record) => record.values().any(RecordValue::contains_decimal),
            _ => false,
        }
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Text(value)
    }
}

impl From<bool> for RecordValue {
    fn from(value: bool) -> Self {
        RecordValue::Bool(value)
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        RecordValue::Number(value)
    }
}

impl From<Decimal> for RecordValue {
    fn from(value: Decimal) -> Self {
        RecordValue::Decimal(value)
    }
}

impl From<Record> for RecordValue {
    fn from(value: Record) -> Self {
        RecordValue::Mapping(value)
    }
}

impl From<Vec<RecordValue>> for RecordValue {
    fn from(value: Vec<RecordValue>) -> Self {
        RecordValue::Sequence(value)
    }
}

/// JSON numbers are read with store semantics: every number is a decimal.
impl From<serde_json::Value> for RecordValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RecordValue::Null,
            serde_json::Value::Bool(flag) => RecordValue::Bool(flag),
            serde_json::Value::Number(number) => {
                // serde_json only renders valid numeric literals.
                let text = number.to_string();
                match Decimal::parse(&text) {
                    Ok(decimal) => RecordValue::Decimal(decimal),
                    Err(_) => RecordValue::Text(text),
                }
            }
            serde_json::Value::String(text) => RecordValue::Text(text),
            serde_json::Value::Array(items) => {
                RecordValue::Sequence(items.into_iter().map(RecordValue::from).collect())
            }
            serde_json::Value::Object(map) => RecordValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, RecordValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for RecordValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RecordValue::Null => serializer.serialize_unit(),
            RecordValue::Bool(flag) => serializer.serialize_bool(*flag),
            RecordValue::Number(number) => serializer.serialize_f64(*number),
            // Written back with every stored digit intact.
            RecordValue::Decimal(decimal) => {
                match serde_json::Number::from_str(&decimal.json_literal()) {
                    Ok(number) => number.serialize(serializer),
                    Err(_) => serializer.serialize_f64(decimal.to_f64()),
                }
            }
            RecordValue::Text(text) => serializer.serialize_str(text),
            RecordValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            RecordValue::Mapping(record) => record.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RecordValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(RecordValue::from)
    }
}

/// A stored item: string keys to heterogeneous values, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, RecordValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RecordValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RecordValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Field lookup; `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.get(key)
    }

    /// Text field lookup; `None` when absent or not text.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RecordValue::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RecordValue)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &RecordValue> {
        self.fields.values()
    }

    /// Parse a JSON object into a record.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl IntoIterator for Record {
    type Item = (String, RecordValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, RecordValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(String, RecordValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, RecordValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(key, value)| (key, RecordValue::from(value)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_grammar() {
        for ok in ["0", "-4.5", "+12", "1.", ".5", "3e10", "2.5E-3", " 7 "] {
            assert!(Decimal::parse(ok).is_ok(), "{ok} should parse");
        }
        for bad in ["", "-", ".", "1e", "abc", "1.2.3", "NaN", "inf", "0x10"] {
            assert!(
                matches!(Decimal::parse(bad), Err(TransformError::InvalidDecimal(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn decimal_converts_to_nearest_double() {
        assert_eq!(Decimal::parse("4.5").unwrap().to_f64(), 4.5);
        assert_eq!(Decimal::parse("0.1").unwrap().to_f64(), 0.1);
        assert!(Decimal::parse("1e400").unwrap().to_f64().is_infinite());
    }

    #[test]
    fn json_numbers_become_decimals() {
        let record = Record::from_json_str(r#"{"rating": 4.5, "tags": [1, "a"], "ok": true}"#)
            .expect("valid json");
        assert_eq!(
            record.get("rating"),
            Some(&RecordValue::Decimal(Decimal::parse("4.5").unwrap()))
        );
        assert!(record.get("tags").unwrap().contains_decimal());
        assert_eq!(record.get("ok"), Some(&RecordValue::Bool(true)));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn json_numbers_keep_every_digit() {
        let record = Record::from_json_str(
            r#"{"yelp_num": 12345678901234567891, "lat": 48.85660000000000000001, "rating": 5}"#,
        )
        .expect("valid json");
        let digits = |key: &str| match record.get(key) {
            Some(RecordValue::Decimal(decimal)) => decimal.as_str().to_string(),
            other => panic!("{key} is not a decimal: {other:?}"),
        };
        assert_eq!(digits("yelp_num"), "12345678901234567891");
        assert_eq!(digits("lat"), "48.85660000000000000001");
        assert_eq!(digits("rating"), "5");
    }

    #[test]
    fn decimals_serialize_as_exact_json_literals() {
        let cases = [
            ("5", "5"),
            ("12345678901234567891", "12345678901234567891"),
            ("-4.50", "-4.50"),
            ("+12", "12"),
            (".5", "0.5"),
            ("-.5", "-0.5"),
            ("1.", "1.0"),
            ("007", "7"),
            ("0.0", "0.0"),
            ("2.5E-3", "2.5E-3"),
            ("1.e5", "1.0e5"),
        ];
        for (stored, expected) in cases {
            let value = RecordValue::decimal(stored).unwrap();
            assert_eq!(
                serde_json::to_string(&value).unwrap(),
                expected,
                "{stored} should serialize as {expected}"
            );
        }
    }

    #[test]
    fn records_round_trip_through_json_text() {
        let raw = r#"{"id":"r-1","rating":5,"score":0.1,"yelp_num":12345678901234567891}"#;
        let record = Record::from_json_str(raw).expect("valid json");
        assert_eq!(serde_json::to_string(&record).unwrap(), raw);
    }

    #[test]
    fn text_accessor_ignores_non_text() {
        let record = Record::new()
            .with("text", "great")
            .with("rating", RecordValue::decimal("5").unwrap());
        assert_eq!(record.text("text"), Some("great"));
        assert_eq!(record.text("rating"), None);
        assert_eq!(record.text("absent"), None);
    }

    #[test]
    fn leaf_count_walks_containers() {
        let nested = Record::new().with("a", 1.0).with("b", RecordValue::Null);
        let value = RecordValue::Sequence(vec![
            RecordValue::Mapping(nested),
            RecordValue::Text("x".into()),
            RecordValue::Sequence(vec![]),
        ]);
        assert_eq!(value.leaf_count(), 3);
    }
}
