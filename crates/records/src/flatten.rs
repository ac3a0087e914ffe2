//! Single-level projection of nested records.
//!
//! Nested mappings are merged upward under path-joined keys
//! (`location` → `city` becomes `location_city`). Sequences are never
//! expanded into indexed keys; they are stored as JSON text so tabular
//! consumers see exactly one column per field path. That text uses Python
//! `json.dumps` layout (`", "` and `": "` separators, non-ASCII escaped,
//! floats in `repr` form) so exports match the ones downstream dashboards
//! were built against.
//!
//! Two branches that flatten to the same key collide silently: the entry
//! visited later in key order wins.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::Formatter;
use tracing::trace;

use crate::error::TransformError;
use crate::value::{Decimal, Record, RecordValue};

/// Default path separator.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Deepest mapping nesting the flattener will descend into.
pub const MAX_FLATTEN_DEPTH: usize = 64;

/// Scalar cell of a [`FlatRecord`]. Never a container.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Null,
    Bool(bool),
    Number(f64),
    Decimal(Decimal),
    /// Plain text, or the JSON encoding of a sequence.
    Text(String),
}

impl Serialize for FlatValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FlatValue::Null => serializer.serialize_unit(),
            FlatValue::Bool(flag) => serializer.serialize_bool(*flag),
            FlatValue::Number(number) => serializer.serialize_f64(*number),
            FlatValue::Decimal(decimal) => serializer.serialize_f64(decimal.to_f64()),
            FlatValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// A record collapsed to one level of path-keyed scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    cells: BTreeMap<String, FlatValue>,
}

impl FlatRecord {
    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlatValue)> {
        self.cells.iter()
    }

    fn set(&mut self, key: String, value: FlatValue) {
        if self.cells.insert(key.clone(), value).is_some() {
            trace!(key = %key, "flatten_key_overwritten");
        }
    }
}

impl Serialize for FlatRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Flatten with an empty prefix and the `_` separator.
pub fn flatten(record: &Record) -> Result<FlatRecord, TransformError> {
    flatten_with(record, "", DEFAULT_SEPARATOR)
}

/// Flatten `record`, joining nested keys onto `prefix` with `separator`.
pub fn flatten_with(
    record: &Record,
    prefix: &str,
    separator: &str,
) -> Result<FlatRecord, TransformError> {
    let mut out = FlatRecord::default();
    flatten_into(record, prefix, separator, 0, &mut out)?;
    Ok(out)
}

fn flatten_into(
    record: &Record,
    prefix: &str,
    separator: &str,
    depth: usize,
    out: &mut FlatRecord,
) -> Result<(), TransformError> {
    if depth > MAX_FLATTEN_DEPTH {
        return Err(TransformError::DepthExceeded {
            depth,
            limit: MAX_FLATTEN_DEPTH,
        });
    }

    for (key, value) in record.iter() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{separator}{key}")
        };

        match value {
            RecordValue::Mapping(nested) => {
                flatten_into(nested, &path, separator, depth + 1, out)?;
            }
            RecordValue::Sequence(_) => out.set(path, FlatValue::Text(encode_sequence(value)?)),
            RecordValue::Null => out.set(path, FlatValue::Null),
            RecordValue::Bool(flag) => out.set(path, FlatValue::Bool(*flag)),
            RecordValue::Number(number) => out.set(path, FlatValue::Number(*number)),
            RecordValue::Decimal(decimal) => out.set(path, FlatValue::Decimal(decimal.clone())),
            RecordValue::Text(text) => out.set(path, FlatValue::Text(text.clone())),
        }
    }

    Ok(())
}

/// JSON text of `value` in `json.dumps` layout.
fn encode_sequence(value: &RecordValue) -> Result<String, TransformError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, DumpsFormatter);
    value.serialize(&mut serializer)?;
    // Every byte written is ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct DumpsFormatter;

impl Formatter for DumpsFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Shortest round-trip text of a finite double, positional for decimal
/// exponents in `-4..16` and `1e+16` style otherwise.
fn float_repr(value: f64) -> String {
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };
    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}
