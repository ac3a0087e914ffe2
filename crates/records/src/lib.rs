//! Review record model.
//!
//! Reviews come out of the key-value store as loosely typed trees: text,
//! booleans, nulls, nested mappings, sequences, and arbitrary-precision
//! decimals. This crate gives that shape a closed type ([`RecordValue`]) and
//! provides the two transforms the export path depends on:
//!
//! - [`normalize`] turns every stored decimal into a plain `f64` so the tree
//!   can be written as JSON (which has no decimal type).
//! - [`flatten`] collapses nested mappings into one level of path-joined
//!   keys, encoding sequences as JSON text, so BI tools see a flat table.
//!
//! Order matters: normalize first, then flatten.
//!
//! ```
//! use records::{flatten, normalize_record, FlatValue, Record};
//!
//! let raw = Record::from_json_str(r#"{"rating": 4.5, "place": {"city": "Lyon"}}"#).unwrap();
//! let flat = flatten(&normalize_record(raw)).unwrap();
//!
//! assert_eq!(flat.get("rating"), Some(&FlatValue::Number(4.5)));
//! assert_eq!(flat.get("place_city"), Some(&FlatValue::Text("Lyon".into())));
//! ```

mod error;
mod flatten;
mod normalize;
#[cfg(test)]
mod strategies;
mod value;

pub use crate::error::TransformError;
pub use crate::flatten::{
    flatten, flatten_with, FlatRecord, FlatValue, DEFAULT_SEPARATOR, MAX_FLATTEN_DEPTH,
};
pub use crate::normalize::{normalize, normalize_record};
pub use crate::value::{Decimal, Record, RecordValue};
