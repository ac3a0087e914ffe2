//! BI ingestion manifest.
//!
//! The field names and the string-typed `containsHeader` flag are part of
//! the wire contract with the BI tool and must not change:
//!
//! ```json
//! { "fileLocations": [ { "URIPrefixes": [ "s3://bucket/reviews_export.json" ] } ],
//!   "globalUploadSettings": { "format": "JSON", "containsHeader": "false" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "fileLocations")]
    pub file_locations: Vec<FileLocation>,
    #[serde(rename = "globalUploadSettings")]
    pub global_upload_settings: UploadSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocation {
    #[serde(rename = "URIPrefixes")]
    pub uri_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSettings {
    pub format: String,
    #[serde(rename = "containsHeader")]
    pub contains_header: String,
}

impl Manifest {
    /// Indented JSON, the form written to the sink.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, ExportError> {
        serde_json::to_vec_pretty(self).map_err(|err| ExportError::Serialize {
            what: "manifest",
            reason: err.to_string(),
        })
    }

    /// All referenced data URIs, in order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.file_locations
            .iter()
            .flat_map(|location| location.uri_prefixes.iter().map(String::as_str))
    }
}

/// Builds manifests with fixed upload settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestBuilder {
    format: String,
    contains_header: bool,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self {
            format: "JSON".to_string(),
            contains_header: false,
        }
    }
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_header(mut self, contains_header: bool) -> Self {
        self.contains_header = contains_header;
        self
    }

    /// Manifest pointing at a single data file.
    pub fn build(&self, data_uri: impl Into<String>) -> Manifest {
        self.build_many([data_uri.into()])
    }

    /// Manifest pointing at several data files under one location entry.
    pub fn build_many(&self, data_uris: impl IntoIterator<Item = String>) -> Manifest {
        Manifest {
            file_locations: vec![FileLocation {
                uri_prefixes: data_uris.into_iter().collect(),
            }],
            global_upload_settings: UploadSettings {
                format: self.format.clone(),
                contains_header: self.contains_header.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn default_manifest_matches_wire_shape() {
        let manifest = ManifestBuilder::new().build("s3://bucket/reviews_export.json");
        let value: Value = serde_json::from_slice(&manifest.to_json_pretty().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "fileLocations": [ { "URIPrefixes": [ "s3://bucket/reviews_export.json" ] } ],
                "globalUploadSettings": { "format": "JSON", "containsHeader": "false" }
            })
        );
    }

    #[test]
    fn output_is_indented() {
        let bytes = ManifestBuilder::new().build("s3://b/k").to_json_pretty().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("{\n  \"fileLocations\""));
    }

    #[test]
    fn header_flag_is_a_string() {
        let manifest = ManifestBuilder::new()
            .with_format("CSV")
            .with_header(true)
            .build_many(["s3://b/1.csv".to_string(), "s3://b/2.csv".to_string()]);
        assert_eq!(manifest.global_upload_settings.contains_header, "true");
        assert_eq!(manifest.global_upload_settings.format, "CSV");
        assert_eq!(manifest.uris().collect::<Vec<_>>(), vec!["s3://b/1.csv", "s3://b/2.csv"]);
    }
}
