//! Pipeline configuration.
//!
//! Settings are read from an optional `revlens.{toml,yaml,json}` file and
//! then from `REVLENS_*` environment variables, later sources winning. Nested
//! options use a double underscore (`REVLENS_AGGREGATE__MIN_FREQUENCY`). Every
//! option has a literal default, so an empty environment is a valid setup.
//!
//! ```toml
//! table_name = "Reviews"
//! bucket_name = "review-analytics-export"
//! data_key = "reviews_export.json"
//! manifest_key = "reviews_export.manifest"
//! charts_bucket = "review-analytics-charts"
//! charts_prefix = "charts/"
//! presign_ttl_secs = 3600
//! chart_format = "svg"
//! ```

use std::path::{Path, PathBuf};

use analytics::{AggregateConfig, ChartFormat};
use publish::{ExportTarget, VisualLookup};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::PipelineSettings;

/// Longest presigned-link lifetime accepted, seven days.
pub const MAX_PRESIGN_TTL_SECS: u64 = 604_800;

pub const ENV_PREFIX: &str = "REVLENS";
pub const DEFAULT_CONFIG_NAME: &str = "revlens";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Options recognized by the pipeline and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Review table to scan.
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Bucket receiving the export table and manifest.
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    #[serde(default = "default_data_key")]
    pub data_key: String,

    #[serde(default = "default_manifest_key")]
    pub manifest_key: String,

    /// Bucket receiving rendered charts.
    #[serde(default = "default_charts_bucket")]
    pub charts_bucket: String,

    #[serde(default = "default_charts_prefix")]
    pub charts_prefix: String,

    #[serde(default = "default_presign_ttl_secs")]
    pub presign_ttl_secs: u64,

    /// Records per store page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub chart_format: ChartFormat,

    /// JSON array of review objects used by the local store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Directory that mirrors the export and chart buckets.
    #[serde(default = "default_sink_root")]
    pub sink_root: PathBuf,

    /// Field identifying a review, used for sentiment write-back.
    #[serde(default = "default_key_field")]
    pub key_field: String,

    #[serde(default)]
    pub aggregate: AggregateConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            bucket_name: default_bucket_name(),
            data_key: default_data_key(),
            manifest_key: default_manifest_key(),
            charts_bucket: default_charts_bucket(),
            charts_prefix: default_charts_prefix(),
            presign_ttl_secs: default_presign_ttl_secs(),
            page_size: default_page_size(),
            chart_format: ChartFormat::default(),
            store_path: default_store_path(),
            sink_root: default_sink_root(),
            key_field: default_key_field(),
            aggregate: AggregateConfig::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl PipelineConfig {
    /// Load from the default file name (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load from an explicit file, which must then exist, and the environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("table_name", self.table_name.as_str()),
            ("bucket_name", self.bucket_name.as_str()),
            ("data_key", self.data_key.as_str()),
            ("manifest_key", self.manifest_key.as_str()),
            ("charts_bucket", self.charts_bucket.as_str()),
            ("key_field", self.key_field.as_str()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{name} must not be empty")));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Validation("page_size must be at least 1".into()));
        }
        if !(1..=MAX_PRESIGN_TTL_SECS).contains(&self.presign_ttl_secs) {
            return Err(ConfigError::Validation(format!(
                "presign_ttl_secs must be between 1 and {MAX_PRESIGN_TTL_SECS}, got {}",
                self.presign_ttl_secs
            )));
        }
        Ok(())
    }

    pub fn export_target(&self) -> ExportTarget {
        ExportTarget::new(&self.data_key, &self.manifest_key)
    }

    pub fn visual_lookup(&self) -> VisualLookup {
        VisualLookup::new(&self.charts_prefix, self.presign_ttl_secs)
    }

    /// Pipeline knobs derived from this configuration.
    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            export_target: self.export_target(),
            charts_prefix: self.charts_prefix.clone(),
            chart_format: self.chart_format,
            aggregate: self.aggregate,
            visuals: self.visual_lookup(),
            ..PipelineSettings::default()
        }
    }
}

fn default_table_name() -> String {
    "Reviews".to_string()
}

fn default_bucket_name() -> String {
    "review-analytics-export".to_string()
}

fn default_data_key() -> String {
    "reviews_export.json".to_string()
}

fn default_manifest_key() -> String {
    "reviews_export.manifest".to_string()
}

fn default_charts_bucket() -> String {
    "review-analytics-charts".to_string()
}

fn default_charts_prefix() -> String {
    "charts/".to_string()
}

fn default_presign_ttl_secs() -> u64 {
    3600
}

fn default_page_size() -> usize {
    100
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/reviews.json")
}

fn default_sink_root() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_key_field() -> String {
    "review_id".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
