use serde::Serialize;
use tracing::{debug, info};

use crate::error::VisualError;
use crate::sink::ArtifactSink;

pub const DEFAULT_CHARTS_PREFIX: &str = "charts/";
pub const DEFAULT_PRESIGN_TTL_SECS: u64 = 3600;

/// A chart located in the sink and a time-limited link to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visual {
    pub key: String,
    pub url: String,
    pub expires_in: u64,
}

/// Finds published charts by file-name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLookup {
    pub charts_prefix: String,
    pub ttl_secs: u64,
}

impl Default for VisualLookup {
    fn default() -> Self {
        Self {
            charts_prefix: DEFAULT_CHARTS_PREFIX.to_string(),
            ttl_secs: DEFAULT_PRESIGN_TTL_SECS,
        }
    }
}

impl VisualLookup {
    pub fn new(charts_prefix: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            charts_prefix: charts_prefix.into(),
            ttl_secs,
        }
    }

    /// `file` with the charts prefix prepended unless already present.
    pub fn search_prefix(&self, file: &str) -> String {
        if file.starts_with(&self.charts_prefix) {
            file.to_string()
        } else {
            format!("{}{}", self.charts_prefix, file)
        }
    }

    /// First stored key equal to or starting with the search prefix,
    /// presigned for [`ttl_secs`](Self::ttl_secs).
    pub fn resolve(&self, sink: &dyn ArtifactSink, file: &str) -> Result<Visual, VisualError> {
        if file.is_empty() {
            return Err(VisualError::MissingFileParam);
        }
        let prefix = self.search_prefix(file);
        let keys = sink.list(&prefix)?;
        debug!(prefix = %prefix, candidates = keys.len(), "visual_lookup");

        let key = keys
            .iter()
            .find(|key| key.as_str() == prefix)
            .or_else(|| keys.iter().find(|key| key.starts_with(&prefix)))
            .cloned()
            .ok_or_else(|| VisualError::NotFound {
                prefix: prefix.clone(),
            })?;

        let url = sink.presign(&key, self.ttl_secs)?;
        info!(key = %key, ttl_secs = self.ttl_secs, "visual_presigned");
        Ok(Visual {
            key,
            url,
            expires_in: self.ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::InMemorySink;

    fn sink_with(keys: &[&str]) -> InMemorySink {
        let sink = InMemorySink::new("charts");
        for key in keys {
            sink.put(key, b"<svg/>", "image/svg+xml").unwrap();
        }
        sink
    }

    #[test]
    fn bare_file_names_get_the_charts_prefix() {
        let lookup = VisualLookup::default();
        assert_eq!(lookup.search_prefix("word_scatter"), "charts/word_scatter");
        assert_eq!(lookup.search_prefix("charts/word_scatter"), "charts/word_scatter");
    }

    #[test]
    fn resolves_first_key_matching_prefix() {
        let sink = sink_with(&[
            "charts/sentiment_hist_1.svg",
            "charts/word_scatter_b.svg",
            "charts/word_scatter_a.svg",
        ]);
        let visual = VisualLookup::default().resolve(&sink, "word_scatter").unwrap();

        assert_eq!(visual.key, "charts/word_scatter_a.svg");
        assert_eq!(visual.url, "s3://charts/charts/word_scatter_a.svg?expires_in=3600");
        assert_eq!(visual.expires_in, 3600);
    }

    #[test]
    fn exact_key_wins_over_longer_matches() {
        let sink = sink_with(&["charts/a.svg", "charts/a.svg.bak"]);
        let visual = VisualLookup::new("charts/", 60)
            .resolve(&sink, "charts/a.svg")
            .unwrap();
        assert_eq!(visual.key, "charts/a.svg");
        assert_eq!(visual.expires_in, 60);
    }

    #[test]
    fn empty_and_unknown_files_are_rejected() {
        let sink = sink_with(&["charts/a.svg"]);
        let lookup = VisualLookup::default();

        assert_eq!(lookup.resolve(&sink, ""), Err(VisualError::MissingFileParam));
        assert_eq!(
            lookup.resolve(&sink, "missing"),
            Err(VisualError::NotFound {
                prefix: "charts/missing".into()
            })
        );
    }
}
