//! Aggregation thresholds.

use serde::{Deserialize, Serialize};

/// Filtering and ranking knobs for chart candidates.
///
/// The defaults match the published charts: tokens seen fewer than twice
/// are dropped and the ten most frequent tokens are annotated.
///
/// ```rust
/// use analytics::AggregateConfig;
///
/// let config = AggregateConfig::default();
/// assert_eq!(config.min_frequency, 2);
/// assert_eq!(config.annotate_top, 10);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Tokens with a lower occurrence count are not charted.
    #[serde(default = "default_min_frequency")]
    pub min_frequency: u64,

    /// How many of the most frequent tokens get a text label on the scatter.
    #[serde(default = "default_annotate_top")]
    pub annotate_top: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            min_frequency: default_min_frequency(),
            annotate_top: default_annotate_top(),
        }
    }
}

fn default_min_frequency() -> u64 {
    2
}

fn default_annotate_top() -> usize {
    10
}
