//! Chart data built from aggregated statistics.
//!
//! Two charts are produced: a scatter of word frequency against mean
//! sentiment, and a bar chart of review counts per sentiment class. Both
//! are plain data plus fixed display metadata; turning them into bytes is
//! the job of a [`ChartRenderer`](crate::ChartRenderer).
//!
//! The scatter scores unrecognized labels as 0.0 while the histogram leaves
//! them out entirely. The two charts are not meant to agree on that point.

use std::collections::BTreeMap;

use records::Record;
use serde::Serialize;

use crate::aggregate::TokenStats;
use crate::config::AggregateConfig;
use crate::sentiment::{sentiment_tag, SentimentLabel};

/// One charted token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub frequency: u64,
    pub avg_sentiment: f64,
    pub label: String,
}

/// Titles and axis captions handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartMeta {
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub series: &'static str,
}

pub const SCATTER_META: ChartMeta = ChartMeta {
    title: "Word frequency vs. average sentiment",
    x_title: "Word frequency (occurrences)",
    y_title: "Average sentiment (-1 = negative, +1 = positive)",
    series: "Words",
};

pub const HISTOGRAM_META: ChartMeta = ChartMeta {
    title: "Sentiment distribution",
    x_title: "Sentiment",
    y_title: "Number of reviews",
    series: "Reviews",
};

/// RGB fill for each sentiment bar.
pub fn label_color(label: SentimentLabel) -> [u8; 3] {
    match label {
        SentimentLabel::Positive => [0x00, 0x80, 0x00],
        SentimentLabel::Negative => [0xff, 0x00, 0x00],
        SentimentLabel::Neutral => [0x80, 0x80, 0x80],
    }
}

/// One point per qualifying token, in first-seen order.
pub fn build_scatter(stats: &TokenStats, cfg: &AggregateConfig) -> Vec<ChartPoint> {
    stats
        .qualifying(cfg)
        .into_iter()
        .map(|(token, frequency, avg_sentiment)| ChartPoint {
            frequency,
            avg_sentiment,
            label: token.to_string(),
        })
        .collect()
}

/// The `n` most frequent points. Equal frequencies keep input order.
pub fn top_by_frequency(points: &[ChartPoint], n: usize) -> Vec<ChartPoint> {
    let mut ranked: Vec<&ChartPoint> = points.iter().collect();
    ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    ranked.into_iter().take(n).cloned().collect()
}

/// Scatter chart ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub meta: ChartMeta,
    pub points: Vec<ChartPoint>,
    /// Subset of `points` that carry a visible text label.
    pub annotated: Vec<ChartPoint>,
}

impl ScatterChart {
    /// `None` when no token qualifies; there is nothing to draw.
    pub fn from_stats(stats: &TokenStats, cfg: &AggregateConfig) -> Option<Self> {
        let points = build_scatter(stats, cfg);
        if points.is_empty() {
            return None;
        }
        let annotated = top_by_frequency(&points, cfg.annotate_top);
        Some(Self {
            meta: SCATTER_META,
            points,
            annotated,
        })
    }

    pub fn max_frequency(&self) -> u64 {
        self.points.iter().map(|p| p.frequency).max().unwrap_or(0)
    }
}

/// Review counts per recognized sentiment label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentHistogram {
    counts: BTreeMap<SentimentLabel, u64>,
}

impl SentimentHistogram {
    /// Count for `label`, `None` when no record carried it.
    pub fn get(&self, label: SentimentLabel) -> Option<u64> {
        self.counts.get(&label).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, u64)> + '_ {
        self.counts.iter().map(|(label, count)| (*label, *count))
    }
}

impl FromIterator<(SentimentLabel, u64)> for SentimentHistogram {
    fn from_iter<I: IntoIterator<Item = (SentimentLabel, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().filter(|(_, count)| *count > 0).collect(),
        }
    }
}

/// Count records per recognized label; everything else is left out.
pub fn build_histogram(records: &[Record]) -> SentimentHistogram {
    let mut histogram = SentimentHistogram::default();
    for label in records
        .iter()
        .filter_map(sentiment_tag)
        .filter_map(|tag| tag.label())
    {
        *histogram.counts.entry(label).or_insert(0) += 1;
    }
    histogram
}

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBar {
    pub label: SentimentLabel,
    pub count: u64,
    pub color: [u8; 3],
}

/// Histogram chart ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramChart {
    pub meta: ChartMeta,
    pub bars: Vec<HistogramBar>,
}

impl HistogramChart {
    /// `None` when no record carries a recognized label.
    pub fn from_histogram(histogram: &SentimentHistogram) -> Option<Self> {
        if histogram.is_empty() {
            return None;
        }
        let bars = histogram
            .iter()
            .map(|(label, count)| HistogramBar {
                label,
                count,
                color: label_color(label),
            })
            .collect();
        Some(Self {
            meta: HISTOGRAM_META,
            bars,
        })
    }

    pub fn max_count(&self) -> u64 {
        self.bars.iter().map(|bar| bar.count).max().unwrap_or(0)
    }
}
