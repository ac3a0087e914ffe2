//! Review text analytics.
//!
//! Turns a set of reviews into chart-ready data:
//!
//! - [`aggregate`] cleans and tokenizes each review and keeps, per token, an
//!   occurrence count and a running sentiment sum.
//! - [`ScatterChart`] charts tokens seen at least twice against their mean
//!   sentiment and labels the ten most frequent.
//! - [`HistogramChart`] counts reviews per sentiment class.
//! - A [`ChartRenderer`] turns either chart into SVG, PNG or a JSON spec.
//!
//! Labels come from the record's `sentiment` field: POSITIVE scores +1.0,
//! NEGATIVE -1.0, NEUTRAL and anything unrecognized 0.0. [`VaderClassifier`]
//! can produce those labels for records that lack one.
//!
//! Nothing here does I/O. Empty input is not an error; the chart builders
//! return `None` when there is nothing to draw.
//!
//! ```
//! use analytics::{aggregate, AggregateConfig, ChartFormat, ChartRenderer, ScatterChart};
//! use records::Record;
//!
//! let reviews = vec![
//!     Record::new().with("text", "good food good").with("sentiment", "POSITIVE"),
//!     Record::new().with("text", "bad food").with("sentiment", "NEGATIVE"),
//! ];
//! let stats = aggregate(&reviews);
//! assert_eq!(stats.get("food").unwrap().frequency, 2);
//!
//! let chart = ScatterChart::from_stats(&stats, &AggregateConfig::default()).unwrap();
//! let svg = ChartFormat::Svg.renderer().render_scatter(&chart).unwrap();
//! assert!(svg.starts_with(b"<svg"));
//! ```

mod aggregate;
mod chart;
mod classify;
mod config;
mod error;
mod render;
mod sentiment;
mod text;

pub use crate::aggregate::{aggregate, TokenStat, TokenStats};
pub use crate::chart::{
    build_histogram, build_scatter, label_color, top_by_frequency, ChartMeta, ChartPoint,
    HistogramBar, HistogramChart, ScatterChart, SentimentHistogram, HISTOGRAM_META,
    SCATTER_META,
};
pub use crate::classify::{
    label_for, SentimentClassifier, VaderClassifier, POLARITY_THRESHOLD,
};
pub use crate::config::AggregateConfig;
pub use crate::error::RenderError;
pub use crate::render::{
    ChartFormat, ChartRenderer, JsonSpecRenderer, PngRenderer, SvgRenderer,
};
pub use crate::sentiment::{
    review_text, sentiment_tag, SentimentLabel, SentimentTag, SENTIMENT_FIELD, TEXT_FIELD,
};
pub use crate::text::{clean_text, tokenize, ACCENTED_LETTERS};
