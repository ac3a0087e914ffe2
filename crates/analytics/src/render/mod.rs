//! Pluggable chart renderers.
//!
//! Every renderer receives the same two chart structures; only the output
//! encoding differs. Pick one with [`ChartFormat::renderer`].

mod json;
mod png;
mod svg;

use serde::{Deserialize, Serialize};

use crate::chart::{HistogramChart, ScatterChart};
use crate::error::RenderError;

pub use self::json::JsonSpecRenderer;
pub use self::png::PngRenderer;
pub use self::svg::SvgRenderer;

/// Output encodings a chart can be published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Svg,
    Png,
    Json,
}

impl ChartFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ChartFormat::Svg => "image/svg+xml",
            ChartFormat::Png => "image/png",
            ChartFormat::Json => "application/json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
            ChartFormat::Json => "json",
        }
    }

    /// Default renderer for this format.
    pub fn renderer(self) -> Box<dyn ChartRenderer> {
        match self {
            ChartFormat::Svg => Box::new(SvgRenderer::default()),
            ChartFormat::Png => Box::new(PngRenderer::default()),
            ChartFormat::Json => Box::new(JsonSpecRenderer),
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "svg" => Some(ChartFormat::Svg),
            "png" => Some(ChartFormat::Png),
            "json" => Some(ChartFormat::Json),
            _ => None,
        }
    }
}

/// Turns chart data into publishable bytes.
pub trait ChartRenderer: Send + Sync {
    fn format(&self) -> ChartFormat;

    fn render_scatter(&self, chart: &ScatterChart) -> Result<Vec<u8>, RenderError>;

    fn render_histogram(&self, chart: &HistogramChart) -> Result<Vec<u8>, RenderError>;
}

/// Linear map from a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    pub(crate) fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub(crate) fn map(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return (self.range.0 + self.range.1) / 2.0;
        }
        let t = (value - self.domain.0) / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_round_trip_through_names() {
        for format in [ChartFormat::Svg, ChartFormat::Png, ChartFormat::Json] {
            assert_eq!(ChartFormat::parse(format.extension()), Some(format));
            assert_eq!(format.renderer().format(), format);
        }
        assert_eq!(ChartFormat::parse("PNG"), Some(ChartFormat::Png));
        assert_eq!(ChartFormat::parse("gif"), None);
    }

    #[test]
    fn scale_maps_and_inverts_ranges() {
        let y = Scale::new((-1.0, 1.0), (500.0, 100.0));
        assert_eq!(y.map(-1.0), 500.0);
        assert_eq!(y.map(1.0), 100.0);
        assert_eq!(y.map(0.0), 300.0);

        let flat = Scale::new((2.0, 2.0), (0.0, 10.0));
        assert_eq!(flat.map(2.0), 5.0);
    }
}
