use serde::Serialize;

use crate::chart::{ChartMeta, ChartPoint, HistogramBar, HistogramChart, ScatterChart};
use crate::error::RenderError;
use crate::render::{ChartFormat, ChartRenderer};

/// Data-only output for a browser-side charting layer.
///
/// The document carries the chart kind, its captions and the raw series;
/// layout and styling are left to the consumer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSpecRenderer;

#[derive(Serialize)]
struct ChartSpec<'a, T: Serialize> {
    kind: &'static str,
    title: &'a str,
    x_title: &'a str,
    y_title: &'a str,
    series: &'a str,
    data: &'a [T],
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<&'a [ChartPoint]>,
}

impl<'a, T: Serialize> ChartSpec<'a, T> {
    fn new(kind: &'static str, meta: &'a ChartMeta, data: &'a [T]) -> Self {
        Self {
            kind,
            title: meta.title,
            x_title: meta.x_title,
            y_title: meta.y_title,
            series: meta.series,
            data,
            annotations: None,
        }
    }
}

fn to_bytes<T: Serialize>(spec: &ChartSpec<'_, T>) -> Result<Vec<u8>, RenderError> {
    serde_json::to_vec_pretty(spec).map_err(|err| RenderError::encode("json", err))
}

impl ChartRenderer for JsonSpecRenderer {
    fn format(&self) -> ChartFormat {
        ChartFormat::Json
    }

    fn render_scatter(&self, chart: &ScatterChart) -> Result<Vec<u8>, RenderError> {
        let mut spec = ChartSpec::new("scatter", &chart.meta, chart.points.as_slice());
        spec.annotations = Some(chart.annotated.as_slice());
        to_bytes(&spec)
    }

    fn render_histogram(&self, chart: &HistogramChart) -> Result<Vec<u8>, RenderError> {
        to_bytes(&ChartSpec::<HistogramBar>::new(
            "bar",
            &chart.meta,
            chart.bars.as_slice(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{HISTOGRAM_META, SCATTER_META};
    use crate::sentiment::SentimentLabel;
    use serde_json::{json, Value};

    #[test]
    fn scatter_spec_lists_points_and_annotations() {
        let point = ChartPoint { frequency: 3, avg_sentiment: -0.5, label: "slow".into() };
        let chart = ScatterChart {
            meta: SCATTER_META,
            points: vec![point.clone()],
            annotated: vec![point],
        };
        let spec: Value =
            serde_json::from_slice(&JsonSpecRenderer.render_scatter(&chart).unwrap()).unwrap();

        assert_eq!(spec["kind"], "scatter");
        assert_eq!(spec["title"], SCATTER_META.title);
        assert_eq!(
            spec["data"],
            json!([{"frequency": 3, "avg_sentiment": -0.5, "label": "slow"}])
        );
        assert_eq!(spec["annotations"][0]["label"], "slow");
    }

    #[test]
    fn histogram_spec_has_no_annotations() {
        let chart = HistogramChart {
            meta: HISTOGRAM_META,
            bars: vec![HistogramBar {
                label: SentimentLabel::Neutral,
                count: 7,
                color: [128, 128, 128],
            }],
        };
        let spec: Value =
            serde_json::from_slice(&JsonSpecRenderer.render_histogram(&chart).unwrap()).unwrap();

        assert_eq!(spec["kind"], "bar");
        assert_eq!(
            spec["data"],
            json!([{"label": "NEUTRAL", "count": 7, "color": [128, 128, 128]}])
        );
        assert!(spec.get("annotations").is_none());
    }
}
