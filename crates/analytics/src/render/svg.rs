use std::fmt::Write as _;

use crate::chart::{ChartMeta, HistogramChart, ScatterChart};
use crate::error::RenderError;
use crate::render::{ChartFormat, ChartRenderer, Scale};

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;

/// Vector output as a standalone SVG document.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    pub scatter_size: (u32, u32),
    pub histogram_size: (u32, u32),
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            scatter_size: (1000, 600),
            histogram_size: (600, 400),
        }
    }
}

impl ChartRenderer for SvgRenderer {
    fn format(&self) -> ChartFormat {
        ChartFormat::Svg
    }

    fn render_scatter(&self, chart: &ScatterChart) -> Result<Vec<u8>, RenderError> {
        let (width, height) = checked_size(self.scatter_size)?;
        let x = Scale::new(
            (0.0, chart.max_frequency() as f64 * 1.05),
            (MARGIN_LEFT, width - MARGIN_RIGHT),
        );
        let y = Scale::new((-1.1, 1.1), (height - MARGIN_BOTTOM, MARGIN_TOP));

        let mut doc = open_document(width, height, &chart.meta);
        let zero = y.map(0.0);
        // Infallible: writing into a String.
        let _ = writeln!(
            doc,
            r##"<line x1="{:.1}" y1="{zero:.1}" x2="{:.1}" y2="{zero:.1}" stroke="#dddddd" stroke-dasharray="4 4"/>"##,
            MARGIN_LEFT,
            width - MARGIN_RIGHT
        );
        let _ = writeln!(doc, r#"<g class="series" data-name="{}">"#, escape(chart.meta.series));
        for point in &chart.points {
            let _ = writeln!(
                doc,
                r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#1f77b4" fill-opacity="0.7"><title>{} ({}, {:.2})</title></circle>"##,
                x.map(point.frequency as f64),
                y.map(point.avg_sentiment),
                escape(&point.label),
                point.frequency,
                point.avg_sentiment
            );
        }
        let _ = writeln!(doc, "</g>");
        for point in &chart.annotated {
            let _ = writeln!(
                doc,
                r#"<text x="{:.1}" y="{:.1}" font-size="9">{}</text>"#,
                x.map(point.frequency as f64) + 5.0,
                y.map(point.avg_sentiment) - 5.0,
                escape(&point.label)
            );
        }
        Ok(close_document(doc))
    }

    fn render_histogram(&self, chart: &HistogramChart) -> Result<Vec<u8>, RenderError> {
        let (width, height) = checked_size(self.histogram_size)?;
        let y = Scale::new(
            (0.0, chart.max_count() as f64 * 1.1),
            (height - MARGIN_BOTTOM, MARGIN_TOP),
        );
        let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
        let slot = plot_width / chart.bars.len().max(1) as f64;
        let bar_width = slot * 0.6;
        let baseline = height - MARGIN_BOTTOM;

        let mut doc = open_document(width, height, &chart.meta);
        for (idx, bar) in chart.bars.iter().enumerate() {
            let left = MARGIN_LEFT + slot * idx as f64 + (slot - bar_width) / 2.0;
            let top = y.map(bar.count as f64);
            let [r, g, b] = bar.color;
            let _ = writeln!(
                doc,
                r##"<rect x="{left:.1}" y="{top:.1}" width="{bar_width:.1}" height="{:.1}" fill="#{r:02x}{g:02x}{b:02x}"><title>{}: {}</title></rect>"##,
                baseline - top,
                bar.label,
                bar.count
            );
            let _ = writeln!(
                doc,
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
                left + bar_width / 2.0,
                baseline + 16.0,
                bar.label
            );
        }
        Ok(close_document(doc))
    }
}

fn checked_size((width, height): (u32, u32)) -> Result<(f64, f64), RenderError> {
    let min_width = (MARGIN_LEFT + MARGIN_RIGHT) as u32 + 1;
    let min_height = (MARGIN_TOP + MARGIN_BOTTOM) as u32 + 1;
    if width < min_width || height < min_height {
        return Err(RenderError::InvalidCanvas { width, height });
    }
    Ok((f64::from(width), f64::from(height)))
}

fn open_document(width: f64, height: f64, meta: &ChartMeta) -> String {
    let mut doc = String::with_capacity(4096);
    let _ = writeln!(
        doc,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    );
    let _ = writeln!(doc, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        doc,
        r#"<text x="{:.1}" y="28" font-size="16" text-anchor="middle">{}</text>"#,
        width / 2.0,
        escape(meta.title)
    );
    let _ = writeln!(
        doc,
        r#"<line x1="{MARGIN_LEFT}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        height - MARGIN_BOTTOM,
        width - MARGIN_RIGHT,
        height - MARGIN_BOTTOM
    );
    let _ = writeln!(
        doc,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{:.1}" stroke="black"/>"#,
        height - MARGIN_BOTTOM
    );
    let _ = writeln!(
        doc,
        r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
        width / 2.0,
        height - 20.0,
        escape(meta.x_title)
    );
    let _ = writeln!(
        doc,
        r#"<text transform="translate(22 {:.1}) rotate(-90)" font-size="12" text-anchor="middle">{}</text>"#,
        height / 2.0,
        escape(meta.y_title)
    );
    doc
}

fn close_document(mut doc: String) -> Vec<u8> {
    doc.push_str("</svg>\n");
    doc.into_bytes()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
