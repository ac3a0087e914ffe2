use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::chart::{HistogramChart, ScatterChart};
use crate::error::RenderError;
use crate::render::{ChartFormat, ChartRenderer, Scale};

const MARGIN: u32 = 40;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([221, 221, 221]);
const POINT: Rgb<u8> = Rgb([31, 119, 180]);
const ANNOTATED: Rgb<u8> = Rgb([214, 39, 40]);

/// Raster output. Text is not drawn; annotated points get a distinct color.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

impl PngRenderer {
    fn canvas(&self) -> Result<RgbImage, RenderError> {
        if self.width <= MARGIN * 2 || self.height <= MARGIN * 2 {
            return Err(RenderError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        let mut img = RgbImage::from_pixel(self.width, self.height, WHITE);
        let bottom = self.height - MARGIN;
        hline(&mut img, MARGIN, self.width - MARGIN, bottom, BLACK);
        vline(&mut img, MARGIN, MARGIN, bottom, BLACK);
        Ok(img)
    }

    fn x_range(&self) -> (f64, f64) {
        (f64::from(MARGIN), f64::from(self.width - MARGIN))
    }

    fn y_range(&self) -> (f64, f64) {
        (f64::from(self.height - MARGIN), f64::from(MARGIN))
    }
}

impl ChartRenderer for PngRenderer {
    fn format(&self) -> ChartFormat {
        ChartFormat::Png
    }

    fn render_scatter(&self, chart: &ScatterChart) -> Result<Vec<u8>, RenderError> {
        let mut img = self.canvas()?;
        let x = Scale::new((0.0, chart.max_frequency() as f64 * 1.05), self.x_range());
        let y = Scale::new((-1.1, 1.1), self.y_range());

        let zero = y.map(0.0).round() as u32;
        hline(&mut img, MARGIN + 1, self.width - MARGIN, zero, GRID);

        for point in &chart.points {
            let color = if chart.annotated.iter().any(|a| a.label == point.label) {
                ANNOTATED
            } else {
                POINT
            };
            let cx = x.map(point.frequency as f64).round() as i64;
            let cy = y.map(point.avg_sentiment).round() as i64;
            fill_rect(&mut img, cx - 3, cy - 3, cx + 3, cy + 3, color);
        }
        encode(img)
    }

    fn render_histogram(&self, chart: &HistogramChart) -> Result<Vec<u8>, RenderError> {
        let mut img = self.canvas()?;
        let y = Scale::new((0.0, chart.max_count() as f64 * 1.1), self.y_range());
        let (left, right) = self.x_range();
        let slot = (right - left) / chart.bars.len().max(1) as f64;
        let bar_width = slot * 0.6;
        let bottom = i64::from(self.height - MARGIN) - 1;

        for (idx, bar) in chart.bars.iter().enumerate() {
            let x0 = left + slot * idx as f64 + (slot - bar_width) / 2.0;
            let top = y.map(bar.count as f64).round() as i64;
            fill_rect(
                &mut img,
                x0.round() as i64,
                top,
                (x0 + bar_width).round() as i64,
                bottom,
                Rgb(bar.color),
            );
        }
        encode(img)
    }
}

fn hline(img: &mut RgbImage, x0: u32, x1: u32, y: u32, color: Rgb<u8>) {
    if y >= img.height() {
        return;
    }
    for x in x0..x1.min(img.width()) {
        img.put_pixel(x, y, color);
    }
}

fn vline(img: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    if x >= img.width() {
        return;
    }
    for y in y0..y1.min(img.height()) {
        img.put_pixel(x, y, color);
    }
}

/// Inclusive rectangle, clipped to the canvas.
fn fill_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let max_x = i64::from(img.width()) - 1;
    let max_y = i64::from(img.height()) - 1;
    for y in y0.max(0)..=y1.min(max_y) {
        for x in x0.max(0)..=x1.min(max_x) {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn encode(img: RgbImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| RenderError::encode("png", err))?;
    Ok(bytes)
}
