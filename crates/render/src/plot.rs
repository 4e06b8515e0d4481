//! Static chart rasterization

use crate::figure::SensorFigure;
use crate::RenderError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

/// An encoded raster preview of a sensor chart.
///
/// Request-scoped: produced by [`StaticPlotRenderer::render`], encoded to a
/// data URI while still in scope, released on drop.
#[derive(Debug)]
pub struct RenderedImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl RenderedImage {
    /// Encode the image as a `data:image/png;base64,...` URI
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Renders a sensor figure into a PNG raster image
pub struct StaticPlotRenderer {
    width: u32,
    height: u32,
}

impl StaticPlotRenderer {
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 480,
        }
    }

    /// Rasterize the figure.
    ///
    /// Returns `Ok(None)` when the series has no drawable points; an empty
    /// chart is not worth an image and must not be an error.
    pub fn render(&self, figure: &SensorFigure) -> Result<Option<RenderedImage>, RenderError> {
        if figure.plottable().is_empty() {
            debug!("No drawable points, skipping raster render");
            return Ok(None);
        }

        let mut buf = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (self.width, self.height)).into_drawing_area();
            draw_chart(figure, &root)?;
        }

        let img = RgbImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| RenderError::Plot("bitmap buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;

        Ok(Some(RenderedImage {
            png,
            width: self.width,
            height: self.height,
        }))
    }
}

impl Default for StaticPlotRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the chart onto any plotters backend. Shared between the raster
/// renderer and the format converter so every artifact shows the same chart.
pub(crate) fn draw_chart<DB>(
    figure: &SensorFigure,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let points = figure.plottable();
    let (t_min, t_max) = time_span(&points);
    let (v_min, v_max) = value_span(&points);

    root.fill(&WHITE)
        .map_err(|e| RenderError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(root)
        .caption(figure.title(), ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(t_min..t_max, v_min..v_max)
        .map_err(|e| RenderError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .x_labels(6)
        .x_label_formatter(&|t: &DateTime<Utc>| t.format("%m-%d %H:%M").to_string())
        .y_desc(figure.y_label())
        .draw()
        .map_err(|e| RenderError::Plot(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(|e| RenderError::Plot(e.to_string()))?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(t, v)| Circle::new((t, v), 3, BLUE.filled())),
        )
        .map_err(|e| RenderError::Plot(e.to_string()))?;

    root.present().map_err(|e| RenderError::Plot(e.to_string()))
}

/// Horizontal axis span, widened so a single-point series still has extent
fn time_span(points: &[(DateTime<Utc>, f64)]) -> (DateTime<Utc>, DateTime<Utc>) {
    let t_min = points.iter().map(|p| p.0).min().unwrap_or_else(Utc::now);
    let mut t_max = points.iter().map(|p| p.0).max().unwrap_or(t_min);
    if t_min == t_max {
        t_max += Duration::seconds(1);
    }
    (t_min, t_max)
}

/// Vertical axis span with 5% headroom
fn value_span(points: &[(DateTime<Utc>, f64)]) -> (f64, f64) {
    let v_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let v_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if v_min == v_max {
        return (v_min - 1.0, v_max + 1.0);
    }
    let pad = (v_max - v_min) * 0.05;
    (v_min - pad, v_max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use storage::{SensorDataPoint, SensorMetadata};

    fn figure_with(values: &[Option<f64>]) -> SensorFigure {
        let metadata = SensorMetadata {
            sensor_id: 7,
            sensor_name: "Boiler".to_string(),
            sensor_type: "temperature".to_string(),
            location: "plant".to_string(),
            unit_id: 1,
        };
        let series: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| SensorDataPoint {
                timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, i as u32, 0).unwrap(),
                value: *v,
            })
            .collect();
        SensorFigure::from_sensor(&metadata, None, &series)
    }

    #[test]
    fn test_empty_series_renders_to_none() {
        let renderer = StaticPlotRenderer::new();
        assert!(renderer.render(&figure_with(&[])).unwrap().is_none());
        // All-missing series has nothing to draw either
        assert!(renderer.render(&figure_with(&[None, None])).unwrap().is_none());
    }

    #[test]
    fn test_render_produces_png_data_uri() {
        let renderer = StaticPlotRenderer::new();
        let image = renderer
            .render(&figure_with(&[Some(1.0), Some(2.0), None]))
            .unwrap()
            .expect("image");

        assert_eq!(&image.as_bytes()[..8], b"\x89PNG\r\n\x1a\n");
        assert!(image.to_data_uri().starts_with("data:image/png;base64,"));
        assert_eq!(image.width(), 800);
        assert_eq!(image.height(), 480);
    }

    #[test]
    fn test_single_point_series_renders() {
        let renderer = StaticPlotRenderer::new();
        let image = renderer.render(&figure_with(&[Some(3.5)])).unwrap();
        assert!(image.is_some());
    }

    #[test]
    fn test_flat_series_renders() {
        let renderer = StaticPlotRenderer::new();
        let image = renderer
            .render(&figure_with(&[Some(2.0), Some(2.0), Some(2.0)]))
            .unwrap();
        assert!(image.is_some());
    }
}
