//! Report orchestration
//!
//! Composes the store, the static renderer, the figure builder and the
//! format converter into the report operations. All artifacts here are
//! request-scoped; nothing is cached between calls.

use crate::error::ApiError;
use render::{ConvertedFile, FigureDescription, FormatConverter, SensorFigure, StaticPlotRenderer};
use serde::Serialize;
use std::sync::Arc;
use storage::{SensorDataPoint, SensorMetadata, SensorStore, TimeRange, UnitStore};
use tracing::debug;

/// Base URL the composed report link points at. Purely informational; the
/// service never resolves it.
const REPORT_PAGE_URL: &str = "https://example.com/report";

/// Raw metadata + series, as served by the plain data endpoint
#[derive(Debug, Serialize)]
pub struct SensorSummary {
    pub metadata: SensorMetadata,
    pub data: Vec<SensorDataPoint>,
}

/// Composite report response
#[derive(Debug, Serialize)]
pub struct Report {
    pub report_url: String,
    /// PNG data URI, or `null` when the series had nothing to draw
    pub preview_image: Option<String>,
    pub interactive_figure: FigureDescription,
}

/// Orchestrates report generation for one sensor and time range per call
pub struct ReportService {
    sensors: Arc<SensorStore>,
    units: Arc<UnitStore>,
    renderer: StaticPlotRenderer,
    converter: FormatConverter,
}

impl ReportService {
    pub fn new(sensors: Arc<SensorStore>, units: Arc<UnitStore>) -> Self {
        Self {
            sensors,
            units,
            renderer: StaticPlotRenderer::new(),
            converter: FormatConverter::new(),
        }
    }

    fn fetch(
        &self,
        sensor_id: i64,
        range: TimeRange,
    ) -> Result<(SensorMetadata, Vec<SensorDataPoint>), ApiError> {
        let metadata = self.sensors.get_sensor_metadata(sensor_id)?;
        let series = self.sensors.get_sensor_data(sensor_id, range)?;
        Ok((metadata, series))
    }

    fn figure(&self, metadata: &SensorMetadata, series: &[SensorDataPoint]) -> SensorFigure {
        // A dangling unit id degrades to a type-only axis label
        let unit = self.units.get_unit_metadata(metadata.unit_id).ok();
        SensorFigure::from_sensor(metadata, unit.as_ref(), series)
    }

    /// Metadata plus raw series; no rendering
    pub fn summary(&self, sensor_id: i64, range: TimeRange) -> Result<SensorSummary, ApiError> {
        let (metadata, data) = self.fetch(sensor_id, range)?;
        Ok(SensorSummary { metadata, data })
    }

    /// Full report: preview image (when drawable), interactive figure, link.
    ///
    /// A series with nothing to draw is not an error; the report ships with
    /// `preview_image: null`. The rendered image lives only long enough to be
    /// encoded into the data URI.
    pub fn report(&self, sensor_id: i64, range: TimeRange) -> Result<Report, ApiError> {
        let (metadata, series) = self.fetch(sensor_id, range)?;
        let figure = self.figure(&metadata, &series);

        let preview_image = self
            .renderer
            .render(&figure)?
            .map(|image| image.to_data_uri());
        if preview_image.is_none() {
            debug!("Sensor {} produced no preview image", sensor_id);
        }

        Ok(Report {
            report_url: format!("{}?sensor_id={}", REPORT_PAGE_URL, sensor_id),
            preview_image,
            interactive_figure: figure.describe(),
        })
    }

    /// Interactive chart description only; same fetch semantics as `report`
    pub fn interactive(
        &self,
        sensor_id: i64,
        range: TimeRange,
    ) -> Result<FigureDescription, ApiError> {
        let (metadata, series) = self.fetch(sensor_id, range)?;
        Ok(self.figure(&metadata, &series).describe())
    }

    /// Convert the figure into a downloadable file.
    ///
    /// The artifact IS the response here, so a converter that produces
    /// nothing (unsupported format, empty series) is a client-visible
    /// failure. Ownership of the file moves to the caller, who hands it to
    /// the response writer via `into_stream`.
    pub fn download(
        &self,
        sensor_id: i64,
        range: TimeRange,
        format: &str,
    ) -> Result<ConvertedFile, ApiError> {
        let (metadata, series) = self.fetch(sensor_id, range)?;
        let figure = self.figure(&metadata, &series);

        let stem = format!("Report Sensor {}", metadata.sensor_name);
        self.converter
            .convert(&figure, format, &stem)?
            .ok_or(ApiError::ConversionFailed)
    }
}
