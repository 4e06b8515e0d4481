//! Rendering Layer
//!
//! Turns a sensor series into derived artifacts: a static raster preview,
//! an interactive chart description, and a downloadable report file.

mod convert;
mod figure;
mod plot;

pub use convert::{ConvertedFile, FileStream, FormatConverter, ReportFormat};
pub use figure::{AxisSpec, FigureDescription, FigureLayout, ScatterTrace, SensorFigure};
pub use plot::{RenderedImage, StaticPlotRenderer};

use thiserror::Error;

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// The plotting backend refused to draw the chart
    #[error("Plot rendering failed: {0}")]
    Plot(String),

    /// PNG encoding failed
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Temp-file or stream I/O failed
    #[error("Artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
