//! Report format conversion
//!
//! Converts an internal figure into a named file artifact and hands its
//! bytes to the transport layer as an incremental stream. The backing temp
//! file lives exactly as long as whoever holds the [`ConvertedFile`] (or the
//! [`FileStream`] it was turned into) — fully written response or mid-stream
//! client disconnect, the file is unlinked when the owner drops it.

use crate::figure::SensorFigure;
use crate::plot::{draw_chart, StaticPlotRenderer};
use crate::RenderError;
use bytes::Bytes;
use futures::Stream;
use plotters::prelude::*;
use std::io::{Seek, SeekFrom, Write};
use std::pin::Pin;
use std::task::{Context, Poll};
use tempfile::{NamedTempFile, TempPath};
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Supported report output formats. Parsing anything outside this set yields
/// `None`, which the orchestrator turns into a uniform client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Png,
    Svg,
}

impl ReportFormat {
    /// Parse a format name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// A converted report: a named temp-file artifact plus its download name
#[derive(Debug)]
pub struct ConvertedFile {
    filename: String,
    content_type: &'static str,
    size: u64,
    temp: NamedTempFile,
}

impl ConvertedFile {
    /// Download filename, extension included
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hand the artifact to the response writer.
    ///
    /// Ownership of the backing file moves into the returned stream; it is
    /// unlinked when the stream is dropped, which is the transport layer's
    /// job once it finishes (or abandons) writing the response body.
    pub fn into_stream(self) -> std::io::Result<FileStream> {
        let (mut file, path) = self.temp.into_parts();
        file.seek(SeekFrom::Start(0))?;

        Ok(FileStream {
            inner: ReaderStream::new(tokio::fs::File::from_std(file)),
            _path: path,
        })
    }
}

/// Chunked reader over a converted file; unlinks the file on drop
pub struct FileStream {
    inner: ReaderStream<tokio::fs::File>,
    _path: TempPath,
}

impl Stream for FileStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Converts internal figures into downloadable report files
pub struct FormatConverter {
    renderer: StaticPlotRenderer,
    svg_width: u32,
    svg_height: u32,
}

impl FormatConverter {
    pub fn new() -> Self {
        Self {
            renderer: StaticPlotRenderer::new(),
            svg_width: 800,
            svg_height: 480,
        }
    }

    /// Convert the figure into `format`, naming the artifact `stem.<ext>`.
    ///
    /// Returns `Ok(None)` for an unsupported format or a figure with nothing
    /// to draw; the caller decides whether that is an error.
    pub fn convert(
        &self,
        figure: &SensorFigure,
        format: &str,
        stem: &str,
    ) -> Result<Option<ConvertedFile>, RenderError> {
        let Some(format) = ReportFormat::parse(format) else {
            debug!("Unsupported report format: {}", format);
            return Ok(None);
        };

        let bytes = match format {
            ReportFormat::Png => match self.renderer.render(figure)? {
                Some(image) => image.into_bytes(),
                None => return Ok(None),
            },
            ReportFormat::Svg => match self.render_svg(figure)? {
                Some(svg) => svg.into_bytes(),
                None => return Ok(None),
            },
        };

        let mut temp = NamedTempFile::new()?;
        temp.write_all(&bytes)?;
        temp.flush()?;

        Ok(Some(ConvertedFile {
            filename: format!("{}.{}", stem, format.extension()),
            content_type: format.content_type(),
            size: bytes.len() as u64,
            temp,
        }))
    }

    fn render_svg(&self, figure: &SensorFigure) -> Result<Option<String>, RenderError> {
        if figure.plottable().is_empty() {
            return Ok(None);
        }

        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (self.svg_width, self.svg_height))
                    .into_drawing_area();
            draw_chart(figure, &root)?;
        }
        Ok(Some(svg))
    }
}

impl Default for FormatConverter {
    fn default() -> Self {
        Self::new()
    }
}
