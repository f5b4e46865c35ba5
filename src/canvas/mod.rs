//! Rendering backends
//!
//! The geometry layer never draws by itself; every primitive calls into a
//! [`Canvas`] passed explicitly by the caller. This module is organized into:
//! - `recording`: an in-memory backend that keeps a log of draw calls
//! - `svg`: an SVG document backend, with optional PNG export
//! - `png`: SVG rasterization via resvg (feature `png`)

pub mod recording;
pub mod svg;

#[cfg(feature = "png")]
pub mod png;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use recording::{DrawCall, RecordingCanvas};
pub use svg::SvgCanvas;

use crate::defaults;
use crate::errors::RenderError;
use crate::style::{LineStyle, NodeStyle, TextStyle};
use crate::types::{Color, Offset};

/// Drawing surface a scene renders into.
///
/// Calls are synchronous and happen in the order the caller makes them.
/// A failed draw is reported immediately; nothing is retried or rolled back.
pub trait Canvas {
    /// Apply figure-level settings. Called once by a scene before any drawing.
    fn setup(&mut self, setup: &CanvasSetup) -> Result<(), RenderError> {
        let _ = setup;
        Ok(())
    }

    /// Draw a node marker centred on `at`.
    fn draw_marker(&mut self, at: Offset, style: &NodeStyle) -> Result<(), RenderError>;

    /// Draw a plain segment.
    fn draw_line(&mut self, from: Offset, to: Offset, style: &LineStyle) -> Result<(), RenderError>;

    /// Draw a segment with an arrowhead at `to`.
    fn draw_arrow(&mut self, from: Offset, to: Offset, style: &LineStyle)
    -> Result<(), RenderError>;

    /// Draw text centred both ways on `at`, rotated counter-clockwise by
    /// `style.rotation` degrees.
    fn draw_text(&mut self, at: Offset, text: &str, style: &TextStyle) -> Result<(), RenderError>;

    /// Export everything drawn so far.
    fn save_to_file(
        &mut self,
        path: &Path,
        format: ImageFormat,
        options: &ExportOptions,
    ) -> Result<(), RenderError>;

    /// Present the drawing to the user.
    fn show(&mut self) -> Result<(), RenderError>;
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn setup(&mut self, setup: &CanvasSetup) -> Result<(), RenderError> {
        (**self).setup(setup)
    }

    fn draw_marker(&mut self, at: Offset, style: &NodeStyle) -> Result<(), RenderError> {
        (**self).draw_marker(at, style)
    }

    fn draw_line(&mut self, from: Offset, to: Offset, style: &LineStyle) -> Result<(), RenderError> {
        (**self).draw_line(from, to, style)
    }

    fn draw_arrow(
        &mut self,
        from: Offset,
        to: Offset,
        style: &LineStyle,
    ) -> Result<(), RenderError> {
        (**self).draw_arrow(from, to, style)
    }

    fn draw_text(&mut self, at: Offset, text: &str, style: &TextStyle) -> Result<(), RenderError> {
        (**self).draw_text(at, text, style)
    }

    fn save_to_file(
        &mut self,
        path: &Path,
        format: ImageFormat,
        options: &ExportOptions,
    ) -> Result<(), RenderError> {
        (**self).save_to_file(path, format, options)
    }

    fn show(&mut self) -> Result<(), RenderError> {
        (**self).show()
    }
}

/// Title drawn above the diagram
#[derive(Clone, Debug, PartialEq)]
pub struct Title {
    pub text: String,
    /// Font size in points
    pub size: f64,
    pub color: Color,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: defaults::TITLE_SIZE,
            color: Color::BLACK,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Figure-level settings handed to [`Canvas::setup`]
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasSetup {
    /// Half of the square figure's side, in inches
    pub half_size: f64,
    pub title: Option<Title>,
    /// Keep one data unit the same length on both axes
    pub equal_aspect: bool,
    pub hide_axes: bool,
    pub background: Color,
}

impl Default for CanvasSetup {
    fn default() -> Self {
        Self {
            half_size: defaults::HALF_SIZE,
            title: None,
            equal_aspect: true,
            hide_axes: true,
            background: Color::WHITE,
        }
    }
}

/// Output format of [`Canvas::save_to_file`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(RenderError::UnsupportedFormat {
                format: other.to_string(),
                hint: Some("supported formats are svg and png".to_string()),
            }),
        }
    }
}

/// Options forwarded to image export
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportOptions {
    /// Target raster width in pixels; the height follows the aspect ratio.
    pub width: Option<u32>,
    /// Leave the background transparent instead of filling it.
    pub transparent: bool,
}

impl ExportOptions {
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }
}
