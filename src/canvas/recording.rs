//! In-memory backend that records every draw call.
//!
//! Useful for tests and for callers that want the drawn primitives as data
//! rather than as an image.

use std::fmt;
use std::path::{Path, PathBuf};

use super::{Canvas, CanvasSetup, ExportOptions, ImageFormat};
use crate::errors::RenderError;
use crate::style::{LineStyle, NodeStyle, TextStyle};
use crate::types::Offset;

/// One side effect performed on a [`RecordingCanvas`]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Marker {
        at: Offset,
        style: NodeStyle,
    },
    Line {
        from: Offset,
        to: Offset,
        style: LineStyle,
    },
    Arrow {
        from: Offset,
        to: Offset,
        style: LineStyle,
    },
    Text {
        at: Offset,
        text: String,
        style: TextStyle,
    },
}

impl DrawCall {
    pub fn is_marker(&self) -> bool {
        matches!(self, DrawCall::Marker { .. })
    }

    /// Lines and arrows
    pub fn is_segment(&self) -> bool {
        matches!(self, DrawCall::Line { .. } | DrawCall::Arrow { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DrawCall::Text { .. })
    }
}

/// Format a coordinate with at most 6 decimals, trailing zeros trimmed.
fn fmt_coord(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn fmt_offset(o: Offset) -> String {
    format!("({}, {})", fmt_coord(o.x), fmt_coord(o.y))
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCall::Marker { at, style } => write!(
                f,
                "marker {} {} size={} color={}",
                fmt_offset(*at),
                style.shape,
                fmt_coord(style.size),
                style.color
            ),
            DrawCall::Line { from, to, style } => write!(
                f,
                "line {} -> {} {} size={} color={}",
                fmt_offset(*from),
                fmt_offset(*to),
                style.dash,
                fmt_coord(style.size),
                style.color
            ),
            DrawCall::Arrow { from, to, style } => write!(
                f,
                "arrow {} -> {} {} size={} color={}",
                fmt_offset(*from),
                fmt_offset(*to),
                style.dash,
                fmt_coord(style.size),
                style.color
            ),
            DrawCall::Text { at, text, style } => write!(
                f,
                "text {:?} at {} rot={} size={} color={}",
                text,
                fmt_offset(*at),
                fmt_coord(style.rotation),
                fmt_coord(style.size),
                style.color
            ),
        }
    }
}

/// Backend that keeps a log of what was drawn
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
    setup: Option<CanvasSetup>,
    saved: Vec<(PathBuf, ImageFormat)>,
    shown: usize,
    /// Number of draws allowed before every further draw fails
    fail_after: Option<usize>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas whose draws start failing once `draws` calls have succeeded.
    pub fn failing_after(draws: usize) -> Self {
        Self {
            fail_after: Some(draws),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Settings received through [`Canvas::setup`], if any
    pub fn recorded_setup(&self) -> Option<&CanvasSetup> {
        self.setup.as_ref()
    }

    pub fn saved(&self) -> &[(PathBuf, ImageFormat)] {
        &self.saved
    }

    pub fn times_shown(&self) -> usize {
        self.shown
    }

    pub fn markers(&self) -> usize {
        self.calls.iter().filter(|c| c.is_marker()).count()
    }

    pub fn segments(&self) -> usize {
        self.calls.iter().filter(|c| c.is_segment()).count()
    }

    pub fn texts(&self) -> usize {
        self.calls.iter().filter(|c| c.is_text()).count()
    }

    fn record(&mut self, call: DrawCall) -> Result<(), RenderError> {
        if let Some(limit) = self.fail_after {
            if self.calls.len() >= limit {
                return Err(RenderError::Backend {
                    message: format!("draw limit of {} reached", limit),
                });
            }
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn setup(&mut self, setup: &CanvasSetup) -> Result<(), RenderError> {
        self.setup = Some(setup.clone());
        Ok(())
    }

    fn draw_marker(&mut self, at: Offset, style: &NodeStyle) -> Result<(), RenderError> {
        self.record(DrawCall::Marker {
            at,
            style: style.clone(),
        })
    }

    fn draw_line(&mut self, from: Offset, to: Offset, style: &LineStyle) -> Result<(), RenderError> {
        self.record(DrawCall::Line {
            from,
            to,
            style: style.clone(),
        })
    }

    fn draw_arrow(
        &mut self,
        from: Offset,
        to: Offset,
        style: &LineStyle,
    ) -> Result<(), RenderError> {
        self.record(DrawCall::Arrow {
            from,
            to,
            style: style.clone(),
        })
    }

    fn draw_text(&mut self, at: Offset, text: &str, style: &TextStyle) -> Result<(), RenderError> {
        self.record(DrawCall::Text {
            at,
            text: text.to_string(),
            style: style.clone(),
        })
    }

    fn save_to_file(
        &mut self,
        path: &Path,
        format: ImageFormat,
        _options: &ExportOptions,
    ) -> Result<(), RenderError> {
        self.saved.push((path.to_path_buf(), format));
        Ok(())
    }

    fn show(&mut self) -> Result<(), RenderError> {
        self.shown += 1;
        Ok(())
    }
}

impl fmt::Display for RecordingCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for call in &self.calls {
            writeln!(f, "{}", call)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_marker(Offset::new(0.0, 0.0), &NodeStyle::default()).unwrap();
        canvas
            .draw_arrow(Offset::new(0.0, 0.0), Offset::new(1.0, 0.0), &LineStyle::default())
            .unwrap();
        canvas
            .draw_text(Offset::new(0.5, 0.9), "1", &TextStyle::default())
            .unwrap();

        assert_eq!(canvas.calls().len(), 3);
        assert_eq!((canvas.markers(), canvas.segments(), canvas.texts()), (1, 1, 1));
        assert_eq!(
            canvas.to_string(),
            "marker (0, 0) o size=5 color=rgb(0,0,0)\n\
             arrow (0, 0) -> (1, 0) solid size=2 color=rgb(0,0,0)\n\
             text \"1\" at (0.5, 0.9) rot=0 size=16 color=rgb(0,0,0)\n"
        );
    }

    #[test]
    fn fails_after_limit() {
        let mut canvas = RecordingCanvas::failing_after(1);
        let style = NodeStyle::default();
        assert!(canvas.draw_marker(Offset::ZERO, &style).is_ok());
        assert!(matches!(
            canvas.draw_marker(Offset::ZERO, &style),
            Err(RenderError::Backend { .. })
        ));
        assert_eq!(canvas.calls().len(), 1);
    }

    #[test]
    fn coordinates_are_trimmed() {
        assert_eq!(fmt_coord(1.2246467991473532e-16), "0");
        assert_eq!(fmt_coord(-1e-9), "0");
        assert_eq!(fmt_coord(2.5), "2.5");
        assert_eq!(fmt_coord(-3.0), "-3");
    }

    #[test]
    fn save_and_show_are_recorded() {
        let mut canvas = RecordingCanvas::new();
        canvas
            .save_to_file(Path::new("out.png"), ImageFormat::Png, &ExportOptions::default())
            .unwrap();
        canvas.show().unwrap();
        assert_eq!(canvas.saved(), &[(PathBuf::from("out.png"), ImageFormat::Png)]);
        assert_eq!(canvas.times_shown(), 1);
    }
}
