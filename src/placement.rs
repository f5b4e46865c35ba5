//! Label placement next to segments and points.
//!
//! Segment labels sit above the segment's midpoint, shifted straight up by
//! the gap. The shift does not follow the segment's normal, so a label on a
//! steep segment ends up beside it rather than across from it.

use crate::canvas::Canvas;
use crate::defaults;
use crate::errors::Result;
use crate::geometry::{Label, Point, Segment};
use crate::style::TextStyle;
use crate::types::{Offset, bearing_between};

/// Gap used when the caller gives none: `(anchor size + text size) * 0.05`
pub fn default_gap(anchor_size: f64, text_size: f64) -> f64 {
    (anchor_size + text_size) * defaults::GAP_FACTOR
}

/// Fixed-point rendering of a measured length.
pub fn format_measurement(value: f64, decimal_digits: usize) -> String {
    format!("{:.*}", decimal_digits, value)
}

/// How length and distance labels are written
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeasureOptions {
    /// Digits after the decimal point
    pub decimal_digits: usize,
    /// Rotate the label to run along the measured direction
    pub parallel: bool,
}

impl MeasureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decimal_digits(mut self, digits: usize) -> Self {
        self.decimal_digits = digits;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

fn above_midpoint(a: Offset, b: Offset, gap: f64) -> Offset {
    let mid = a.midpoint(b);
    Offset::new(mid.x, mid.y + gap)
}

impl Label {
    /// Label `segment` with `text`, rotated to the segment's bearing.
    pub fn parallel_to<C: Canvas + ?Sized>(
        canvas: &mut C,
        segment: &Segment,
        text: impl Into<String>,
        gap: Option<f64>,
        style: &TextStyle,
    ) -> Result<Label> {
        let gap = gap.unwrap_or_else(|| default_gap(segment.style().size, style.size));
        let position = above_midpoint(segment.start(), segment.end(), gap);
        Label::create(canvas, position, text, &style.with_rotation(segment.bearing()))
    }

    /// Label `segment` with its own length.
    pub fn showing_length<C: Canvas + ?Sized>(
        canvas: &mut C,
        segment: &Segment,
        gap: Option<f64>,
        style: &TextStyle,
        options: MeasureOptions,
    ) -> Result<Label> {
        let gap = gap.unwrap_or_else(|| default_gap(segment.style().size, style.size));
        let position = above_midpoint(segment.start(), segment.end(), gap);
        let text = format_measurement(segment.length(), options.decimal_digits);
        if options.parallel {
            Label::create(canvas, position, text, &style.with_rotation(segment.bearing()))
        } else {
            Label::create(canvas, position, text, style)
        }
    }

    /// Label the gap between two points with their distance.
    pub fn showing_distance<C: Canvas + ?Sized>(
        canvas: &mut C,
        a: &Point,
        b: &Point,
        gap: Option<f64>,
        style: &TextStyle,
        options: MeasureOptions,
    ) -> Result<Label> {
        let gap = gap.unwrap_or_else(|| default_gap(a.style().size, style.size));
        let position = above_midpoint(a.position(), b.position(), gap);
        let text = format_measurement(a.distance_to(b), options.decimal_digits);
        if options.parallel {
            let bearing = bearing_between(a.position(), b.position());
            Label::create(canvas, position, text, &style.with_rotation(bearing))
        } else {
            Label::create(canvas, position, text, style)
        }
    }

    /// Put `text` beside `point`, `gap` away along `bearing` degrees.
    pub fn near_point<C: Canvas + ?Sized>(
        canvas: &mut C,
        point: &Point,
        text: impl Into<String>,
        bearing: f64,
        gap: Option<f64>,
        style: &TextStyle,
    ) -> Result<Label> {
        let gap = gap.unwrap_or_else(|| default_gap(point.style().size, style.size));
        let position = point.position() + Offset::polar(gap, bearing);
        Label::create(canvas, position, text, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::style::{LineStyle, NodeStyle};

    fn segment(canvas: &mut RecordingCanvas, a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::create(canvas, a.into(), b.into(), &LineStyle::default(), false).unwrap()
    }

    #[test]
    fn measurement_rounds_to_digits() {
        assert_eq!(format_measurement(4.999, 0), "5");
        assert_eq!(format_measurement(4.999, 2), "5.00");
        assert_eq!(format_measurement(2.0, 1), "2.0");
    }

    #[test]
    fn default_gap_scales_sizes() {
        assert!((default_gap(2.0, 16.0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn parallel_label_sits_above_midpoint() {
        let mut canvas = RecordingCanvas::new();
        let s = segment(&mut canvas, (0.0, 0.0), (4.0, 4.0));
        let style = TextStyle::default();
        let label = Label::parallel_to(&mut canvas, &s, "x", None, &style).unwrap();

        assert!(label.position().approx_eq(Offset::new(2.0, 2.9), 1e-12));
        assert!((label.rotation() - 45.0).abs() < 1e-9);
        // The caller's style is left untouched
        assert_eq!(style.rotation, 0.0);
    }

    #[test]
    fn zero_gap_is_honoured() {
        let mut canvas = RecordingCanvas::new();
        let s = segment(&mut canvas, (0.0, 0.0), (2.0, 0.0));
        let label = Label::parallel_to(&mut canvas, &s, "x", Some(0.0), &TextStyle::default())
            .unwrap();
        assert_eq!(label.position(), Offset::new(1.0, 0.0));
    }

    #[test]
    fn vertical_segment_label_is_shifted_along_the_segment() {
        let mut canvas = RecordingCanvas::new();
        let s = segment(&mut canvas, (0.0, 0.0), (0.0, 2.0));
        let label = Label::parallel_to(&mut canvas, &s, "x", Some(0.5), &TextStyle::default())
            .unwrap();
        assert_eq!(label.position(), Offset::new(0.0, 1.5));
        assert!((label.rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn length_label_rotates_only_when_parallel() {
        let mut canvas = RecordingCanvas::new();
        let s = segment(&mut canvas, (0.0, 0.0), (0.0, 4.999));
        let style = TextStyle::default();

        let flat = Label::showing_length(&mut canvas, &s, None, &style, MeasureOptions::new())
            .unwrap();
        assert_eq!(flat.text(), "5");
        assert_eq!(flat.rotation(), 0.0);

        let options = MeasureOptions::new().with_decimal_digits(2).with_parallel(true);
        let along = Label::showing_length(&mut canvas, &s, None, &style, options).unwrap();
        assert_eq!(along.text(), "5.00");
        assert!((along.rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn distance_label_uses_first_point_size_for_gap() {
        let mut canvas = RecordingCanvas::new();
        let big = NodeStyle::default().with_size(14.0);
        let a = Point::create(&mut canvas, Offset::new(0.0, 0.0), &big).unwrap();
        let b = Point::create(&mut canvas, Offset::new(-3.0, -4.0), &NodeStyle::default()).unwrap();

        let options = MeasureOptions::new().with_parallel(true);
        let label =
            Label::showing_distance(&mut canvas, &a, &b, None, &TextStyle::default(), options)
                .unwrap();
        assert_eq!(label.text(), "5");
        // (14 + 16) * 0.05
        assert!(label.position().approx_eq(Offset::new(-1.5, -0.5), 1e-12));
        assert!((0.0..360.0).contains(&label.rotation()));
        assert!((label.rotation() - 233.130_102_354_155_98).abs() < 1e-9);
    }

    #[test]
    fn near_point_follows_bearing() {
        let mut canvas = RecordingCanvas::new();
        let p = Point::create(&mut canvas, Offset::new(1.0, 1.0), &NodeStyle::default()).unwrap();
        let style = TextStyle::default();

        let east = Label::near_point(&mut canvas, &p, "A", 0.0, Some(0.5), &style).unwrap();
        assert!(east.position().approx_eq(Offset::new(1.5, 1.0), 1e-12));

        let north = Label::near_point(&mut canvas, &p, "B", 90.0, None, &style).unwrap();
        // (5 + 16) * 0.05
        assert!(north.position().approx_eq(Offset::new(1.0, 2.05), 1e-12));
    }
}
