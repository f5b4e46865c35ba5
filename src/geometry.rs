//! Drawn primitives: points, segments and labels.
//!
//! Every constructor draws immediately on the canvas it is given and returns
//! an immutable record of what was drawn. Records never reference the canvas.

use crate::canvas::Canvas;
use crate::errors::{Error, Result};
use crate::log::debug;
use crate::style::{LineStyle, NodeStyle, TextStyle};
use crate::types::{Offset, bearing_between};

// ============================================================================
// Point
// ============================================================================

/// A node marker at a fixed position
#[derive(Clone, Debug)]
pub struct Point {
    position: Offset,
    style: NodeStyle,
}

impl Point {
    /// Draw a marker at `position`.
    pub fn create<C: Canvas + ?Sized>(
        canvas: &mut C,
        position: Offset,
        style: &NodeStyle,
    ) -> Result<Self> {
        canvas.draw_marker(position, style)?;
        Ok(Point {
            position,
            style: style.clone(),
        })
    }

    /// Draw a marker at `base + direction`.
    pub fn offset_from<C: Canvas + ?Sized>(
        canvas: &mut C,
        base: &Point,
        direction: Offset,
        style: &NodeStyle,
    ) -> Result<Self> {
        Self::create(canvas, base.position + direction, style)
    }

    /// Draw a marker `distance` away from `base` along `bearing` degrees,
    /// measured counter-clockwise from +x.
    pub fn bind_polar<C: Canvas + ?Sized>(
        canvas: &mut C,
        base: &Point,
        distance: f64,
        bearing: f64,
        style: &NodeStyle,
    ) -> Result<Self> {
        debug!(distance, bearing, "binding point");
        Self::create(canvas, base.position + Offset::polar(distance, bearing), style)
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.position.distance(other.position)
    }

    /// Distance from this point to the infinite line through `segment`.
    pub fn perpendicular_distance_to_line(&self, segment: &Segment) -> Result<f64> {
        if segment.start == segment.end {
            return Err(Error::degenerate(
                "a zero-length segment does not define a line",
            ));
        }
        if segment.is_vertical() {
            return Ok((self.x() - segment.start.x).abs());
        }
        let k = segment.slope()?;
        let b = segment.intercept()?;
        let cos = segment.bearing().to_radians().cos();
        Ok((-k * self.x() + self.y() - b).abs() * cos.abs())
    }
}

impl From<&Point> for Offset {
    fn from(point: &Point) -> Offset {
        point.position
    }
}

// ============================================================================
// Segment
// ============================================================================

/// A straight line between two positions, optionally ending in an arrowhead
#[derive(Clone, Debug)]
pub struct Segment {
    start: Offset,
    end: Offset,
    style: LineStyle,
    arrow: bool,
}

impl Segment {
    /// Draw a line (or an arrow pointing at `end`).
    pub fn create<C: Canvas + ?Sized>(
        canvas: &mut C,
        start: Offset,
        end: Offset,
        style: &LineStyle,
        arrow: bool,
    ) -> Result<Self> {
        if arrow {
            canvas.draw_arrow(start, end, style)?;
        } else {
            canvas.draw_line(start, end, style)?;
        }
        Ok(Segment {
            start,
            end,
            style: style.clone(),
            arrow,
        })
    }

    /// Draw a segment between two existing points.
    pub fn bind_points<C: Canvas + ?Sized>(
        canvas: &mut C,
        from: &Point,
        to: &Point,
        style: &LineStyle,
        arrow: bool,
    ) -> Result<Self> {
        Self::create(canvas, from.position, to.position, style, arrow)
    }

    pub fn start(&self) -> Offset {
        self.start
    }

    pub fn end(&self) -> Offset {
        self.end
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    pub fn has_arrow(&self) -> bool {
        self.arrow
    }

    fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// Direction from start to end in degrees, within `[0, 360)`
    pub fn bearing(&self) -> f64 {
        bearing_between(self.start, self.end)
    }

    pub fn slope(&self) -> Result<f64> {
        if self.is_vertical() {
            return Err(Error::degenerate(format!(
                "slope of vertical segment at x = {}",
                self.start.x
            )));
        }
        Ok((self.start.y - self.end.y) / (self.start.x - self.end.x))
    }

    /// Y-intercept of the line through this segment
    pub fn intercept(&self) -> Result<f64> {
        Ok(self.start.y - self.start.x * self.slope()?)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Offset {
        self.start.midpoint(self.end)
    }

    /// Draw a marker at the midpoint.
    pub fn midpoint_point<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        style: &NodeStyle,
    ) -> Result<Point> {
        Point::create(canvas, self.midpoint(), style)
    }
}

// ============================================================================
// Label
// ============================================================================

/// Text centred on a position
#[derive(Clone, Debug)]
pub struct Label {
    position: Offset,
    text: String,
    style: TextStyle,
}

impl Label {
    /// Draw `text` centred on `position`, rotated by `style.rotation`.
    pub fn create<C: Canvas + ?Sized>(
        canvas: &mut C,
        position: Offset,
        text: impl Into<String>,
        style: &TextStyle,
    ) -> Result<Self> {
        let text = text.into();
        let style = style.with_rotation(style.rotation);
        canvas.draw_text(position, &text, &style)?;
        Ok(Label {
            position,
            text,
            style,
        })
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Rotation actually used, in degrees
    pub fn rotation(&self) -> f64 {
        self.style.rotation
    }
}
