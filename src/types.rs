//! Value types shared by every layer: offsets, bearings, colors and bounds.
//!
//! Angles cross the public API in degrees, measured counter-clockwise from
//! the positive x-axis. Radians only appear inside the trig calls.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use glam::DVec2;

use crate::errors::StyleError;

/// A 2-D displacement, also used for absolute positions relative to the
/// scene origin.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Offset { x, y }
    }

    /// The offset reached by travelling `distance` along `bearing` degrees.
    pub fn polar(distance: f64, bearing: f64) -> Self {
        let (sin, cos) = bearing.to_radians().sin_cos();
        Offset {
            x: distance * cos,
            y: distance * sin,
        }
    }

    /// Euclidean norm
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another offset
    #[inline]
    pub fn distance(self, other: Offset) -> f64 {
        (self - other).length()
    }

    /// Average of two offsets
    pub fn midpoint(self, other: Offset) -> Offset {
        Offset {
            x: self.x / 2.0 + other.x / 2.0,
            y: self.y / 2.0 + other.y / 2.0,
        }
    }

    /// Check if both components are finite (not NaN or infinite)
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(self, other: Offset, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Offset {
    fn from(v: DVec2) -> Self {
        Offset { x: v.x, y: v.y }
    }
}

impl From<(f64, f64)> for Offset {
    fn from((x, y): (f64, f64)) -> Self {
        Offset { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;
    fn add(self, rhs: Offset) -> Offset {
        Offset {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// Scalar addition broadcasts to both components.
impl Add<f64> for Offset {
    type Output = Offset;
    fn add(self, rhs: f64) -> Offset {
        Offset {
            x: self.x + rhs,
            y: self.y + rhs,
        }
    }
}

impl Sub for Offset {
    type Output = Offset;
    fn sub(self, rhs: Offset) -> Offset {
        Offset {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Scalar subtraction broadcasts to both components.
impl Sub<f64> for Offset {
    type Output = Offset;
    fn sub(self, rhs: f64) -> Offset {
        Offset {
            x: self.x - rhs,
            y: self.y - rhs,
        }
    }
}

impl Mul<f64> for Offset {
    type Output = Offset;
    fn mul(self, rhs: f64) -> Offset {
        Offset {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Neg for Offset {
    type Output = Offset;
    fn neg(self) -> Offset {
        Offset {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl AddAssign for Offset {
    fn add_assign(&mut self, rhs: Offset) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Offset {
    fn sub_assign(&mut self, rhs: Offset) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Bearing of the direction `from -> to`, in degrees within `[0, 360)`.
pub fn bearing_between(from: Offset, to: Offset) -> f64 {
    normalize_degrees((to.y - from.y).atan2(to.x - from.x).to_degrees())
}

// ============================================================================
// Color
// ============================================================================

/// Color specification passed through to the rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, u8),
}

impl Color {
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const RED: Color = Color::Rgb(255, 0, 0);

    /// Shorthand for a named color, e.g. `Color::named("cyan")`.
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into().to_ascii_lowercase())
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(s) => write!(f, "{}", s),
            Color::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
            Color::Rgba(r, g, b, a) => {
                let alpha = (*a as f64 / 255.0 * 1000.0).round() / 1000.0;
                write!(f, "rgba({},{},{},{})", r, g, b, alpha)
            }
        }
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || StyleError::InvalidColor { value: s.to_string() };

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            let nibble = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .map(|v| v * 17)
                    .map_err(|_| invalid())
            };
            return match hex.len() {
                3 => Ok(Color::Rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
                6 => Ok(Color::Rgb(byte(0)?, byte(2)?, byte(4)?)),
                8 => Ok(Color::Rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
                _ => Err(invalid()),
            };
        }

        // Single-letter shorthands
        let name = match trimmed {
            "k" => "black",
            "w" => "white",
            "r" => "red",
            "g" => "green",
            "b" => "blue",
            "c" => "cyan",
            "m" => "magenta",
            "y" => "yellow",
            other => other,
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        Ok(Color::named(name))
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounding box in scene coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Offset,
    pub max: Offset,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Offset::new(f64::MAX, f64::MAX),
            max: Offset::new(f64::MIN, f64::MIN),
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point. Non-finite points are skipped.
    pub fn expand_point(&mut self, p: Offset) {
        if !p.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Offset {
        self.min.midpoint(self.max)
    }
}
