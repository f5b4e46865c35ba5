//! Immutable style records for nodes, segments and labels.
//!
//! Styles are plain values. Operations that need a different rotation build
//! a new record with [`TextStyle::with_rotation`]; shared defaults are never
//! modified in place.

use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::errors::StyleError;
use crate::types::{Color, normalize_degrees};

/// Marker drawn at a node position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Diamond,
    ThinDiamond,
    Star,
    Pentagon,
    Hexagon,
    Plus,
    Cross,
}

impl MarkerShape {
    /// Short code of this marker (`o`, `s`, `^`, ...)
    pub fn code(self) -> &'static str {
        match self {
            MarkerShape::Circle => "o",
            MarkerShape::Square => "s",
            MarkerShape::TriangleUp => "^",
            MarkerShape::TriangleDown => "v",
            MarkerShape::TriangleLeft => "<",
            MarkerShape::TriangleRight => ">",
            MarkerShape::Diamond => "D",
            MarkerShape::ThinDiamond => "d",
            MarkerShape::Star => "*",
            MarkerShape::Pentagon => "p",
            MarkerShape::Hexagon => "h",
            MarkerShape::Plus => "+",
            MarkerShape::Cross => "x",
        }
    }

    /// Whether the marker is drawn with strokes rather than a filled outline
    pub fn is_stroked(self) -> bool {
        matches!(self, MarkerShape::Plus | MarkerShape::Cross)
    }
}

impl FromStr for MarkerShape {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let shape = match s.trim() {
            "o" | "circle" => MarkerShape::Circle,
            "s" | "square" => MarkerShape::Square,
            "^" | "triangle_up" => MarkerShape::TriangleUp,
            "v" | "triangle_down" => MarkerShape::TriangleDown,
            "<" | "triangle_left" => MarkerShape::TriangleLeft,
            ">" | "triangle_right" => MarkerShape::TriangleRight,
            "D" | "diamond" => MarkerShape::Diamond,
            "d" | "thin_diamond" => MarkerShape::ThinDiamond,
            "*" | "star" => MarkerShape::Star,
            "p" | "pentagon" => MarkerShape::Pentagon,
            "h" | "H" | "hexagon" => MarkerShape::Hexagon,
            "+" | "P" | "plus" => MarkerShape::Plus,
            "x" | "X" | "cross" => MarkerShape::Cross,
            other => {
                return Err(StyleError::UnknownMarker {
                    code: other.to_string(),
                });
            }
        };
        Ok(shape)
    }
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Dash pattern of a segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineDash {
    pub fn code(self) -> &'static str {
        match self {
            LineDash::Solid => "-",
            LineDash::Dashed => "--",
            LineDash::Dotted => ":",
            LineDash::DashDot => "-.",
        }
    }

    /// On/off lengths in multiples of the line width; `None` for solid lines.
    pub fn pattern(self) -> Option<&'static [f64]> {
        match self {
            LineDash::Solid => None,
            LineDash::Dashed => Some(&[3.7, 1.6][..]),
            LineDash::Dotted => Some(&[1.0, 1.65][..]),
            LineDash::DashDot => Some(&[6.4, 1.6, 1.0, 1.6][..]),
        }
    }
}

impl FromStr for LineDash {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "solid" => Ok(LineDash::Solid),
            "--" | "dashed" => Ok(LineDash::Dashed),
            ":" | "dotted" => Ok(LineDash::Dotted),
            "-." | "dashdot" => Ok(LineDash::DashDot),
            other => Err(StyleError::UnknownDash {
                code: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LineDash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineDash::Solid => "solid",
            LineDash::Dashed => "dashed",
            LineDash::Dotted => "dotted",
            LineDash::DashDot => "dashdot",
        };
        f.write_str(name)
    }
}

/// Font slant of a label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontSlant {
    pub fn as_css(self) -> &'static str {
        match self {
            FontSlant::Normal => "normal",
            FontSlant::Italic => "italic",
            FontSlant::Oblique => "oblique",
        }
    }
}

impl FromStr for FontSlant {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "normal" => Ok(FontSlant::Normal),
            "italic" => Ok(FontSlant::Italic),
            "oblique" => Ok(FontSlant::Oblique),
            other => Err(StyleError::UnknownSlant {
                code: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FontSlant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

// ============================================================================
// Style records
// ============================================================================

/// Style of a node marker
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
    pub shape: MarkerShape,
    /// Marker size in points
    pub size: f64,
    pub color: Color,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            size: defaults::NODE_SIZE,
            color: Color::BLACK,
        }
    }
}

impl NodeStyle {
    /// Style of the origin marker drawn by a scene
    pub fn origin() -> Self {
        Self {
            shape: MarkerShape::Circle,
            size: defaults::ORIGIN_SIZE,
            color: Color::RED,
        }
    }

    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.shape = shape;
        self
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

/// Style of a segment
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub dash: LineDash,
    /// Stroke width in points
    pub size: f64,
    pub color: Color,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            dash: LineDash::Solid,
            size: defaults::LINE_SIZE,
            color: Color::BLACK,
        }
    }
}

impl LineStyle {
    pub fn with_dash(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
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

/// Style of a label
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub slant: FontSlant,
    /// Font size in points
    pub size: f64,
    pub color: Color,
    pub family: String,
    /// Counter-clockwise rotation in degrees, within `[0, 360)`
    pub rotation: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            slant: FontSlant::Normal,
            size: defaults::TEXT_SIZE,
            color: Color::BLACK,
            family: defaults::FONT_FAMILY.to_string(),
            rotation: defaults::TEXT_ROTATION,
        }
    }
}

impl TextStyle {
    pub fn with_slant(mut self, slant: FontSlant) -> Self {
        self.slant = slant;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// A copy of this style rotated to `degrees` (normalized to `[0, 360)`).
    pub fn with_rotation(&self, degrees: f64) -> Self {
        Self {
            rotation: normalize_degrees(degrees),
            ..self.clone()
        }
    }
}

/// The default node, line and text styles a scene falls back to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneStyles {
    pub node: NodeStyle,
    pub line: LineStyle,
    pub text: TextStyle,
}

// ============================================================================
// Loosely specified options
// ============================================================================

/// Partially specified style, resolved against the per-kind defaults.
///
/// `style` is the marker code for nodes, the dash code for lines and the
/// slant for text. `family` and `rotation` only apply to text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleOptions {
    pub style: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
    pub family: Option<String>,
    pub rotation: Option<f64>,
}

impl StyleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, code: impl Into<String>) -> Self {
        self.style = Some(code.into());
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    fn resolve_size(&self, kind: &'static str, default: f64) -> Result<f64, StyleError> {
        match self.size {
            None => Ok(default),
            Some(value) if value.is_finite() && value > 0.0 => Ok(value),
            Some(value) => Err(StyleError::InvalidSize { kind, value }),
        }
    }

    fn resolve_color(&self) -> Result<Color, StyleError> {
        self.color
            .as_deref()
            .map(str::parse::<Color>)
            .transpose()
            .map(|c| c.unwrap_or_default())
    }

    /// Resolve as a node style (defaults: circle, 5, black).
    pub fn node(&self) -> Result<NodeStyle, StyleError> {
        Ok(NodeStyle {
            shape: self
                .style
                .as_deref()
                .map(str::parse::<MarkerShape>)
                .transpose()?
                .unwrap_or_default(),
            size: self.resolve_size("node", defaults::NODE_SIZE)?,
            color: self.resolve_color()?,
        })
    }

    /// Resolve as a line style (defaults: solid, 2, black).
    pub fn line(&self) -> Result<LineStyle, StyleError> {
        Ok(LineStyle {
            dash: self
                .style
                .as_deref()
                .map(str::parse::<LineDash>)
                .transpose()?
                .unwrap_or_default(),
            size: self.resolve_size("line", defaults::LINE_SIZE)?,
            color: self.resolve_color()?,
        })
    }

    /// Resolve as a text style (defaults: normal, 16, black, sans-serif, 0°).
    pub fn text(&self) -> Result<TextStyle, StyleError> {
        Ok(TextStyle {
            slant: self
                .style
                .as_deref()
                .map(str::parse::<FontSlant>)
                .transpose()?
                .unwrap_or_default(),
            size: self.resolve_size("text", defaults::TEXT_SIZE)?,
            color: self.resolve_color()?,
            family: self
                .family
                .clone()
                .unwrap_or_else(|| defaults::FONT_FAMILY.to_string()),
            rotation: normalize_degrees(self.rotation.unwrap_or(defaults::TEXT_ROTATION)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_kind_defaults() {
        let node = NodeStyle::default();
        assert_eq!((node.shape, node.size, &node.color), (MarkerShape::Circle, 5.0, &Color::BLACK));

        let line = LineStyle::default();
        assert_eq!((line.dash, line.size, &line.color), (LineDash::Solid, 2.0, &Color::BLACK));

        let text = TextStyle::default();
        assert_eq!(text.slant, FontSlant::Normal);
        assert_eq!(text.size, 16.0);
        assert_eq!(text.family, "sans-serif");
        assert_eq!(text.rotation, 0.0);
    }

    #[test]
    fn empty_options_resolve_to_defaults() {
        let opts = StyleOptions::new();
        assert_eq!(opts.node(), Ok(NodeStyle::default()));
        assert_eq!(opts.line(), Ok(LineStyle::default()));
        assert_eq!(opts.text(), Ok(TextStyle::default()));
    }

    #[test]
    fn options_fill_only_unset_fields() {
        let node = StyleOptions::new().style("^").size(12.0).color("red").node().unwrap();
        assert_eq!(node.shape, MarkerShape::TriangleUp);
        assert_eq!(node.size, 12.0);
        assert_eq!(node.color, Color::named("red"));

        let line = StyleOptions::new().style("--").color("grey").line().unwrap();
        assert_eq!(line.dash, LineDash::Dashed);
        assert_eq!(line.size, 2.0);

        let text = StyleOptions::new().style("italic").rotation(-90.0).text().unwrap();
        assert_eq!(text.slant, FontSlant::Italic);
        assert_eq!(text.rotation, 270.0);
    }

    #[test]
    fn options_reject_bad_values() {
        assert_eq!(
            StyleOptions::new().style("?").node(),
            Err(StyleError::UnknownMarker { code: "?".into() })
        );
        assert!(StyleOptions::new().style("~~").line().is_err());
        assert!(StyleOptions::new().style("bold").text().is_err());
        assert!(StyleOptions::new().color("#12").node().is_err());
        assert_eq!(
            StyleOptions::new().size(0.0).line(),
            Err(StyleError::InvalidSize { kind: "line", value: 0.0 })
        );
    }

    #[test]
    fn with_rotation_leaves_the_receiver_untouched() {
        let shared = TextStyle::default();
        let rotated = shared.with_rotation(405.0);
        assert_eq!(rotated.rotation, 45.0);
        assert_eq!(shared.rotation, 0.0);
    }

    #[test]
    fn marker_codes_roundtrip() {
        for shape in [
            MarkerShape::Circle,
            MarkerShape::Square,
            MarkerShape::TriangleUp,
            MarkerShape::TriangleDown,
            MarkerShape::TriangleLeft,
            MarkerShape::TriangleRight,
            MarkerShape::Diamond,
            MarkerShape::ThinDiamond,
            MarkerShape::Star,
            MarkerShape::Pentagon,
            MarkerShape::Hexagon,
            MarkerShape::Plus,
            MarkerShape::Cross,
        ] {
            assert_eq!(shape.code().parse::<MarkerShape>(), Ok(shape));
        }
    }

    #[test]
    fn dash_patterns() {
        assert_eq!(LineDash::Solid.pattern(), None);
        assert_eq!(LineDash::Dashed.pattern(), Some(&[3.7, 1.6][..]));
        assert_eq!(":".parse::<LineDash>(), Ok(LineDash::Dotted));
    }
}
