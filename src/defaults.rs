//! Default sizes and settings

/// Marker size for nodes, in points
pub const NODE_SIZE: f64 = 5.0;
/// Stroke width for segments, in points
pub const LINE_SIZE: f64 = 2.0;
/// Font size for labels, in points
pub const TEXT_SIZE: f64 = 16.0;
pub const FONT_FAMILY: &str = "sans-serif";
pub const TEXT_ROTATION: f64 = 0.0;

/// Origin marker drawn by a scene when requested
pub const ORIGIN_SIZE: f64 = 10.0;

/// Factor applied to `anchor size + text size` for the default label gap
pub const GAP_FACTOR: f64 = 0.05;

/// Figure half-size in inches
pub const HALF_SIZE: f64 = 6.0;
pub const TITLE_SIZE: f64 = 12.0;

/// Pixels per inch of the SVG canvas
pub const DPI: f64 = 100.0;
pub const POINTS_PER_INCH: f64 = 72.0;
/// Fraction of the drawable area kept free around the diagram
pub const MARGIN: f64 = 0.05;
