//! SVG generation
//!
//! Primitives are kept in scene coordinates and projected when the document
//! is produced, so the view always fits everything drawn so far. Sizes
//! (marker size, stroke width, font size) are in points and converted at
//! [`defaults::DPI`] pixels per inch.

use std::io::Write as _;
use std::path::Path;

use glam::{DVec2, dvec2};

use super::{Canvas, CanvasSetup, ExportOptions, ImageFormat};
use crate::defaults;
use crate::errors::RenderError;
use crate::log::{debug, warn};
use crate::style::{LineStyle, MarkerShape, NodeStyle, TextStyle};
use crate::types::{BBox, Color, Offset};

/// Pixels per typographic point
const PX_PER_PT: f64 = defaults::DPI / defaults::POINTS_PER_INCH;

#[derive(Clone, Debug)]
enum Item {
    Marker {
        at: Offset,
        style: NodeStyle,
    },
    Segment {
        from: Offset,
        to: Offset,
        style: LineStyle,
        arrow: bool,
    },
    Text {
        at: Offset,
        text: String,
        style: TextStyle,
    },
}

impl Item {
    fn anchors(&self) -> impl Iterator<Item = Offset> {
        let (a, b) = match self {
            Item::Marker { at, .. } | Item::Text { at, .. } => (*at, None),
            Item::Segment { from, to, .. } => (*from, Some(*to)),
        };
        std::iter::once(a).chain(b)
    }

    fn is_finite(&self) -> bool {
        self.anchors().all(Offset::is_finite)
    }
}

/// Maps scene coordinates (y up) to SVG pixels (y down)
#[derive(Clone, Copy, Debug)]
struct Projection {
    center: Offset,
    origin_px: DVec2,
    scale: DVec2,
}

impl Projection {
    fn fit(bounds: &BBox, area_min: DVec2, area_max: DVec2, equal_aspect: bool) -> Self {
        let (center, w, h) = if bounds.is_empty() {
            (Offset::ZERO, 1.0, 1.0)
        } else {
            (bounds.center(), bounds.width(), bounds.height())
        };
        // A single point or a straight line still needs a non-zero extent
        let extent = w.max(h).max(f64::EPSILON);
        let w = if w > 0.0 { w } else { extent };
        let h = if h > 0.0 { h } else { extent };

        let avail = area_max - area_min;
        let scale = if equal_aspect {
            let s = (avail.x / w).min(avail.y / h);
            dvec2(s, s)
        } else {
            dvec2(avail.x / w, avail.y / h)
        };

        Projection {
            center,
            origin_px: (area_min + area_max) * 0.5,
            scale,
        }
    }

    fn apply(&self, p: Offset) -> DVec2 {
        let d = (p - self.center).to_dvec2();
        self.origin_px + dvec2(d.x, -d.y) * self.scale
    }
}

/// Backend that builds an SVG document
#[derive(Clone, Debug, Default)]
pub struct SvgCanvas {
    setup: CanvasSetup,
    items: Vec<Item>,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setup(setup: CanvasSetup) -> Self {
        Self {
            setup,
            items: Vec::new(),
        }
    }

    /// Number of primitives drawn so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounds of everything drawn so far, in scene coordinates
    pub fn bounds(&self) -> BBox {
        let mut bounds = BBox::new();
        for p in self.items.iter().flat_map(Item::anchors) {
            bounds.expand_point(p);
        }
        bounds
    }

    /// Side of the square document in pixels
    pub fn side_px(&self) -> f64 {
        2.0 * self.setup.half_size * defaults::DPI
    }

    /// Serialize everything drawn so far
    pub fn to_svg(&self) -> String {
        self.render_document(true)
    }

    fn render_document(&self, background: bool) -> String {
        let side = self.side_px();
        let title_band = self
            .setup
            .title
            .as_ref()
            .map(|t| t.size * PX_PER_PT * 2.0)
            .unwrap_or(0.0);
        let margin = side * defaults::MARGIN;
        let area_min = dvec2(margin, title_band + margin);
        let area_max = dvec2(side - margin, side - margin);
        let projection = Projection::fit(&self.bounds(), area_min, area_max, self.setup.equal_aspect);

        let mut out = String::new();
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{w}\" viewBox=\"0 0 {w} {w}\">\n",
            w = fmt_num(side)
        ));
        if background {
            out.push_str(&format!(
                "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
                escape_xml(&self.setup.background.to_string())
            ));
        }
        if let Some(title) = &self.setup.title {
            out.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" fill=\"{}\" font-family=\"{}\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>\n",
                fmt_num(side / 2.0),
                fmt_num(title_band / 2.0),
                escape_xml(&title.color.to_string()),
                defaults::FONT_FAMILY,
                fmt_num(title.size * PX_PER_PT),
                escape_xml(&title.text)
            ));
        }
        if !self.setup.hide_axes {
            out.push_str(&format!(
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"rgb(0,0,0)\" stroke-width=\"1\"/>\n",
                fmt_num(area_min.x),
                fmt_num(area_min.y),
                fmt_num(area_max.x - area_min.x),
                fmt_num(area_max.y - area_min.y)
            ));
        }

        for item in &self.items {
            if !item.is_finite() {
                warn!(?item, "skipping primitive with non-finite coordinates");
                continue;
            }
            match item {
                Item::Marker { at, style } => {
                    render_marker(&mut out, projection.apply(*at), style);
                }
                Item::Segment {
                    from,
                    to,
                    style,
                    arrow,
                } => {
                    let (a, b) = (projection.apply(*from), projection.apply(*to));
                    render_line(&mut out, a, b, style);
                    if *arrow {
                        render_arrowhead(&mut out, a, b, style);
                    }
                }
                Item::Text { at, text, style } => {
                    render_text(&mut out, projection.apply(*at), text, style);
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }

    fn write_file(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
        std::fs::write(path, bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Canvas for SvgCanvas {
    fn setup(&mut self, setup: &CanvasSetup) -> Result<(), RenderError> {
        self.setup = setup.clone();
        Ok(())
    }

    fn draw_marker(&mut self, at: Offset, style: &NodeStyle) -> Result<(), RenderError> {
        self.items.push(Item::Marker {
            at,
            style: style.clone(),
        });
        Ok(())
    }

    fn draw_line(&mut self, from: Offset, to: Offset, style: &LineStyle) -> Result<(), RenderError> {
        self.items.push(Item::Segment {
            from,
            to,
            style: style.clone(),
            arrow: false,
        });
        Ok(())
    }

    fn draw_arrow(
        &mut self,
        from: Offset,
        to: Offset,
        style: &LineStyle,
    ) -> Result<(), RenderError> {
        self.items.push(Item::Segment {
            from,
            to,
            style: style.clone(),
            arrow: true,
        });
        Ok(())
    }

    fn draw_text(&mut self, at: Offset, text: &str, style: &TextStyle) -> Result<(), RenderError> {
        self.items.push(Item::Text {
            at,
            text: text.to_string(),
            style: style.clone(),
        });
        Ok(())
    }

    fn save_to_file(
        &mut self,
        path: &Path,
        format: ImageFormat,
        options: &ExportOptions,
    ) -> Result<(), RenderError> {
        debug!(path = %path.display(), %format, "saving scene");
        let document = self.render_document(!options.transparent);
        match format {
            ImageFormat::Svg => Self::write_file(path, document.as_bytes()),
            #[cfg(feature = "png")]
            ImageFormat::Png => {
                let bytes = super::png::rasterize(&document, options)?;
                Self::write_file(path, &bytes)
            }
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(RenderError::UnsupportedFormat {
                format: format.to_string(),
                hint: Some("enable the `png` feature to export raster images".to_string()),
            }),
        }
    }

    /// Writes the document to stdout.
    fn show(&mut self) -> Result<(), RenderError> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(self.to_svg().as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|source| RenderError::Io {
                path: "<stdout>".into(),
                source,
            })
    }
}

fn color_attr(color: &Color) -> String {
    escape_xml(&color.to_string())
}

fn points_attr(points: &[DVec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Vertices of a regular polygon of circumradius `r`, first vertex at
/// `start` radians (SVG orientation, y down).
fn regular_polygon(n: usize, r: f64, start: f64) -> Vec<DVec2> {
    (0..n)
        .map(|i| {
            let a = start + std::f64::consts::TAU * i as f64 / n as f64;
            dvec2(a.cos(), a.sin()) * r
        })
        .collect()
}

fn star(r: f64) -> Vec<DVec2> {
    let inner = r * 0.381_966;
    (0..10)
        .map(|i| {
            let a = -std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * i as f64 / 5.0;
            let radius = if i % 2 == 0 { r } else { inner };
            dvec2(a.cos(), a.sin()) * radius
        })
        .collect()
}

/// Outline of a filled marker relative to its centre
fn marker_outline(shape: MarkerShape, r: f64) -> Vec<DVec2> {
    let h = r * 0.866_025_4;
    match shape {
        MarkerShape::Square => vec![dvec2(-r, -r), dvec2(r, -r), dvec2(r, r), dvec2(-r, r)]
            .into_iter()
            .map(|v| v * std::f64::consts::FRAC_1_SQRT_2)
            .collect(),
        MarkerShape::TriangleUp => vec![dvec2(0.0, -r), dvec2(h, r / 2.0), dvec2(-h, r / 2.0)],
        MarkerShape::TriangleDown => vec![dvec2(0.0, r), dvec2(-h, -r / 2.0), dvec2(h, -r / 2.0)],
        MarkerShape::TriangleLeft => vec![dvec2(-r, 0.0), dvec2(r / 2.0, -h), dvec2(r / 2.0, h)],
        MarkerShape::TriangleRight => vec![dvec2(r, 0.0), dvec2(-r / 2.0, h), dvec2(-r / 2.0, -h)],
        MarkerShape::Diamond => vec![dvec2(0.0, -r), dvec2(r, 0.0), dvec2(0.0, r), dvec2(-r, 0.0)],
        MarkerShape::ThinDiamond => vec![
            dvec2(0.0, -r),
            dvec2(r * 0.6, 0.0),
            dvec2(0.0, r),
            dvec2(-r * 0.6, 0.0),
        ],
        MarkerShape::Star => star(r),
        MarkerShape::Pentagon => regular_polygon(5, r, -std::f64::consts::FRAC_PI_2),
        MarkerShape::Hexagon => regular_polygon(6, r, -std::f64::consts::FRAC_PI_2),
        MarkerShape::Circle | MarkerShape::Plus | MarkerShape::Cross => Vec::new(),
    }
}

fn render_marker(out: &mut String, c: DVec2, style: &NodeStyle) {
    let r = style.size * PX_PER_PT / 2.0;
    let color = color_attr(&style.color);
    match style.shape {
        MarkerShape::Circle => out.push_str(&format!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>\n",
            fmt_num(c.x),
            fmt_num(c.y),
            fmt_num(r),
            color
        )),
        shape if shape.is_stroked() => {
            let (u, v) = if shape == MarkerShape::Plus {
                (dvec2(r, 0.0), dvec2(0.0, r))
            } else {
                let d = r * std::f64::consts::FRAC_1_SQRT_2;
                (dvec2(d, d), dvec2(d, -d))
            };
            out.push_str(&format!(
                "  <path d=\"M{} {}L{} {}M{} {}L{} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                fmt_num((c - u).x),
                fmt_num((c - u).y),
                fmt_num((c + u).x),
                fmt_num((c + u).y),
                fmt_num((c - v).x),
                fmt_num((c - v).y),
                fmt_num((c + v).x),
                fmt_num((c + v).y),
                color,
                fmt_num((r / 3.0).max(1.0))
            ));
        }
        shape => {
            let points: Vec<DVec2> = marker_outline(shape, r).into_iter().map(|v| c + v).collect();
            out.push_str(&format!(
                "  <polygon points=\"{}\" fill=\"{}\"/>\n",
                points_attr(&points),
                color
            ));
        }
    }
}

fn render_line(out: &mut String, a: DVec2, b: DVec2, style: &LineStyle) {
    let width = style.size * PX_PER_PT;
    let dash = style
        .dash
        .pattern()
        .map(|pattern| {
            let lengths: Vec<String> = pattern.iter().map(|l| fmt_num(l * width)).collect();
            format!(" stroke-dasharray=\"{}\"", lengths.join(","))
        })
        .unwrap_or_default();
    out.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{}/>\n",
        fmt_num(a.x),
        fmt_num(a.y),
        fmt_num(b.x),
        fmt_num(b.y),
        color_attr(&style.color),
        fmt_num(width),
        dash
    ));
}

/// Open `->` arrowhead at `end`, pointing away from `start`
fn render_arrowhead(out: &mut String, start: DVec2, end: DVec2, style: &LineStyle) {
    let delta = end - start;
    let len = delta.length();
    if len < 0.001 {
        return; // Zero-length line, no arrowhead
    }

    let width = style.size * PX_PER_PT;
    let arrow_len = (4.0 + 2.0 * style.size) * PX_PER_PT;
    let half_width = arrow_len * 0.5;

    // Unit vector in direction of line and its perpendicular
    let unit = delta / len;
    let perp = dvec2(-unit.y, unit.x);

    let base = end - unit * arrow_len;
    let p1 = base + perp * half_width;
    let p2 = base - perp * half_width;

    out.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
        points_attr(&[p1, end, p2]),
        color_attr(&style.color),
        fmt_num(width)
    ));
}

fn render_text(out: &mut String, at: DVec2, text: &str, style: &TextStyle) {
    // SVG rotates clockwise in a y-down frame
    let transform = if style.rotation != 0.0 {
        format!(
            " transform=\"rotate({} {} {})\"",
            fmt_num(-style.rotation),
            fmt_num(at.x),
            fmt_num(at.y)
        )
    } else {
        String::new()
    };
    out.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" fill=\"{}\" font-family=\"{}\" font-size=\"{}\" font-style=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\"{}>{}</text>\n",
        fmt_num(at.x),
        fmt_num(at.y),
        color_attr(&style.color),
        escape_xml(&style.family),
        fmt_num(style.size * PX_PER_PT),
        style.slant.as_css(),
        transform,
        escape_xml(text)
    ));
}

/// Escape text and attribute values for XML
fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Format a number like C's %g (6 significant figures, trailing zeros trimmed).
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

/// Format a number with specified significant figures, trailing zeros trimmed.
fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    // Round to specified significant figures
    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    if !scale.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * scale).round() / scale;

    // Format with enough decimal places, then trim
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        &s
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
