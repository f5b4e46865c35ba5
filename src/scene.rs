//! Scene facade owning a canvas, default styles and the origin point.
//!
//! Every method draws immediately and returns the records of what it drew.
//! Style arguments take `None` for the scene's defaults.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::canvas::{Canvas, ExportOptions, ImageFormat, SvgCanvas};
use crate::chain::{
    self, Anchor, Chain, ChainOptions, MixedStep, PolarStep, PositionMode,
};
use crate::config::SceneConfig;
use crate::errors::Result;
use crate::geometry::{Label, Point, Segment};
use crate::log::debug;
use crate::placement::{MeasureOptions, format_measurement};
use crate::style::{LineStyle, NodeStyle, SceneStyles, TextStyle};
use crate::types::Offset;

/// A diagram under construction
#[derive(Debug)]
pub struct NetScene<C: Canvas> {
    canvas: C,
    styles: SceneStyles,
    origin: Option<Point>,
}

impl NetScene<SvgCanvas> {
    /// A scene drawing into a fresh [`SvgCanvas`]
    pub fn svg(config: SceneConfig) -> Result<Self> {
        Self::new(SvgCanvas::new(), config)
    }
}

impl<C: Canvas> NetScene<C> {
    /// Set up `canvas` from `config` and draw the origin if asked to.
    pub fn new(mut canvas: C, config: SceneConfig) -> Result<Self> {
        config.validate()?;
        canvas.setup(&config.canvas_setup())?;
        let origin = if config.show_origin {
            Some(Point::create(&mut canvas, Offset::ZERO, &NodeStyle::origin())?)
        } else {
            None
        };
        debug!(half_size = config.half_size, "scene created");
        Ok(Self {
            canvas,
            styles: SceneStyles::default(),
            origin,
        })
    }

    pub fn origin(&self) -> Option<&Point> {
        self.origin.as_ref()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    pub fn styles(&self) -> &SceneStyles {
        &self.styles
    }

    /// Replace the styles used when a method gets `None`.
    pub fn set_styles(&mut self, styles: SceneStyles) {
        self.styles = styles;
    }

    // ------------------------------------------------------------------------
    // Points and segments
    // ------------------------------------------------------------------------

    pub fn add_node(&mut self, position: Offset, style: Option<&NodeStyle>) -> Result<Point> {
        let style = style.unwrap_or(&self.styles.node);
        Point::create(&mut self.canvas, position, style)
    }

    /// Add a node at `base + direction`.
    pub fn add_node_offset(
        &mut self,
        base: &Point,
        direction: Offset,
        style: Option<&NodeStyle>,
    ) -> Result<Point> {
        let style = style.unwrap_or(&self.styles.node);
        Point::offset_from(&mut self.canvas, base, direction, style)
    }

    /// Add a node `distance` away from `base` along `bearing` degrees.
    pub fn add_polar_node(
        &mut self,
        base: &Point,
        distance: f64,
        bearing: f64,
        style: Option<&NodeStyle>,
    ) -> Result<Point> {
        let style = style.unwrap_or(&self.styles.node);
        Point::bind_polar(&mut self.canvas, base, distance, bearing, style)
    }

    /// Draw a segment; with [`PositionMode::Relative`] `end` is an offset
    /// from `start`.
    pub fn add_line(
        &mut self,
        start: Offset,
        end: Offset,
        mode: PositionMode,
        arrow: bool,
        style: Option<&LineStyle>,
    ) -> Result<Segment> {
        let style = style.unwrap_or(&self.styles.line);
        Segment::create(&mut self.canvas, start, mode.resolve(start, end), style, arrow)
    }

    pub fn connect(
        &mut self,
        a: &Point,
        b: &Point,
        arrow: bool,
        style: Option<&LineStyle>,
    ) -> Result<Segment> {
        let style = style.unwrap_or(&self.styles.line);
        Segment::bind_points(&mut self.canvas, a, b, style, arrow)
    }

    /// Draw both end nodes and the segment between them.
    pub fn add_line_with_nodes(
        &mut self,
        start: Offset,
        end: Offset,
        mode: PositionMode,
        arrow: bool,
        styles: Option<&SceneStyles>,
    ) -> Result<(Point, Point, Segment)> {
        let styles = styles.unwrap_or(&self.styles);
        let end = mode.resolve(start, end);
        let a = Point::create(&mut self.canvas, start, &styles.node)?;
        let b = Point::create(&mut self.canvas, end, &styles.node)?;
        let segment = Segment::create(&mut self.canvas, start, end, &styles.line, arrow)?;
        Ok((a, b, segment))
    }

    pub fn add_midpoint(&mut self, segment: &Segment, style: Option<&NodeStyle>) -> Result<Point> {
        let style = style.unwrap_or(&self.styles.node);
        segment.midpoint_point(&mut self.canvas, style)
    }

    // ------------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------------

    /// Draw text at `position`; `rotation` overrides the style's rotation.
    pub fn add_text(
        &mut self,
        position: Offset,
        text: &str,
        style: Option<&TextStyle>,
        rotation: Option<f64>,
    ) -> Result<Label> {
        let style = style.unwrap_or(&self.styles.text);
        match rotation {
            Some(degrees) => {
                Label::create(&mut self.canvas, position, text, &style.with_rotation(degrees))
            }
            None => Label::create(&mut self.canvas, position, text, style),
        }
    }

    /// Connect two anchors and label the segment, parallel to it.
    ///
    /// Positions get new nodes; existing points are reused. Without `text`
    /// the label is the distance rounded to a whole number.
    pub fn connect_with_text(
        &mut self,
        a: impl Into<Anchor>,
        b: impl Into<Anchor>,
        text: Option<&str>,
        arrow: bool,
        gap: Option<f64>,
        styles: Option<&SceneStyles>,
    ) -> Result<(Point, Point, Segment, Label)> {
        let styles = styles.unwrap_or(&self.styles);
        let a = a.into().resolve(&mut self.canvas, styles)?;
        let b = b.into().resolve(&mut self.canvas, styles)?;
        let segment = Segment::bind_points(&mut self.canvas, &a, &b, &styles.line, arrow)?;
        let text = match text {
            Some(text) => text.to_string(),
            None => format_measurement(a.distance_to(&b), 0),
        };
        let label = Label::parallel_to(&mut self.canvas, &segment, text, gap, &styles.text)?;
        Ok((a, b, segment, label))
    }

    /// Label a segment with `text` parallel to it, or with its length.
    pub fn attach_text(
        &mut self,
        segment: &Segment,
        text: Option<&str>,
        gap: Option<f64>,
        style: Option<&TextStyle>,
        options: MeasureOptions,
    ) -> Result<Label> {
        let style = style.unwrap_or(&self.styles.text);
        match text {
            Some(text) => Label::parallel_to(&mut self.canvas, segment, text, gap, style),
            None => Label::showing_length(&mut self.canvas, segment, gap, style, options),
        }
    }

    /// Label the distance between two points.
    pub fn add_distance_text(
        &mut self,
        a: &Point,
        b: &Point,
        gap: Option<f64>,
        style: Option<&TextStyle>,
        options: MeasureOptions,
    ) -> Result<Label> {
        let style = style.unwrap_or(&self.styles.text);
        Label::showing_distance(&mut self.canvas, a, b, gap, style, options)
    }

    /// Put text beside a node, `gap` away along `bearing` degrees.
    pub fn add_text_near_node(
        &mut self,
        point: &Point,
        text: &str,
        bearing: f64,
        gap: Option<f64>,
        style: Option<&TextStyle>,
    ) -> Result<Label> {
        let style = style.unwrap_or(&self.styles.text);
        Label::near_point(&mut self.canvas, point, text, bearing, gap, style)
    }

    /// Label each point with the text at the same index.
    pub fn add_node_labels<S: AsRef<str>>(
        &mut self,
        texts: &[S],
        points: &[Point],
        gap: Option<f64>,
        style: Option<&TextStyle>,
    ) -> Result<Vec<Label>> {
        let style = style.unwrap_or(&self.styles.text);
        chain::label_points(&mut self.canvas, texts, points, gap, style)
    }

    // ------------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------------

    pub fn draw_path(
        &mut self,
        points: &[Offset],
        options: &ChainOptions,
        style: Option<&LineStyle>,
    ) -> Result<Vec<Segment>> {
        let style = style.unwrap_or(&self.styles.line);
        chain::draw_open_chain(&mut self.canvas, points, options, style)
    }

    pub fn draw_path_with_nodes(
        &mut self,
        points: &[Offset],
        options: &ChainOptions,
        styles: Option<&SceneStyles>,
    ) -> Result<Chain> {
        let styles = styles.unwrap_or(&self.styles);
        chain::draw_chain_with_points(&mut self.canvas, points, options, styles)
    }

    pub fn draw_path_with_nodes_and_text(
        &mut self,
        points: &[Offset],
        options: &ChainOptions,
        styles: Option<&SceneStyles>,
    ) -> Result<Chain> {
        let styles = styles.unwrap_or(&self.styles);
        chain::draw_chain_with_points_and_labels(&mut self.canvas, points, options, styles)
    }

    pub fn fan_out(
        &mut self,
        center: Offset,
        targets: &[Offset],
        mode: PositionMode,
        options: &ChainOptions,
        style: Option<&LineStyle>,
    ) -> Result<Vec<Segment>> {
        let style = style.unwrap_or(&self.styles.line);
        chain::fan_out(&mut self.canvas, center, targets, mode, options, style)
    }

    pub fn fan_out_with_nodes(
        &mut self,
        center: Offset,
        targets: &[Offset],
        mode: PositionMode,
        options: &ChainOptions,
        styles: Option<&SceneStyles>,
    ) -> Result<Chain> {
        let styles = styles.unwrap_or(&self.styles);
        chain::fan_out_with_points(&mut self.canvas, center, targets, mode, options, styles)
    }

    pub fn fan_out_with_nodes_and_text(
        &mut self,
        center: Offset,
        targets: &[Offset],
        mode: PositionMode,
        text: Option<&str>,
        options: &ChainOptions,
        styles: Option<&SceneStyles>,
    ) -> Result<Chain> {
        let styles = styles.unwrap_or(&self.styles);
        chain::fan_out_with_points_and_labels(
            &mut self.canvas,
            center,
            targets,
            mode,
            text,
            options,
            styles,
        )
    }

    pub fn add_polar_chain(
        &mut self,
        start: impl Into<Anchor>,
        steps: &[PolarStep],
        options: &ChainOptions,
        styles: Option<&SceneStyles>,
    ) -> Result<Chain> {
        let styles = styles.unwrap_or(&self.styles);
        chain::build_polar_chain(&mut self.canvas, start, steps, options, styles)
    }

    pub fn add_mixed_chain(
        &mut self,
        start: impl Into<Anchor>,
        steps: &[MixedStep],
        options: &ChainOptions,
        styles: Option<&SceneStyles>,
    ) -> Result<Chain> {
        let styles = styles.unwrap_or(&self.styles);
        chain::build_mixed_chain(&mut self.canvas, start, steps, options, styles)
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Export the scene, appending the format's extension to `path` when it
    /// does not already end in it. Returns the path written.
    pub fn save(
        &mut self,
        path: impl AsRef<Path>,
        format: ImageFormat,
        options: &ExportOptions,
    ) -> Result<PathBuf> {
        let path = with_extension(path.as_ref(), format);
        self.canvas.save_to_file(&path, format, options)?;
        Ok(path)
    }

    pub fn show(&mut self) -> Result<()> {
        self.canvas.show()?;
        Ok(())
    }
}

fn with_extension(path: &Path, format: ImageFormat) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
    if has_extension {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::errors::Error;
    use crate::types::Color;

    fn scene() -> NetScene<RecordingCanvas> {
        NetScene::new(RecordingCanvas::new(), SceneConfig::default()).unwrap()
    }

    #[test]
    fn new_sets_up_canvas_and_origin() {
        let scene = scene();
        let origin = scene.origin().unwrap();
        assert_eq!(origin.position(), Offset::ZERO);
        assert_eq!(origin.style().color, Color::RED);
        assert_eq!(origin.style().size, 10.0);
        assert!(scene.canvas().recorded_setup().is_some());
        assert_eq!(scene.canvas().markers(), 1);
    }

    #[test]
    fn origin_is_optional() {
        let scene = NetScene::new(
            RecordingCanvas::new(),
            SceneConfig::default().with_origin(false),
        )
        .unwrap();
        assert!(scene.origin().is_none());
        assert!(scene.canvas().calls().is_empty());
    }

    #[test]
    fn rejects_bad_half_size() {
        let err = NetScene::new(RecordingCanvas::new(), SceneConfig::new(0.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn relative_line_end() {
        let mut scene = scene();
        let s = scene
            .add_line(
                Offset::new(1.0, 1.0),
                Offset::new(2.0, 0.0),
                PositionMode::Relative,
                false,
                None,
            )
            .unwrap();
        assert_eq!(s.end(), Offset::new(3.0, 1.0));
    }

    #[test]
    fn explicit_style_overrides_defaults() {
        let mut scene = scene();
        let blue = NodeStyle::default().with_color(Color::named("blue"));
        let p = scene.add_node(Offset::new(1.0, 0.0), Some(&blue)).unwrap();
        assert_eq!(p.style().color, Color::named("blue"));

        scene.set_styles(SceneStyles {
            node: blue.clone(),
            ..SceneStyles::default()
        });
        let q = scene.add_node(Offset::new(2.0, 0.0), None).unwrap();
        assert_eq!(q.style(), &blue);
    }

    #[test]
    fn text_rotation_override() {
        let mut scene = scene();
        let label = scene
            .add_text(Offset::ZERO, "t", None, Some(-90.0))
            .unwrap();
        assert_eq!(label.rotation(), 270.0);
        assert_eq!(scene.styles().text.rotation, 0.0);

        let explicit_zero = scene
            .add_text(
                Offset::ZERO,
                "t",
                Some(&TextStyle::default().with_rotation(45.0)),
                Some(0.0),
            )
            .unwrap();
        assert_eq!(explicit_zero.rotation(), 0.0);
    }

    #[test]
    fn connect_with_text_defaults_to_rounded_distance() {
        let mut scene = scene();
        let existing = scene.add_node(Offset::new(3.0, 4.0), None).unwrap();
        let (a, b, segment, label) = scene
            .connect_with_text(Offset::ZERO, &existing, None, false, None, None)
            .unwrap();
        assert_eq!(a.position(), Offset::ZERO);
        assert_eq!(b.position(), existing.position());
        assert_eq!(segment.length(), 5.0);
        assert_eq!(label.text(), "5");
        // origin, existing, the new start node
        assert_eq!(scene.canvas().markers(), 3);
    }

    #[test]
    fn attach_text_prefers_given_text() {
        let mut scene = scene();
        let s = scene
            .add_line(
                Offset::ZERO,
                Offset::new(0.0, 2.5),
                PositionMode::Absolute,
                true,
                None,
            )
            .unwrap();
        let fixed = scene
            .attach_text(&s, Some("h"), None, None, MeasureOptions::new())
            .unwrap();
        assert_eq!(fixed.text(), "h");
        assert!((fixed.rotation() - 90.0).abs() < 1e-9);

        let measured = scene
            .attach_text(&s, None, None, None, MeasureOptions::new().with_decimal_digits(1))
            .unwrap();
        assert_eq!(measured.text(), "2.5");
        assert_eq!(measured.rotation(), 0.0);
    }

    #[test]
    fn save_appends_missing_extension() {
        let mut scene = scene();
        let written = scene
            .save("out/net", ImageFormat::Png, &ExportOptions::default())
            .unwrap();
        assert_eq!(written, PathBuf::from("out/net.png"));

        let kept = scene
            .save("net.SVG", ImageFormat::Svg, &ExportOptions::default())
            .unwrap();
        assert_eq!(kept, PathBuf::from("net.SVG"));

        let appended = scene
            .save("net.v2", ImageFormat::Svg, &ExportOptions::default())
            .unwrap();
        assert_eq!(appended, PathBuf::from("net.v2.svg"));
        assert_eq!(scene.canvas().saved().len(), 3);
    }

    #[test]
    fn show_reaches_backend() {
        let mut scene = scene();
        scene.show().unwrap();
        assert_eq!(scene.into_canvas().times_shown(), 1);
    }
}
