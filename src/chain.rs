//! Path builders: chains of segments, polar chains, mixed chains and fans.
//!
//! Builders draw as they go. When a step fails the error is returned at once
//! and everything drawn before it stays on the canvas.

use crate::canvas::Canvas;
use crate::errors::{Error, Result};
use crate::geometry::{Label, Point, Segment};
use crate::log::{debug, warn};
use crate::placement::{MeasureOptions, default_gap, format_measurement};
use crate::style::{LineStyle, SceneStyles, TextStyle};
use crate::types::Offset;

// ============================================================================
// Options and step types
// ============================================================================

/// Settings shared by the chain builders
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainOptions {
    /// End every segment in an arrowhead
    pub arrow: bool,
    /// Draw a closing segment from the last point back to the first
    pub close_loop: bool,
    /// Label gap; `None` derives it from the line and text sizes
    pub gap: Option<f64>,
    pub decimal_digits: usize,
    /// Rotate labels to run along their segment
    pub parallel: bool,
    /// Text of the closing segment's label instead of its measured length
    pub closure_text: Option<String>,
}

impl ChainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arrow(mut self, arrow: bool) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn closed(mut self) -> Self {
        self.close_loop = true;
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn with_decimal_digits(mut self, digits: usize) -> Self {
        self.decimal_digits = digits;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_closure_text(mut self, text: impl Into<String>) -> Self {
        self.closure_text = Some(text.into());
        self
    }

    pub fn measure(&self) -> MeasureOptions {
        MeasureOptions {
            decimal_digits: self.decimal_digits,
            parallel: self.parallel,
        }
    }
}

/// Everything a builder drew, in drawing order per kind
#[derive(Clone, Debug, Default)]
pub struct Chain {
    pub points: Vec<Point>,
    pub segments: Vec<Segment>,
    pub labels: Vec<Label>,
}

/// One hop of a polar chain
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarStep {
    pub distance: f64,
    /// Degrees counter-clockwise from +x
    pub bearing: f64,
}

impl PolarStep {
    pub fn new(distance: f64, bearing: f64) -> Self {
        Self { distance, bearing }
    }
}

impl From<(f64, f64)> for PolarStep {
    fn from((distance, bearing): (f64, f64)) -> Self {
        Self { distance, bearing }
    }
}

/// A position to draw a new point at, or an existing point
#[derive(Clone, Debug)]
pub enum Anchor {
    /// A new point is drawn here
    Position(Offset),
    /// An existing point, reused without drawing it again
    Point(Point),
}

impl From<Offset> for Anchor {
    fn from(position: Offset) -> Self {
        Anchor::Position(position)
    }
}

impl From<Point> for Anchor {
    fn from(point: Point) -> Self {
        Anchor::Point(point)
    }
}

impl From<&Point> for Anchor {
    fn from(point: &Point) -> Self {
        Anchor::Point(point.clone())
    }
}

impl Anchor {
    pub(crate) fn resolve<C: Canvas + ?Sized>(
        self,
        canvas: &mut C,
        styles: &SceneStyles,
    ) -> Result<Point> {
        match self {
            Anchor::Position(position) => Point::create(canvas, position, &styles.node),
            Anchor::Point(point) => Ok(point),
        }
    }
}

/// Length of a mixed-chain step, as a number or as the exact label text
#[derive(Clone, Debug, PartialEq)]
pub enum StepDistance {
    Value(f64),
    Text(String),
}

impl StepDistance {
    /// Numeric value, parsing text if needed
    pub fn value(&self) -> Option<f64> {
        match self {
            StepDistance::Value(v) => Some(*v),
            StepDistance::Text(text) => text.trim().parse().ok(),
        }
    }

    fn label(&self, decimal_digits: usize) -> String {
        match self {
            StepDistance::Value(v) => format_measurement(*v, decimal_digits),
            StepDistance::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for StepDistance {
    fn from(value: f64) -> Self {
        StepDistance::Value(value)
    }
}

impl From<&str> for StepDistance {
    fn from(text: &str) -> Self {
        StepDistance::Text(text.to_string())
    }
}

impl From<String> for StepDistance {
    fn from(text: String) -> Self {
        StepDistance::Text(text)
    }
}

/// One step of a mixed chain
#[derive(Clone, Debug, Default)]
pub struct MixedStep {
    /// Continue from this existing point instead of binding a new one
    pub point: Option<Point>,
    pub distance: Option<StepDistance>,
    pub bearing: Option<f64>,
}

impl MixedStep {
    pub fn new(point: Option<Point>, distance: Option<StepDistance>, bearing: Option<f64>) -> Self {
        Self {
            point,
            distance,
            bearing,
        }
    }

    /// Move to an existing point without drawing a segment.
    pub fn existing(point: &Point) -> Self {
        Self::new(Some(point.clone()), None, None)
    }

    /// Connect to an existing point, labelling the segment with `distance`.
    pub fn existing_with_length(point: &Point, distance: impl Into<StepDistance>) -> Self {
        Self::new(Some(point.clone()), Some(distance.into()), None)
    }

    /// Bind a new point `distance` away along `bearing`.
    pub fn polar(distance: impl Into<StepDistance>, bearing: f64) -> Self {
        Self::new(None, Some(distance.into()), Some(bearing))
    }
}

/// How target positions relate to the point they are drawn from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionMode {
    #[default]
    Absolute,
    /// Offsets from the base position
    Relative,
}

impl PositionMode {
    pub fn resolve(self, base: Offset, target: Offset) -> Offset {
        match self {
            PositionMode::Absolute => target,
            PositionMode::Relative => base + target,
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn too_short(n: usize) -> Error {
    Error::invalid_input_with_help(
        format!("a chain needs at least 2 points, got {n}"),
        "pass two or more positions",
    )
}

/// Label a segment with `text` using the chain's placement settings.
fn segment_label<C: Canvas + ?Sized>(
    canvas: &mut C,
    segment: &Segment,
    text: String,
    options: &ChainOptions,
    style: &TextStyle,
) -> Result<Label> {
    if options.parallel {
        return Label::parallel_to(canvas, segment, text, options.gap, style);
    }
    let gap = options
        .gap
        .unwrap_or_else(|| default_gap(segment.style().size, style.size));
    let mid = segment.midpoint();
    Label::create(canvas, Offset::new(mid.x, mid.y + gap), text, style)
}

/// Close the chain back to its first point and label the closing segment.
fn close_chain<C: Canvas + ?Sized>(
    canvas: &mut C,
    chain: &mut Chain,
    options: &ChainOptions,
    styles: &SceneStyles,
) -> Result<()> {
    let (Some(first), Some(last)) = (chain.points.first(), chain.points.last()) else {
        return Ok(());
    };
    let segment = Segment::bind_points(canvas, last, first, &styles.line, options.arrow)?;
    let text = options
        .closure_text
        .clone()
        .unwrap_or_else(|| format_measurement(segment.length(), options.decimal_digits));
    let label = segment_label(canvas, &segment, text, options, &styles.text)?;
    chain.segments.push(segment);
    chain.labels.push(label);
    Ok(())
}

// ============================================================================
// Chains through given positions
// ============================================================================

/// Connect consecutive positions with segments.
///
/// Closing needs at least three points; on a two-point chain the request is
/// ignored.
pub fn draw_open_chain<C: Canvas + ?Sized>(
    canvas: &mut C,
    points: &[Offset],
    options: &ChainOptions,
    style: &LineStyle,
) -> Result<Vec<Segment>> {
    if points.len() < 2 {
        return Err(too_short(points.len()));
    }
    debug!(points = points.len(), closed = options.close_loop, "drawing chain");

    let mut segments = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        segments.push(Segment::create(canvas, pair[0], pair[1], style, options.arrow)?);
    }
    if options.close_loop {
        if points.len() >= 3 {
            let (first, last) = (points[0], points[points.len() - 1]);
            segments.push(Segment::create(canvas, last, first, style, options.arrow)?);
        } else {
            warn!("closing a two-point chain is ignored");
        }
    }
    Ok(segments)
}

/// Like [`draw_open_chain`], with a point drawn at every vertex.
pub fn draw_chain_with_points<C: Canvas + ?Sized>(
    canvas: &mut C,
    points: &[Offset],
    options: &ChainOptions,
    styles: &SceneStyles,
) -> Result<Chain> {
    build_chain(canvas, points, options, styles, false)
}

/// Like [`draw_chain_with_points`], with every segment labelled by its length.
pub fn draw_chain_with_points_and_labels<C: Canvas + ?Sized>(
    canvas: &mut C,
    points: &[Offset],
    options: &ChainOptions,
    styles: &SceneStyles,
) -> Result<Chain> {
    build_chain(canvas, points, options, styles, true)
}

fn build_chain<C: Canvas + ?Sized>(
    canvas: &mut C,
    positions: &[Offset],
    options: &ChainOptions,
    styles: &SceneStyles,
    labelled: bool,
) -> Result<Chain> {
    let Some((&last, head)) = positions.split_last() else {
        return Err(too_short(0));
    };
    if head.is_empty() {
        return Err(too_short(1));
    }
    debug!(points = positions.len(), labelled, "drawing chain with points");

    let mut chain = Chain::default();
    let measure = options.measure();
    for (i, &position) in head.iter().enumerate() {
        chain.points.push(Point::create(canvas, position, &styles.node)?);
        let segment =
            Segment::create(canvas, position, positions[i + 1], &styles.line, options.arrow)?;
        if labelled {
            chain.labels.push(Label::showing_length(
                canvas,
                &segment,
                options.gap,
                &styles.text,
                measure,
            )?);
        }
        chain.segments.push(segment);
    }
    chain.points.push(Point::create(canvas, last, &styles.node)?);

    if options.close_loop {
        if positions.len() >= 3 {
            let first = &chain.points[0];
            let last = &chain.points[chain.points.len() - 1];
            let segment = Segment::bind_points(canvas, last, first, &styles.line, options.arrow)?;
            if labelled {
                chain.labels.push(Label::showing_length(
                    canvas,
                    &segment,
                    options.gap,
                    &styles.text,
                    measure,
                )?);
            }
            chain.segments.push(segment);
        } else {
            warn!("closing a two-point chain is ignored");
        }
    }
    Ok(chain)
}

// ============================================================================
// Polar and mixed chains
// ============================================================================

/// Walk `steps` from `start`, binding each new point to the previous one.
///
/// Every step draws a point, a segment and a length label.
pub fn build_polar_chain<C: Canvas + ?Sized>(
    canvas: &mut C,
    start: impl Into<Anchor>,
    steps: &[PolarStep],
    options: &ChainOptions,
    styles: &SceneStyles,
) -> Result<Chain> {
    if steps.is_empty() {
        return Err(Error::invalid_input("a polar chain needs at least one step"));
    }
    let mut chain = Chain::default();
    chain.points.push(start.into().resolve(canvas, styles)?);
    let measure = options.measure();

    for step in steps {
        let Some(last) = chain.points.last() else {
            break;
        };
        let point = Point::bind_polar(canvas, last, step.distance, step.bearing, &styles.node)?;
        let segment = Segment::bind_points(canvas, last, &point, &styles.line, options.arrow)?;
        let label =
            Label::showing_length(canvas, &segment, options.gap, &styles.text, measure)?;
        chain.points.push(point);
        chain.segments.push(segment);
        chain.labels.push(label);
    }

    if options.close_loop {
        close_chain(canvas, &mut chain, options, styles)?;
    }
    Ok(chain)
}

/// Walk `steps` from `start`, mixing existing points with polar hops.
///
/// A step with a point continues from it and draws a labelled segment only
/// when it also carries a distance. A step without a point binds a new one
/// from the previous point and needs both a distance and a bearing.
pub fn build_mixed_chain<C: Canvas + ?Sized>(
    canvas: &mut C,
    start: impl Into<Anchor>,
    steps: &[MixedStep],
    options: &ChainOptions,
    styles: &SceneStyles,
) -> Result<Chain> {
    if steps.is_empty() {
        return Err(Error::invalid_input("a mixed chain needs at least one step"));
    }
    let mut chain = Chain::default();
    chain.points.push(start.into().resolve(canvas, styles)?);

    for (index, step) in steps.iter().enumerate() {
        let Some(last) = chain.points.last() else {
            break;
        };
        let point = match &step.point {
            Some(point) => {
                if step.bearing.is_some() {
                    warn!(index, "bearing ignored on a step with an existing point");
                }
                point.clone()
            }
            None => {
                let distance = step.distance.as_ref().ok_or_else(|| {
                    Error::invalid_input_with_help(
                        format!("step {index} has neither a point nor a distance"),
                        "give the step an existing point, or a distance and a bearing",
                    )
                })?;
                let bearing = step.bearing.ok_or_else(|| {
                    Error::invalid_input(format!("step {index} has a distance but no bearing"))
                })?;
                let value = distance.value().ok_or_else(|| {
                    Error::invalid_input(format!(
                        "step {index} distance {distance:?} is not a number"
                    ))
                })?;
                Point::bind_polar(canvas, last, value, bearing, &styles.node)?
            }
        };

        if let Some(distance) = &step.distance {
            let segment = Segment::bind_points(canvas, last, &point, &styles.line, options.arrow)?;
            let text = distance.label(options.decimal_digits);
            chain
                .labels
                .push(segment_label(canvas, &segment, text, options, &styles.text)?);
            chain.segments.push(segment);
        }
        chain.points.push(point);
    }

    if options.close_loop {
        close_chain(canvas, &mut chain, options, styles)?;
    }
    Ok(chain)
}

// ============================================================================
// Fans
// ============================================================================

/// Draw a segment from `center` to every target.
pub fn fan_out<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: Offset,
    targets: &[Offset],
    mode: PositionMode,
    options: &ChainOptions,
    style: &LineStyle,
) -> Result<Vec<Segment>> {
    debug!(targets = targets.len(), ?mode, "drawing fan");
    targets
        .iter()
        .map(|&t| Segment::create(canvas, center, mode.resolve(center, t), style, options.arrow))
        .collect()
}

/// Like [`fan_out`], with a point at every target.
pub fn fan_out_with_points<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: Offset,
    targets: &[Offset],
    mode: PositionMode,
    options: &ChainOptions,
    styles: &SceneStyles,
) -> Result<Chain> {
    let mut chain = Chain::default();
    for &target in targets {
        let end = mode.resolve(center, target);
        chain
            .segments
            .push(Segment::create(canvas, center, end, &styles.line, options.arrow)?);
        chain.points.push(Point::create(canvas, end, &styles.node)?);
    }
    Ok(chain)
}

/// Like [`fan_out_with_points`], then label every segment with `text`
/// (parallel to it) or, without text, with its length.
pub fn fan_out_with_points_and_labels<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: Offset,
    targets: &[Offset],
    mode: PositionMode,
    text: Option<&str>,
    options: &ChainOptions,
    styles: &SceneStyles,
) -> Result<Chain> {
    let mut chain = fan_out_with_points(canvas, center, targets, mode, options, styles)?;
    let measure = options.measure();
    for segment in &chain.segments {
        let label = match text {
            Some(text) => Label::parallel_to(canvas, segment, text, options.gap, &styles.text)?,
            None => Label::showing_length(canvas, segment, options.gap, &styles.text, measure)?,
        };
        chain.labels.push(label);
    }
    Ok(chain)
}

// ============================================================================
// Batch helpers
// ============================================================================

/// Turn `(x, y)` pairs into positions.
///
/// `Relative` pairs are cumulative: each one offsets the previous position,
/// starting from the origin.
pub fn offsets_from_pairs(pairs: &[(f64, f64)], mode: PositionMode) -> Vec<Offset> {
    pairs
        .iter()
        .scan(Offset::ZERO, |last, &pair| {
            *last = mode.resolve(*last, pair.into());
            Some(*last)
        })
        .collect()
}

/// Put one label beside each point, to its right.
pub fn label_points<C: Canvas + ?Sized, S: AsRef<str>>(
    canvas: &mut C,
    texts: &[S],
    points: &[Point],
    gap: Option<f64>,
    style: &TextStyle,
) -> Result<Vec<Label>> {
    if texts.len() != points.len() {
        return Err(Error::invalid_input(format!(
            "{} labels for {} points",
            texts.len(),
            points.len()
        )));
    }
    texts
        .iter()
        .zip(points)
        .map(|(text, point)| Label::near_point(canvas, point, text.as_ref(), 0.0, gap, style))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCall, RecordingCanvas};
    use crate::style::NodeStyle;

    fn offsets(pairs: &[(f64, f64)]) -> Vec<Offset> {
        offsets_from_pairs(pairs, PositionMode::Absolute)
    }

    #[test]
    fn open_chain_needs_two_points() {
        let mut canvas = RecordingCanvas::new();
        let style = LineStyle::default();
        for n in 0..2 {
            let points = vec![Offset::ZERO; n];
            let err = draw_open_chain(&mut canvas, &points, &ChainOptions::new(), &style)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }));
        }
        assert!(canvas.calls().is_empty());
    }

    #[test]
    fn triangle_closes() {
        let mut canvas = RecordingCanvas::new();
        let points = offsets(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let segments = draw_open_chain(
            &mut canvas,
            &points,
            &ChainOptions::new().closed(),
            &LineStyle::default(),
        )
        .unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].start(), Offset::new(0.0, 1.0));
        assert_eq!(segments[2].end(), Offset::ZERO);
    }

    #[test]
    fn two_point_chain_ignores_closure() {
        let mut canvas = RecordingCanvas::new();
        let points = offsets(&[(0.0, 0.0), (1.0, 0.0)]);
        let segments = draw_open_chain(
            &mut canvas,
            &points,
            &ChainOptions::new().closed(),
            &LineStyle::default(),
        )
        .unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn chain_with_points_draws_every_vertex() {
        let mut canvas = RecordingCanvas::new();
        let points = offsets(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let chain = draw_chain_with_points(
            &mut canvas,
            &points,
            &ChainOptions::new().closed().with_arrow(true),
            &SceneStyles::default(),
        )
        .unwrap();
        assert_eq!(chain.points.len(), 4);
        assert_eq!(chain.segments.len(), 4);
        assert!(chain.labels.is_empty());
        assert!(chain.segments.iter().all(Segment::has_arrow));
        // Point, segment, point, segment, ...
        assert!(canvas.calls()[0].is_marker());
        assert!(canvas.calls()[1].is_segment());
    }

    #[test]
    fn labelled_chain_labels_closing_segment() {
        let mut canvas = RecordingCanvas::new();
        let points = offsets(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
        let chain = draw_chain_with_points_and_labels(
            &mut canvas,
            &points,
            &ChainOptions::new().closed(),
            &SceneStyles::default(),
        )
        .unwrap();
        let texts: Vec<&str> = chain.labels.iter().map(Label::text).collect();
        assert_eq!(texts, ["3", "4", "5"]);
    }

    #[test]
    fn polar_square() {
        let mut canvas = RecordingCanvas::new();
        let steps = [
            PolarStep::new(2.0, 0.0),
            PolarStep::new(2.0, 90.0),
            PolarStep::new(2.0, 180.0),
        ];
        let chain = build_polar_chain(
            &mut canvas,
            Offset::ZERO,
            &steps,
            &ChainOptions::new().closed(),
            &SceneStyles::default(),
        )
        .unwrap();

        assert_eq!(chain.points.len(), 4);
        assert_eq!(chain.segments.len(), 4);
        assert_eq!(chain.labels.len(), 4);
        for (segment, expected) in chain.segments.iter().zip([0.0, 90.0, 180.0, 270.0]) {
            assert!((segment.length() - 2.0).abs() < 1e-9);
            assert!((segment.bearing() - expected).abs() < 1e-9);
        }
        assert!(chain.labels.iter().all(|l| l.text() == "2"));
    }

    #[test]
    fn polar_chain_reuses_existing_start() {
        let mut canvas = RecordingCanvas::new();
        let start = Point::create(&mut canvas, Offset::new(1.0, 1.0), &NodeStyle::default())
            .unwrap();
        let chain = build_polar_chain(
            &mut canvas,
            &start,
            &[PolarStep::new(1.0, 0.0)],
            &ChainOptions::new(),
            &SceneStyles::default(),
        )
        .unwrap();
        assert_eq!(chain.points.len(), 2);
        // The start point was drawn once, before the chain
        assert_eq!(canvas.markers(), 2);
    }

    #[test]
    fn polar_chain_closure_text_and_parallel() {
        let mut canvas = RecordingCanvas::new();
        let chain = build_polar_chain(
            &mut canvas,
            Offset::ZERO,
            &[PolarStep::new(1.0, 0.0), PolarStep::new(1.0, 90.0)],
            &ChainOptions::new()
                .closed()
                .with_parallel(true)
                .with_closure_text("√2"),
            &SceneStyles::default(),
        )
        .unwrap();
        let closing = chain.labels.last().unwrap();
        assert_eq!(closing.text(), "√2");
        assert!((closing.rotation() - 225.0).abs() < 1e-9);
    }

    #[test]
    fn polar_chain_needs_steps() {
        let mut canvas = RecordingCanvas::new();
        let err = build_polar_chain(
            &mut canvas,
            Offset::ZERO,
            &[],
            &ChainOptions::new(),
            &SceneStyles::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn mixed_step_without_point_or_distance_is_rejected() {
        let mut canvas = RecordingCanvas::new();
        let steps = [
            MixedStep::polar(1.0, 0.0),
            MixedStep::new(None, None, Some(45.0)),
        ];
        let err = build_mixed_chain(
            &mut canvas,
            Offset::ZERO,
            &steps,
            &ChainOptions::new(),
            &SceneStyles::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        // Start point and the first step stay drawn
        assert_eq!((canvas.markers(), canvas.segments(), canvas.texts()), (2, 1, 1));
    }

    #[test]
    fn mixed_step_without_bearing_is_rejected() {
        let mut canvas = RecordingCanvas::new();
        let err = build_mixed_chain(
            &mut canvas,
            Offset::ZERO,
            &[MixedStep::new(None, Some(2.0.into()), None)],
            &ChainOptions::new(),
            &SceneStyles::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn mixed_text_distance_must_parse_for_polar_steps() {
        let mut canvas = RecordingCanvas::new();
        let err = build_mixed_chain(
            &mut canvas,
            Offset::ZERO,
            &[MixedStep::polar("about 2", 0.0)],
            &ChainOptions::new(),
            &SceneStyles::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn mixed_chain_combines_points_and_hops() {
        let mut canvas = RecordingCanvas::new();
        let styles = SceneStyles::default();
        let a = Point::create(&mut canvas, Offset::ZERO, &styles.node).unwrap();
        let b = Point::create(&mut canvas, Offset::new(3.0, 0.0), &styles.node).unwrap();
        let c = Point::create(&mut canvas, Offset::new(10.0, 10.0), &styles.node).unwrap();

        let steps = [
            MixedStep::existing_with_length(&b, "3.0 m"),
            MixedStep::polar(4.0, 90.0),
            MixedStep::existing(&c),
            MixedStep::polar("1.5", 180.0),
        ];
        let chain = build_mixed_chain(
            &mut canvas,
            &a,
            &steps,
            &ChainOptions::new().closed().with_decimal_digits(1),
            &styles,
        )
        .unwrap();

        assert_eq!(chain.points.len(), 5);
        // b, polar hop, polar hop from c, closure
        assert_eq!(chain.segments.len(), 4);
        let texts: Vec<&str> = chain.labels.iter().map(Label::text).collect();
        assert_eq!(texts[..3], ["3.0 m", "4.0", "1.5"]);
        assert!(chain.points[4].position().approx_eq(Offset::new(8.5, 10.0), 1e-9));
        assert_eq!(chain.segments[2].start(), Offset::new(10.0, 10.0));
        assert_eq!(chain.segments[3].end(), Offset::ZERO);
    }

    #[test]
    fn existing_point_step_ignores_bearing() {
        let mut canvas = RecordingCanvas::new();
        let styles = SceneStyles::default();
        let a = Point::create(&mut canvas, Offset::ZERO, &styles.node).unwrap();
        let b = Point::create(&mut canvas, Offset::new(4.0, 0.0), &styles.node).unwrap();

        let steps = [MixedStep::new(Some(b), Some("4".into()), Some(45.0))];
        let chain =
            build_mixed_chain(&mut canvas, &a, &steps, &ChainOptions::new(), &styles).unwrap();

        assert_eq!(chain.segments.len(), 1);
        assert_eq!(chain.segments[0].end(), Offset::new(4.0, 0.0));
        assert_eq!(chain.points[1].position(), Offset::new(4.0, 0.0));
        assert_eq!(chain.labels[0].text(), "4");
        // Only a and b were drawn
        assert_eq!(canvas.markers(), 2);
    }

    #[test]
    fn fan_out_resolves_targets() {
        let mut canvas = RecordingCanvas::new();
        let center = Offset::new(1.0, 1.0);
        let targets = [Offset::new(1.0, 0.0), Offset::new(0.0, 2.0)];

        let absolute = fan_out(
            &mut canvas,
            center,
            &targets,
            PositionMode::Absolute,
            &ChainOptions::new(),
            &LineStyle::default(),
        )
        .unwrap();
        assert_eq!(absolute[1].end(), Offset::new(0.0, 2.0));

        let relative = fan_out(
            &mut canvas,
            center,
            &targets,
            PositionMode::Relative,
            &ChainOptions::new(),
            &LineStyle::default(),
        )
        .unwrap();
        assert_eq!(relative[1].end(), Offset::new(1.0, 3.0));
    }

    #[test]
    fn fan_out_labels_follow_segments() {
        let mut canvas = RecordingCanvas::new();
        let targets = [Offset::new(3.0, 4.0), Offset::new(0.0, -2.0)];
        let styles = SceneStyles::default();

        let measured = fan_out_with_points_and_labels(
            &mut canvas,
            Offset::ZERO,
            &targets,
            PositionMode::Relative,
            None,
            &ChainOptions::new(),
            &styles,
        )
        .unwrap();
        let texts: Vec<&str> = measured.labels.iter().map(Label::text).collect();
        assert_eq!(texts, ["5", "2"]);
        assert_eq!(measured.points.len(), 2);

        let fixed = fan_out_with_points_and_labels(
            &mut canvas,
            Offset::ZERO,
            &targets,
            PositionMode::Relative,
            Some("r"),
            &ChainOptions::new(),
            &styles,
        )
        .unwrap();
        assert!(fixed.labels.iter().all(|l| l.text() == "r"));
        assert!((fixed.labels[1].rotation() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn relative_pairs_accumulate() {
        let pairs = [(1.0, 0.0), (0.0, 2.0), (-1.0, 0.5)];
        assert_eq!(
            offsets_from_pairs(&pairs, PositionMode::Relative),
            [Offset::new(1.0, 0.0), Offset::new(1.0, 2.0), Offset::new(0.0, 2.5)]
        );
        assert_eq!(
            offsets_from_pairs(&pairs, PositionMode::Absolute)[2],
            Offset::new(-1.0, 0.5)
        );
    }

    #[test]
    fn label_points_pairs_texts_with_points() {
        let mut canvas = RecordingCanvas::new();
        let style = NodeStyle::default();
        let points = [
            Point::create(&mut canvas, Offset::ZERO, &style).unwrap(),
            Point::create(&mut canvas, Offset::new(1.0, 0.0), &style).unwrap(),
        ];
        let labels =
            label_points(&mut canvas, &["A", "B"], &points, Some(0.25), &TextStyle::default())
                .unwrap();
        assert_eq!(labels[1].position(), Offset::new(1.25, 0.0));

        let err = label_points(&mut canvas, &["A"], &points, None, &TextStyle::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn failing_backend_stops_the_chain() {
        let mut canvas = RecordingCanvas::failing_after(2);
        let points = offsets(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let err = draw_open_chain(&mut canvas, &points, &ChainOptions::new(), &LineStyle::default())
            .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert_eq!(canvas.calls().len(), 2);
        assert!(matches!(canvas.calls()[1], DrawCall::Line { .. }));
    }
}
