//! Geometry and layout helpers for annotated 2-D diagrams.
//!
//! Place nodes by position, by offset or by distance and bearing from
//! another node, connect them with plain or arrowed segments, and label
//! segments with text that runs parallel to them or shows their length.
//!
//! ```no_run
//! use netscene::{ChainOptions, NetScene, Offset, PolarStep, SceneConfig};
//!
//! # fn main() -> netscene::Result<()> {
//! let mut scene = NetScene::svg(SceneConfig::new(3.0))?;
//! let steps = [PolarStep::new(2.0, 0.0), PolarStep::new(2.0, 90.0), PolarStep::new(2.0, 180.0)];
//! scene.add_polar_chain(Offset::ZERO, &steps, &ChainOptions::new().closed(), None)?;
//! println!("{}", scene.canvas().to_svg());
//! # Ok(())
//! # }
//! ```
//!
//! Drawing goes through the [`Canvas`] trait; [`SvgCanvas`] builds an SVG
//! document and [`RecordingCanvas`] keeps the draw calls as data.

pub mod canvas;
pub mod chain;
pub mod config;
pub mod defaults;
pub mod errors;
pub mod geometry;
mod log;
pub mod placement;
pub mod scene;
pub mod style;
pub mod types;

pub use canvas::{
    Canvas, CanvasSetup, DrawCall, ExportOptions, ImageFormat, RecordingCanvas, SvgCanvas, Title,
};
pub use chain::{Anchor, Chain, ChainOptions, MixedStep, PolarStep, PositionMode, StepDistance};
pub use config::SceneConfig;
pub use errors::{Error, RenderError, Result, StyleError};
pub use geometry::{Label, Point, Segment};
pub use placement::MeasureOptions;
pub use scene::NetScene;
pub use style::{
    FontSlant, LineDash, LineStyle, MarkerShape, NodeStyle, SceneStyles, StyleOptions, TextStyle,
};
pub use types::{BBox, Color, Offset};
