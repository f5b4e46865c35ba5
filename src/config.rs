//! Scene configuration

use crate::canvas::{CanvasSetup, Title};
use crate::defaults;
use crate::errors::{Error, Result};
use crate::types::Color;

/// Settings for [`NetScene::new`](crate::NetScene::new)
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Half of the square figure's side, in inches
    pub half_size: f64,
    pub title: Option<Title>,
    /// Draw a red marker at the origin
    pub show_origin: bool,
    /// Equal aspect, hidden axes and a white background. When off the
    /// backend keeps its own defaults for these.
    pub configure_canvas: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            half_size: defaults::HALF_SIZE,
            title: None,
            show_origin: true,
            configure_canvas: true,
        }
    }
}

impl SceneConfig {
    pub fn new(half_size: f64) -> Self {
        Self {
            half_size,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: Title) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_origin(mut self, show: bool) -> Self {
        self.show_origin = show;
        self
    }

    pub fn with_canvas_configuration(mut self, configure: bool) -> Self {
        self.configure_canvas = configure;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.half_size.is_finite() && self.half_size > 0.0) {
            return Err(Error::invalid_input_with_help(
                format!("half size must be positive, got {}", self.half_size),
                "the figure side is twice the half size, in inches",
            ));
        }
        Ok(())
    }

    /// Figure settings handed to the backend
    pub fn canvas_setup(&self) -> CanvasSetup {
        CanvasSetup {
            half_size: self.half_size,
            title: self.title.clone(),
            equal_aspect: self.configure_canvas,
            hide_axes: self.configure_canvas,
            background: Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_half_size() {
        for half_size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = SceneConfig::new(half_size).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }), "{half_size}");
        }
        assert!(SceneConfig::new(0.5).validate().is_ok());
    }

    #[test]
    fn configure_canvas_controls_setup() {
        let setup = SceneConfig::default().canvas_setup();
        assert!(setup.equal_aspect && setup.hide_axes);

        let setup = SceneConfig::new(3.0)
            .with_canvas_configuration(false)
            .with_title(Title::new("net"))
            .canvas_setup();
        assert!(!setup.equal_aspect && !setup.hide_axes);
        assert_eq!(setup.half_size, 3.0);
        assert_eq!(setup.title.unwrap().text, "net");
    }
}
