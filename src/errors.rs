//! Error types with diagnostics using miette
//!
//! Geometry and builder errors are raised synchronously and never recovered
//! locally. Backend errors pass through transparently.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// Geometry / Builder Errors
// ============================================================================

/// Errors raised while building scene geometry
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("invalid input: {message}")]
    #[diagnostic(code(netscene::invalid_input))]
    InvalidInput {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("degenerate geometry: {message}")]
    #[diagnostic(
        code(netscene::degenerate_geometry),
        help("the query has no defined value for this segment")
    )]
    DegenerateGeometry { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
            help: None,
        }
    }

    pub(crate) fn invalid_input_with_help(
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Error::InvalidInput {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        Error::DegenerateGeometry {
            message: message.into(),
        }
    }
}

// ============================================================================
// Style Errors
// ============================================================================

/// Errors from resolving caller-supplied style options
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("unknown marker shape: {code}")]
    #[diagnostic(
        code(netscene::style::unknown_marker),
        help("use one of o s ^ v < > D d * p h + x")
    )]
    UnknownMarker { code: String },

    #[error("unknown line dash: {code}")]
    #[diagnostic(
        code(netscene::style::unknown_dash),
        help("use one of - -- : -.")
    )]
    UnknownDash { code: String },

    #[error("unknown font slant: {code}")]
    #[diagnostic(
        code(netscene::style::unknown_slant),
        help("use one of normal, italic, oblique")
    )]
    UnknownSlant { code: String },

    #[error("invalid color: {value}")]
    #[diagnostic(
        code(netscene::style::invalid_color),
        help("use #rgb, #rrggbb, #rrggbbaa or a CSS color name")
    )]
    InvalidColor { value: String },

    #[error("{kind} size must be positive and finite, got {value}")]
    #[diagnostic(code(netscene::style::invalid_size))]
    InvalidSize { kind: &'static str, value: f64 },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur in a rendering backend
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("failed to write {}", .path.display())]
    #[diagnostic(code(netscene::render::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported image format: {format}")]
    #[diagnostic(code(netscene::render::unsupported_format))]
    UnsupportedFormat {
        format: String,
        #[help]
        hint: Option<String>,
    },

    #[error("rasterization failed: {message}")]
    #[diagnostic(code(netscene::render::rasterize))]
    Rasterize { message: String },

    #[error("backend failure: {message}")]
    #[diagnostic(code(netscene::render::backend))]
    Backend { message: String },
}
