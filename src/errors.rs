//! Error types with rich diagnostics using miette
//!
//! Parsing commands and evaluating equations never fails; these errors only
//! cover invalid render configuration and malformed JSON handed over at the
//! data boundary.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Render Errors
// ============================================================================

/// Invalid numeric configuration found before rendering.
///
/// Zero, negative and non-finite sizes are rejected rather than clamped, for
/// canvas dimensions, grid step and radii alike.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid canvas size {width}x{height}")]
    #[diagnostic(
        code(graphpaper::render::invalid_canvas),
        help("width and height must be finite and greater than zero")
    )]
    InvalidCanvas { width: f64, height: f64 },

    #[error("invalid grid step: {value}")]
    #[diagnostic(
        code(graphpaper::render::invalid_grid_step),
        help("the grid step is in logical units and must be greater than zero")
    )]
    InvalidGridStep { value: f64 },

    #[error("invalid padding: {value}%")]
    #[diagnostic(code(graphpaper::render::invalid_padding))]
    InvalidPadding { value: f64 },

    #[error("need at least 2 samples per function, got {samples}")]
    #[diagnostic(code(graphpaper::render::too_few_samples))]
    TooFewSamples { samples: usize },

    #[error("`{id}` has invalid radius {radius}")]
    #[diagnostic(
        code(graphpaper::render::invalid_radius),
        help("radii are in logical units and must be greater than zero")
    )]
    InvalidRadius { id: String, radius: f64 },

    #[error("`{id}` has a NaN or infinite coordinate")]
    #[diagnostic(code(graphpaper::render::non_finite_coordinate))]
    NonFiniteCoordinate { id: String },

    #[error("degenerate viewport: x in [{min_x}, {max_x}], y in [{min_y}, {max_y}]")]
    #[diagnostic(
        code(graphpaper::render::degenerate_viewport),
        help("each axis needs finite bounds with max > min")
    )]
    DegenerateViewport {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    },

    #[error("failed to write SVG: {message}")]
    #[diagnostic(code(graphpaper::render::serialize))]
    Serialize { message: String },
}

// ============================================================================
// Data Errors
// ============================================================================

/// Errors from decoding diagram JSON.
#[derive(Error, Diagnostic, Debug)]
pub enum DataError {
    #[error("malformed diagram data: {message}")]
    #[diagnostic(code(graphpaper::data::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] RenderError),
}

impl DataError {
    /// Build a syntax error pointing at a 1-based line/column in `source`.
    pub(crate) fn syntax(
        name: &str,
        source: &str,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        let offset = byte_offset(source, line, column);
        DataError::Syntax {
            message: message.into(),
            src: NamedSource::new(name, source.to_string()),
            span: SourceSpan::from((offset, 0)),
        }
    }
}

/// Convert a 1-based line/column pair into a byte offset, clamped to the
/// source length.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}
