//! Coordinate-plane diagrams for exam questions.
//!
//! The crate is a small pipeline:
//!
//! 1. [`command::parse_command`] turns a GeoGebra-like command string
//!    (`ZoomIn(...)`, `f(x)=...`, `g(x)=...`, `h(x)=...` separated by `;`)
//!    into a [`DiagramSpec`].
//! 2. [`equation::eval_function`] evaluates one of a fixed family of
//!    equation forms at a given `x`.
//! 3. [`render`] projects logical coordinates onto a pixel canvas and emits
//!    SVG: grid, axes, ticks, sampled function curves, and the point/element
//!    graph of a [`Scene`].
//!
//! Parsing and evaluation are total: malformed input degrades to defaults,
//! never to an error. Rendering only fails on invalid configuration.
//!
//! ```
//! use graphpaper::{ParseOptions, RenderOptions, render_command};
//!
//! let svg = render_command(
//!     "ZoomIn(-5,5,-5,5);f(x)=x^2-5x+6",
//!     &ParseOptions::default(),
//!     &RenderOptions::default(),
//! )
//! .unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

use pest_derive::Parser;

pub mod command;
pub mod data;
pub mod equation;
pub mod errors;
pub mod log;
pub mod model;
pub mod render;
pub mod types;

pub use command::{ParseOptions, parse_command, quadratic_roots};
pub use equation::eval_function;
pub use errors::{DataError, RenderError};
pub use model::{
    AngleElement, CircleElement, DiagramElement, DiagramKind, DiagramSpec, FunctionPlot,
    LineElement, Point, PolygonElement, Scene, SpecialPoint, Style, TextAnchor, TextElement,
};
pub use render::{
    RenderOptions, render_blank, render_optional_spec, render_scene, render_spec,
};
pub use types::{CanvasSize, Projection, Viewport};

#[derive(Parser)]
#[grammar = "graphpaper.pest"]
pub struct DiagramParser;

/// Parse a command string and render it to SVG.
///
/// The command itself cannot fail to parse; errors only come from invalid
/// render options.
pub fn render_command(
    input: &str,
    parse_options: &ParseOptions,
    render_options: &RenderOptions,
) -> Result<String, RenderError> {
    let spec = parse_command(input, parse_options);
    render_spec(&spec, render_options)
}
