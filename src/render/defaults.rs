//! Default sizes and styles (pixels unless noted).
//!
//! The style table is a process-wide constant. Per-item [`Style`] overrides
//! are merged over a copy, so nothing here ever changes at runtime.
//!
//! [`Style`]: crate::model::Style

use std::borrow::Cow;

use crate::model::TextAnchor;

pub const CANVAS_WIDTH: f64 = 600.0;
pub const CANVAS_HEIGHT: f64 = 400.0;
/// Grid spacing in logical units
pub const GRID_STEP: f64 = 1.0;
pub const PADDING_PERCENT: f64 = 10.0;
pub const SAMPLES: usize = 50;

/// Auto-fit widens a zero-span axis by this many logical units each way
pub const DEGENERATE_SPAN_WIDEN: f64 = 5.0;
/// Coarsen the grid rather than emit more lines than this per axis
pub const MAX_GRID_LINES: usize = 500;

pub const POINT_RADIUS: f64 = 4.0;
pub const POINT_LABEL_OFFSET: f64 = 8.0;
pub const MEASUREMENT_OFFSET: f64 = 10.0;
pub const ANGLE_RADIUS: f64 = 30.0;
pub const ANGLE_LABEL_FACTOR: f64 = 1.2;
pub const CIRCLE_LABEL_GAP: f64 = 8.0;

pub const ARROW_LENGTH: f64 = 10.0;
pub const ARROW_WIDTH: f64 = 8.0;
pub const TICK_HALF: f64 = 4.0;
pub const TICK_LABEL_GAP: f64 = 16.0;
pub const AXIS_LABEL_GAP: f64 = 14.0;

pub const FONT_FAMILY: &str = "sans-serif";
pub const FONT_SIZE: f64 = 14.0;
pub const TICK_FONT_SIZE: f64 = 11.0;

pub const GRID_COLOR: &str = "#e0e0e0";
pub const AXIS_COLOR: &str = "#333333";
pub const TICK_LABEL_COLOR: &str = "#555555";
pub const FUNCTION_STROKE_WIDTH: f64 = 2.0;

/// Cell size of the placeholder grid drawn when there is no diagram
pub const FALLBACK_CELL: f64 = 20.0;
pub const FALLBACK_COLOR: &str = "#cccccc";
pub const FALLBACK_DASH: &str = "4 4";

/// A fully specified style, the result of merging overrides over a default.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub stroke: Cow<'static, str>,
    pub stroke_width: f64,
    pub fill: Cow<'static, str>,
    pub fill_opacity: f64,
    pub stroke_dasharray: Option<Cow<'static, str>>,
    pub font_size: f64,
    pub text_anchor: TextAnchor,
}

impl ResolvedStyle {
    const fn new(stroke: &'static str, stroke_width: f64, fill: &'static str, fill_opacity: f64) -> Self {
        ResolvedStyle {
            stroke: Cow::Borrowed(stroke),
            stroke_width,
            fill: Cow::Borrowed(fill),
            fill_opacity,
            stroke_dasharray: None,
            font_size: FONT_SIZE,
            text_anchor: TextAnchor::Middle,
        }
    }
}

/// Default style per item kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultStyles {
    pub point: ResolvedStyle,
    pub line: ResolvedStyle,
    pub circle: ResolvedStyle,
    pub text: ResolvedStyle,
    pub angle: ResolvedStyle,
    pub polygon: ResolvedStyle,
    pub special_point: ResolvedStyle,
}

pub static DEFAULT_STYLES: DefaultStyles = DefaultStyles {
    point: ResolvedStyle::new("#000000", 1.0, "#000000", 1.0),
    line: ResolvedStyle::new("#000000", 2.0, "none", 1.0),
    circle: ResolvedStyle::new("#1f77b4", 2.0, "none", 1.0),
    text: ResolvedStyle::new("none", 0.0, "#000000", 1.0),
    angle: ResolvedStyle::new("#d62728", 1.5, "none", 1.0),
    polygon: ResolvedStyle::new("#2ca02c", 2.0, "#2ca02c", 0.2),
    special_point: ResolvedStyle::new("#ffffff", 1.5, "#000000", 1.0),
};
