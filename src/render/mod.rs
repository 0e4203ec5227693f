//! SVG rendering for coordinate diagrams
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes, colors and the style table
//! - `viewport`: Auto-fitting a viewport to scene content
//! - `axes`: Grid, axes, ticks and the placeholder grid
//! - `elements`: Drawing points and the element variants
//! - `plot`: Sampling and drawing functions and special points
//! - `svg`: The SVG node tree and its serialization
//!
//! Layers are drawn back to front: grid, axes, ticks, then content.

pub mod axes;
pub mod defaults;
pub mod elements;
pub mod plot;
pub mod svg;
pub mod viewport;

use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::log::debug;
use crate::model::{DiagramSpec, Draw, Scene};
use crate::types::{CanvasSize, Projection};
use elements::DrawContext;
use svg::{Group, Svg, SvgNode};

/// Canvas size, grid and display switches for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub width: f64,
    pub height: f64,
    /// Grid and tick spacing in logical units
    pub grid_step: f64,
    /// Auto-fit margin, as a percentage of each axis span
    pub padding_percent: f64,
    /// Samples per plotted function
    pub samples: usize,
    pub show_grid: bool,
    pub show_axes: bool,
    /// Point labels, element labels and freestanding text
    pub show_labels: bool,
    pub show_measurements: bool,
    /// Points and elements marked as part of the solution
    pub show_solution: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: defaults::CANVAS_WIDTH,
            height: defaults::CANVAS_HEIGHT,
            grid_step: defaults::GRID_STEP,
            padding_percent: defaults::PADDING_PERCENT,
            samples: defaults::SAMPLES,
            show_grid: true,
            show_axes: true,
            show_labels: true,
            show_measurements: true,
            show_solution: false,
        }
    }
}

impl RenderOptions {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_solution(mut self, show: bool) -> Self {
        self.show_solution = show;
        self
    }

    pub fn canvas(&self) -> Result<CanvasSize, RenderError> {
        CanvasSize::try_new(self.width, self.height)
    }

    /// Check every numeric field, returning the canvas size on success.
    pub fn validate(&self) -> Result<CanvasSize, RenderError> {
        let canvas = self.canvas()?;
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(RenderError::InvalidGridStep {
                value: self.grid_step,
            });
        }
        if !(self.padding_percent.is_finite() && self.padding_percent >= 0.0) {
            return Err(RenderError::InvalidPadding {
                value: self.padding_percent,
            });
        }
        if self.samples < 2 {
            return Err(RenderError::TooFewSamples {
                samples: self.samples,
            });
        }
        Ok(canvas)
    }
}

/// Append `<g class=...>` holding `children`, unless there are none.
fn push_group(out: &mut Vec<SvgNode>, class: &str, children: Vec<SvgNode>) {
    if !children.is_empty() {
        out.push(SvgNode::G(Group {
            class: Some(class.to_string()),
            children,
        }));
    }
}

/// Render a point/element scene.
///
/// Without explicit ranges the viewport is fitted to the content. Elements
/// referencing a missing point are skipped.
pub fn render_scene(scene: &Scene, options: &RenderOptions) -> Result<String, RenderError> {
    let canvas = options.validate()?;
    scene.validate()?;
    let viewport = viewport::auto_viewport(scene, options.padding_percent)?;
    let projection = Projection::new(viewport, canvas);
    debug!(%viewport, points = scene.points.len(), elements = scene.elements.len(), "render scene");

    let mut children = axes::background(&projection, options);

    let cx = DrawContext {
        scene,
        projection: &projection,
        options,
    };
    let mut drawn = Vec::new();
    for element in &scene.elements {
        if !element.is_visible() || (element.is_solution() && !options.show_solution) {
            continue;
        }
        element.draw(&cx, &mut drawn);
    }
    push_group(&mut children, "elements", drawn);
    push_group(&mut children, "points", elements::draw_points(&cx));

    Svg::new(canvas.width, canvas.height, children).to_xml()
}

/// Render a coordinate diagram: background, sampled functions and special
/// points over the spec's own viewport.
pub fn render_spec(spec: &DiagramSpec, options: &RenderOptions) -> Result<String, RenderError> {
    let canvas = options.validate()?;
    spec.validate()?;
    let projection = Projection::new(spec.viewport(), canvas);
    debug!(viewport = %spec.viewport(), functions = spec.functions.len(), "render spec");

    let mut children = axes::background(&projection, options);
    push_group(
        &mut children,
        "functions",
        plot::draw_functions(&spec.functions, &projection, options.samples),
    );
    push_group(
        &mut children,
        "special-points",
        plot::draw_special_points(&spec.special_points, &projection, options.show_labels),
    );

    Svg::new(canvas.width, canvas.height, children).to_xml()
}

/// The placeholder for questions without a diagram: a dashed square grid.
pub fn render_blank(options: &RenderOptions) -> Result<String, RenderError> {
    let canvas = options.canvas()?;
    let mut children = Vec::new();
    push_group(&mut children, "fallback-grid", axes::fallback_grid(canvas));
    Svg::new(canvas.width, canvas.height, children).to_xml()
}

/// Render `spec` if there is one, otherwise the placeholder grid.
pub fn render_optional_spec(
    spec: Option<&DiagramSpec>,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    match spec {
        Some(spec) => render_spec(spec, options),
        None => render_blank(options),
    }
}
