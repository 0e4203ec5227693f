//! Function curves and special points

use glam::{DVec2, dvec2};

use super::defaults::{
    DEFAULT_STYLES, FUNCTION_STROKE_WIDTH, POINT_LABEL_OFFSET, POINT_RADIUS,
};
use super::svg::{Circle, Paint, Points, Polyline, SvgNode, Text};
use crate::equation::eval_function;
use crate::log::debug;
use crate::model::{FunctionPlot, SpecialPoint};
use crate::types::{Projection, Viewport};

/// Sample `equation` at `samples` evenly spaced x values across the
/// viewport, both ends included.
///
/// Returns logical-coordinate runs. A non-finite value ends the current run,
/// and runs shorter than two points are dropped, so every run can be drawn
/// as a polyline.
pub fn sample_function(equation: &str, viewport: &Viewport, samples: usize) -> Vec<Vec<DVec2>> {
    if samples < 2 {
        return Vec::new();
    }
    let step = viewport.width() / (samples - 1) as f64;
    let mut runs = Vec::new();
    let mut run = Vec::new();
    for i in 0..samples {
        let x = if i == samples - 1 {
            viewport.max_x
        } else {
            viewport.min_x + i as f64 * step
        };
        let y = eval_function(equation, x);
        if y.is_finite() {
            run.push(dvec2(x, y));
        } else if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    runs.push(run);
    runs.retain(|r| r.len() >= 2);
    debug!(equation, samples, runs = runs.len(), "sampled function");
    runs
}

/// One polyline per finite run of each function, stroked in its color.
pub fn draw_functions(
    functions: &[FunctionPlot],
    projection: &Projection,
    samples: usize,
) -> Vec<SvgNode> {
    let mut out = Vec::new();
    for function in functions {
        for run in sample_function(&function.equation, projection.viewport(), samples) {
            out.push(SvgNode::Polyline(Polyline {
                points: run.into_iter().map(|p| projection.to_screen(p)).collect(),
                paint: Paint::stroke(function.color.as_str(), FUNCTION_STROKE_WIDTH),
            }));
        }
    }
    out
}

/// Special points are always drawn; `show_labels` controls their labels.
pub fn draw_special_points(
    points: &[SpecialPoint],
    projection: &Projection,
    show_labels: bool,
) -> Vec<SvgNode> {
    let style = &DEFAULT_STYLES.special_point;
    let mut out = Vec::new();
    for point in points {
        let at = projection.to_screen(dvec2(point.x, point.y));
        let color = point.color.as_deref().unwrap_or(&style.fill);
        let mut paint = Paint::from_style(style);
        paint.fill = Some(color.to_string());
        out.push(SvgNode::Circle(Circle {
            cx: at.x,
            cy: at.y,
            r: POINT_RADIUS,
            paint,
        }));
        if let Some(label) = point.label.as_deref().filter(|_| show_labels) {
            out.push(SvgNode::Text(
                Text::new(
                    at + dvec2(POINT_LABEL_OFFSET, -POINT_LABEL_OFFSET),
                    label,
                    color,
                    style.font_size,
                )
                .anchored("start"),
            ));
        }
    }
    out
}
