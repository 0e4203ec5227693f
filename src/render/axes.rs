//! Grid, axes and tick marks
//!
//! Grid lines and ticks sit at whole multiples of the grid step, so they
//! stay aligned with the origin whatever the viewport. An axis (and its
//! ticks) is only drawn when logical zero on the other axis is in view.

use glam::dvec2;

use super::RenderOptions;
use super::defaults::{
    ARROW_LENGTH, ARROW_WIDTH, AXIS_COLOR, AXIS_LABEL_GAP, FALLBACK_CELL, FALLBACK_COLOR,
    FALLBACK_DASH, FONT_SIZE, GRID_COLOR, MAX_GRID_LINES, TICK_FONT_SIZE, TICK_HALF,
    TICK_LABEL_COLOR, TICK_LABEL_GAP,
};
use super::svg::{Group, Line, Paint, SvgNode, Text, fmt_num, render_arrowhead};
use crate::types::{CanvasSize, Projection};

/// Multiples of `step` inside `[min, max]`, as integer multipliers with the
/// step actually used. The step doubles until the count fits under
/// `MAX_GRID_LINES`.
fn grid_multiples(min: f64, max: f64, step: f64) -> (f64, std::ops::RangeInclusive<i64>) {
    let mut step = step;
    while (max - min) / step > MAX_GRID_LINES as f64 {
        step *= 2.0;
    }
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (step, first..=last)
}

/// Grid, axes and ticks, each in its own group, as enabled by `options`.
pub fn background(projection: &Projection, options: &RenderOptions) -> Vec<SvgNode> {
    let mut out = Vec::new();
    if options.show_grid {
        out.push(group("grid", grid(projection, options.grid_step)));
    }
    if options.show_axes {
        out.push(group("axes", axes(projection)));
        out.push(group("ticks", ticks(projection, options.grid_step)));
    }
    out.retain(|node| !matches!(node, SvgNode::G(g) if g.children.is_empty()));
    out
}

fn group(class: &str, children: Vec<SvgNode>) -> SvgNode {
    SvgNode::G(Group {
        class: Some(class.to_string()),
        children,
    })
}

fn grid(projection: &Projection, step: f64) -> Vec<SvgNode> {
    let vp = projection.viewport();
    let canvas = projection.canvas();
    let paint = Paint::stroke(GRID_COLOR, 1.0);
    let mut out = Vec::new();

    let (step_x, xs) = grid_multiples(vp.min_x, vp.max_x, step);
    for k in xs {
        let sx = projection.screen_x(k as f64 * step_x);
        out.push(SvgNode::Line(Line::between(
            dvec2(sx, 0.0),
            dvec2(sx, canvas.height),
            paint.clone(),
        )));
    }
    let (step_y, ys) = grid_multiples(vp.min_y, vp.max_y, step);
    for k in ys {
        let sy = projection.screen_y(k as f64 * step_y);
        out.push(SvgNode::Line(Line::between(
            dvec2(0.0, sy),
            dvec2(canvas.width, sy),
            paint.clone(),
        )));
    }
    out
}

fn axes(projection: &Projection) -> Vec<SvgNode> {
    let vp = projection.viewport();
    let canvas = projection.canvas();
    let paint = Paint::stroke(AXIS_COLOR, 1.5);
    let mut out = Vec::new();

    if vp.contains_zero_y() {
        let y0 = projection.screen_y(0.0);
        let (start, end) = (dvec2(0.0, y0), dvec2(canvas.width, y0));
        out.push(SvgNode::Line(Line::between(start, end, paint.clone())));
        if let Some(head) = render_arrowhead(start, end, AXIS_COLOR, ARROW_LENGTH, ARROW_WIDTH) {
            out.push(SvgNode::Polygon(head));
        }
        out.push(SvgNode::Text(Text::new(
            dvec2(canvas.width - AXIS_LABEL_GAP, y0 - AXIS_LABEL_GAP),
            "x",
            AXIS_COLOR,
            FONT_SIZE,
        )));
    }

    if vp.contains_zero_x() {
        let x0 = projection.screen_x(0.0);
        let (start, end) = (dvec2(x0, canvas.height), dvec2(x0, 0.0));
        out.push(SvgNode::Line(Line::between(start, end, paint)));
        if let Some(head) = render_arrowhead(start, end, AXIS_COLOR, ARROW_LENGTH, ARROW_WIDTH) {
            out.push(SvgNode::Polygon(head));
        }
        out.push(SvgNode::Text(
            Text::new(
                dvec2(x0 + AXIS_LABEL_GAP, AXIS_LABEL_GAP),
                "y",
                AXIS_COLOR,
                FONT_SIZE,
            )
            .centered_vertically(),
        ));
    }
    out
}

fn ticks(projection: &Projection, step: f64) -> Vec<SvgNode> {
    let vp = projection.viewport();
    let paint = Paint::stroke(AXIS_COLOR, 1.0);
    let mut out = Vec::new();
    let label = |at, value: f64| Text::new(at, fmt_num(value), TICK_LABEL_COLOR, TICK_FONT_SIZE);

    if vp.contains_zero_y() {
        let y0 = projection.screen_y(0.0);
        let (step_x, xs) = grid_multiples(vp.min_x, vp.max_x, step);
        for k in xs.filter(|&k| k != 0) {
            let value = k as f64 * step_x;
            let sx = projection.screen_x(value);
            out.push(SvgNode::Line(Line::between(
                dvec2(sx, y0 - TICK_HALF),
                dvec2(sx, y0 + TICK_HALF),
                paint.clone(),
            )));
            out.push(SvgNode::Text(label(dvec2(sx, y0 + TICK_LABEL_GAP), value)));
        }
    }

    if vp.contains_zero_x() {
        let x0 = projection.screen_x(0.0);
        let (step_y, ys) = grid_multiples(vp.min_y, vp.max_y, step);
        for k in ys.filter(|&k| k != 0) {
            let value = k as f64 * step_y;
            let sy = projection.screen_y(value);
            out.push(SvgNode::Line(Line::between(
                dvec2(x0 - TICK_HALF, sy),
                dvec2(x0 + TICK_HALF, sy),
                paint.clone(),
            )));
            out.push(SvgNode::Text(
                label(dvec2(x0 - TICK_HALF * 2.0, sy), value)
                    .anchored("end")
                    .centered_vertically(),
            ));
        }
    }

    // The origin gets one label at the intersection instead of a tick on each axis.
    if vp.contains_zero_x() && vp.contains_zero_y() {
        let origin = projection.to_screen(glam::DVec2::ZERO);
        out.push(SvgNode::Text(
            label(dvec2(origin.x - TICK_HALF * 2.0, origin.y + TICK_LABEL_GAP), 0.0).anchored("end"),
        ));
    }
    out
}

/// Dashed square cells covering the whole canvas. Cells grow on huge
/// canvases the same way the main grid is coarsened.
pub fn fallback_grid(canvas: CanvasSize) -> Vec<SvgNode> {
    let paint = Paint::stroke(FALLBACK_COLOR, 1.0).dashed(FALLBACK_DASH);
    let mut out = Vec::new();
    let (x_cell, columns) = grid_multiples(0.0, canvas.width, FALLBACK_CELL);
    let (y_cell, rows) = grid_multiples(0.0, canvas.height, FALLBACK_CELL);
    for i in columns {
        let x = i as f64 * x_cell;
        out.push(SvgNode::Line(Line::between(
            dvec2(x, 0.0),
            dvec2(x, canvas.height),
            paint.clone(),
        )));
    }
    for j in rows {
        let y = j as f64 * y_cell;
        out.push(SvgNode::Line(Line::between(
            dvec2(0.0, y),
            dvec2(canvas.width, y),
            paint.clone(),
        )));
    }
    out
}
