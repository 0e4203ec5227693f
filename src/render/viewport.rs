//! Fitting a viewport to scene content

use glam::DVec2;

use super::defaults::DEGENERATE_SPAN_WIDEN;
use crate::errors::RenderError;
use crate::log::debug;
use crate::model::{DiagramElement, Scene};
use crate::types::{BBox, Viewport};

/// Logical bounds of everything auto-fit looks at: every declared point
/// (visible or not) and the axis extremes of every circle whose center
/// resolves.
pub fn content_bounds(scene: &Scene) -> BBox {
    let mut bounds = BBox::new();
    for point in scene.points.values() {
        bounds.expand_point(point.pos());
    }
    for element in &scene.elements {
        if let DiagramElement::Circle(circle) = element {
            if let Some(center) = scene.point(&circle.center_point_id) {
                bounds.expand_circle(center.pos(), circle.radius);
            }
        }
    }
    bounds
}

/// Snap one axis outwards to whole units, widening a zero span.
fn snap_axis(min: f64, max: f64) -> (f64, f64) {
    let (min, max) = (min.floor(), max.ceil());
    if max > min {
        (min, max)
    } else {
        (min - DEGENERATE_SPAN_WIDEN, max + DEGENERATE_SPAN_WIDEN)
    }
}

/// Content bounds snapped to whole units, before padding. An empty scene
/// fits around the origin.
pub fn fit_content(scene: &Scene) -> Viewport {
    let bounds = content_bounds(scene);
    let (min, max) = if bounds.is_empty() {
        (DVec2::ZERO, DVec2::ZERO)
    } else {
        (bounds.min, bounds.max)
    };
    let (min_x, max_x) = snap_axis(min.x, max.x);
    let (min_y, max_y) = snap_axis(min.y, max.y);
    Viewport::new(min_x, max_x, min_y, max_y)
}

/// The viewport a scene renders in.
///
/// Explicit ranges are used unmodified. Any axis without one is fitted to
/// the content and then padded by `padding_percent` of its span per side.
pub fn auto_viewport(scene: &Scene, padding_percent: f64) -> Result<Viewport, RenderError> {
    let viewport = match (scene.x_range, scene.y_range) {
        (Some((min_x, max_x)), Some((min_y, max_y))) => {
            Viewport::new(min_x, max_x, min_y, max_y)
        }
        (x_range, y_range) => {
            let fitted = fit_content(scene).padded(padding_percent);
            let (min_x, max_x) = x_range.unwrap_or((fitted.min_x, fitted.max_x));
            let (min_y, max_y) = y_range.unwrap_or((fitted.min_y, fitted.max_y));
            Viewport::new(min_x, max_x, min_y, max_y)
        }
    };
    viewport.validate()?;
    debug!(%viewport, explicit_x = scene.x_range.is_some(), explicit_y = scene.y_range.is_some(), "viewport");
    Ok(viewport)
}
