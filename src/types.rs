//! Strongly-typed geometry primitives: logical viewports, bounding boxes,
//! canvas sizes and the logical -> pixel projection.
//!
//! Logical coordinates are Y-up (the maths convention); pixel coordinates are
//! SVG's Y-down. The only place the two meet is [`Projection`].

use std::fmt;

use glam::{DAffine2, DMat2, DVec2, dvec2};

use crate::errors::RenderError;

/// The logical rectangle mapped onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Viewport {
    /// (-10, 10) on both axes.
    pub const SYMMETRIC: Viewport = Viewport::new(-10.0, 10.0, -10.0, 10.0);

    /// x in (0, 10), y in (-10, 10).
    pub const FIRST_QUADRANT: Viewport = Viewport::new(0.0, 10.0, -10.0, 10.0);

    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Viewport {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Build a viewport, returning `None` unless every bound is finite and
    /// `max > min` on both axes.
    pub fn checked(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Option<Self> {
        let vp = Viewport::new(min_x, max_x, min_y, max_y);
        vp.validate().ok().map(|_| vp)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether logical x = 0 lies inside the horizontal range (the y-axis is visible).
    pub fn contains_zero_x(&self) -> bool {
        self.min_x <= 0.0 && 0.0 <= self.max_x
    }

    /// Whether logical y = 0 lies inside the vertical range (the x-axis is visible).
    pub fn contains_zero_y(&self) -> bool {
        self.min_y <= 0.0 && 0.0 <= self.max_y
    }

    /// Grow each axis by `percent` of its span on both sides.
    pub fn padded(&self, percent: f64) -> Viewport {
        let pad_x = self.width() * percent / 100.0;
        let pad_y = self.height() * percent / 100.0;
        Viewport::new(
            self.min_x - pad_x,
            self.max_x + pad_x,
            self.min_y - pad_y,
            self.max_y + pad_y,
        )
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if finite && self.max_x > self.min_x && self.max_y > self.min_y {
            Ok(())
        } else {
            Err(RenderError::DegenerateViewport {
                min_x: self.min_x,
                max_x: self.max_x,
                min_y: self.min_y,
                max_y: self.max_y,
            })
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

/// Axis-aligned bounding box in logical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand to include the four axis extremes of a circle
    pub fn expand_circle(&mut self, center: DVec2, radius: f64) {
        self.expand_point(center - DVec2::splat(radius));
        self.expand_point(center + DVec2::splat(radius));
    }
}

/// Pixel size of the output drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Create a canvas size with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(width: f64, height: f64) -> Result<Self, RenderError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(width) && ok(height) {
            Ok(CanvasSize { width, height })
        } else {
            Err(RenderError::InvalidCanvas { width, height })
        }
    }
}

/// Affine map from logical coordinates to canvas pixels.
///
/// Scaling is independent per axis, so a shape drawn with a single radius
/// (circles, angle arcs) is only round when `x_scale == y_scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    viewport: Viewport,
    canvas: CanvasSize,
    affine: DAffine2,
}

impl Projection {
    /// The viewport must already be validated; a zero span would yield an
    /// infinite scale.
    pub fn new(viewport: Viewport, canvas: CanvasSize) -> Self {
        let x_scale = canvas.width / viewport.width();
        let y_scale = canvas.height / viewport.height();
        // screen_x = (x - min_x) * x_scale
        // screen_y = height - (y - min_y) * y_scale
        let affine = DAffine2::from_mat2_translation(
            DMat2::from_diagonal(dvec2(x_scale, -y_scale)),
            dvec2(
                -viewport.min_x * x_scale,
                canvas.height + viewport.min_y * y_scale,
            ),
        );
        Projection {
            viewport,
            canvas,
            affine,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Pixels per logical unit along x
    pub fn x_scale(&self) -> f64 {
        self.affine.matrix2.x_axis.x
    }

    /// Pixels per logical unit along y
    pub fn y_scale(&self) -> f64 {
        -self.affine.matrix2.y_axis.y
    }

    pub fn to_screen(&self, p: DVec2) -> DVec2 {
        self.affine.transform_point2(p)
    }

    pub fn screen_x(&self, x: f64) -> f64 {
        self.to_screen(dvec2(x, 0.0)).x
    }

    pub fn screen_y(&self, y: f64) -> f64 {
        self.to_screen(dvec2(0.0, y)).y
    }

    /// Convert a logical length measured along x (radii) to pixels.
    pub fn len_x(&self, len: f64) -> f64 {
        len * self.x_scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== Viewport tests ====================

    #[test]
    fn viewport_checked_rejects_inverted_axis() {
        assert!(Viewport::checked(5.0, -5.0, 0.0, 1.0).is_none());
        assert!(Viewport::checked(0.0, 1.0, 2.0, 2.0).is_none());
    }

    #[test]
    fn viewport_checked_rejects_non_finite() {
        assert!(Viewport::checked(f64::NAN, 1.0, 0.0, 1.0).is_none());
        assert!(Viewport::checked(0.0, f64::INFINITY, 0.0, 1.0).is_none());
    }

    #[test]
    fn viewport_padded_grows_both_sides() {
        let vp = Viewport::new(0.0, 4.0, 0.0, 3.0).padded(10.0);
        assert!(close(vp.min_x, -0.4));
        assert!(close(vp.max_x, 4.4));
        assert!(close(vp.min_y, -0.3));
        assert!(close(vp.max_y, 3.3));
    }

    #[test]
    fn viewport_zero_containment() {
        assert!(Viewport::SYMMETRIC.contains_zero_x());
        assert!(Viewport::FIRST_QUADRANT.contains_zero_x());
        assert!(!Viewport::new(1.0, 5.0, -1.0, 1.0).contains_zero_x());
        assert!(!Viewport::new(-1.0, 1.0, 2.0, 3.0).contains_zero_y());
    }

    // ==================== BBox tests ====================

    #[test]
    fn bbox_new_is_empty() {
        assert!(BBox::new().is_empty());
    }

    #[test]
    fn bbox_expand_point() {
        let mut bb = BBox::new();
        bb.expand_point(dvec2(1.0, 2.0));
        bb.expand_point(dvec2(3.0, -4.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.min, dvec2(1.0, -4.0));
        assert_eq!(bb.max, dvec2(3.0, 2.0));
    }

    #[test]
    fn bbox_expand_circle() {
        let mut bb = BBox::new();
        bb.expand_circle(dvec2(1.0, 1.0), 2.0);
        assert_eq!(bb.min, dvec2(-1.0, -1.0));
        assert_eq!(bb.max, dvec2(3.0, 3.0));
    }

    // ==================== CanvasSize tests ====================

    #[test]
    fn canvas_rejects_zero_and_nan() {
        assert!(CanvasSize::try_new(0.0, 10.0).is_err());
        assert!(CanvasSize::try_new(10.0, -1.0).is_err());
        assert!(CanvasSize::try_new(f64::NAN, 10.0).is_err());
        assert!(CanvasSize::try_new(600.0, 400.0).is_ok());
    }

    // ==================== Projection tests ====================

    fn projection() -> Projection {
        Projection::new(
            Viewport::SYMMETRIC,
            CanvasSize::try_new(600.0, 400.0).unwrap(),
        )
    }

    #[test]
    fn projection_scales_are_independent() {
        let p = projection();
        assert!(close(p.x_scale(), 30.0));
        assert!(close(p.y_scale(), 20.0));
    }

    #[test]
    fn projection_maps_corners() {
        let p = projection();
        let bottom_left = p.to_screen(dvec2(-10.0, -10.0));
        let top_right = p.to_screen(dvec2(10.0, 10.0));
        assert!(close(bottom_left.x, 0.0) && close(bottom_left.y, 400.0));
        assert!(close(top_right.x, 600.0) && close(top_right.y, 0.0));
    }

    #[test]
    fn projection_origin_is_centered() {
        let p = projection();
        assert!(close(p.screen_x(0.0), 300.0));
        assert!(close(p.screen_y(0.0), 200.0));
    }

    #[test]
    fn projection_inverts_y() {
        let p = projection();
        assert!(p.screen_y(5.0) < p.screen_y(0.0));
    }

    #[test]
    fn radius_uses_x_scale_only() {
        let p = projection();
        assert!(close(p.len_x(2.0), 60.0));
    }
}
