//! Diagram data model.
//!
//! Two inputs feed the renderer:
//! - [`DiagramSpec`]: a coordinate plane with sampled functions, usually
//!   produced by [`crate::parse_command`] or decoded from quiz JSON.
//! - [`Scene`]: an id-keyed map of [`Point`]s plus [`DiagramElement`]s that
//!   reference those points by id.
//!
//! Everything here is plain data, built fresh per render and discarded after.

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::render::defaults::ResolvedStyle;
use crate::render::elements::DrawContext;
use crate::render::svg::SvgNode;
use crate::types::Viewport;

fn default_visible() -> bool {
    true
}

// ============================================================================
// Style
// ============================================================================

/// Horizontal anchoring of a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Per-item visual overrides. Unset fields fall back to the defaults for the
/// item's kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill: Option<String>,
    pub fill_opacity: Option<f64>,
    pub stroke_dasharray: Option<String>,
    pub font_size: Option<f64>,
    pub text_anchor: Option<TextAnchor>,
}

impl Style {
    /// Shallow-merge these overrides over `base`; `base` itself is untouched.
    pub fn resolve(&self, base: &ResolvedStyle) -> ResolvedStyle {
        let mut out = base.clone();
        if let Some(stroke) = &self.stroke {
            out.stroke = stroke.clone().into();
        }
        if let Some(width) = self.stroke_width {
            out.stroke_width = width;
        }
        if let Some(fill) = &self.fill {
            out.fill = fill.clone().into();
        }
        if let Some(opacity) = self.fill_opacity {
            out.fill_opacity = opacity;
        }
        if let Some(dash) = &self.stroke_dasharray {
            out.stroke_dasharray = Some(dash.clone().into());
        }
        if let Some(size) = self.font_size {
            out.font_size = size;
        }
        if let Some(anchor) = self.text_anchor {
            out.text_anchor = anchor;
        }
        out
    }
}

// ============================================================================
// Points
// ============================================================================

/// A named point in logical coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Filled from the map key when decoding a scene
    #[serde(default)]
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub style: Style,
    /// Only drawn when solutions are shown
    #[serde(default)]
    pub solution: bool,
}

impl Point {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Point {
            id: id.into(),
            x,
            y,
            label: None,
            visible: true,
            style: Style::default(),
            solution: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn solution(mut self) -> Self {
        self.solution = true;
        self
    }

    pub fn pos(&self) -> DVec2 {
        dvec2(self.x, self.y)
    }
}

// ============================================================================
// Elements
// ============================================================================

/// Behaviour shared by every diagram element.
#[enum_dispatch]
pub trait Draw {
    fn id(&self) -> &str;

    fn is_visible(&self) -> bool;

    fn is_solution(&self) -> bool;

    /// Reject values that would put NaN or infinity into the drawing
    fn validate(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Append this element's SVG nodes. Elements whose point references do
    /// not resolve append nothing.
    fn draw(&self, cx: &DrawContext<'_>, out: &mut Vec<SvgNode>);
}

/// Straight segment between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    pub id: String,
    pub point1_id: String,
    pub point2_id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub measurement: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub solution: bool,
}

/// Circle around a point, radius in logical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleElement {
    pub id: String,
    pub center_point_id: String,
    pub radius: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub solution: bool,
}

/// Freestanding text at logical coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub content: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub solution: bool,
}

/// Arc marking the angle at `vertex` between the rays to `point1` and `point2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleElement {
    pub id: String,
    pub vertex: String,
    pub point1: String,
    pub point2: String,
    /// Arc radius in logical units; defaults to a fixed pixel radius
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub measurement: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub solution: bool,
}

/// Closed polygon through three or more points, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonElement {
    pub id: String,
    pub point_ids: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub solution: bool,
}

#[enum_dispatch(Draw)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiagramElement {
    Line(LineElement),
    Circle(CircleElement),
    Text(TextElement),
    Angle(AngleElement),
    Polygon(PolygonElement),
}

impl LineElement {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        LineElement {
            id: id.into(),
            point1_id: from.into(),
            point2_id: to.into(),
            label: None,
            measurement: None,
            visible: true,
            style: Style::default(),
            solution: false,
        }
    }

    pub fn with_measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = Some(measurement.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl CircleElement {
    pub fn new(id: impl Into<String>, center: impl Into<String>, radius: f64) -> Self {
        CircleElement {
            id: id.into(),
            center_point_id: center.into(),
            radius,
            label: None,
            visible: true,
            style: Style::default(),
            solution: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl TextElement {
    pub fn new(id: impl Into<String>, x: f64, y: f64, content: impl Into<String>) -> Self {
        TextElement {
            id: id.into(),
            x,
            y,
            content: content.into(),
            visible: true,
            style: Style::default(),
            solution: false,
        }
    }
}

impl AngleElement {
    pub fn new(
        id: impl Into<String>,
        vertex: impl Into<String>,
        point1: impl Into<String>,
        point2: impl Into<String>,
    ) -> Self {
        AngleElement {
            id: id.into(),
            vertex: vertex.into(),
            point1: point1.into(),
            point2: point2.into(),
            radius: None,
            label: None,
            measurement: None,
            visible: true,
            style: Style::default(),
            solution: false,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = Some(measurement.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl PolygonElement {
    pub fn new<I, S>(id: impl Into<String>, point_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PolygonElement {
            id: id.into(),
            point_ids: point_ids.into_iter().map(Into::into).collect(),
            label: None,
            visible: true,
            style: Style::default(),
            solution: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ============================================================================
// Scene
// ============================================================================

/// A point/element graph with optional explicit axis ranges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Points by id. Inserting an existing id replaces the earlier point.
    pub points: IndexMap<String, Point>,
    pub elements: Vec<DiagramElement>,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.insert(point.id.clone(), point);
    }

    pub fn add_element(&mut self, element: impl Into<DiagramElement>) {
        self.elements.push(element.into());
    }

    pub fn with_point(mut self, point: Point) -> Self {
        self.add_point(point);
        self
    }

    pub fn with_element(mut self, element: impl Into<DiagramElement>) -> Self {
        self.add_element(element);
        self
    }

    pub fn with_ranges(mut self, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        self.x_range = Some(x_range);
        self.y_range = Some(y_range);
        self
    }

    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.get(id)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        for point in self.points.values() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(RenderError::NonFiniteCoordinate {
                    id: point.id.clone(),
                });
            }
        }
        for element in &self.elements {
            element.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// Coordinate diagrams
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    #[default]
    Coordinate,
}

/// A function to plot: the raw equation text and its stroke color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionPlot {
    pub equation: String,
    pub color: String,
}

/// An auto-derived point of interest, such as a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Renderer-ready description of a coordinate-plane diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSpec {
    #[serde(rename = "type", default)]
    pub kind: DiagramKind,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    #[serde(default)]
    pub functions: Vec<FunctionPlot>,
    #[serde(default)]
    pub special_points: Vec<SpecialPoint>,
}

impl DiagramSpec {
    /// An empty coordinate plane over `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        DiagramSpec {
            kind: DiagramKind::Coordinate,
            x_min: viewport.min_x,
            x_max: viewport.max_x,
            y_min: viewport.min_y,
            y_max: viewport.max_y,
            functions: Vec::new(),
            special_points: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        self.viewport().validate()?;
        for (i, point) in self.special_points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(RenderError::NonFiniteCoordinate {
                    id: point
                        .label
                        .clone()
                        .unwrap_or_else(|| format!("special point {i}")),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::defaults::DEFAULT_STYLES;

    #[test]
    fn style_overrides_win() {
        let style = Style {
            stroke: Some("red".into()),
            stroke_width: Some(4.0),
            ..Style::default()
        };
        let resolved = style.resolve(&DEFAULT_STYLES.line);
        assert_eq!(resolved.stroke, "red");
        assert_eq!(resolved.stroke_width, 4.0);
        assert_eq!(resolved.fill, DEFAULT_STYLES.line.fill);
    }

    #[test]
    fn style_resolve_leaves_defaults_untouched() {
        let before = DEFAULT_STYLES.circle.clone();
        let style = Style {
            fill: Some("yellow".into()),
            ..Style::default()
        };
        let _ = style.resolve(&DEFAULT_STYLES.circle);
        assert_eq!(DEFAULT_STYLES.circle, before);
    }

    #[test]
    fn duplicate_point_ids_last_write_wins() {
        let scene = Scene::new()
            .with_point(Point::new("A", 0.0, 0.0))
            .with_point(Point::new("B", 1.0, 1.0))
            .with_point(Point::new("A", 5.0, 6.0));
        assert_eq!(scene.points.len(), 2);
        assert_eq!(scene.point("A").map(Point::pos), Some(dvec2(5.0, 6.0)));
    }

    #[test]
    fn scene_rejects_nan_point() {
        let scene = Scene::new().with_point(Point::new("P", f64::NAN, 0.0));
        assert_eq!(
            scene.validate(),
            Err(RenderError::NonFiniteCoordinate { id: "P".into() })
        );
    }

    #[test]
    fn element_ids_dispatch() {
        let element: DiagramElement = CircleElement::new("c1", "O", 2.0).into();
        assert_eq!(element.id(), "c1");
        assert!(element.is_visible());
        assert!(!element.is_solution());
    }

    #[test]
    fn spec_viewport_round_trip() {
        let spec = DiagramSpec::new(Viewport::FIRST_QUADRANT);
        assert_eq!(spec.viewport(), Viewport::FIRST_QUADRANT);
        assert!(spec.functions.is_empty());
    }
}
