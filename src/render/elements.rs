//! Drawing points and diagram elements
//!
//! Elements refer to points by id. A reference that does not resolve drops
//! the whole element rather than failing the render.

use std::f64::consts::PI;

use glam::{DVec2, dvec2};

use super::RenderOptions;
use super::defaults::{
    ANGLE_LABEL_FACTOR, ANGLE_RADIUS, CIRCLE_LABEL_GAP, DEFAULT_STYLES, MEASUREMENT_OFFSET,
    POINT_LABEL_OFFSET, POINT_RADIUS, ResolvedStyle,
};
use super::svg::{Circle, Line, Paint, Path, PathData, Points, Polygon, SvgNode, Text};
use crate::errors::RenderError;
use crate::log::debug;
use crate::model::{
    AngleElement, CircleElement, Draw, LineElement, Point, PolygonElement, Scene, TextElement,
};
use crate::types::Projection;

/// Line labels sit this far below the segment midpoint
const LINE_LABEL_OFFSET: f64 = 14.0;

/// Everything an element needs to draw itself.
pub struct DrawContext<'a> {
    pub scene: &'a Scene,
    pub projection: &'a Projection,
    pub options: &'a RenderOptions,
}

impl DrawContext<'_> {
    /// Look up a referenced point; `None` means the referencing element is skipped.
    fn point(&self, element: &str, id: &str) -> Option<&Point> {
        let point = self.scene.point(id);
        if point.is_none() {
            debug!(element, missing = id, "skipping element with unresolved point");
        }
        point
    }

    fn screen(&self, point: &Point) -> DVec2 {
        self.projection.to_screen(point.pos())
    }

    fn label(&self, at: DVec2, content: &str, style: &ResolvedStyle) -> Text {
        Text::new(at, content, &*DEFAULT_STYLES.text.fill, style.font_size)
    }
}

/// The arc an angle marker sweeps, in logical radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSweep {
    pub start: f64,
    pub end: f64,
    pub large_arc: bool,
}

impl ArcSweep {
    /// Angle markers sweep counter-clockwise from the smaller ray angle to the
    /// larger one, whichever ray is named first. This is not a shortest-arc
    /// search: rays at -170° and 170° get the 340° arc, flagged `large_arc`.
    pub fn ascending(a1: f64, a2: f64) -> ArcSweep {
        let (start, end) = if a1 > a2 { (a2, a1) } else { (a1, a2) };
        ArcSweep {
            start,
            end,
            large_arc: end - start > PI,
        }
    }

    pub fn bisector(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Screen position at `radius` pixels from `center` along logical `angle`.
fn polar(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    // screen y grows downwards
    center + radius * dvec2(angle.cos(), -angle.sin())
}

/// All visible points, each a dot with an optional label up and to the right.
pub fn draw_points(cx: &DrawContext<'_>) -> Vec<SvgNode> {
    let mut out = Vec::new();
    for point in cx.scene.points.values() {
        if !point.visible || (point.solution && !cx.options.show_solution) {
            continue;
        }
        let style = point.style.resolve(&DEFAULT_STYLES.point);
        let at = cx.screen(point);
        out.push(SvgNode::Circle(Circle {
            cx: at.x,
            cy: at.y,
            r: POINT_RADIUS,
            paint: Paint::from_style(&style),
        }));
        if let Some(label) = point.label.as_deref().filter(|_| cx.options.show_labels) {
            let offset = dvec2(POINT_LABEL_OFFSET, -POINT_LABEL_OFFSET);
            out.push(SvgNode::Text(
                Text::new(
                    at + offset,
                    label,
                    &*DEFAULT_STYLES.text.fill,
                    style.font_size,
                )
                .anchored("start"),
            ));
        }
    }
    out
}

impl Draw for LineElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_solution(&self) -> bool {
        self.solution
    }

    fn draw(&self, cx: &DrawContext<'_>, out: &mut Vec<SvgNode>) {
        let (Some(p1), Some(p2)) = (
            cx.point(&self.id, &self.point1_id),
            cx.point(&self.id, &self.point2_id),
        ) else {
            return;
        };
        let style = self.style.resolve(&DEFAULT_STYLES.line);
        let (a, b) = (cx.screen(p1), cx.screen(p2));
        out.push(SvgNode::Line(Line::between(a, b, Paint::from_style(&style))));

        let mid = (a + b) / 2.0;
        if let Some(measurement) = self
            .measurement
            .as_deref()
            .filter(|_| cx.options.show_measurements)
        {
            out.push(SvgNode::Text(cx.label(
                mid - dvec2(0.0, MEASUREMENT_OFFSET),
                measurement,
                &style,
            )));
        }
        if let Some(label) = self.label.as_deref().filter(|_| cx.options.show_labels) {
            out.push(SvgNode::Text(cx.label(
                mid + dvec2(0.0, LINE_LABEL_OFFSET),
                label,
                &style,
            )));
        }
    }
}

impl Draw for CircleElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_solution(&self) -> bool {
        self.solution
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.radius.is_finite() && self.radius > 0.0 {
            Ok(())
        } else {
            Err(RenderError::InvalidRadius {
                id: self.id.clone(),
                radius: self.radius,
            })
        }
    }

    /// The radius is scaled by the x scale only, so with unequal axis scales
    /// the drawn circle is not round in logical space.
    fn draw(&self, cx: &DrawContext<'_>, out: &mut Vec<SvgNode>) {
        let Some(center) = cx.point(&self.id, &self.center_point_id) else {
            return;
        };
        let style = self.style.resolve(&DEFAULT_STYLES.circle);
        let at = cx.screen(center);
        let r = cx.projection.len_x(self.radius);
        out.push(SvgNode::Circle(Circle {
            cx: at.x,
            cy: at.y,
            r,
            paint: Paint::from_style(&style),
        }));
        if let Some(label) = self.label.as_deref().filter(|_| cx.options.show_labels) {
            out.push(SvgNode::Text(cx.label(
                at - dvec2(0.0, r + CIRCLE_LABEL_GAP),
                label,
                &style,
            )));
        }
    }
}

impl Draw for TextElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_solution(&self) -> bool {
        self.solution
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(())
        } else {
            Err(RenderError::NonFiniteCoordinate {
                id: self.id.clone(),
            })
        }
    }

    fn draw(&self, cx: &DrawContext<'_>, out: &mut Vec<SvgNode>) {
        if !cx.options.show_labels {
            return;
        }
        let style = self.style.resolve(&DEFAULT_STYLES.text);
        let at = cx.projection.to_screen(dvec2(self.x, self.y));
        out.push(SvgNode::Text(
            Text::new(at, self.content.as_str(), &*style.fill, style.font_size)
                .anchored(style.text_anchor.as_str()),
        ));
    }
}

impl Draw for AngleElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_solution(&self) -> bool {
        self.solution
    }

    fn validate(&self) -> Result<(), RenderError> {
        match self.radius {
            Some(radius) if !(radius.is_finite() && radius > 0.0) => {
                Err(RenderError::InvalidRadius {
                    id: self.id.clone(),
                    radius,
                })
            }
            _ => Ok(()),
        }
    }

    fn draw(&self, cx: &DrawContext<'_>, out: &mut Vec<SvgNode>) {
        let (Some(vertex), Some(p1), Some(p2)) = (
            cx.point(&self.id, &self.vertex),
            cx.point(&self.id, &self.point1),
            cx.point(&self.id, &self.point2),
        ) else {
            return;
        };
        let style = self.style.resolve(&DEFAULT_STYLES.angle);

        let ray = |p: &Point| {
            let d = p.pos() - vertex.pos();
            d.y.atan2(d.x)
        };
        let sweep = ArcSweep::ascending(ray(p1), ray(p2));
        let r = self
            .radius
            .map_or(ANGLE_RADIUS, |radius| cx.projection.len_x(radius));

        let center = cx.screen(vertex);
        let from = polar(center, r, sweep.start);
        let to = polar(center, r, sweep.end);
        let d = PathData::new()
            .m(from.x, from.y)
            .a(r, r, sweep.large_arc, false, to.x, to.y);
        out.push(SvgNode::Path(Path {
            d,
            paint: Paint::from_style(&style),
        }));

        let text = self
            .measurement
            .as_deref()
            .filter(|_| cx.options.show_measurements)
            .or(self.label.as_deref().filter(|_| cx.options.show_labels));
        if let Some(text) = text {
            let at = polar(center, r * ANGLE_LABEL_FACTOR, sweep.bisector());
            out.push(SvgNode::Text(cx.label(at, text, &style).centered_vertically()));
        }
    }
}

impl Draw for PolygonElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_solution(&self) -> bool {
        self.solution
    }

    fn draw(&self, cx: &DrawContext<'_>, out: &mut Vec<SvgNode>) {
        if self.point_ids.len() < 3 {
            debug!(element = %self.id, "polygon needs at least three points");
            return;
        }
        let Some(vertices) = self
            .point_ids
            .iter()
            .map(|id| cx.point(&self.id, id).map(|p| cx.screen(p)))
            .collect::<Option<Vec<_>>>()
        else {
            return;
        };
        let style = self.style.resolve(&DEFAULT_STYLES.polygon);
        let centroid = vertices.iter().sum::<DVec2>() / vertices.len() as f64;
        out.push(SvgNode::Polygon(Polygon {
            points: vertices.into_iter().collect::<Points>(),
            paint: Paint::from_style(&style),
        }));
        if let Some(label) = self.label.as_deref().filter(|_| cx.options.show_labels) {
            out.push(SvgNode::Text(
                cx.label(centroid, label, &style).centered_vertically(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiagramElement;
    use crate::types::{CanvasSize, Viewport};

    const DEG: f64 = PI / 180.0;

    fn projection() -> Projection {
        // 30 px per unit on both axes, origin at (300, 300)
        Projection::new(
            Viewport::new(-10.0, 10.0, -10.0, 10.0),
            CanvasSize::try_new(600.0, 600.0).unwrap(),
        )
    }

    fn scene() -> Scene {
        Scene::new()
            .with_point(Point::new("O", 0.0, 0.0).with_label("O"))
            .with_point(Point::new("A", 4.0, 0.0))
            .with_point(Point::new("B", 0.0, 3.0))
            .with_point(Point::new("C", 4.0, 3.0))
    }

    fn draw(element: impl Into<DiagramElement>, options: &RenderOptions) -> Vec<SvgNode> {
        let scene = scene();
        let projection = projection();
        let cx = DrawContext {
            scene: &scene,
            projection: &projection,
            options,
        };
        let element: DiagramElement = element.into();
        let mut out = Vec::new();
        element.draw(&cx, &mut out);
        out
    }

    fn texts(nodes: &[SvgNode]) -> Vec<&str> {
        nodes
            .iter()
            .filter_map(|n| match n {
                SvgNode::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn sweep_orders_rays() {
        let sweep = ArcSweep::ascending(90.0 * DEG, 0.0);
        assert_eq!(sweep.start, 0.0);
        assert_eq!(sweep.end, 90.0 * DEG);
        assert!(!sweep.large_arc);
    }

    #[test]
    fn sweep_is_not_shortest_arc() {
        let sweep = ArcSweep::ascending(170.0 * DEG, -170.0 * DEG);
        assert!(sweep.large_arc);
        assert!((sweep.end - sweep.start - 340.0 * DEG).abs() < 1e-9);
    }

    #[test]
    fn line_with_measurement_and_label() {
        let line = LineElement::new("l", "O", "A")
            .with_measurement("4 cm")
            .with_label("a");
        let nodes = draw(line, &RenderOptions::default());
        let SvgNode::Line(segment) = &nodes[0] else {
            panic!("expected a line first, got {nodes:?}");
        };
        assert_eq!((segment.x1, segment.y1, segment.x2, segment.y2), (300.0, 300.0, 420.0, 300.0));
        let SvgNode::Text(measurement) = &nodes[1] else {
            panic!("expected the measurement");
        };
        assert_eq!((measurement.x, measurement.y), (360.0, 290.0));
        assert_eq!(texts(&nodes), ["4 cm", "a"]);
    }

    #[test]
    fn measurements_can_be_hidden() {
        let options = RenderOptions {
            show_measurements: false,
            ..RenderOptions::default()
        };
        let nodes = draw(LineElement::new("l", "O", "A").with_measurement("4"), &options);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn line_with_missing_point_draws_nothing() {
        let nodes = draw(LineElement::new("l", "O", "Z"), &RenderOptions::default());
        assert!(nodes.is_empty());
    }

    #[test]
    fn circle_radius_uses_x_scale() {
        let nodes = draw(
            CircleElement::new("c", "O", 2.0).with_label("k"),
            &RenderOptions::default(),
        );
        let SvgNode::Circle(circle) = &nodes[0] else {
            panic!("expected a circle");
        };
        assert_eq!(circle.r, 60.0);
        let SvgNode::Text(label) = &nodes[1] else {
            panic!("expected a label");
        };
        assert_eq!((label.x, label.y), (300.0, 300.0 - 60.0 - CIRCLE_LABEL_GAP));
    }

    #[test]
    fn circle_radius_must_be_positive() {
        for radius in [0.0, -1.0, f64::INFINITY] {
            let circle = CircleElement::new("c", "O", radius);
            assert!(matches!(
                circle.validate(),
                Err(RenderError::InvalidRadius { .. })
            ));
        }
    }

    #[test]
    fn right_angle_arc() {
        let angle = AngleElement::new("t", "O", "A", "B").with_measurement("90°");
        let nodes = draw(angle, &RenderOptions::default());
        let SvgNode::Path(path) = &nodes[0] else {
            panic!("expected an arc path");
        };
        insta::assert_snapshot!(path.d.to_string(), @"M 330 300 A 30 30 0 0 0 300 270");
        assert_eq!(texts(&nodes), ["90°"]);
    }

    #[test]
    fn angle_arc_is_symmetric_in_its_rays() {
        let a = draw(AngleElement::new("t", "O", "A", "B"), &RenderOptions::default());
        let b = draw(AngleElement::new("t", "O", "B", "A"), &RenderOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn angle_radius_in_logical_units() {
        let nodes = draw(
            AngleElement::new("t", "O", "A", "B").with_radius(1.0),
            &RenderOptions::default(),
        );
        let SvgNode::Path(path) = &nodes[0] else {
            panic!("expected an arc path");
        };
        assert!(path.d.to_string().starts_with("M 330 300 A 30 30"));
    }

    #[test]
    fn angle_label_used_without_measurement() {
        let nodes = draw(
            AngleElement::new("t", "O", "A", "B").with_label("θ"),
            &RenderOptions::default(),
        );
        assert_eq!(texts(&nodes), ["θ"]);
    }

    #[test]
    fn polygon_needs_three_points() {
        let nodes = draw(
            PolygonElement::new("p", ["O", "A"]),
            &RenderOptions::default(),
        );
        assert!(nodes.is_empty());
    }

    #[test]
    fn polygon_with_missing_point_draws_nothing() {
        let nodes = draw(
            PolygonElement::new("p", ["O", "A", "Q"]),
            &RenderOptions::default(),
        );
        assert!(nodes.is_empty());
    }

    #[test]
    fn polygon_label_at_centroid() {
        let nodes = draw(
            PolygonElement::new("p", ["O", "A", "C", "B"]).with_label("R"),
            &RenderOptions::default(),
        );
        let SvgNode::Polygon(polygon) = &nodes[0] else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.points.len(), 4);
        assert_eq!(polygon.paint.fill_opacity, Some(0.2));
        let SvgNode::Text(label) = &nodes[1] else {
            panic!("expected a label");
        };
        assert_eq!((label.x, label.y), (360.0, 255.0));
    }

    #[test]
    fn text_respects_anchor_and_label_switch() {
        let mut text = TextElement::new("t", 1.0, 1.0, "hello");
        text.style.text_anchor = Some(crate::model::TextAnchor::Start);
        let nodes = draw(text.clone(), &RenderOptions::default());
        let SvgNode::Text(node) = &nodes[0] else {
            panic!("expected text");
        };
        assert_eq!(node.text_anchor, "start");
        assert_eq!((node.x, node.y), (330.0, 270.0));

        let options = RenderOptions {
            show_labels: false,
            ..RenderOptions::default()
        };
        assert!(draw(text, &options).is_empty());
    }

    #[test]
    fn points_with_labels_offset_up_right() {
        let scene = scene().with_point(Point::new("H", 1.0, 1.0).hidden());
        let projection = projection();
        let options = RenderOptions::default();
        let cx = DrawContext {
            scene: &scene,
            projection: &projection,
            options: &options,
        };
        let nodes = draw_points(&cx);
        let dots = nodes
            .iter()
            .filter(|n| matches!(n, SvgNode::Circle(_)))
            .count();
        assert_eq!(dots, 4);
        let SvgNode::Text(label) = &nodes[1] else {
            panic!("expected the label of O");
        };
        assert_eq!((label.x, label.y), (308.0, 292.0));
    }
}
