//! SVG generation
//!
//! A small typed SVG DOM: the renderer builds a tree of [`SvgNode`]s and
//! [`Svg::to_xml`] serializes it through quick-xml with a fixed attribute
//! order, so identical trees always produce identical bytes.

use std::fmt;

use glam::DVec2;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::defaults::{FONT_FAMILY, ResolvedStyle};
use crate::errors::RenderError;

/// SVG namespace URI
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Presentation attributes shared by shape elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paint {
    pub fill: Option<String>,
    pub fill_opacity: Option<f64>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub stroke_dasharray: Option<String>,
}

impl Paint {
    /// Unfilled outline
    pub fn stroke(color: impl Into<String>, width: f64) -> Self {
        Paint {
            fill: Some("none".to_string()),
            stroke: Some(color.into()),
            stroke_width: Some(width),
            ..Paint::default()
        }
    }

    /// Solid fill, no outline
    pub fn fill(color: impl Into<String>) -> Self {
        Paint {
            fill: Some(color.into()),
            ..Paint::default()
        }
    }

    pub fn dashed(mut self, pattern: impl Into<String>) -> Self {
        self.stroke_dasharray = Some(pattern.into());
        self
    }

    pub fn from_style(style: &ResolvedStyle) -> Self {
        Paint {
            fill: Some(style.fill.to_string()),
            fill_opacity: (style.fill_opacity < 1.0).then_some(style.fill_opacity),
            stroke: Some(style.stroke.to_string()),
            stroke_width: Some(style.stroke_width),
            stroke_dasharray: style.stroke_dasharray.as_ref().map(|d| d.to_string()),
        }
    }
}

/// Root SVG element
#[derive(Debug, Clone, PartialEq)]
pub struct Svg {
    pub width: f64,
    pub height: f64,
    pub children: Vec<SvgNode>,
}

/// Any SVG node we emit
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    G(Group),
    Line(Line),
    Circle(Circle),
    Path(Path),
    Polygon(Polygon),
    Polyline(Polyline),
    Text(Text),
}

/// SVG group element (`<g>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub class: Option<String>,
    pub children: Vec<SvgNode>,
}

/// SVG line element (`<line>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub paint: Paint,
}

impl Line {
    pub fn between(a: DVec2, b: DVec2, paint: Paint) -> Self {
        Line {
            x1: a.x,
            y1: a.y,
            x2: b.x,
            y2: b.y,
            paint,
        }
    }
}

/// SVG circle element (`<circle>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub paint: Paint,
}

/// SVG path element (`<path>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub d: PathData,
    pub paint: Paint,
}

/// SVG polygon element (`<polygon>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Points,
    pub paint: Paint,
}

/// SVG polyline element (`<polyline>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Points,
    pub paint: Paint,
}

/// SVG text element (`<text>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub fill: String,
    pub font_size: f64,
    pub text_anchor: &'static str,
    pub dominant_baseline: Option<&'static str>,
}

impl Text {
    pub fn new(at: DVec2, content: impl Into<String>, fill: impl Into<String>, font_size: f64) -> Self {
        Text {
            x: at.x,
            y: at.y,
            content: content.into(),
            fill: fill.into(),
            font_size,
            text_anchor: "middle",
            dominant_baseline: None,
        }
    }

    pub fn anchored(mut self, anchor: &'static str) -> Self {
        self.text_anchor = anchor;
        self
    }

    pub fn centered_vertically(mut self) -> Self {
        self.dominant_baseline = Some("central");
        self
    }
}

// ============================================================================
// Path data and point lists
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathCommand {
    MoveTo(f64, f64),
    Arc {
        rx: f64,
        ry: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
}

/// Builder for the `d` attribute of a path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn m(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo(x, y));
        self
    }

    /// Elliptical arc with no x-axis rotation
    pub fn a(mut self, rx: f64, ry: f64, large_arc: bool, sweep: bool, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::Arc {
            rx,
            ry,
            large_arc,
            sweep,
            x,
            y,
        });
        self
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match *cmd {
                PathCommand::MoveTo(x, y) => write!(f, "M {} {}", fmt_num(x), fmt_num(y))?,
                PathCommand::Arc {
                    rx,
                    ry,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => write!(
                    f,
                    "A {} {} 0 {} {} {} {}",
                    fmt_num(rx),
                    fmt_num(ry),
                    u8::from(large_arc),
                    u8::from(sweep),
                    fmt_num(x),
                    fmt_num(y)
                )?,
            }
        }
        Ok(())
    }
}

/// Point list for polygons and polylines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Points(Vec<DVec2>);

impl Points {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, x: f64, y: f64) -> Self {
        self.0.push(DVec2::new(x, y));
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<DVec2> for Points {
    fn from_iter<I: IntoIterator<Item = DVec2>>(iter: I) -> Self {
        Points(iter.into_iter().collect())
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{},{}", fmt_num(p.x), fmt_num(p.y))?;
        }
        Ok(())
    }
}

// ============================================================================
// Serialization
// ============================================================================

type SvgWriter = Writer<Vec<u8>>;

fn xml_error(err: impl fmt::Display) -> RenderError {
    RenderError::Serialize {
        message: err.to_string(),
    }
}

fn emit(w: &mut SvgWriter, event: Event<'_>) -> Result<(), RenderError> {
    w.write_event(event).map_err(xml_error)
}

fn push_num(tag: &mut BytesStart<'_>, name: &str, value: f64) {
    tag.push_attribute((name, fmt_num(value).as_str()));
}

fn push_paint(tag: &mut BytesStart<'_>, paint: &Paint) {
    if let Some(fill) = &paint.fill {
        tag.push_attribute(("fill", fill.as_str()));
    }
    if let Some(opacity) = paint.fill_opacity {
        push_num(tag, "fill-opacity", opacity);
    }
    if let Some(stroke) = &paint.stroke {
        tag.push_attribute(("stroke", stroke.as_str()));
    }
    if let Some(width) = paint.stroke_width {
        push_num(tag, "stroke-width", width);
    }
    if let Some(dash) = &paint.stroke_dasharray {
        tag.push_attribute(("stroke-dasharray", dash.as_str()));
    }
}

fn point_list(name: &'static str, points: &Points, paint: &Paint) -> BytesStart<'static> {
    let mut tag = BytesStart::new(name);
    tag.push_attribute(("points", points.to_string().as_str()));
    push_paint(&mut tag, paint);
    tag
}

fn write_node(w: &mut SvgWriter, node: &SvgNode) -> Result<(), RenderError> {
    let tag = match node {
        SvgNode::G(g) => {
            let mut tag = BytesStart::new("g");
            if let Some(class) = &g.class {
                tag.push_attribute(("class", class.as_str()));
            }
            if g.children.is_empty() {
                return emit(w, Event::Empty(tag));
            }
            emit(w, Event::Start(tag))?;
            for child in &g.children {
                write_node(w, child)?;
            }
            return emit(w, Event::End(BytesEnd::new("g")));
        }
        SvgNode::Line(l) => {
            let mut tag = BytesStart::new("line");
            push_num(&mut tag, "x1", l.x1);
            push_num(&mut tag, "y1", l.y1);
            push_num(&mut tag, "x2", l.x2);
            push_num(&mut tag, "y2", l.y2);
            push_paint(&mut tag, &l.paint);
            tag
        }
        SvgNode::Circle(c) => {
            let mut tag = BytesStart::new("circle");
            push_num(&mut tag, "cx", c.cx);
            push_num(&mut tag, "cy", c.cy);
            push_num(&mut tag, "r", c.r);
            push_paint(&mut tag, &c.paint);
            tag
        }
        SvgNode::Path(p) => {
            let mut tag = BytesStart::new("path");
            tag.push_attribute(("d", p.d.to_string().as_str()));
            push_paint(&mut tag, &p.paint);
            tag
        }
        SvgNode::Polygon(p) => point_list("polygon", &p.points, &p.paint),
        SvgNode::Polyline(p) => point_list("polyline", &p.points, &p.paint),
        SvgNode::Text(t) => {
            let mut tag = BytesStart::new("text");
            push_num(&mut tag, "x", t.x);
            push_num(&mut tag, "y", t.y);
            tag.push_attribute(("fill", t.fill.as_str()));
            tag.push_attribute(("font-family", FONT_FAMILY));
            push_num(&mut tag, "font-size", t.font_size);
            tag.push_attribute(("text-anchor", t.text_anchor));
            if let Some(baseline) = t.dominant_baseline {
                tag.push_attribute(("dominant-baseline", baseline));
            }
            emit(w, Event::Start(tag))?;
            emit(w, Event::Text(BytesText::new(&t.content)))?;
            return emit(w, Event::End(BytesEnd::new("text")));
        }
    };
    emit(w, Event::Empty(tag))
}

impl Svg {
    pub fn new(width: f64, height: f64, children: Vec<SvgNode>) -> Self {
        Svg {
            width,
            height,
            children,
        }
    }

    /// Serialize the document: one element per line, two-space indent,
    /// attributes in a fixed order.
    pub fn to_xml(&self) -> Result<String, RenderError> {
        let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NS));
        push_num(&mut root, "width", self.width);
        push_num(&mut root, "height", self.height);
        let view_box = format!("0 0 {} {}", fmt_num(self.width), fmt_num(self.height));
        root.push_attribute(("viewBox", view_box.as_str()));

        emit(&mut w, Event::Start(root))?;
        for child in &self.children {
            write_node(&mut w, child)?;
        }
        emit(&mut w, Event::End(BytesEnd::new("svg")))?;

        let mut xml = String::from_utf8(w.into_inner()).map_err(xml_error)?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Filled triangular arrowhead with its tip at `end`, pointing away from
/// `start`. `None` for a zero-length segment.
pub fn render_arrowhead(
    start: DVec2,
    end: DVec2,
    color: &str,
    arrow_len: f64,
    arrow_width: f64,
) -> Option<Polygon> {
    let delta = end - start;
    let len = delta.length();
    if len < 0.001 {
        return None;
    }

    let unit = delta / len;
    let perp = DVec2::new(-unit.y, unit.x);

    // arrow_width is the full base width
    let base = end - unit * arrow_len;
    let half_width = arrow_width / 2.0;
    let p1 = base + perp * half_width;
    let p2 = base - perp * half_width;

    Some(Polygon {
        points: Points::new()
            .push(end.x, end.y)
            .push(p1.x, p1.y)
            .push(p2.x, p2.y),
        paint: Paint::fill(color),
    })
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

/// Format a number with specified significant figures, trailing zeros trimmed.
fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", value, prec = decimals);
    if !s.contains('.') {
        return s;
    }
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn fmt_num_trims_trailing_zeros() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(-0.25), "-0.25");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn fmt_num_keeps_large_integers() {
        assert_eq!(fmt_num(1_000_000.0), "1000000");
        assert_eq!(fmt_num(20000.0), "20000");
    }

    #[test]
    fn fmt_num_rounds_to_six_significant_figures() {
        assert_eq!(fmt_num(123.456789), "123.457");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn fmt_num_never_prints_nan() {
        assert_eq!(fmt_num(f64::NAN), "0");
        assert_eq!(fmt_num(f64::INFINITY), "0");
    }

    #[test]
    fn path_data_display() {
        let d = PathData::new()
            .m(0.0, 400.0)
            .a(30.0, 30.0, true, false, 5.5, 5.0);
        insta::assert_snapshot!(d.to_string(), @"M 0 400 A 30 30 0 1 0 5.5 5");
    }

    #[test]
    fn points_display() {
        let points = Points::new().push(1.0, 2.0).push(3.5, -4.0);
        insta::assert_snapshot!(points.to_string(), @"1,2 3.5,-4");
    }

    #[test]
    fn text_content_is_escaped() {
        let svg = Svg::new(
            10.0,
            10.0,
            vec![SvgNode::Text(Text::new(dvec2(1.0, 2.0), "a < b & c", "#000", 12.0))],
        );
        let xml = svg.to_xml().unwrap();
        assert!(xml.contains(">a &lt; b &amp; c</text>"), "{xml}");
    }

    #[test]
    fn document_header_and_nesting() {
        let svg = Svg::new(
            600.0,
            400.0,
            vec![SvgNode::G(Group {
                class: Some("grid".into()),
                children: vec![SvgNode::Line(Line::between(
                    dvec2(0.0, 0.0),
                    dvec2(600.0, 0.0),
                    Paint::stroke("#e0e0e0", 1.0),
                ))],
            })],
        );
        let xml = svg.to_xml().unwrap();
        assert!(xml.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"600\" height=\"400\" viewBox=\"0 0 600 400\">\n"
        ));
        assert!(xml.contains(
            "  <g class=\"grid\">\n    <line x1=\"0\" y1=\"0\" x2=\"600\" y2=\"0\" fill=\"none\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>\n  </g>\n"
        ));
        assert!(xml.ends_with("</svg>\n"));
    }

    #[test]
    fn attributes_are_escaped_and_empty_groups_self_close() {
        let svg = Svg::new(
            20.0,
            10.0,
            vec![
                SvgNode::G(Group {
                    class: Some("a\"b<c".into()),
                    children: Vec::new(),
                }),
                SvgNode::Text(Text::new(dvec2(0.0, 0.0), "", "#000", 12.0)),
            ],
        );
        insta::assert_snapshot!(svg.to_xml().unwrap(), @r##"
        <svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10">
          <g class="a&quot;b&lt;c"/>
          <text x="0" y="0" fill="#000" font-family="sans-serif" font-size="12" text-anchor="middle"></text>
        </svg>
        "##);
    }

    #[test]
    fn arrowhead_points_along_segment() {
        let head = render_arrowhead(dvec2(0.0, 50.0), dvec2(100.0, 50.0), "#333", 10.0, 8.0)
            .expect("non-degenerate segment");
        insta::assert_snapshot!(head.points.to_string(), @"100,50 90,54 90,46");
        assert!(render_arrowhead(dvec2(1.0, 1.0), dvec2(1.0, 1.0), "#333", 10.0, 8.0).is_none());
    }

    #[test]
    fn paint_from_style_skips_opaque_fill_opacity() {
        let paint = Paint::from_style(&super::super::defaults::DEFAULT_STYLES.line);
        assert_eq!(paint.fill_opacity, None);
        let paint = Paint::from_style(&super::super::defaults::DEFAULT_STYLES.polygon);
        assert_eq!(paint.fill_opacity, Some(0.2));
    }
}
