//! GeoGebra-like command strings.
//!
//! A command is zero or more `;`-separated clauses. Two kinds are understood:
//! `ZoomIn(xMin,xMax,yMin,yMax)` anywhere in the string sets the viewport,
//! and `f(x)=...`, `g(x)=...`, `h(x)=...` declare up to three functions.
//! Everything else is ignored.

use pest::Parser;

use crate::equation::coefficients;
use crate::log::debug;
use crate::model::{DiagramSpec, FunctionPlot, SpecialPoint};
use crate::types::Viewport;
use crate::{DiagramParser, Rule};

/// Caller-supplied parsing defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParseOptions {
    /// Used when the command has no usable `ZoomIn`
    pub default_viewport: Viewport,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            default_viewport: Viewport::SYMMETRIC,
        }
    }
}

impl ParseOptions {
    pub fn new(default_viewport: Viewport) -> Self {
        ParseOptions { default_viewport }
    }
}

/// Function slot of a clause, each with a fixed stroke color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    F,
    G,
    H,
}

impl Slot {
    fn from_name(name: &str) -> Option<Slot> {
        match name {
            "f" => Some(Slot::F),
            "g" => Some(Slot::G),
            "h" => Some(Slot::H),
            _ => None,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Slot::F => "blue",
            Slot::G => "red",
            Slot::H => "green",
        }
    }
}

/// Parse a command string into a diagram spec. Never fails.
pub fn parse_command(input: &str, options: &ParseOptions) -> DiagramSpec {
    let viewport = zoom_viewport(input).unwrap_or(options.default_viewport);
    let mut spec = DiagramSpec::new(viewport);

    for clause in input.split(';').map(str::trim) {
        if let Some((slot, equation)) = function_clause(clause) {
            spec.functions.push(FunctionPlot {
                equation: equation.to_string(),
                color: slot.color().to_string(),
            });
        }
    }

    for function in &spec.functions {
        for x in quadratic_roots(&function.equation) {
            spec.special_points.push(SpecialPoint {
                x,
                y: 0.0,
                label: Some(format!("({x:.1}, 0)")),
                color: Some(function.color.clone()),
            });
        }
    }

    debug!(
        viewport = %spec.viewport(),
        functions = spec.functions.len(),
        roots = spec.special_points.len(),
        "parsed command"
    );
    spec
}

/// The first `ZoomIn(...)` in `input`, if it holds four numbers forming a
/// valid viewport.
fn zoom_viewport(input: &str) -> Option<Viewport> {
    let search = DiagramParser::parse(Rule::zoom_search, input).ok()?.next()?;
    let args = search
        .into_inner()
        .flat_map(|p| p.into_inner())
        .find(|p| p.as_rule() == Rule::zoom_args)?;

    let bounds = args
        .as_str()
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    let [min_x, max_x, min_y, max_y] = bounds.as_slice() else {
        debug!(args = args.as_str(), "ZoomIn needs exactly four bounds");
        return None;
    };
    let viewport = Viewport::checked(*min_x, *max_x, *min_y, *max_y);
    if viewport.is_none() {
        debug!(args = args.as_str(), "ZoomIn bounds do not form a viewport");
    }
    viewport
}

fn function_clause(clause: &str) -> Option<(Slot, &str)> {
    let pair = DiagramParser::parse(Rule::function_clause, clause)
        .ok()?
        .next()?;
    let mut slot = None;
    let mut body = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::slot => slot = Slot::from_name(part.as_str()),
            Rule::equation_body => body = Some(part.as_str().trim()),
            _ => {}
        }
    }
    Some((slot?, body?))
}

/// Real roots of an equation written as `ax^2+bx+c` with an explicit x term.
///
/// Any other form, including `x^2-4`, yields no roots. Two distinct roots
/// come back as `[(-b+√d)/2a, (-b-√d)/2a]`.
pub fn quadratic_roots(equation: &str) -> Vec<f64> {
    let expr: String = equation.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(c) = DiagramParser::parse(Rule::root_quadratic, &expr)
        .ok()
        .and_then(|mut pairs| pairs.next())
        .and_then(coefficients)
    else {
        return Vec::new();
    };
    let [c0, b, a, _] = c;
    if a == 0.0 {
        return Vec::new();
    }

    let discriminant = b * b - 4.0 * a * c0;
    // -0.0 would print as "-0.0" in the label
    let tidy = |x: f64| if x == 0.0 { 0.0 } else { x };
    if discriminant > 0.0 {
        let root = discriminant.sqrt();
        vec![
            tidy((-b + root) / (2.0 * a)),
            tidy((-b - root) / (2.0 * a)),
        ]
    } else if discriminant == 0.0 {
        vec![tidy(-b / (2.0 * a))]
    } else {
        Vec::new()
    }
}
