//! Equation evaluation over a fixed family of forms.
//!
//! This is not a general expression parser. Each supported form is a pest
//! rule anchored at both ends, and [`eval_function`] tries them in a fixed
//! order, stopping at the first one that matches and evaluates. Several forms
//! are textual prefixes of later ones, so the order in [`FORMS`] matters.

use pest::Parser;
use pest::iterators::Pair;

use crate::log::{debug, warn};
use crate::{DiagramParser, Rule};

/// Stand-in magnitude for a function value at a vertical asymptote.
pub const ASYMPTOTE_SENTINEL: f64 = 1000.0;

/// Denominators smaller than this in magnitude are treated as zero.
pub const SINGULARITY_EPSILON: f64 = 0.001;

type Handler = fn(Pair<'_, Rule>, f64) -> Option<f64>;

/// Recognised forms, in evaluation order.
const FORMS: &[(Rule, &str, Handler)] = &[
    (Rule::sqrt_form, "square root", eval_sqrt),
    (Rule::cubic, "cubic", eval_polynomial),
    (Rule::reciprocal, "reciprocal", eval_reciprocal),
    (Rule::sqrt_power, "x^(1/2)", eval_sqrt_power),
    (Rule::cbrt_power, "x^(1/3)", eval_cbrt_power),
    (Rule::power, "power", eval_power),
    (Rule::quadratic, "quadratic", eval_polynomial),
    (Rule::linear, "linear", eval_polynomial),
    (Rule::scaled, "scaled x", eval_scaled),
    (Rule::identity, "identity", eval_identity),
    (Rule::constant_form, "constant", eval_constant),
    (Rule::fraction, "fraction", eval_fraction),
];

/// Evaluate `equation` at `x`.
///
/// Never fails: input matching none of the supported forms logs a warning
/// and evaluates to `0`. Division by a near-zero denominator yields
/// `±ASYMPTOTE_SENTINEL` instead of an infinity. Roots and fractional powers
/// outside their real domain return NaN, which the plotter drops.
pub fn eval_function(equation: &str, x: f64) -> f64 {
    let expr: String = equation.chars().filter(|c| !c.is_whitespace()).collect();

    for &(rule, name, handler) in FORMS {
        let Ok(mut pairs) = DiagramParser::parse(rule, &expr) else {
            continue;
        };
        let Some(pair) = pairs.next() else {
            continue;
        };
        if let Some(value) = handler(pair, x) {
            debug!(equation = %expr, form = name, x, value, "evaluated");
            return value;
        }
    }

    warn!(equation = %expr, "unrecognised equation, evaluating to 0");
    0.0
}

/// The signed sentinel for a denominator approaching zero from `approach`'s
/// side. Exactly zero counts as the positive side.
fn asymptote(approach: f64, numerator: f64) -> f64 {
    let side = if approach < 0.0 { -1.0 } else { 1.0 };
    let sign = if numerator >= 0.0 { 1.0 } else { -1.0 };
    side * sign * ASYMPTOTE_SENTINEL
}

fn divide(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < SINGULARITY_EPSILON {
        asymptote(denominator, numerator)
    } else {
        numerator / denominator
    }
}

/// Strip one pair of wrapping parentheses, if present.
fn unwrap_parens(s: &str) -> &str {
    s.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(s)
}

// ============================================================================
// Coefficients
// ============================================================================

/// Leading coefficient text: empty or `+` is 1, `-` is -1.
fn parse_coef(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => s.parse().ok(),
    }
}

fn term_coef(term: Pair<'_, Rule>) -> Option<f64> {
    match term.into_inner().find(|p| p.as_rule() == Rule::lead_coef) {
        Some(coef) => parse_coef(coef.as_str()),
        None => Some(1.0),
    }
}

/// Polynomial coefficients `[c0, c1, c2, c3]` (constant first) of a matched
/// cubic, quadratic, linear or root-quadratic pair. Absent terms are zero.
pub(crate) fn coefficients(pair: Pair<'_, Rule>) -> Option<[f64; 4]> {
    let mut c = [0.0; 4];
    for term in pair.into_inner() {
        match term.as_rule() {
            Rule::cube_term => c[3] += term_coef(term)?,
            Rule::square_term => c[2] += term_coef(term)?,
            Rule::linear_term => c[1] += term_coef(term)?,
            Rule::const_term => c[0] += term.as_str().parse::<f64>().ok()?,
            _ => {}
        }
    }
    Some(c)
}

fn horner(c: &[f64; 4], x: f64) -> f64 {
    ((c[3] * x + c[2]) * x + c[1]) * x + c[0]
}

fn inner_str<'i>(pair: Pair<'i, Rule>, rule: Rule) -> Option<&'i str> {
    pair.into_inner()
        .find(|p| p.as_rule() == rule)
        .map(|p| p.as_str())
}

// ============================================================================
// Form handlers
// ============================================================================

fn eval_sqrt(pair: Pair<'_, Rule>, x: f64) -> Option<f64> {
    let radicand = pair
        .into_inner()
        .find(|p| matches!(p.as_rule(), Rule::radicand | Rule::radicand_bare))?;
    let inner = unwrap_parens(radicand.as_str());
    Some(eval_function(inner, x).sqrt())
}

fn eval_polynomial(pair: Pair<'_, Rule>, x: f64) -> Option<f64> {
    coefficients(pair).map(|c| horner(&c, x))
}

fn eval_reciprocal(pair: Pair<'_, Rule>, x: f64) -> Option<f64> {
    let numerator: f64 = inner_str(pair, Rule::constant)?.parse().ok()?;
    Some(divide(numerator, x))
}

fn eval_sqrt_power(_: Pair<'_, Rule>, x: f64) -> Option<f64> {
    Some(x.sqrt())
}

fn eval_cbrt_power(_: Pair<'_, Rule>, x: f64) -> Option<f64> {
    Some(x.cbrt())
}

fn eval_power(pair: Pair<'_, Rule>, x: f64) -> Option<f64> {
    let n: f64 = inner_str(pair, Rule::exponent)?.parse().ok()?;
    if n < 0.0 {
        return Some(divide(1.0, x.powf(-n)));
    }
    Some(x.powf(n))
}

fn eval_scaled(pair: Pair<'_, Rule>, x: f64) -> Option<f64> {
    let m = parse_coef(inner_str(pair, Rule::lead_coef)?)?;
    Some(m * x)
}

fn eval_identity(_: Pair<'_, Rule>, x: f64) -> Option<f64> {
    Some(x)
}

fn eval_constant(pair: Pair<'_, Rule>, _: f64) -> Option<f64> {
    inner_str(pair, Rule::constant)?.parse().ok()
}

fn eval_fraction(pair: Pair<'_, Rule>, x: f64) -> Option<f64> {
    let mut numerator = None;
    let mut denominator = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::constant => numerator = part.as_str().parse::<f64>().ok(),
            Rule::denominator_group | Rule::denominator_bare => denominator = Some(part.as_str()),
            _ => {}
        }
    }
    let numerator = numerator?;
    let denominator = match denominator? {
        "x" => x,
        expr => eval_function(unwrap_parens(expr), x),
    };
    Some(divide(numerator, denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[track_caller]
    fn assert_eval(equation: &str, x: f64, expected: f64) {
        let got = eval_function(equation, x);
        assert!(
            close(got, expected),
            "{equation} at x={x}: expected {expected}, got {got}"
        );
    }

    #[test]
    fn linear() {
        assert_eval("2x+3", 5.0, 13.0);
        assert_eval("-x-1", 2.0, -3.0);
        assert_eval("0.5x-2", 4.0, 0.0);
        assert_eval("3*x+1", 1.0, 4.0);
    }

    #[test]
    fn quadratic() {
        assert_eval("x^2-9x+14", 2.0, 0.0);
        assert_eval("x^2-9x+14", 7.0, 0.0);
        assert_eval("-2x^2+3", 1.0, 1.0);
        assert_eval("x^2+x", 3.0, 12.0);
    }

    #[test]
    fn cubic() {
        assert_eval("x^3", 2.0, 8.0);
        assert_eval("x^3", -2.0, -8.0);
        assert_eval("2x^3-x^2+4x-1", 1.0, 4.0);
        assert_eval("x^3-3x", 2.0, 2.0);
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eval(" 2x + 3 ", 5.0, 13.0);
        assert_eval("x^2 - 9x + 14", 2.0, 0.0);
    }

    #[test]
    fn scaled_identity_and_constant() {
        assert_eval("3x", 2.0, 6.0);
        assert_eval("-x", 2.0, -2.0);
        assert_eval("x", 1.5, 1.5);
        assert_eval("4", 100.0, 4.0);
        assert_eval("-2.5", 0.0, -2.5);
    }

    #[test]
    fn powers_and_roots() {
        assert_eval("sqrt(x)", 9.0, 3.0);
        assert_eval("√x", 16.0, 4.0);
        assert_eval("sqrt(x^2+9)", 4.0, 5.0);
        assert_eval("√(x+1)", 3.0, 2.0);
        assert_eval("x^(1/2)", 4.0, 2.0);
        assert_eval("x^0.5", 25.0, 5.0);
        assert_eval("x^(1/3)", 27.0, 3.0);
        assert_eval("x^(1/3)", -8.0, -2.0);
        assert_eval("x^4", 2.0, 16.0);
        assert_eval("x^-1", 4.0, 0.25);
    }

    #[test]
    fn square_root_of_negative_is_nan() {
        assert!(eval_function("sqrt(x)", -4.0).is_nan());
    }

    #[test]
    fn reciprocal() {
        assert_eval("1/x", 4.0, 0.25);
        assert_eval("-2/x", 4.0, -0.5);
    }

    #[test]
    fn reciprocal_asymptote_follows_sign_of_x() {
        assert_eq!(eval_function("1/x", 0.0001), ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("1/x", -0.0001), -ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("-1/x", 0.0001), -ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("-1/x", -0.0001), ASYMPTOTE_SENTINEL);
    }

    #[test]
    fn asymptote_at_exact_zero_is_positive_side() {
        assert_eq!(eval_function("1/x", 0.0), ASYMPTOTE_SENTINEL);
    }

    #[test]
    fn fractions() {
        assert_eval("1/(x-2)", 4.0, 0.5);
        assert_eval("6/(x+1)", 2.0, 2.0);
        assert_eval("-3/x^2", 1.0, -3.0);
    }

    #[test]
    fn fraction_asymptote_uses_denominator_sign() {
        assert_eq!(eval_function("1/(x-2)", 2.0005), ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("1/(x-2)", 1.9995), -ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("-3/x^2", 0.0), -ASYMPTOTE_SENTINEL);
    }

    #[test]
    fn negative_powers_hit_the_sentinel() {
        assert_eq!(eval_function("x^-1", 0.0), ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("x^-1", -0.0005), -ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("x^(-2)", 0.0), ASYMPTOTE_SENTINEL);
        assert_eq!(eval_function("x^(-2)", -0.0005), ASYMPTOTE_SENTINEL);
        assert_eval("x^(-2)", 2.0, 0.25);
    }

    #[test]
    fn unrecognised_input_is_zero() {
        assert_eq!(eval_function("not-an-equation", 1.0), 0.0);
        assert_eq!(eval_function("", 1.0), 0.0);
        assert_eq!(eval_function("sin(x)", 1.0), 0.0);
    }

    #[test]
    fn sentinel_is_always_finite() {
        for i in -100..=100 {
            let x = i as f64 * 0.00001;
            for eq in ["1/x", "-5/x", "2/(x)", "1/(x+0)", "x^-1", "x^(-2)"] {
                let y = eval_function(eq, x);
                assert!(y.is_finite(), "{eq} at {x} gave {y}");
            }
        }
    }

    #[test]
    fn coefficients_of_quadratic() {
        let pair = DiagramParser::parse(Rule::quadratic, "-x^2+4x-3")
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(coefficients(pair), Some([-3.0, 4.0, -1.0, 0.0]));
    }

    #[test]
    fn unwrap_parens_strips_one_layer() {
        assert_eq!(unwrap_parens("((x))"), "(x)");
        assert_eq!(unwrap_parens("x+1"), "x+1");
    }
}
