//! Equation text parsing
//!
//! The grammar lives in `equation.pest`; this module folds the parse pairs
//! into an [`Expr`] tree.  The parser is written so that rendering a freshly
//! parsed serializer string reproduces it exactly, which pins down one
//! subtle choice: where a negation's parentheses live.  A `-(…)` that opens
//! an expression owns its parentheses (`Negate(e)`), while a `-(…)` that
//! follows a binary operator keeps the group visible (`Negate(Brackets(e))`).
//! The distinction is what the simplifier's collapse rules key off.

// pest_derive generates the public `Rule` enum without documentation
#![allow(missing_docs)]

use crate::expr::{BinaryOp, Equation, Expr, Formula};
use crate::Error;
use pest::iterators::Pair;
use pest::Parser as _;
use pest_derive::Parser;

/// pest parser for the equation grammar
#[derive(Parser)]
#[grammar = "equation.pest"]
struct EquationParser;

/// Whether a subexpression opens its enclosing expression or follows a
/// binary operator
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Position {
    /// Start of an equation side, bracket group, or function argument
    Head,
    /// Anywhere after a binary operator
    Operand,
}

impl Formula {
    /// Parses a textual equation, e.g. `"y / 4 = x * (x + 2)"`
    ///
    /// Exactly one `=` is required.  A failure reports the offending text
    /// alongside the grammar diagnostics.
    pub fn parse(text: &str) -> Result<Formula, Error> {
        let mut pairs =
            EquationParser::parse(Rule::equation, text).map_err(|source| Error::Parse {
                text: text.to_owned(),
                source: Box::new(source),
            })?;
        let mut sides = pairs.next().expect("grammar yields one equation").into_inner();
        let lhs = build_expr(sides.next().expect("grammar yields a left side"));
        let rhs = build_expr(sides.next().expect("grammar yields a right side"));
        Ok(Formula::new(Equation::new(lhs, rhs)))
    }
}

fn build_expr(pair: Pair<Rule>) -> Expr {
    debug_assert_eq!(pair.as_rule(), Rule::expr);
    let mut inner = pair.into_inner();
    let mut acc = build_additive(inner.next().expect("expr has a first term"), Position::Head);
    while let Some(name) = inner.next() {
        let rhs = inner.next().expect("infix function has a right operand");
        acc = Expr::double(
            name.as_str(),
            acc,
            build_additive(rhs, Position::Operand),
            true,
        );
    }
    acc
}

fn build_additive(pair: Pair<Rule>, position: Position) -> Expr {
    let mut inner = pair.into_inner();
    let mut acc = build_multiplicative(inner.next().expect("additive has a first term"), position);
    while let Some(op) = inner.next() {
        let op = match op.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            other => unreachable!("additive operator {other:?}"),
        };
        let rhs = inner.next().expect("binary operator has a right operand");
        acc = Expr::binary(op, acc, build_multiplicative(rhs, Position::Operand));
    }
    acc
}

fn build_multiplicative(pair: Pair<Rule>, position: Position) -> Expr {
    let mut inner = pair.into_inner();
    let mut acc = build_power(inner.next().expect("multiplicative has a first term"), position);
    while let Some(op) = inner.next() {
        let op = match op.as_str() {
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            other => unreachable!("multiplicative operator {other:?}"),
        };
        let rhs = inner.next().expect("binary operator has a right operand");
        acc = Expr::binary(op, acc, build_power(rhs, Position::Operand));
    }
    acc
}

/// `^` chains fold right-associatively
fn build_power(pair: Pair<Rule>, position: Position) -> Expr {
    let mut operands: Vec<Expr> = Vec::new();
    for (i, item) in pair
        .into_inner()
        .filter(|p| p.as_rule() != Rule::pow_op)
        .enumerate()
    {
        let position = if i == 0 { position } else { Position::Operand };
        operands.push(build_unary(item, position));
    }
    let mut acc = operands.pop().expect("power has a last operand");
    while let Some(lhs) = operands.pop() {
        acc = Expr::binary(BinaryOp::Pow, lhs, acc);
    }
    acc
}

fn build_unary(pair: Pair<Rule>, position: Position) -> Expr {
    let inner = pair.into_inner().next().expect("unary wraps one node");
    match inner.as_rule() {
        Rule::negate => {
            let expr = build_expr(inner.into_inner().next().expect("negate wraps an expr"));
            match position {
                Position::Head => Expr::negate(expr),
                Position::Operand => Expr::negate(Expr::brackets(expr)),
            }
        }
        Rule::primary => build_primary(inner),
        rule => unreachable!("unary node {rule:?}"),
    }
}

fn build_primary(pair: Pair<Rule>) -> Expr {
    let inner = pair.into_inner().next().expect("primary wraps one node");
    match inner.as_rule() {
        Rule::number => {
            let value = inner
                .as_str()
                .parse()
                .expect("grammar only admits float syntax");
            Expr::constant(value)
        }
        Rule::variable => {
            let letter = inner.as_str().chars().next().expect("variable is a letter");
            Expr::var(letter)
        }
        Rule::brackets => Expr::brackets(build_expr(
            inner.into_inner().next().expect("brackets wrap an expr"),
        )),
        Rule::call => {
            let mut parts = inner.into_inner();
            let name = parts.next().expect("call has a name");
            let first = build_expr(parts.next().expect("call has an argument"));
            match parts.next() {
                Some(second) => Expr::double(name.as_str(), first, build_expr(second), false),
                None => Expr::single(name.as_str(), first),
            }
        }
        rule => unreachable!("primary node {rule:?}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Hand-written equations that must render back byte for byte
    const ROUND_TRIP: &[&str] = &[
        "y = x + 2",
        "y / 4 = x * (x + 2)",
        "Y = X",
        "-(42 + 55.75) = X / 16.25",
        "-(-(42 + 55.75)) = X",
        "1 - -(-(42 + 55.75)) = X",
        "-(-(-(42 + 55.75) - -(-(T + Y - X ^ T)))) = X / 16.25",
        "42 Expm1 55.75 = X",
        "42 % T = X",
        "2 ^ X ^ 2 = Y",
        "Sin(T) = Atan2(X, Y)",
        "t = y ^ 2 + x ^ 2",
        "Tan(x) - Cos(y) = Pow(x, 2)",
        "1 Max 2 Max 3 = X",
    ];

    #[test]
    fn round_trip_corpus() {
        for text in ROUND_TRIP {
            let formula = Formula::parse(text).unwrap();
            assert_eq!(formula.to_string(), *text);
        }
    }

    #[test]
    fn rendering_is_a_fixed_point() {
        // Inputs with loose spacing or redundant case normalize in one step.
        for text in ["y=x+2", "  Y  =  X  ", "SIN(t) = x"] {
            let once = Formula::parse(text).unwrap().to_string();
            let twice = Formula::parse(&once).unwrap().to_string();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn precedence_shapes_the_tree() {
        let formula = Formula::parse("1 + 2 * 3 = x").unwrap();
        let equation = formula.equation().unwrap();
        assert_eq!(
            equation.lhs,
            Expr::binary(
                BinaryOp::Add,
                Expr::constant(1.0),
                Expr::binary(BinaryOp::Mul, Expr::constant(2.0), Expr::constant(3.0)),
            )
        );

        let formula = Formula::parse("2 ^ 3 ^ 2 = x").unwrap();
        let equation = formula.equation().unwrap();
        assert_eq!(
            equation.lhs,
            Expr::binary(
                BinaryOp::Pow,
                Expr::constant(2.0),
                Expr::binary(BinaryOp::Pow, Expr::constant(3.0), Expr::constant(2.0)),
            )
        );
    }

    #[test]
    fn negation_position_decides_bracket_ownership() {
        let head = Formula::parse("-(x + 1) = y").unwrap();
        assert_eq!(
            head.equation().unwrap().lhs,
            Expr::negate(Expr::binary(
                BinaryOp::Add,
                Expr::var('x'),
                Expr::constant(1.0)
            ))
        );

        let operand = Formula::parse("2 - -(x + 1) = y").unwrap();
        assert_eq!(
            operand.equation().unwrap().lhs,
            Expr::binary(
                BinaryOp::Sub,
                Expr::constant(2.0),
                Expr::negate(Expr::brackets(Expr::binary(
                    BinaryOp::Add,
                    Expr::var('x'),
                    Expr::constant(1.0)
                ))),
            )
        );
    }

    #[test]
    fn variables_are_never_function_names() {
        let formula = Formula::parse("42 Expm1 T = X").unwrap();
        assert_eq!(
            formula.equation().unwrap().lhs,
            Expr::double("Expm1", Expr::constant(42.0), Expr::var('T'), true)
        );

        // `t` must not be swallowed as an infix function name
        assert!(Formula::parse("1 t 2 = x").is_err());
    }

    #[test]
    fn malformed_input_reports_the_text() {
        for text in ["", "y = ", "y = x = 2", "y + 2", "y = 1.", "y = .5", "y = -x"] {
            match Formula::parse(text) {
                Err(Error::Parse { text: reported, .. }) => assert_eq!(reported, text),
                other => panic!("expected parse error for {text:?}, got {other:?}"),
            }
        }
    }
}
