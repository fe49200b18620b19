//! Canonical text rendering of equation trees
//!
//! The surface forms here are a contract, spacing included: parsing a string
//! produced by these impls and rendering the parse result must reproduce the
//! string byte for byte.
use super::{Equation, Expr, Formula};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{value}"),
            Expr::Var(letter) => write!(f, "{letter}"),
            Expr::Binary(op, lhs, rhs) => write!(f, "{lhs} {op} {rhs}"),
            // A bracketed child supplies its own parentheses; either way the
            // rendered form is `-(…)`.
            Expr::Negate(expr) => match expr.as_ref() {
                inner @ Expr::Brackets(..) => write!(f, "-{inner}"),
                inner => write!(f, "-({inner})"),
            },
            Expr::Brackets(expr) => write!(f, "({expr})"),
            Expr::Single { name, arg } => write!(f, "{name}({arg})"),
            Expr::Double {
                name,
                lhs,
                rhs,
                infix: true,
            } => write!(f, "{lhs} {name} {rhs}"),
            Expr::Double {
                name,
                lhs,
                rhs,
                infix: false,
            } => write!(f, "{name}({lhs}, {rhs})"),
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// An empty formula renders as the empty string
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.equation() {
            Some(equation) => equation.fmt(f),
            None => Ok(()),
        }
    }
}
