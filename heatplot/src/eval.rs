//! Pointwise evaluation of equations
//!
//! Every evaluation happens against a fresh [`EvalState`], which carries the
//! variable bindings and records which variables were actually read.  The
//! read-tracking is per call, never cached on the tree: the same tree is
//! evaluated at many points, and the answer to "does this equation use T?"
//! must come from an actual evaluation.
//!
//! Numeric trouble is not an error: division by zero, domain violations and
//! overflow all propagate as IEEE `Inf`/`NaN` through the tree.  The only
//! thing that can fail inside the evaluator is a defensive guard, surfaced as
//! an [`EvalFault`] and normalized away at the [`Formula::evaluate`]
//! boundary.
use crate::builtins;
use crate::expr::{Equation, Expr, Formula};
use crate::Error;
use thiserror::Error;

/// Maximum expression nesting the evaluator will follow
pub const MAX_EVAL_DEPTH: usize = 256;

/// Variable bindings for a single evaluation, plus read-tracking flags
///
/// Created fresh per sample point and discarded afterwards; never shared.
#[derive(Copy, Clone, Debug)]
pub struct EvalState {
    x: f64,
    y: f64,
    t: i32,
    accessed_x: bool,
    accessed_y: bool,
    accessed_t: bool,
}

impl EvalState {
    /// Binds the three variables; all read flags start cleared
    pub fn new(x: f64, y: f64, t: i32) -> Self {
        Self {
            x,
            y,
            t,
            accessed_x: false,
            accessed_y: false,
            accessed_t: false,
        }
    }

    /// Reads X, marking it as used
    pub fn x(&mut self) -> f64 {
        self.accessed_x = true;
        self.x
    }

    /// Reads Y, marking it as used
    pub fn y(&mut self) -> f64 {
        self.accessed_y = true;
        self.y
    }

    /// Reads T, marking it as used
    pub fn t(&mut self) -> f64 {
        self.accessed_t = true;
        f64::from(self.t)
    }

    /// Whether X was read since construction
    pub fn x_used(&self) -> bool {
        self.accessed_x
    }

    /// Whether Y was read since construction
    pub fn y_used(&self) -> bool {
        self.accessed_y
    }

    /// Whether T was read since construction
    pub fn t_used(&self) -> bool {
        self.accessed_t
    }
}

/// Fault raised by the evaluator's defensive guards
///
/// A fault is not a user-visible error: [`Formula::evaluate`] converts it
/// into a zero residual so that one bad sample can never abort a surrounding
/// grid scan.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum EvalFault {
    /// Expression nesting exceeded [`MAX_EVAL_DEPTH`]
    #[error("expression nesting exceeded {MAX_EVAL_DEPTH} levels")]
    TooDeep,
}

/// One evaluated sample of an equation
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Signed residual `rhs - lhs`; zero means the point is on the curve
    pub residual: f64,
    /// Whether the T variable was read during this evaluation
    pub time_used: bool,
}

impl Expr {
    /// Evaluates this node against `state`
    ///
    /// `depth` is the current nesting level, checked against
    /// [`MAX_EVAL_DEPTH`].
    fn evaluate(&self, state: &mut EvalState, depth: usize) -> Result<f64, EvalFault> {
        if depth > MAX_EVAL_DEPTH {
            return Err(EvalFault::TooDeep);
        }
        let value = match self {
            Expr::Const(value) => *value,
            Expr::Var(letter) => match letter.to_ascii_uppercase() {
                'X' => state.x(),
                'Y' => state.y(),
                'T' => state.t(),
                _ => 0.0,
            },
            Expr::Binary(op, lhs, rhs) => {
                // rhs evaluates first; see `BinaryOp::apply`
                let rhs = rhs.evaluate(state, depth + 1)?;
                let lhs = lhs.evaluate(state, depth + 1)?;
                op.apply(lhs, rhs)
            }
            Expr::Negate(expr) => -expr.evaluate(state, depth + 1)?,
            Expr::Brackets(expr) => expr.evaluate(state, depth + 1)?,
            Expr::Single { name, arg } => {
                let arg = arg.evaluate(state, depth + 1)?;
                match builtins::single(name) {
                    Some(f) => f(arg),
                    None => arg,
                }
            }
            Expr::Double {
                name, lhs, rhs, ..
            } => {
                let lhs = lhs.evaluate(state, depth + 1)?;
                let rhs = rhs.evaluate(state, depth + 1)?;
                match builtins::double(name) {
                    Some(f) => f(lhs, rhs),
                    None => lhs,
                }
            }
        };
        Ok(value)
    }
}

impl Equation {
    /// Signed residual `rhs - lhs` at the given state
    pub fn residual(&self, state: &mut EvalState) -> Result<f64, EvalFault> {
        let rhs = self.rhs.evaluate(state, 0)?;
        let lhs = self.lhs.evaluate(state, 0)?;
        Ok(rhs - lhs)
    }
}

impl Formula {
    /// Evaluates the bound equation at `(x, y, t)`
    ///
    /// Fails only when no equation is bound.  An evaluator fault is
    /// normalized to a zero residual here, so a long grid scan survives a
    /// single bad sample.
    pub fn evaluate(&self, x: f64, y: f64, t: i32) -> Result<Sample, Error> {
        let equation = self.equation().ok_or(Error::NoEquation)?;
        let mut state = EvalState::new(x, y, t);
        let residual = match equation.residual(&mut state) {
            Ok(residual) => residual,
            Err(fault) => {
                log::warn!("recovered from {fault} at ({x}, {y}, {t})");
                0.0
            }
        };
        Ok(Sample {
            residual,
            time_used: state.t_used(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::Expr;

    fn residual_of(text: &str, x: f64, y: f64, t: i32) -> f64 {
        Formula::parse(text).unwrap().evaluate(x, y, t).unwrap().residual
    }

    #[test]
    fn time_tracking() {
        let quiet = Formula::parse("y / 4 = x + 2").unwrap();
        for (x, y, t) in [(0.0, 0.0, 0), (1.5, -2.0, 7), (100.0, 3.0, -4)] {
            assert!(!quiet.evaluate(x, y, t).unwrap().time_used);
        }

        let timed = Formula::parse("42 Expm1 T = X").unwrap();
        assert!(timed.evaluate(0.0, 0.0, 0).unwrap().time_used);
    }

    #[test]
    fn x_and_y_tracking() {
        let mut state = EvalState::new(1.0, 2.0, 3);
        let equation = Formula::parse("y = 1").unwrap().equation().unwrap().clone();
        equation.residual(&mut state).unwrap();
        assert!(state.y_used());
        assert!(!state.x_used());
        assert!(!state.t_used());
    }

    #[test]
    fn residual_is_rhs_minus_lhs() {
        assert_eq!(residual_of("Y = X", 1.0, 1.0, 0), 0.0);
        assert_eq!(residual_of("Y = X", 0.0, 1.0, 0), -1.0);
        assert_eq!(residual_of("Y = X", 3.0, 1.0, 0), 2.0);
    }

    #[test]
    fn operand_convention_is_preserved() {
        // Sub and Div bind rhs-first; Pow and Mod lhs-first.
        assert_eq!(residual_of("0 = 8 - 2", 0.0, 0.0, 0), -6.0);
        assert_eq!(residual_of("0 = 2 / 8", 0.0, 0.0, 0), 4.0);
        assert_eq!(residual_of("0 = 2 ^ 3 ^ 2", 0.0, 0.0, 0), 512.0);
        assert_eq!(residual_of("0 = 7 % 4", 0.0, 0.0, 0), 3.0);
    }

    #[test]
    fn numeric_trouble_is_not_an_error() {
        // `0 / 1` evaluates rhs-first as 1/0
        let residual = residual_of("Y = 0 / 1", 0.0, 0.0, 0);
        assert!(residual.is_infinite());

        // `1 - 0` evaluates rhs-first as 0 - 1
        let residual = residual_of("Y = Log(1 - 0)", 0.0, 0.0, 0);
        assert!(residual.is_nan());
    }

    #[test]
    fn unknown_functions_pass_through() {
        assert_eq!(residual_of("Y = Frobnicate(X)", 2.0, 0.0, 0), 2.0);
        assert_eq!(residual_of("Y = Frobnicate(X, 3)", 2.0, 0.0, 0), 2.0);
        assert_eq!(residual_of("Y = 5 Frobnicate X", 0.0, 0.0, 0), 5.0);
    }

    #[test]
    fn registered_functions_apply() {
        let residual = residual_of("Y = Hypot(3, 4)", 0.0, 0.0, 0);
        assert_eq!(residual, 5.0);
    }

    #[test]
    fn runaway_nesting_becomes_zero_residual() {
        let mut deep = Expr::var('X');
        for _ in 0..MAX_EVAL_DEPTH + 8 {
            deep = Expr::negate(deep);
        }
        let formula = Formula::new(crate::Equation::new(Expr::constant(0.0), deep));
        let sample = formula.evaluate(5.0, 0.0, 0).unwrap();
        assert_eq!(sample.residual, 0.0);
    }

    #[test]
    fn empty_formula_is_an_error() {
        assert!(matches!(
            Formula::empty().evaluate(0.0, 0.0, 0),
            Err(Error::NoEquation)
        ));
    }
}
