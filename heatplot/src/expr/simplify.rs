//! Local rewrites over equation trees
//!
//! The only rewrites are the two negation collapses below; everything else
//! keeps its shape while its children are simplified.  There is deliberately
//! no constant folding and no reordering, so the rendered text of an
//! unaffected subtree never changes.
use super::{Equation, Expr, Formula};

impl Expr {
    /// Collapses redundant negations, returning a new tree
    ///
    /// Two patterns rewrite:
    ///
    /// - `Negate(Negate(e))` drops both negation layers;
    /// - `Negate(Brackets(Negate(e)))` drops both negations while the
    ///   user-visible bracket survives.
    ///
    /// The pass is idempotent: neither pattern can reappear in its output.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Negate(inner) => match inner.as_ref() {
                Expr::Negate(e) => e.simplify(),
                Expr::Brackets(group) => match group.as_ref() {
                    Expr::Negate(e) => Expr::Brackets(Box::new(e.simplify())),
                    _ => Expr::Negate(Box::new(inner.simplify())),
                },
                _ => Expr::Negate(Box::new(inner.simplify())),
            },
            Expr::Const(value) => Expr::Const(*value),
            Expr::Var(letter) => Expr::Var(*letter),
            Expr::Binary(op, lhs, rhs) => {
                Expr::Binary(*op, Box::new(lhs.simplify()), Box::new(rhs.simplify()))
            }
            Expr::Brackets(e) => Expr::Brackets(Box::new(e.simplify())),
            Expr::Single { name, arg } => Expr::Single {
                name: name.clone(),
                arg: Box::new(arg.simplify()),
            },
            Expr::Double {
                name,
                lhs,
                rhs,
                infix,
            } => Expr::Double {
                name: name.clone(),
                lhs: Box::new(lhs.simplify()),
                rhs: Box::new(rhs.simplify()),
                infix: *infix,
            },
        }
    }
}

impl Equation {
    /// Simplifies both sides, returning a new equation
    pub fn simplify(&self) -> Equation {
        Equation {
            lhs: self.lhs.simplify(),
            rhs: self.rhs.simplify(),
        }
    }
}

impl Formula {
    /// Simplifies the bound equation, if any
    pub fn simplify(&self) -> Formula {
        match self.equation() {
            Some(equation) => Formula::new(equation.simplify()),
            None => Formula::empty(),
        }
    }
}
