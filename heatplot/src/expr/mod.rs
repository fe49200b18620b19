//! Equation syntax trees
//!
//! An [`Equation`] is a pair of [`Expr`] trees joined by `=`; its value at a
//! point is the signed residual `rhs - lhs`, so zero means the point lies on
//! the curve.  Trees are immutable once built: the simplifier returns a new
//! tree and the original stays valid, which lets callers hold the parsed and
//! the simplified form side by side.
mod simplify;
mod text;

/// A two-argument arithmetic operation
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, strum::Display, strum::EnumIter)]
pub enum BinaryOp {
    /// Addition, rendered `+`
    #[strum(to_string = "+")]
    Add,
    /// Subtraction, rendered `-`
    #[strum(to_string = "-")]
    Sub,
    /// Multiplication, rendered `*`
    #[strum(to_string = "*")]
    Mul,
    /// Division, rendered `/`
    #[strum(to_string = "/")]
    Div,
    /// Exponentiation, rendered `^`
    #[strum(to_string = "^")]
    Pow,
    /// Floating-point remainder, rendered `%`
    #[strum(to_string = "%")]
    Mod,
}

impl BinaryOp {
    /// Applies the operator to already-evaluated operands
    ///
    /// `Add`, `Sub`, `Mul` and `Div` combine their operands rhs-first
    /// (`rhs - lhs`, `rhs / lhs`, …); `Pow` and `Mod` are lhs-first.  The
    /// ordering is load-bearing: rendered output from existing corpora
    /// depends on it.
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => rhs + lhs,
            BinaryOp::Sub => rhs - lhs,
            BinaryOp::Mul => rhs * lhs,
            BinaryOp::Div => rhs / lhs,
            BinaryOp::Pow => lhs.powf(rhs),
            BinaryOp::Mod => lhs % rhs,
        }
    }
}

/// A node in an equation's expression tree
///
/// The set of variants is closed; the evaluator, serializer and simplifier
/// all match exhaustively, so adding a variant is a compile error until every
/// pass handles it.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Const(f64),

    /// Free variable: one of `X`, `Y` or `T` in either case, stored as
    /// written so it renders back verbatim
    Var(char),

    /// Binary operation
    Binary(BinaryOp, Box<Expr>, Box<Expr>),

    /// Unary negation; renders as `-(…)`
    Negate(Box<Expr>),

    /// Explicit user-visible grouping; renders as `(…)`
    Brackets(Box<Expr>),

    /// Application of a named one-argument function
    Single {
        /// Function name, matched case-insensitively against the registry
        name: String,
        /// Argument expression
        arg: Box<Expr>,
    },

    /// Application of a named two-argument function
    Double {
        /// Function name, matched case-insensitively against the registry
        name: String,
        /// First argument
        lhs: Box<Expr>,
        /// Second argument
        rhs: Box<Expr>,
        /// Whether the application was written infix (`a Name b`) rather
        /// than prefix (`Name(a, b)`)
        infix: bool,
    },
}

impl Expr {
    /// Builds a numeric literal node
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    /// Builds a variable node; the letter is kept as written
    pub fn var(letter: char) -> Self {
        Expr::Var(letter)
    }

    /// Builds a binary operation node
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Builds a negation node
    pub fn negate(expr: Expr) -> Self {
        Expr::Negate(Box::new(expr))
    }

    /// Builds an explicit grouping node
    pub fn brackets(expr: Expr) -> Self {
        Expr::Brackets(Box::new(expr))
    }

    /// Builds a one-argument function application
    pub fn single(name: impl Into<String>, arg: Expr) -> Self {
        Expr::Single {
            name: name.into(),
            arg: Box::new(arg),
        }
    }

    /// Builds a two-argument function application
    pub fn double(name: impl Into<String>, lhs: Expr, rhs: Expr, infix: bool) -> Self {
        Expr::Double {
            name: name.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            infix,
        }
    }

    /// Height of the tree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Expr::Const(..) | Expr::Var(..) => 1,
            Expr::Binary(_, lhs, rhs) => lhs.depth().max(rhs.depth()) + 1,
            Expr::Negate(e) | Expr::Brackets(e) => e.depth() + 1,
            Expr::Single { arg, .. } => arg.depth() + 1,
            Expr::Double { lhs, rhs, .. } => lhs.depth().max(rhs.depth()) + 1,
        }
    }
}

/// An implicit equation `lhs = rhs`
///
/// Evaluation produces the signed residual `rhs - lhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    /// Left-hand side, as written
    pub lhs: Expr,
    /// Right-hand side, as written
    pub rhs: Expr,
}

impl Equation {
    /// Builds an equation from its two sides
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    /// Height of the deeper side, plus one for the `=` node
    pub fn depth(&self) -> usize {
        self.lhs.depth().max(self.rhs.depth()) + 1
    }
}

/// Top-level handle for a parsed or generated equation
///
/// A formula may be empty; evaluating an empty formula is
/// [`Error::NoEquation`](crate::Error::NoEquation).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Formula {
    equation: Option<Equation>,
}

impl Formula {
    /// Wraps an equation
    pub fn new(equation: Equation) -> Self {
        Self {
            equation: Some(equation),
        }
    }

    /// A formula with no equation bound
    pub fn empty() -> Self {
        Self { equation: None }
    }

    /// The bound equation, if any
    pub fn equation(&self) -> Option<&Equation> {
        self.equation.as_ref()
    }

    /// Tree depth of the bound equation; 0 when empty
    pub fn depth(&self) -> usize {
        self.equation.as_ref().map(Equation::depth).unwrap_or(0)
    }
}

impl From<Equation> for Formula {
    fn from(equation: Equation) -> Self {
        Formula::new(equation)
    }
}
