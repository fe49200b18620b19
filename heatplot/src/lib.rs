//! Heatplot renders textual implicit equations over `x`, `y` and a time
//! parameter `t` as heat-mapped raster frames.
//!
//! An equation like `y / 4 = x * (x + 2)` is sampled over an integer cell
//! grid: each cell evaluates the signed **residual** `rhs - lhs`, and
//! residuals inside the near-zero band `[-1, 1]` are considered on or near
//! the curve.  The residual field becomes a colour raster through a bucketed
//! heat scale (black on the curve, red above it, blue below), and a
//! sequence of such rasters over a time range becomes an animation.
//!
//! # Pipeline
//!
//! Text goes through [`Formula::parse`] into an immutable expression tree,
//! optionally through [`Formula::simplify`], and into the sampling pipeline:
//!
//! ```
//! use heatplot::plot::{self, GridRect};
//! use heatplot::Formula;
//!
//! let formula = Formula::parse("y = x * t")?;
//! let (time_used, frames) = plot::animate(&formula, 0, 10, GridRect::centered(20), 0.1)?;
//! assert!(time_used);
//! assert_eq!(frames.len(), 10);
//! # Ok::<(), heatplot::Error>(())
//! ```
//!
//! Equations that never read `t` produce exactly one frame, no matter the
//! requested range: the evaluator tracks which variables each evaluation
//! actually touched (see [`eval::EvalState`]), and the animator gates on
//! that.
//!
//! [`render::rasterise`] turns each frame into RGB pixels and
//! [`render::palette`] exposes the stable colour table an encoder needs to
//! write all frames against one global palette.
//!
//! The expression grammar supports the usual arithmetic operators plus named
//! one- and two-argument functions from a fixed registry ([`builtins`]);
//! unknown names deliberately evaluate as no-ops rather than failing.
//! [`generate`] builds random formulas for the search mode, and
//! [`plot::FrameStats`] decides whether a random candidate's animation is
//! interesting enough to keep.
#![warn(missing_docs)]

pub mod builtins;
mod error;
pub mod eval;
pub mod expr;
pub mod generate;
pub mod parse;
pub mod plot;
pub mod render;

pub use error::Error;
pub use eval::{EvalFault, EvalState, Sample, MAX_EVAL_DEPTH};
pub use expr::{BinaryOp, Equation, Expr, Formula};
