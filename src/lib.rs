//! Xpcurve - progression curve engine
//!
//! Maps levels to cumulative experience and back. Curves are either sparse
//! lookup tables (interpolated between entries, extrapolated past the end)
//! or arithmetic formulas over the variable `level`, evaluated by a small
//! built-in expression engine. A registry owns the named curves, loads
//! definitions from disk, and always resolves to a usable default.

pub mod curve;
pub mod data;
pub mod expr;

// Re-export commonly used types
pub use curve::{Curve, CurveError, CurveKind, CurveRegistry, LevelTable, LEVEL_VARIABLE};
pub use data::{CurveDef, DEFAULT_CURVE_NAME, DEFAULT_EQUATION};
pub use expr::{evaluate, ExprError};
