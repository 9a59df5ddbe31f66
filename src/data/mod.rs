//! Curve definition loading
//!
//! Reads per-curve definition files (RON or JSON) and supplies the seeded
//! defaults used when a directory has nothing usable in it.

pub mod defaults;
pub mod loader;

pub use defaults::{default_curve_defs, DEFAULT_CURVE_NAME, DEFAULT_EQUATION};
pub use loader::{load_curve_def, load_curve_defs, CurveDef, LoadError};
