//! Arithmetic expression engine
//!
//! A small parser/evaluator for curve formulas: infix `+ - * / ^`,
//! parentheses, floating-point literals, the builtins `pow`/`sqrt`/`floor`/
//! `ceil`, and a single bound variable. No embedded scripting runtime.

pub mod eval;
pub mod token;

pub use eval::{evaluate, EvalErrorKind, ExprError, ParseErrorKind};
pub use token::{tokenize, Op, Token};
