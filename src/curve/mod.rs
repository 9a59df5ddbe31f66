//! Progression curves
//!
//! A curve maps an integer level to the cumulative experience required to
//! reach it, and back. Curves are either sparse lookup tables or equations
//! over the variable `level`; each instance memoizes its per-level results.

pub mod registry;
pub mod table;

pub use registry::CurveRegistry;
pub use table::LevelTable;

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use crate::expr::{evaluate, ExprError};

/// Variable token equation curves are written against.
pub const LEVEL_VARIABLE: &str = "level";

/// How a curve computes its values.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveKind {
    /// Explicit (level, xp) milestones with interpolation between them.
    Table(LevelTable),
    /// A formula over `level`, e.g. `100 * pow(level, 2)`.
    Equation { text: String },
}

/// Curve lookup failure. Table curves never fail; equation curves surface
/// evaluator errors wrapped with the curve name, never a silent zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("curve '{curve}' failed to evaluate its equation: {source}")]
    Equation {
        curve: String,
        #[source]
        source: ExprError,
    },
}

/// One named progression curve.
///
/// Never structurally mutated after construction; only the cache grows.
/// Reload replaces whole instances, which drops their caches with them.
#[derive(Debug)]
pub struct Curve {
    name: String,
    kind: CurveKind,
    // Memoized per-level results. Racing recomputations of the same level
    // are tolerated: the value is deterministic and the last write wins.
    cache: RwLock<HashMap<i32, f64>>,
}

impl Curve {
    pub fn new(name: impl Into<String>, kind: CurveKind) -> Curve {
        Curve {
            name: name.into(),
            kind,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn table(name: impl Into<String>, table: LevelTable) -> Curve {
        Curve::new(name, CurveKind::Table(table))
    }

    pub fn equation(name: impl Into<String>, text: impl Into<String>) -> Curve {
        Curve::new(name, CurveKind::Equation { text: text.into() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CurveKind {
        &self.kind
    }

    /// Cumulative experience required to reach `level`.
    ///
    /// Zero at and below level 1 for every curve kind.
    pub fn xp_for_level(&self, level: i32) -> Result<f64, CurveError> {
        if level <= 1 {
            return Ok(0.0);
        }
        if let Some(&xp) = self.cache.read().get(&level) {
            return Ok(xp);
        }
        let xp = match &self.kind {
            CurveKind::Table(table) => table.xp_at(level),
            CurveKind::Equation { text } => evaluate(text, LEVEL_VARIABLE, level as f64)
                .map_err(|source| CurveError::Equation {
                    curve: self.name.clone(),
                    source,
                })?,
        };
        self.cache.write().insert(level, xp);
        Ok(xp)
    }

    /// Highest level in `[1, max_level]` whose requirement is within `xp`.
    ///
    /// Returns 1 when no level qualifies and `max_level` when the cap
    /// requirement is met. Binary search; assumes a monotone curve.
    pub fn level_for_xp(&self, xp: f64, max_level: i32) -> Result<i32, CurveError> {
        let mut lo = 1;
        let mut hi = max_level;
        let mut best = 1;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            if self.xp_for_level(mid)? <= xp {
                best = mid;
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }
        Ok(best)
    }

    /// Experience between `level` and the level after it.
    pub fn xp_to_next_level(&self, level: i32) -> Result<f64, CurveError> {
        if level <= 0 {
            return self.xp_for_level(2);
        }
        Ok(self.xp_for_level(level + 1)? - self.xp_for_level(level)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_curve() -> Curve {
        Curve::table(
            "test",
            LevelTable::new(vec![(1, 0.0), (10, 900.0)]).unwrap(),
        )
    }

    fn quadratic() -> Curve {
        Curve::equation("quadratic", "100 * pow(level, 2)")
    }

    #[test]
    fn test_level_one_and_below_are_free() {
        for curve in [table_curve(), quadratic()] {
            assert_eq!(curve.xp_for_level(1).unwrap(), 0.0);
            assert_eq!(curve.xp_for_level(0).unwrap(), 0.0);
            assert_eq!(curve.xp_for_level(-5).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_equation_curve_values() {
        let curve = quadratic();
        assert_eq!(curve.xp_for_level(5).unwrap(), 2500.0);
        assert_eq!(curve.xp_for_level(10).unwrap(), 10000.0);
        // caret form behaves the same
        let caret = Curve::equation("caret", "100 * level^2");
        assert_eq!(caret.xp_for_level(5).unwrap(), 2500.0);
    }

    #[test]
    fn test_table_interpolation_and_extrapolation() {
        let curve = table_curve();
        assert_eq!(curve.xp_for_level(5).unwrap(), 400.0);
        assert_eq!(curve.xp_for_level(20).unwrap(), 1900.0);
    }

    #[test]
    fn test_monotone_table_gives_monotone_xp() {
        let curve = Curve::table(
            "mono",
            LevelTable::new(vec![(1, 0.0), (5, 500.0), (10, 2000.0), (20, 10000.0)]).unwrap(),
        );
        let mut prev = 0.0;
        for level in 1..=30 {
            let xp = curve.xp_for_level(level).unwrap();
            assert!(xp >= prev, "xp decreased at level {}", level);
            prev = xp;
        }
    }

    #[test]
    fn test_level_for_xp_round_trip() {
        for curve in [table_curve(), quadratic()] {
            for level in 1..=50 {
                let xp = curve.xp_for_level(level).unwrap();
                assert_eq!(curve.level_for_xp(xp, 50).unwrap(), level);
            }
        }
    }

    #[test]
    fn test_level_for_xp_clamps() {
        let curve = quadratic();
        assert_eq!(curve.level_for_xp(0.0, 100).unwrap(), 1);
        assert_eq!(curve.level_for_xp(-10.0, 100).unwrap(), 1);
        assert_eq!(curve.level_for_xp(1e12, 100).unwrap(), 100);
    }

    #[test]
    fn test_xp_to_next_level() {
        let curve = quadratic();
        // level 1 -> 2 costs the full level-2 requirement
        assert_eq!(curve.xp_to_next_level(1).unwrap(), 400.0);
        assert_eq!(curve.xp_to_next_level(5).unwrap(), 3600.0 - 2500.0);
        // at or below zero: the cost of reaching level 2
        assert_eq!(curve.xp_to_next_level(0).unwrap(), 400.0);
        assert_eq!(curve.xp_to_next_level(-3).unwrap(), 400.0);
    }

    #[test]
    fn test_equation_failure_is_wrapped_with_curve_name() {
        let curve = Curve::equation("broken", "100 / (level - level)");
        let err = curve.xp_for_level(5).unwrap_err();
        let CurveError::Equation { curve: name, source } = err;
        assert_eq!(name, "broken");
        assert_eq!(source.expression(), "100 / (level - level)");
    }

    #[test]
    fn test_cached_lookup_is_stable() {
        let curve = quadratic();
        let first = curve.xp_for_level(7).unwrap();
        let second = curve.xp_for_level(7).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, 4900.0);
    }

    #[test]
    fn test_concurrent_lookups() {
        use std::sync::Arc;

        let curve = Arc::new(quadratic());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let curve = curve.clone();
                std::thread::spawn(move || {
                    for level in 2..=100 {
                        let expected = 100.0 * (level as f64).powf(2.0);
                        assert_eq!(curve.xp_for_level(level).unwrap(), expected);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
