//! Named curve registry
//!
//! Owns the name -> curve namespace. Loading never leaves the registry
//! unusable: bad definitions are skipped with a warning, an empty definition
//! directory is seeded with a few example shapes, and unknown names resolve
//! to a synthesized default curve.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::data::defaults::{
    default_curve_defs, seed_default_files, DEFAULT_CURVE_NAME, DEFAULT_EQUATION,
};
use crate::data::loader::{load_curve_defs, CurveDef};

use super::{Curve, LevelTable};

/// Registry of named progression curves, loaded from a definition directory.
pub struct CurveRegistry {
    dir: PathBuf,
    curves: RwLock<HashMap<String, Arc<Curve>>>,
}

impl CurveRegistry {
    /// Create a registry backed by `dir` and load it immediately.
    pub fn new(dir: impl Into<PathBuf>) -> CurveRegistry {
        let registry = CurveRegistry {
            dir: dir.into(),
            curves: RwLock::new(HashMap::new()),
        };
        registry.reload();
        registry
    }

    /// Discard the current curve set and reload from disk.
    ///
    /// The replacement map is built completely before it is swapped in, so a
    /// concurrent `get` sees either the old set or the new one, never a
    /// half-populated registry.
    pub fn reload(&self) {
        let map = self.build_curves();
        *self.curves.write() = map;
    }

    fn build_curves(&self) -> HashMap<String, Arc<Curve>> {
        let mut defs = load_curve_defs(&self.dir);
        if defs.is_empty() {
            log::info!(
                "no usable curve definitions in {}, seeding defaults",
                self.dir.display()
            );
            seed_default_files(&self.dir);
            defs = default_curve_defs();
        }

        let mut map = HashMap::new();
        for def in defs {
            match curve_from_def(def) {
                Ok(curve) => {
                    log::debug!("loaded curve '{}'", curve.name());
                    map.insert(curve.name().to_string(), Arc::new(curve));
                }
                Err(reason) => log::warn!("skipping curve definition: {}", reason),
            }
        }

        // the registry must always resolve something
        map.entry(DEFAULT_CURVE_NAME.to_string())
            .or_insert_with(|| Arc::new(Curve::equation(DEFAULT_CURVE_NAME, DEFAULT_EQUATION)));

        log::info!("curve registry holds {} curve(s)", map.len());
        map
    }

    /// The named curve, or the default curve when the name is unknown.
    /// A miss is not an error; this never fails.
    pub fn get(&self, name: &str) -> Arc<Curve> {
        {
            let curves = self.curves.read();
            if let Some(curve) = curves.get(name) {
                return curve.clone();
            }
            if let Some(curve) = curves.get(DEFAULT_CURVE_NAME) {
                return curve.clone();
            }
        }
        // only reachable if the default was somehow removed; put one back
        let curve = Arc::new(Curve::equation(DEFAULT_CURVE_NAME, DEFAULT_EQUATION));
        self.curves
            .write()
            .insert(DEFAULT_CURVE_NAME.to_string(), curve.clone());
        curve
    }

    /// The shared curve for `equation`, created and registered on first use.
    ///
    /// Identical equation text (ignoring whitespace) maps to one curve
    /// instance, and therefore one memoization cache, instead of being
    /// re-parsed per caller.
    pub fn get_or_create_from_equation(&self, equation: &str) -> Arc<Curve> {
        let key = equation_key(equation);
        if let Some(curve) = self.curves.read().get(&key) {
            return curve.clone();
        }
        let mut curves = self.curves.write();
        curves
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Curve::equation(key.clone(), equation)))
            .clone()
    }

    /// Names currently registered, unordered.
    pub fn names(&self) -> Vec<String> {
        self.curves.read().keys().cloned().collect()
    }
}

/// Stable lookup key for an equation: its text with whitespace stripped.
fn equation_key(equation: &str) -> String {
    equation.chars().filter(|c| !c.is_whitespace()).collect()
}

fn curve_from_def(def: CurveDef) -> Result<Curve, String> {
    match def {
        CurveDef::Table { name, entries } => {
            let table = LevelTable::new(entries)
                .ok_or_else(|| format!("table curve '{}' has no entries", name))?;
            Ok(Curve::table(name, table))
        }
        CurveDef::Equation { name, equation } => {
            let curve = Curve::equation(name, equation);
            // probe once so a formula that cannot evaluate is caught at load
            // time instead of mid-award
            if let Err(e) = curve.xp_for_level(2) {
                return Err(e.to_string());
            }
            Ok(curve)
        }
    }
}
