//! Seeded example curves
//!
//! Used when the definition directory yields nothing usable, so the engine
//! always has a few recognizable shapes to hand out.

use std::path::Path;

use super::loader::CurveDef;

/// Name of the synthesized fallback curve.
pub const DEFAULT_CURVE_NAME: &str = "default";

/// Formula of the synthesized fallback curve.
pub const DEFAULT_EQUATION: &str = "100 * level^2";

/// Illustrative starter shapes: linear, quadratic, square-root growth and a
/// milestone table.
pub fn default_curve_defs() -> Vec<CurveDef> {
    vec![
        CurveDef::Equation {
            name: "linear".to_string(),
            equation: "100 * level".to_string(),
        },
        CurveDef::Equation {
            name: "quadratic".to_string(),
            equation: "100 * pow(level, 2)".to_string(),
        },
        CurveDef::Equation {
            name: "square_root".to_string(),
            equation: "1000 * sqrt(level)".to_string(),
        },
        CurveDef::Table {
            name: "tiered".to_string(),
            entries: vec![
                (1, 0.0),
                (5, 500.0),
                (10, 2000.0),
                (20, 10_000.0),
                (50, 100_000.0),
            ],
        },
    ]
}

/// Write the starter shapes into `dir` as RON files so server owners have
/// something to edit. Best effort: failures are logged and the in-memory
/// defaults are used either way.
pub fn seed_default_files(dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        log::warn!("cannot create curve directory {}: {}", dir.display(), e);
        return;
    }
    for def in default_curve_defs() {
        let path = dir.join(format!("{}.ron", def.name()));
        if path.exists() {
            continue;
        }
        match ron::ser::to_string_pretty(&def, ron::ser::PrettyConfig::default()) {
            Ok(text) => {
                if let Err(e) = std::fs::write(&path, text) {
                    log::warn!("cannot write {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("cannot serialize default curve '{}': {}", def.name(), e),
        }
    }
}
