//! Curve definition files
//!
//! One definition per file, RON or JSON, each describing a single named
//! curve. Unreadable or malformed files are logged and skipped so one bad
//! definition never takes down the whole load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk form of a single named curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveDef {
    /// Sparse (level, xp) milestones, interpolated between entries.
    Table { name: String, entries: Vec<(i32, f64)> },
    /// Formula over the variable `level`.
    Equation { name: String, equation: String },
}

impl CurveDef {
    pub fn name(&self) -> &str {
        match self {
            CurveDef::Table { name, .. } | CurveDef::Equation { name, .. } => name,
        }
    }
}

/// Why a definition file could not be used.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Load every usable definition in `dir`.
///
/// Files without a `.ron`/`.json` extension are ignored; files that fail to
/// read or parse are logged with a warning and skipped. A missing directory
/// yields an empty list.
pub fn load_curve_defs(dir: &Path) -> Vec<CurveDef> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("cannot read curve directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut defs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "ron" && ext != "json" {
            continue;
        }
        match load_curve_def(&path) {
            Ok(def) => defs.push(def),
            Err(e) => log::warn!("{}", e),
        }
    }
    defs
}

/// Load one definition file, dispatching on its extension.
pub fn load_curve_def(path: &Path) -> Result<CurveDef, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&text).map_err(|e| LoadError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    } else {
        ron::from_str(&text).map_err(|e| LoadError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_ron_table() {
        let def: CurveDef =
            ron::from_str(r#"Table(name: "steady", entries: [(1, 0.0), (10, 900.0)])"#).unwrap();
        assert_eq!(
            def,
            CurveDef::Table {
                name: "steady".to_string(),
                entries: vec![(1, 0.0), (10, 900.0)],
            }
        );
    }

    #[test]
    fn test_parse_json_equation() {
        let def: CurveDef = serde_json::from_str(
            r#"{"Equation": {"name": "quadratic", "equation": "100 * pow(level, 2)"}}"#,
        )
        .unwrap();
        assert_eq!(def.name(), "quadratic");
    }

    #[test]
    fn test_load_dir_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.ron"), "garbage").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(
            dir.path().join("good.ron"),
            r#"Equation(name: "linear", equation: "100 * level")"#,
        )
        .unwrap();

        let defs = load_curve_defs(dir.path());
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name(), "linear");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_curve_defs(&missing).is_empty());
    }

    #[test]
    fn test_round_trip_through_ron() {
        let def = CurveDef::Table {
            name: "tiered".to_string(),
            entries: vec![(1, 0.0), (5, 500.0)],
        };
        let text = ron::ser::to_string_pretty(&def, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: CurveDef = ron::from_str(&text).unwrap();
        assert_eq!(parsed, def);
    }
}
