//! Sparse level tables
//!
//! A table curve lists a handful of (level, xp) milestones; levels between
//! milestones are linearly interpolated, levels past the last milestone are
//! extrapolated with the slope of the final segment.

/// Ordered, deduplicated (level, xp) entries.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    entries: Vec<(i32, f64)>,
}

impl LevelTable {
    /// Build a table from entries in any order. Entries are sorted by level;
    /// when a level appears more than once the last value given wins.
    /// Returns `None` for an empty entry list.
    pub fn new(mut entries: Vec<(i32, f64)>) -> Option<LevelTable> {
        if entries.is_empty() {
            return None;
        }
        entries.sort_by_key(|&(level, _)| level);
        let mut deduped: Vec<(i32, f64)> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last_mut() {
                Some(last) if last.0 == entry.0 => *last = entry,
                _ => deduped.push(entry),
            }
        }
        Some(LevelTable { entries: deduped })
    }

    /// Sorted view of the entries.
    pub fn entries(&self) -> &[(i32, f64)] {
        &self.entries
    }

    /// Xp at `level`: exact entry, interpolation between the surrounding
    /// entries, clamp below the first entry, extrapolation past the last.
    pub fn xp_at(&self, level: i32) -> f64 {
        match self.entries.binary_search_by_key(&level, |&(l, _)| l) {
            Ok(i) => self.entries[i].1,
            Err(0) => self.entries[0].1, // below range: clamp, never extrapolate down
            Err(i) if i == self.entries.len() => self.extrapolate(level),
            Err(i) => Self::interpolate(self.entries[i - 1], self.entries[i], level),
        }
    }

    fn interpolate(floor: (i32, f64), ceil: (i32, f64), level: i32) -> f64 {
        let (floor_level, floor_xp) = floor;
        let (ceil_level, ceil_xp) = ceil;
        let t = (level - floor_level) as f64 / (ceil_level - floor_level) as f64;
        floor_xp + t * (ceil_xp - floor_xp)
    }

    /// Past the end, only the most recent trend continues: the slope between
    /// the last two entries. A single-entry table clamps instead.
    fn extrapolate(&self, level: i32) -> f64 {
        let (last_level, last_xp) = self.entries[self.entries.len() - 1];
        if self.entries.len() < 2 {
            return last_xp;
        }
        let (prev_level, prev_xp) = self.entries[self.entries.len() - 2];
        let slope = (last_xp - prev_xp) / (last_level - prev_level) as f64;
        last_xp + slope * (level - last_level) as f64
    }
}
