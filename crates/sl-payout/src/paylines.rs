//! Payline definitions and the enable/disable payline set

use serde::{Deserialize, Serialize};

use sl_core::{ConfigError, ConfigResult};

use crate::grid::Cell;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row positions for each reel (e.g., [1, 0, 0, 0, 1] for a "V" shape)
    pub positions: Vec<u8>,
}

impl Payline {
    /// Create a straight line (same row across all reels)
    pub fn straight(index: u8, row: u8, reel_count: u8) -> Self {
        Self {
            index,
            positions: vec![row; reel_count as usize],
        }
    }

    /// Create a line from explicit rows
    pub fn new(index: u8, positions: &[u8]) -> Self {
        Self {
            index,
            positions: positions.to_vec(),
        }
    }

    /// Coordinates walked left to right, one per reel
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(col, &row)| Cell::new(col, row as usize))
    }

    /// Check the line fits a rows × cols grid
    pub fn validate(&self, rows: usize, cols: usize) -> ConfigResult<()> {
        if self.positions.len() != cols {
            return Err(ConfigError::InvalidPayline {
                index: self.index,
                reason: format!("{} positions for {} reels", self.positions.len(), cols),
            });
        }
        if let Some(&row) = self.positions.iter().find(|&&r| r as usize >= rows) {
            return Err(ConfigError::InvalidPayline {
                index: self.index,
                reason: format!("row {} outside a {}-row grid", row, rows),
            });
        }
        Ok(())
    }
}

/// Standard payline patterns for a 5×3 grid
pub fn standard_20_paylines() -> Vec<Payline> {
    vec![
        // Straight lines
        Payline::straight(0, 1, 5), // Middle
        Payline::straight(1, 0, 5), // Top
        Payline::straight(2, 2, 5), // Bottom
        // V shapes
        Payline::new(3, &[0, 1, 2, 1, 0]),
        Payline::new(4, &[2, 1, 0, 1, 2]),
        // Zigzag
        Payline::new(5, &[0, 0, 1, 2, 2]),
        Payline::new(6, &[2, 2, 1, 0, 0]),
        Payline::new(7, &[1, 0, 0, 0, 1]),
        Payline::new(8, &[1, 2, 2, 2, 1]),
        // W shapes
        Payline::new(9, &[0, 1, 0, 1, 0]),
        Payline::new(10, &[2, 1, 2, 1, 2]),
        Payline::new(11, &[0, 1, 1, 1, 0]),
        Payline::new(12, &[2, 1, 1, 1, 2]),
        // Steps
        Payline::new(13, &[1, 1, 0, 1, 1]),
        Payline::new(14, &[1, 1, 2, 1, 1]),
        // Complex
        Payline::new(15, &[0, 2, 0, 2, 0]),
        Payline::new(16, &[2, 0, 2, 0, 2]),
        Payline::new(17, &[1, 0, 1, 0, 1]),
        Payline::new(18, &[1, 2, 1, 2, 1]),
        Payline::new(19, &[0, 0, 2, 0, 0]),
    ]
}

/// Immutable line patterns plus a caller-controlled enabled flag per line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaylineSet {
    lines: Vec<Payline>,
    enabled: Vec<bool>,
}

impl PaylineSet {
    /// All lines enabled
    pub fn new(lines: Vec<Payline>) -> Self {
        let enabled = vec![true; lines.len()];
        Self { lines, enabled }
    }

    /// Validate every line against the grid shape
    pub fn validate(&self, rows: usize, cols: usize) -> ConfigResult<()> {
        if self.lines.is_empty() {
            return Err(ConfigError::InvalidParam("payline set is empty".into()));
        }
        self.lines.iter().try_for_each(|l| l.validate(rows, cols))
    }

    pub fn lines(&self) -> &[Payline] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Enabled lines, in configuration order
    pub fn active(&self) -> impl Iterator<Item = &Payline> + '_ {
        self.lines
            .iter()
            .zip(&self.enabled)
            .filter(|(_, on)| **on)
            .map(|(line, _)| line)
    }

    pub fn active_count(&self) -> usize {
        self.enabled.iter().filter(|on| **on).count()
    }

    pub fn is_enabled(&self, position: usize) -> bool {
        self.enabled.get(position).copied().unwrap_or(false)
    }

    /// Toggle one line by its position in the set; out-of-range is ignored
    pub fn set_enabled(&mut self, position: usize, on: bool) {
        if let Some(flag) = self.enabled.get_mut(position) {
            *flag = on;
        }
    }

    /// Enable the first `count` lines and disable the rest
    pub fn set_active_count(&mut self, count: usize) {
        for (i, flag) in self.enabled.iter_mut().enumerate() {
            *flag = i < count;
        }
    }

    pub fn enable_all(&mut self) {
        self.set_active_count(self.lines.len());
    }

    pub fn disable_all(&mut self) {
        self.set_active_count(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payline_straight() {
        let line = Payline::straight(0, 1, 5);
        assert_eq!(line.positions, vec![1, 1, 1, 1, 1]);
        let cells: Vec<Cell> = line.cells().collect();
        assert_eq!(cells[4], Cell::new(4, 1));
    }

    #[test]
    fn test_standard_lines_fit_5x3() {
        let set = PaylineSet::new(standard_20_paylines());
        assert_eq!(set.len(), 20);
        assert!(set.validate(3, 5).is_ok());
        assert!(set.validate(2, 5).is_err());
        assert!(set.validate(3, 4).is_err());
    }

    #[test]
    fn test_enable_disable() {
        let mut set = PaylineSet::new(standard_20_paylines());
        assert_eq!(set.active_count(), 20);

        set.set_active_count(5);
        assert_eq!(set.active_count(), 5);
        assert!(set.is_enabled(4));
        assert!(!set.is_enabled(5));

        set.set_enabled(10, true);
        let indices: Vec<u8> = set.active().map(|l| l.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 10]);

        set.disable_all();
        assert_eq!(set.active().count(), 0);

        set.set_enabled(99, true);
        assert_eq!(set.active_count(), 0);
    }
}
