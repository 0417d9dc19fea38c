//! Symbol grid and the independent per-cell sampler

use rand::Rng;
use serde::{Deserialize, Serialize};

use sl_core::{ConfigError, ConfigResult};

use crate::symbols::SymbolTable;

/// A grid position (reel = column, row = 0 at the top)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Rows × cols matrix of symbol IDs, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// Build from explicit rows (top to bottom)
    pub fn from_rows(rows: Vec<Vec<u32>>) -> ConfigResult<Self> {
        let row_count = rows.len();
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if row_count == 0 || cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return Err(ConfigError::InvalidDimensions {
                rows: row_count,
                cols,
            });
        }

        Ok(Self {
            rows: row_count,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Grid with every cell set to the same symbol
    pub fn filled(rows: usize, cols: usize, symbol_id: u32) -> ConfigResult<Self> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![symbol_id; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major symbol IDs
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Symbol at a position
    pub fn get(&self, cell: Cell) -> Option<u32> {
        self.index_of(cell).map(|idx| self.cells[idx])
    }

    /// Row-major index of a position
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        (cell.col < self.cols && cell.row < self.rows).then(|| cell.row * self.cols + cell.col)
    }

    /// Position of a row-major index
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        (index < self.cells.len()).then(|| Cell::new(index % self.cols, index / self.cols))
    }

    /// Symbols of one row, left to right
    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Symbols of one column, top to bottom
    pub fn column(&self, col: usize) -> Vec<u32> {
        (0..self.rows).map(|r| self.cells[r * self.cols + col]).collect()
    }

    /// Display names for every cell, row-major (unknown IDs render as "?")
    pub fn symbol_names(&self, table: &SymbolTable) -> Vec<String> {
        self.cells
            .iter()
            .map(|&id| {
                table
                    .get(id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "?".to_string())
            })
            .collect()
    }
}

fn check_dimensions(rows: usize, cols: usize) -> ConfigResult<()> {
    if rows == 0 || cols == 0 {
        return Err(ConfigError::InvalidDimensions { rows, cols });
    }
    Ok(())
}

/// Draw rows × cols independent symbols from the table.
///
/// Every cell is an independent trial against the full weighted
/// distribution; the only side effect is consuming `rng`.
pub fn sample_grid<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    table: &SymbolTable,
    rng: &mut R,
) -> ConfigResult<Grid> {
    check_dimensions(rows, cols)?;

    let cells = (0..rows * cols).map(|_| table.sample(rng).id).collect();
    Ok(Grid { rows, cols, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn table() -> SymbolTable {
        SymbolTable::new(vec![
            Symbol::triple(1, "A", 5, 2),
            Symbol::triple(2, "B", 3, 3),
            Symbol::triple(3, "C", 1, 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_grid(0, 3, &table(), &mut rng),
            Err(ConfigError::InvalidDimensions { rows: 0, cols: 3 })
        ));
        assert!(matches!(
            sample_grid(3, 0, &table(), &mut rng),
            Err(ConfigError::InvalidDimensions { rows: 3, cols: 0 })
        ));
    }

    #[test]
    fn test_sampled_shape() {
        let mut rng = StdRng::seed_from_u64(2);
        let grid = sample_grid(3, 5, &table(), &mut rng).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.cells().len(), 15);
        assert!(grid.cells().iter().all(|id| (1..=3).contains(id)));
    }

    #[test]
    fn test_sampling_reproducible() {
        let t = table();
        let a = sample_grid(5, 5, &t, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = sample_grid(5, 5, &t, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_indexing() {
        let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(grid.get(Cell::new(2, 1)), Some(6));
        assert_eq!(grid.index_of(Cell::new(1, 1)), Some(4));
        assert_eq!(grid.cell_at(5), Some(Cell::new(2, 1)));
        assert_eq!(grid.get(Cell::new(3, 0)), None);
        assert_eq!(grid.row(1), &[4, 5, 6]);
        assert_eq!(grid.column(0), vec![1, 4]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(Grid::from_rows(vec![vec![1, 2], vec![3]]).is_err());
        assert!(Grid::from_rows(Vec::new()).is_err());
    }
}
