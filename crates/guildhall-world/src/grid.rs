//! Fixed grid dimensions and row-major tile indexing.

use guildhall_types::Tile;
use serde::{Deserialize, Serialize};

/// Columns in the reference world.
pub const GRID_COLS: u32 = 56;

/// Rows in the reference world.
pub const GRID_ROWS: u32 = 56;

/// Largest side length accepted from an imported artifact.
pub const MAX_GRID_SIDE: u32 = 4096;

/// Width and height of a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
}

impl GridDims {
    /// The 56×56 reference grid.
    pub const REFERENCE: Self = Self {
        cols: GRID_COLS,
        rows: GRID_ROWS,
    };

    /// Create grid dimensions.
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells.
    pub fn len(self) -> usize {
        usize::try_from(u64::from(self.cols).saturating_mul(u64::from(self.rows)))
            .unwrap_or(usize::MAX)
    }

    /// Whether the grid has no cells.
    pub const fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Whether `tile` lies inside `[0, cols) × [0, rows)`.
    pub fn contains(self, tile: Tile) -> bool {
        self.index(tile).is_some()
    }

    /// Row-major index of `tile`, or `None` when out of range.
    pub fn index(self, tile: Tile) -> Option<usize> {
        let col = u32::try_from(tile.col).ok()?;
        let row = u32::try_from(tile.row).ok()?;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let flat = u64::from(row)
            .checked_mul(u64::from(self.cols))?
            .checked_add(u64::from(col))?;
        usize::try_from(flat).ok()
    }

    /// Every tile of the grid in row-major scan order (row outer, column
    /// inner). All generation stages and the scorer use this order.
    pub fn tiles(self) -> impl Iterator<Item = Tile> {
        let cols = i32::try_from(self.cols).unwrap_or(i32::MAX);
        let rows = i32::try_from(self.rows).unwrap_or(i32::MAX);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Tile::new(col, row)))
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major() {
        let dims = GridDims::new(4, 3);
        assert_eq!(dims.index(Tile::new(0, 0)), Some(0));
        assert_eq!(dims.index(Tile::new(3, 0)), Some(3));
        assert_eq!(dims.index(Tile::new(0, 1)), Some(4));
        assert_eq!(dims.index(Tile::new(3, 2)), Some(11));
    }

    #[test]
    fn out_of_range_tiles_have_no_index() {
        let dims = GridDims::new(4, 3);
        assert_eq!(dims.index(Tile::new(-1, 0)), None);
        assert_eq!(dims.index(Tile::new(4, 0)), None);
        assert_eq!(dims.index(Tile::new(0, 3)), None);
    }

    #[test]
    fn scan_order_matches_index_order() {
        let dims = GridDims::new(5, 4);
        let indices: Vec<Option<usize>> = dims.tiles().map(|t| dims.index(t)).collect();
        let expected: Vec<Option<usize>> = (0..20).map(Some).collect();
        assert_eq!(indices, expected);
        assert_eq!(dims.len(), 20);
    }
}
