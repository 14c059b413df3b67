//! Axis-aligned bounds and centroid of a district.

use guildhall_types::Tile;
use serde::{Deserialize, Serialize};

/// Extent and arithmetic-mean centroid of a set of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictBounds {
    /// Smallest column.
    pub min_col: i32,
    /// Largest column.
    pub max_col: i32,
    /// Smallest row.
    pub min_row: i32,
    /// Largest row.
    pub max_row: i32,
    /// Mean column of all tiles.
    pub center_col: f64,
    /// Mean row of all tiles.
    pub center_row: f64,
    /// Number of tiles.
    pub tile_count: usize,
}

impl DistrictBounds {
    /// Compute bounds in one pass. Returns `None` for an empty set.
    pub fn from_tiles(tiles: &[Tile]) -> Option<Self> {
        let first = tiles.first()?;
        let mut bounds = Self {
            min_col: first.col,
            max_col: first.col,
            min_row: first.row,
            max_row: first.row,
            center_col: 0.0,
            center_row: 0.0,
            tile_count: 0,
        };
        let mut sum_col = 0.0;
        let mut sum_row = 0.0;
        for tile in tiles {
            bounds.min_col = bounds.min_col.min(tile.col);
            bounds.max_col = bounds.max_col.max(tile.col);
            bounds.min_row = bounds.min_row.min(tile.row);
            bounds.max_row = bounds.max_row.max(tile.row);
            sum_col += f64::from(tile.col);
            sum_row += f64::from(tile.row);
        }
        let count = u32::try_from(tiles.len()).map_or(f64::from(u32::MAX), f64::from);
        bounds.center_col = sum_col / count;
        bounds.center_row = sum_row / count;
        bounds.tile_count = tiles.len();
        Some(bounds)
    }

    /// The centroid as `(col, row)`.
    pub const fn center(&self) -> (f64, f64) {
        (self.center_col, self.center_row)
    }

    /// Half-extent used to normalize coordinates, never below one tile.
    pub fn half_extent(&self) -> (f64, f64) {
        let half_cols = (f64::from(self.max_col) - f64::from(self.min_col)) / 2.0;
        let half_rows = (f64::from(self.max_row) - f64::from(self.min_row)) / 2.0;
        (half_cols.max(1.0), half_rows.max(1.0))
    }

    /// `tile` in centroid-relative coordinates scaled by [`Self::half_extent`].
    pub fn normalize(&self, tile: Tile) -> (f64, f64) {
        let (half_cols, half_rows) = self.half_extent();
        (
            (f64::from(tile.col) - self.center_col) / half_cols,
            (f64::from(tile.row) - self.center_row) / half_rows,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    #[test]
    fn empty_set_has_no_bounds() {
        assert_eq!(DistrictBounds::from_tiles(&[]), None);
    }

    #[test]
    fn extent_and_centroid() {
        let tiles = [Tile::new(2, 3), Tile::new(6, 3), Tile::new(4, 9)];
        let bounds = DistrictBounds::from_tiles(&tiles).unwrap();
        assert_eq!((bounds.min_col, bounds.max_col), (2, 6));
        assert_eq!((bounds.min_row, bounds.max_row), (3, 9));
        assert_eq!(bounds.center(), (4.0, 5.0));
        assert_eq!(bounds.tile_count, 3);
        assert_eq!(bounds.half_extent(), (2.0, 3.0));
        assert_eq!(bounds.normalize(Tile::new(6, 8)), (1.0, 1.0));
    }

    #[test]
    fn narrow_districts_normalize_by_at_least_one() {
        let bounds = DistrictBounds::from_tiles(&[Tile::new(5, 5)]);
        assert_eq!(bounds.map(|b| b.half_extent()), Some((1.0, 1.0)));
    }
}
