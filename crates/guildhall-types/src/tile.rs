//! Grid tile coordinates and the textual `"col,row"` key.
//!
//! A [`Tile`] doubles as a plot identifier: a plot is named after its
//! primary tile. Both the world artifact and the occupancy snapshot
//! serialize tiles as `"col,row"` strings.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A tile key could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tile key {0:?}, expected \"col,row\"")]
pub struct ParseTileError(pub String);

/// Integer grid coordinate of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    /// Column (x) index.
    pub col: i32,
    /// Row (y) index.
    pub row: i32,
}

impl Tile {
    /// Create a tile at `(col, row)`.
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Return the tile shifted by `(dcol, drow)`, or `None` on overflow.
    pub const fn offset(self, dcol: i32, drow: i32) -> Option<Self> {
        let Some(col) = self.col.checked_add(dcol) else {
            return None;
        };
        let Some(row) = self.row.checked_add(drow) else {
            return None;
        };
        Some(Self { col, row })
    }

    /// The four edge-adjacent neighbours (up, left, right, down).
    pub fn neighbors4(self) -> impl Iterator<Item = Self> {
        [(0, -1), (-1, 0), (1, 0), (0, 1)]
            .into_iter()
            .filter_map(move |(dc, dr)| self.offset(dc, dr))
    }

    /// Tiles covered by a square footprint of side `size` anchored at this
    /// tile (the primary), in row-major order starting with the primary.
    pub fn footprint(self, size: u8) -> Vec<Self> {
        let side = i32::from(size.max(1));
        let mut tiles = Vec::new();
        for dr in 0..side {
            for dc in 0..side {
                if let Some(tile) = self.offset(dc, dr) {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    /// Center of a square footprint of side `size` anchored at this tile:
    /// `col + (size - 1) / 2`, likewise for the row.
    pub fn footprint_center(self, size: u8) -> (f64, f64) {
        let half = (f64::from(size.max(1)) - 1.0) / 2.0;
        (f64::from(self.col) + half, f64::from(self.row) + half)
    }

    /// The `"col,row"` key.
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

impl FromStr for Tile {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTileError(s.to_owned());
        let (col, row) = s.split_once(',').ok_or_else(invalid)?;
        let col = col.trim().parse::<i32>().map_err(|_e| invalid())?;
        let row = row.trim().parse::<i32>().map_err(|_e| invalid())?;
        Ok(Self { col, row })
    }
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    #[test]
    fn key_parses_and_prints() {
        let tile: Tile = "28,28".parse().unwrap_or(Tile::new(0, 0));
        assert_eq!(tile, Tile::new(28, 28));
        assert_eq!(tile.key(), "28,28");
        assert_eq!(" 3 , -4".parse::<Tile>().ok(), Some(Tile::new(3, -4)));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!("28".parse::<Tile>().is_err());
        assert!("a,b".parse::<Tile>().is_err());
        assert!("1,2,3".parse::<Tile>().is_err());
        assert!("".parse::<Tile>().is_err());
    }

    #[test]
    fn serde_uses_string_key() {
        let json = serde_json::to_string(&Tile::new(7, 9)).unwrap_or_default();
        assert_eq!(json, "\"7,9\"");
        let back: Result<Tile, _> = serde_json::from_str("\"7,9\"");
        assert_eq!(back.ok(), Some(Tile::new(7, 9)));
    }

    #[test]
    fn footprint_is_row_major_from_primary() {
        let tiles = Tile::new(4, 5).footprint(2);
        assert_eq!(
            tiles,
            vec![
                Tile::new(4, 5),
                Tile::new(5, 5),
                Tile::new(4, 6),
                Tile::new(5, 6)
            ]
        );
        assert_eq!(Tile::new(4, 5).footprint(1), vec![Tile::new(4, 5)]);
    }

    #[test]
    fn footprint_center_shifts_by_half() {
        assert_eq!(Tile::new(4, 5).footprint_center(1), (4.0, 5.0));
        assert_eq!(Tile::new(4, 5).footprint_center(2), (4.5, 5.5));
        assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
    }
}
