//! Noise-perturbed isometric world boundary.
//!
//! Each cell is projected into the isometric screen frame (`sx = dx - dy`,
//! `sy = dx + dy` relative to the grid center) and normalized into an
//! ellipse. Three octaves of value noise push the unit threshold in and out
//! by up to 0.4, producing an irregular coastline.

use guildhall_types::Tile;

use crate::grid::GridDims;
use crate::noise::NoiseField;

/// Octave parameters: `(seed, lattice size, coordinate scale, coordinate offset, weight)`.
const OCTAVES: [(u32, usize, f64, f64, f64); 3] = [
    (101, 24, 0.18, 3.1, 0.5),
    (202, 32, 0.4, 7.7, 0.3),
    (303, 48, 0.8, 1.3, 0.2),
];

/// Ellipse radius factors for the screen x and y axes, times `cols + rows`.
const RADIUS_X: f64 = 0.38;
const RADIUS_Y: f64 = 0.36;

/// Maximum threshold swing contributed by the blended noise.
const THRESHOLD_SWING: f64 = 0.8;

/// Evaluates the world mask for one grid.
#[derive(Debug, Clone)]
pub struct WorldBoundary {
    dims: GridDims,
    octaves: Vec<(NoiseField, f64, f64, f64)>,
}

impl WorldBoundary {
    /// Build the boundary noise for `dims`.
    pub fn new(dims: GridDims) -> Self {
        let octaves = OCTAVES
            .iter()
            .map(|&(seed, size, scale, offset, weight)| {
                (NoiseField::new(size, seed), scale, offset, weight)
            })
            .collect();
        Self { dims, octaves }
    }

    /// Whether `tile` lies inside the world.
    pub fn contains(&self, tile: Tile) -> bool {
        if !self.dims.contains(tile) {
            return false;
        }
        let cols = f64::from(self.dims.cols);
        let rows = f64::from(self.dims.rows);
        let col = f64::from(tile.col);
        let row = f64::from(tile.row);

        let dx = col - cols / 2.0;
        let dy = row - rows / 2.0;
        let sx = dx - dy;
        let sy = dx + dy;
        let nx = sx / (RADIUS_X * (cols + rows));
        let ny = sy / (RADIUS_Y * (cols + rows));
        let dist = nx * nx + ny * ny;

        let blend = self
            .octaves
            .iter()
            .map(|(field, scale, offset, weight)| {
                field.sample(col * scale + offset, row * scale + offset) * weight
            })
            .fold(0.0, |acc, v| acc + v);
        let threshold = 1.0 + (blend - 0.5) * THRESHOLD_SWING;
        dist < threshold
    }

    /// Evaluate every cell, returning a row-major mask.
    pub fn mask(&self) -> Vec<bool> {
        self.dims.tiles().map(|tile| self.contains(tile)).collect()
    }
}
