//! Smooth 2D value noise over a coarse lattice of seeded random values.
//!
//! A [`NoiseField`] of `size` holds a `(size + 1) × (size + 1)` lattice drawn
//! row-major from a [`SeededRng`]. Sampling clamps the lattice cell to
//! `[0, size - 1]`, applies Hermite smoothing `f²(3 - 2f)` to the fractional
//! parts, and interpolates the four surrounding corners bilinearly.
//!
//! Fields are immutable after construction and therefore `Sync`; any number
//! of threads may sample one concurrently.

use crate::rng::SeededRng;

/// Immutable value-noise lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    size: usize,
    values: Vec<f64>,
}

impl NoiseField {
    /// Build a field of `size` cells per side from `seed`.
    ///
    /// Draws exactly `(size + 1)²` values in row-major order. A `size` of 0
    /// is treated as 1.
    pub fn new(size: usize, seed: u32) -> Self {
        let size = size.max(1);
        let stride = size.saturating_add(1);
        let mut rng = SeededRng::new(seed);
        let values = (0..stride.saturating_mul(stride))
            .map(|_| rng.next_f64())
            .collect();
        Self { size, values }
    }

    /// Number of cells per side.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Sample the field at `(x, y)`. The result lies in `[0, 1)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let floor_x = x.floor();
        let floor_y = y.floor();
        let ix = self.cell_index(floor_x);
        let iy = self.cell_index(floor_y);

        let sx = smoothstep(x - floor_x);
        let sy = smoothstep(y - floor_y);

        let v00 = self.lattice(ix, iy);
        let v10 = self.lattice(ix.saturating_add(1), iy);
        let v01 = self.lattice(ix, iy.saturating_add(1));
        let v11 = self.lattice(ix.saturating_add(1), iy.saturating_add(1));

        let top = lerp(v00, v10, sx);
        let bottom = lerp(v01, v11, sx);
        lerp(top, bottom, sy)
    }

    /// Clamp a floored coordinate into `[0, size - 1]`.
    fn cell_index(&self, floor: f64) -> usize {
        let max = self.size.saturating_sub(1);
        if floor <= 0.0 || floor.is_nan() {
            return 0;
        }
        // `floor` is a non-negative integral value; saturating float->int
        // conversion plus the clamp keeps it in range.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = floor as usize;
        index.min(max)
    }

    fn lattice(&self, ix: usize, iy: usize) -> f64 {
        let stride = self.size.saturating_add(1);
        iy.checked_mul(stride)
            .and_then(|base| base.checked_add(ix))
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or_default()
    }
}

/// Hermite smoothing `f²(3 - 2f)`.
fn smoothstep(f: f64) -> f64 {
    f * f * (3.0 - 2.0 * f)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
