//! Approximate-Voronoi district partition with organic road gaps.
//!
//! Every in-world tile measures a noise-perturbed, size-weighted distance to
//! each district seed. The nearest district claims the tile unless the
//! runner-up is within a noise-varied margin, in which case the tile becomes
//! a road. Roads therefore trace the contested borders between districts.

use guildhall_types::{DistrictCategory, Tile};

use crate::districts::DistrictDef;
use crate::grid::GridDims;
use crate::noise::NoiseField;
use crate::rng::SeededRng;

const SHARED_FIELD_SEED: u32 = 7919;
const SHARED_FIELD_SIZE: usize = 128;
const OFFSET_SEED: u32 = 1337;
const OFFSET_RANGE: f64 = 64.0;
/// Frequency multiplier of the detail octave.
const DETAIL_SCALE: f64 = 2.5;

const ROAD_FIELD_A: (u32, usize, f64) = (4201, 32, 0.12);
const ROAD_FIELD_B: (u32, usize, f64) = (4202, 32, 0.31);
/// Road width swing: the threshold ranges over `1.0 ± 0.2`.
const ROAD_SWING: f64 = 0.4;

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileClass {
    /// Not part of the world.
    Outside,
    /// A road separating districts.
    Road,
    /// Owned by a district.
    District(DistrictCategory),
}

impl TileClass {
    /// The owning district, if any.
    pub const fn district(self) -> Option<DistrictCategory> {
        match self {
            Self::District(category) => Some(category),
            Self::Outside | Self::Road => None,
        }
    }
}

/// Partitions in-world tiles among a set of district definitions.
#[derive(Debug, Clone)]
pub struct Partitioner<'a> {
    defs: &'a [DistrictDef],
    offsets: Vec<(f64, f64)>,
    field: NoiseField,
    road_a: NoiseField,
    road_b: NoiseField,
}

impl<'a> Partitioner<'a> {
    /// Prepare the shared noise and draw per-district offsets in definition
    /// order.
    pub fn new(defs: &'a [DistrictDef]) -> Self {
        let mut rng = SeededRng::new(OFFSET_SEED);
        let offsets = defs
            .iter()
            .map(|_| {
                let ox = rng.next_f64() * OFFSET_RANGE;
                let oy = rng.next_f64() * OFFSET_RANGE;
                (ox, oy)
            })
            .collect();
        Self {
            defs,
            offsets,
            field: NoiseField::new(SHARED_FIELD_SIZE, SHARED_FIELD_SEED),
            road_a: NoiseField::new(ROAD_FIELD_A.1, ROAD_FIELD_A.0),
            road_b: NoiseField::new(ROAD_FIELD_B.1, ROAD_FIELD_B.0),
        }
    }

    /// Perturbed distance from `tile` to the seed of the district at `index`.
    fn perturbed_distance(&self, tile: Tile, def: &DistrictDef, offset: (f64, f64)) -> f64 {
        let col = f64::from(tile.col);
        let row = f64::from(tile.row);
        let dx = col - f64::from(def.seed_col);
        let dy = row - f64::from(def.seed_row);
        let base = (dx * dx + dy * dy).sqrt() * def.size_weight;

        let (ox, oy) = offset;
        let f = def.frequency;
        let coarse = self.field.sample(col * f + ox, row * f + oy);
        let detail = self
            .field
            .sample(col * f * DETAIL_SCALE + ox, row * f * DETAIL_SCALE + oy);
        let blend = coarse * 0.65 + detail * 0.35;
        base + (blend - 0.5) * 2.0 * def.amplitude * (1.0 - def.radial_bias * 0.3)
    }

    fn road_threshold(&self, tile: Tile) -> f64 {
        let col = f64::from(tile.col);
        let row = f64::from(tile.row);
        let a = self.road_a.sample(col * ROAD_FIELD_A.2, row * ROAD_FIELD_A.2);
        let b = self.road_b.sample(col * ROAD_FIELD_B.2, row * ROAD_FIELD_B.2);
        1.0 + ((a * 0.6 + b * 0.4) - 0.5) * ROAD_SWING
    }

    /// Classify one in-world tile.
    ///
    /// Equal distances resolve to the district listed first.
    pub fn classify(&self, tile: Tile) -> TileClass {
        let mut best: Option<(f64, DistrictCategory)> = None;
        let mut runner_up = f64::INFINITY;
        for (def, &offset) in self.defs.iter().zip(&self.offsets) {
            let d = self.perturbed_distance(tile, def, offset);
            match best {
                Some((best_d, _)) if d >= best_d => {
                    if d < runner_up {
                        runner_up = d;
                    }
                }
                Some((best_d, _)) => {
                    runner_up = best_d;
                    best = Some((d, def.category));
                }
                None => best = Some((d, def.category)),
            }
        }
        let Some((nearest, category)) = best else {
            return TileClass::Outside;
        };
        if runner_up - nearest < self.road_threshold(tile) {
            TileClass::Road
        } else {
            TileClass::District(category)
        }
    }

    /// Classify every cell of `dims` given the row-major world `mask`.
    pub fn partition(&self, dims: GridDims, mask: &[bool]) -> Vec<TileClass> {
        dims.tiles()
            .zip(mask)
            .map(|(tile, &inside)| {
                if inside {
                    self.classify(tile)
                } else {
                    TileClass::Outside
                }
            })
            .collect()
    }
}
