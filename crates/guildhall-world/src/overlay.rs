//! Water and decoration overlays on top of the district partition.
//!
//! Both overlays only ever mark tiles of the district they belong to, and
//! both make the tile unbuildable.

use std::collections::HashSet;

use guildhall_types::{Tile, distance};

use crate::bounds::DistrictBounds;
use crate::districts::DecorationStyle;
use crate::rng::SeededRng;

/// Tiles within this distance of a district seed are never decorated.
pub const SEED_CLEARING_RADIUS: f64 = 2.5;

/// How a district's water tiles are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterRule {
    /// No water.
    None,
    /// A band along the eastern edge: `nx > 0.6`.
    EdgeBand,
    /// A small circular pond around the centroid: `nx² + ny² < 0.06`.
    Pond,
    /// A thin canal along the normalized diagonal: `|nx - ny| < 0.05`.
    DiagonalBand,
    /// Scattered pools: `sin(col·3.7)·cos(row·2.3) > 0.85`.
    TrigScatter,
}

impl WaterRule {
    /// Whether `tile` of a district with `bounds` is water.
    pub fn is_water(self, tile: Tile, bounds: &DistrictBounds) -> bool {
        let (nx, ny) = bounds.normalize(tile);
        match self {
            Self::None => false,
            Self::EdgeBand => nx > 0.6,
            Self::Pond => nx * nx + ny * ny < 0.06,
            Self::DiagonalBand => (nx - ny).abs() < 0.05,
            Self::TrigScatter => {
                (f64::from(tile.col) * 3.7).sin() * (f64::from(tile.row) * 2.3).cos() > 0.85
            }
        }
    }
}

/// Place clustered decorations for one district.
///
/// `tiles` is the district's tile list in scan order and `seed` its Voronoi
/// seed point. Returns the decorated tiles in placement order.
pub fn decorate(
    style: &DecorationStyle,
    seed: Tile,
    tiles: &[Tile],
    is_water: impl Fn(Tile) -> bool,
) -> Vec<Tile> {
    let seed_point = (f64::from(seed.col), f64::from(seed.row));
    let mut candidates: Vec<Tile> = tiles
        .iter()
        .copied()
        .filter(|&tile| {
            !is_water(tile)
                && distance((f64::from(tile.col), f64::from(tile.row)), seed_point)
                    > SEED_CLEARING_RADIUS
        })
        .collect();

    let mut rng = SeededRng::new(style.seed);
    rng.shuffle(&mut candidates);

    let mut centers: Vec<Tile> = Vec::with_capacity(style.clusters);
    for &tile in &candidates {
        if centers.len() >= style.clusters {
            break;
        }
        let point = (f64::from(tile.col), f64::from(tile.row));
        let spaced = centers.iter().all(|center| {
            distance(point, (f64::from(center.col), f64::from(center.row))) >= style.min_spacing
        });
        if spaced {
            centers.push(tile);
        }
    }

    let eligible: HashSet<Tile> = candidates.iter().copied().collect();
    let mut placed: HashSet<Tile> = HashSet::new();
    let mut decorations = Vec::new();
    for center in centers {
        if placed.insert(center) {
            decorations.push(center);
        }
        for drow in -style.radius..=style.radius {
            for dcol in -style.radius..=style.radius {
                let Some(tile) = center.offset(dcol, drow) else {
                    continue;
                };
                if !eligible.contains(&tile) || placed.contains(&tile) {
                    continue;
                }
                if rng.next_f64() < style.fill {
                    placed.insert(tile);
                    decorations.push(tile);
                }
            }
        }
    }
    decorations
}
