//! Plot suggestions and per-district statistics.
//!
//! Suggestions rank free plots by closeness to the district centroid with a
//! bonus for road access:
//!
//! ```text
//! score = 100 - 3 * distance(footprint center, centroid) + (3 if road-adjacent)
//! ```

use guildhall_types::{DistrictCategory, Tier, Tile, distance};
use guildhall_world::WorldMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocator::{check_footprint, check_spacing};
use crate::occupancy::OccupancyState;
use crate::rules::AllocationRules;

/// Score every suggestion starts from.
pub const BASE_SCORE: f64 = 100.0;
/// Score lost per tile of distance from the centroid.
pub const DISTANCE_PENALTY: f64 = 3.0;
/// Score gained by road-adjacent plots.
pub const ROAD_BONUS: f64 = 3.0;
/// Plots within this distance of the centroid are labelled central.
pub const CENTRAL_RADIUS: f64 = 3.0;

/// A candidate plot with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotSuggestion {
    /// Primary tile.
    pub plot_id: Tile,
    /// Primary column.
    pub col: i32,
    /// Primary row.
    pub row: i32,
    /// District.
    pub district: DistrictCategory,
    /// Tier the suggestion was computed for.
    pub tier: Tier,
    /// Footprint side length.
    pub footprint: u8,
    /// Ranking score; higher is better.
    pub score: f64,
    /// Distance from the footprint center to the district centroid.
    pub distance: f64,
    /// Whether any footprint tile touches a road.
    pub road_adjacent: bool,
    /// Human-readable reasons behind the score.
    pub reasons: Vec<String>,
}

/// Occupancy summary of one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStats {
    /// District.
    pub category: DistrictCategory,
    /// Display name.
    pub name: String,
    /// Tiles owned by the district.
    pub tile_count: usize,
    /// Buildable road-adjacent tiles.
    pub road_adjacent_tiles: usize,
    /// Buildings (primary plots) in the district.
    pub building_count: usize,
    /// Summed tier weight of those buildings.
    pub density: Decimal,
    /// Density cap.
    pub density_cap: Decimal,
}

/// Score a plot whose footprint center lies `dist` tiles from the centroid.
pub fn score_plot(dist: f64, road_adjacent: bool) -> f64 {
    let base = DISTANCE_PENALTY.mul_add(-dist, BASE_SCORE);
    if road_adjacent { base + ROAD_BONUS } else { base }
}

/// Free plots in `district` that a guild of `tier` could take, best first.
///
/// A plot qualifies when its tile is buildable and unoccupied, its full
/// footprint passes the footprint checks, and it respects the minimum
/// spacing to every existing building. Ties keep scan order.
pub fn available_plots(
    world: &WorldMap,
    state: &OccupancyState,
    rules: &AllocationRules,
    district: DistrictCategory,
    tier: Tier,
) -> Vec<PlotSuggestion> {
    let Some(realized) = world.district(district) else {
        return Vec::new();
    };
    let Some(bounds) = realized.bounds else {
        return Vec::new();
    };
    let footprint = tier.footprint();

    let mut suggestions: Vec<PlotSuggestion> = realized
        .tiles
        .iter()
        .copied()
        .filter(|&tile| world.is_buildable(tile) && !state.is_occupied(tile))
        .filter(|&tile| {
            footprint <= 1 || check_footprint(world, state, tile, footprint, district).is_ok()
        })
        .filter(|&tile| check_spacing(state, tile, footprint, rules.min_spacing).is_ok())
        .map(|tile| {
            let dist = distance(tile.footprint_center(footprint), bounds.center());
            let road_adjacent = tile
                .footprint(footprint)
                .into_iter()
                .any(|part| world.is_road_adjacent(part));
            let mut reasons = Vec::new();
            if road_adjacent {
                reasons.push("road access".to_owned());
            }
            if dist <= CENTRAL_RADIUS {
                reasons.push("central".to_owned());
            }
            if footprint > 1 {
                reasons.push("large footprint".to_owned());
            }
            PlotSuggestion {
                plot_id: tile,
                col: tile.col,
                row: tile.row,
                district,
                tier,
                footprint,
                score: score_plot(dist, road_adjacent),
                distance: dist,
                road_adjacent,
                reasons,
            }
        })
        .collect();
    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions
}

/// Statistics for every district in definition order.
pub fn district_stats(
    world: &WorldMap,
    state: &OccupancyState,
    rules: &AllocationRules,
) -> Vec<DistrictStats> {
    world
        .districts()
        .iter()
        .map(|district| DistrictStats {
            category: district.category,
            name: district.name.clone(),
            tile_count: district.tiles.len(),
            road_adjacent_tiles: district
                .tiles
                .iter()
                .filter(|&&tile| world.is_road_adjacent(tile))
                .count(),
            building_count: state.district_building_count(district.category),
            density: state.district_density(district.category),
            density_cap: rules.density_cap,
        })
        .collect()
}
