//! The fixed district definition table of the reference world.
//!
//! Definitions are configuration data, not derived state: they are the
//! seeds of the approximate-Voronoi partition. Their order is significant.
//! It fixes the order in which per-district noise offsets are drawn, and
//! when two districts tie on perturbed distance the one listed first wins.

use guildhall_types::DistrictCategory;

use crate::overlay::WaterRule;

/// Parameters of one district's clustered decoration pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationStyle {
    /// Seed for the candidate shuffle and the jitter-fill rolls.
    pub seed: u32,
    /// Maximum number of cluster centers.
    pub clusters: usize,
    /// Minimum distance between two cluster centers.
    pub min_spacing: f64,
    /// Chebyshev radius of the fill window around each center.
    pub radius: i32,
    /// Probability that an eligible tile inside the window is decorated.
    pub fill: f64,
}

/// Compile-time definition of a district.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistrictDef {
    /// Display name.
    pub name: &'static str,
    /// Category label (unique per district).
    pub category: DistrictCategory,
    /// Column of the Voronoi seed point.
    pub seed_col: i32,
    /// Row of the Voronoi seed point.
    pub seed_row: i32,
    /// Peak distance perturbation contributed by noise, in tiles.
    pub amplitude: f64,
    /// Spatial frequency of the perturbation noise.
    pub frequency: f64,
    /// Damps the perturbation: the amplitude is scaled by `1 - bias * 0.3`.
    pub radial_bias: f64,
    /// Multiplier on seed distance; larger weights shrink the district.
    pub size_weight: f64,
    /// Water overlay rule.
    pub water: WaterRule,
    /// Decoration overlay style.
    pub decoration: DecorationStyle,
}

/// The six districts of the reference world, in canonical order.
pub const DISTRICT_DEFS: [DistrictDef; 6] = [
    DistrictDef {
        name: "Town Square",
        category: DistrictCategory::TownSquare,
        seed_col: 28,
        seed_row: 28,
        amplitude: 4.0,
        frequency: 0.10,
        radial_bias: 0.8,
        size_weight: 1.1,
        water: WaterRule::None,
        decoration: DecorationStyle {
            seed: 511,
            clusters: 3,
            min_spacing: 6.0,
            radius: 1,
            fill: 0.5,
        },
    },
    DistrictDef {
        name: "Market Row",
        category: DistrictCategory::Market,
        seed_col: 42,
        seed_row: 15,
        amplitude: 5.0,
        frequency: 0.08,
        radial_bias: 0.4,
        size_weight: 1.0,
        water: WaterRule::DiagonalBand,
        decoration: DecorationStyle {
            seed: 523,
            clusters: 5,
            min_spacing: 7.0,
            radius: 1,
            fill: 0.6,
        },
    },
    DistrictDef {
        name: "Artisan Quarter",
        category: DistrictCategory::Artisan,
        seed_col: 15,
        seed_row: 15,
        amplitude: 5.5,
        frequency: 0.12,
        radial_bias: 0.2,
        size_weight: 0.95,
        water: WaterRule::None,
        decoration: DecorationStyle {
            seed: 541,
            clusters: 6,
            min_spacing: 8.0,
            radius: 2,
            fill: 0.45,
        },
    },
    DistrictDef {
        name: "Harbor Ward",
        category: DistrictCategory::Harbor,
        seed_col: 45,
        seed_row: 39,
        amplitude: 5.0,
        frequency: 0.07,
        radial_bias: 0.5,
        size_weight: 0.9,
        water: WaterRule::EdgeBand,
        decoration: DecorationStyle {
            seed: 557,
            clusters: 4,
            min_spacing: 8.0,
            radius: 1,
            fill: 0.55,
        },
    },
    DistrictDef {
        name: "Arcane Spire",
        category: DistrictCategory::Arcane,
        seed_col: 12,
        seed_row: 40,
        amplitude: 4.5,
        frequency: 0.14,
        radial_bias: 0.6,
        size_weight: 1.05,
        water: WaterRule::TrigScatter,
        decoration: DecorationStyle {
            seed: 569,
            clusters: 5,
            min_spacing: 7.0,
            radius: 1,
            fill: 0.5,
        },
    },
    DistrictDef {
        name: "Guild Gardens",
        category: DistrictCategory::Gardens,
        seed_col: 29,
        seed_row: 47,
        amplitude: 5.0,
        frequency: 0.09,
        radial_bias: 0.3,
        size_weight: 1.0,
        water: WaterRule::Pond,
        decoration: DecorationStyle {
            seed: 587,
            clusters: 8,
            min_spacing: 5.0,
            radius: 2,
            fill: 0.55,
        },
    },
];

/// Look up the definition for `category`.
pub fn district_def(category: DistrictCategory) -> Option<&'static DistrictDef> {
    DISTRICT_DEFS.iter().find(|def| def.category == category)
}
