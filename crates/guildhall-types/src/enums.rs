//! Enumeration types shared by the world generator, the allocator, and
//! the external request layer.
//!
//! Every enum has a stable lowercase (or `SCREAMING_SNAKE_CASE` for codes)
//! wire form that matches the JSON contract consumed by the renderer and
//! the HTTP layer.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A string did not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// A guild's allocation class.
///
/// The tier bounds how many plots a guild may hold, how much of a district's
/// density capacity each plot consumes, and how many tiles a plot covers.
/// Tier is computed upstream from mission and rating data; this core only
/// consumes the label.
///
/// | Tier    | Max plots | Density weight | Footprint |
/// |---------|-----------|----------------|-----------|
/// | Bronze  | 1         | 1.0            | 1×1       |
/// | Silver  | 2         | 1.0            | 1×1       |
/// | Gold    | 4         | 1.5            | 2×2       |
/// | Diamond | 6         | 2.5            | 2×2       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Tier {
    /// Entry tier.
    Bronze,
    /// Second tier.
    Silver,
    /// Third tier; first with a 2×2 footprint.
    Gold,
    /// Highest tier.
    Diamond,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Self; 4] = [Self::Bronze, Self::Silver, Self::Gold, Self::Diamond];

    /// Maximum number of primary plots a guild of this tier may hold.
    pub const fn max_plots(self) -> u32 {
        match self {
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 4,
            Self::Diamond => 6,
        }
    }

    /// Density weight charged against a district's capacity per plot.
    pub const fn density_weight(self) -> Decimal {
        match self {
            Self::Bronze | Self::Silver => Decimal::ONE,
            Self::Gold => Decimal::from_parts(15, 0, 0, false, 1), // 1.5
            Self::Diamond => Decimal::from_parts(25, 0, 0, false, 1), // 2.5
        }
    }

    /// Side length of the square footprint (1 or 2 tiles).
    pub const fn footprint(self) -> u8 {
        match self {
            Self::Bronze | Self::Silver => 1,
            Self::Gold | Self::Diamond => 2,
        }
    }

    /// The wire label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Diamond => "diamond",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "tier",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// DistrictCategory
// ---------------------------------------------------------------------------

/// The six district categories of the reference world, in canonical
/// definition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DistrictCategory {
    /// The central plaza.
    TownSquare,
    /// Trading halls and stalls.
    Market,
    /// Workshops and forges.
    Artisan,
    /// Docks along the eastern shore.
    Harbor,
    /// Towers of the arcane guilds.
    Arcane,
    /// Parks and greenhouses.
    Gardens,
}

impl DistrictCategory {
    /// All categories in canonical definition order.
    pub const ALL: [Self; 6] = [
        Self::TownSquare,
        Self::Market,
        Self::Artisan,
        Self::Harbor,
        Self::Arcane,
        Self::Gardens,
    ];

    /// The wire label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TownSquare => "townsquare",
            Self::Market => "market",
            Self::Artisan => "artisan",
            Self::Harbor => "harbor",
            Self::Arcane => "arcane",
            Self::Gardens => "gardens",
        }
    }
}

impl fmt::Display for DistrictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistrictCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "district category",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// AllocationCode
// ---------------------------------------------------------------------------

/// Machine-readable outcome code for a rejected plot command.
///
/// Codes are caller-facing: the request layer shows the first applicable
/// reason and decides whether to retry with a different plot or tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum AllocationCode {
    /// Tile is outside the world, a road, water, or decoration.
    NotBuildable,
    /// Tile already holds an assignment.
    Occupied,
    /// Guild already holds its tier's quota of plots.
    TierLimit,
    /// Tile does not belong to any district.
    NoDistrict,
    /// Another building is closer than the minimum spacing.
    SpacingViolation,
    /// The district's density capacity would be exceeded.
    DensityLimit,
    /// A 2×2 footprint tile is not buildable.
    FootprintBlocked,
    /// A 2×2 footprint tile is already occupied.
    FootprintOccupied,
    /// A 2×2 footprint tile lies in a different district.
    FootprintDistrict,
    /// Release requested for a tile with no assignment.
    NotAssigned,
    /// Release requested by a guild that does not own the plot.
    NotOwner,
}

impl AllocationCode {
    /// The wire label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotBuildable => "NOT_BUILDABLE",
            Self::Occupied => "OCCUPIED",
            Self::TierLimit => "TIER_LIMIT",
            Self::NoDistrict => "NO_DISTRICT",
            Self::SpacingViolation => "SPACING_VIOLATION",
            Self::DensityLimit => "DENSITY_LIMIT",
            Self::FootprintBlocked => "FOOTPRINT_BLOCKED",
            Self::FootprintOccupied => "FOOTPRINT_OCCUPIED",
            Self::FootprintDistrict => "FOOTPRINT_DISTRICT",
            Self::NotAssigned => "NOT_ASSIGNED",
            Self::NotOwner => "NOT_OWNER",
        }
    }
}

impl fmt::Display for AllocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
