//! Allocation outcomes that reject a plot command.
//!
//! Each variant carries the context a caller needs to explain the refusal
//! and maps to exactly one machine-readable [`AllocationCode`].

use guildhall_types::{AllocationCode, DistrictCategory, GuildId, Tier, Tile};
use rust_decimal::Decimal;

/// Why an assign or release was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    /// The plot id does not name a buildable tile.
    #[error("plot {plot} is not buildable")]
    NotBuildable {
        /// The requested plot id as given.
        plot: String,
    },

    /// The tile already holds an assignment.
    #[error("plot {plot} is already assigned to guild {holder}")]
    Occupied {
        /// Requested plot.
        plot: Tile,
        /// Current holder.
        holder: GuildId,
    },

    /// The guild already holds its tier's quota of plots.
    #[error("guild {guild} already holds {held} of {limit} {tier} plots")]
    TierLimit {
        /// Requesting guild.
        guild: GuildId,
        /// Requested tier.
        tier: Tier,
        /// Primary plots currently held.
        held: u32,
        /// Quota of the tier.
        limit: u32,
    },

    /// The tile is not owned by any district.
    #[error("plot {plot} is not in a district")]
    NoDistrict {
        /// Requested plot.
        plot: Tile,
    },

    /// Another building is closer than the minimum spacing.
    #[error("plot {plot} is {distance:.2} tiles from guild {guild}'s building at {neighbor} (minimum {min_spacing})")]
    SpacingViolation {
        /// Requested plot.
        plot: Tile,
        /// Primary tile of the conflicting building.
        neighbor: Tile,
        /// Guild holding the conflicting building.
        guild: GuildId,
        /// Distance between the footprint centers.
        distance: f64,
        /// Required minimum.
        min_spacing: f64,
    },

    /// The district has no density capacity left for this tier.
    #[error("district {district} density {density} + {weight} exceeds cap {cap}")]
    DensityLimit {
        /// Target district.
        district: DistrictCategory,
        /// Current density.
        density: Decimal,
        /// Weight of the requested tier.
        weight: Decimal,
        /// District cap.
        cap: Decimal,
    },

    /// A footprint tile is not buildable.
    #[error("footprint tile {tile} is not buildable")]
    FootprintBlocked {
        /// The offending tile.
        tile: Tile,
    },

    /// A footprint tile is already occupied.
    #[error("footprint tile {tile} is already occupied")]
    FootprintOccupied {
        /// The offending tile.
        tile: Tile,
    },

    /// A footprint tile lies in another district.
    #[error("footprint tile {tile} is in {found}, not {expected}")]
    FootprintDistrict {
        /// The offending tile.
        tile: Tile,
        /// District of the primary tile.
        expected: DistrictCategory,
        /// District of the offending tile.
        found: DistrictCategory,
    },

    /// Nothing is assigned at the plot.
    #[error("plot {plot} is not assigned")]
    NotAssigned {
        /// The requested plot id as given.
        plot: String,
    },

    /// The plot belongs to another guild.
    #[error("plot {plot} belongs to guild {owner}")]
    NotOwner {
        /// Primary tile of the plot.
        plot: Tile,
        /// Actual owner.
        owner: GuildId,
    },
}

impl AllocationError {
    /// The machine-readable code.
    pub const fn code(&self) -> AllocationCode {
        match self {
            Self::NotBuildable { .. } => AllocationCode::NotBuildable,
            Self::Occupied { .. } => AllocationCode::Occupied,
            Self::TierLimit { .. } => AllocationCode::TierLimit,
            Self::NoDistrict { .. } => AllocationCode::NoDistrict,
            Self::SpacingViolation { .. } => AllocationCode::SpacingViolation,
            Self::DensityLimit { .. } => AllocationCode::DensityLimit,
            Self::FootprintBlocked { .. } => AllocationCode::FootprintBlocked,
            Self::FootprintOccupied { .. } => AllocationCode::FootprintOccupied,
            Self::FootprintDistrict { .. } => AllocationCode::FootprintDistrict,
            Self::NotAssigned { .. } => AllocationCode::NotAssigned,
            Self::NotOwner { .. } => AllocationCode::NotOwner,
        }
    }
}
