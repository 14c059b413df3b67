//! Error types for the `guildhall-world` crate.
//!
//! Generation itself is infallible. Only importing a [`WorldMapArtifact`]
//! can fail, when the artifact is malformed or internally inconsistent.
//!
//! [`WorldMapArtifact`]: crate::artifact::WorldMapArtifact

use guildhall_types::{DistrictCategory, Tile};

/// Errors that can occur while importing a world map artifact.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The artifact JSON could not be parsed.
    #[error("artifact parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The artifact declares a format version this build does not read.
    #[error("unsupported artifact version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the artifact.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// Grid dimensions are zero or larger than `MAX_GRID_SIDE`.
    #[error("invalid grid dimensions {cols}x{rows}")]
    InvalidDimensions {
        /// Declared columns.
        cols: u32,
        /// Declared rows.
        rows: u32,
    },

    /// A tile lies outside the declared grid.
    #[error("tile {0} is outside the grid")]
    OutOfGrid(Tile),

    /// A tile is listed as in-world more than once.
    #[error("tile {0} appears more than once in the world mask")]
    DuplicateTile(Tile),

    /// A road or district tile is not part of the world mask.
    #[error("tile {0} is classified but not in the world mask")]
    NotInWorld(Tile),

    /// A tile is claimed by more than one of road and the districts.
    #[error("tile {0} has more than one classification")]
    Overlap(Tile),

    /// An in-world tile is neither road nor district.
    #[error("in-world tile {0} has no classification")]
    Unclassified(Tile),

    /// A water or decoration tile is not a district tile.
    #[error("overlay tile {0} is not a district tile")]
    OverlayOutsideDistrict(Tile),

    /// A district's tiles have no matching definition entry.
    #[error("district {0} has no definition")]
    UnknownDistrict(DistrictCategory),

    /// The declared road adjacency disagrees with the partition.
    #[error("road adjacency does not match the partition")]
    RoadAdjacencyMismatch,
}
