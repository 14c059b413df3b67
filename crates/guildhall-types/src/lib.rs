//! Shared type definitions for the Guildhall world and plot governance.
//!
//! This crate is the single source of truth for the identifiers and labels
//! that cross crate and process boundaries. Enums and identifiers flow
//! downstream to `TypeScript` via `ts-rs` for the interactive renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Integer newtypes for externally issued identifiers
//! - [`enums`] -- Tiers, district categories, and allocation outcome codes
//! - [`tile`] -- Grid coordinates and the `"col,row"` tile key

pub mod enums;
pub mod ids;
pub mod tile;

// Re-export all public types at crate root for convenience.
pub use enums::{AllocationCode, DistrictCategory, ParseEnumError, Tier};
pub use ids::GuildId;
pub use tile::{ParseTileError, Tile, distance};
