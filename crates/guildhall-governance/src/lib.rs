//! Plot governance for the Guildhall world.
//!
//! Guilds hold plots on the buildable tiles of the generated world. This
//! crate decides who may build where: it validates and applies assign and
//! release commands, ranks free plots, and persists occupancy.
//!
//! # Modules
//!
//! - [`rules`] -- Spacing and density limits
//! - [`occupancy`] -- The tile-to-assignment map and its snapshot format
//! - [`allocator`] -- Ordered validation of assign/release commands
//! - [`scoring`] -- Plot suggestions and per-district statistics
//! - [`response`] -- The `{ok, ...}` command result shape
//! - [`service`] -- [`WorldGovernanceService`], the shared entry point
//! - [`config`] -- YAML configuration loading
//! - [`error`] -- Allocation refusals

pub mod allocator;
pub mod config;
pub mod error;
pub mod occupancy;
pub mod response;
pub mod rules;
pub mod scoring;
pub mod service;

// Re-export primary types at crate root.
pub use allocator::PlotAllocator;
pub use config::{ConfigError, GuildhallConfig, LoggingConfig, PersistenceConfig, WorldConfig};
pub use error::AllocationError;
pub use occupancy::{
    OccupancySnapshot, OccupancyState, PlotAssignment, RestoreReport, SNAPSHOT_VERSION,
};
pub use response::CommandResponse;
pub use rules::{AllocationRules, DEFAULT_DENSITY_CAP, DEFAULT_MIN_SPACING};
pub use scoring::{DistrictStats, PlotSuggestion, available_plots, district_stats, score_plot};
pub use service::WorldGovernanceService;
