//! Deterministic world generation for Guildhall.
//!
//! The pipeline is a pure function of fixed seed constants: two independent
//! consumers running it must derive the identical grid. Stages run in this
//! order and each consumes the previous one's output:
//!
//! 1. [`rng`] -- bit-exact 32-bit generator shared by every stage.
//! 2. [`noise`] -- smooth value noise over a seeded lattice.
//! 3. [`boundary`] -- the irregular isometric world mask.
//! 4. [`partition`] -- approximate-Voronoi districts with road gaps.
//! 5. [`bounds`] -- per-district extent and centroid.
//! 6. [`overlay`] -- water rules and clustered decorations.
//!
//! [`world_map`] assembles the result into the immutable [`WorldMap`];
//! [`artifact`] converts it to and from the JSON form consumed by the
//! renderer. [`districts`] holds the fixed definition table and [`grid`]
//! the dimensions and scan order.

pub mod artifact;
pub mod boundary;
pub mod bounds;
pub mod districts;
pub mod error;
pub mod grid;
pub mod noise;
pub mod overlay;
pub mod partition;
pub mod rng;
pub mod world_map;

// Re-export primary types at crate root.
pub use artifact::{ARTIFACT_VERSION, ArtifactDistrictDef, WorldMapArtifact};
pub use bounds::DistrictBounds;
pub use districts::{DISTRICT_DEFS, DecorationStyle, DistrictDef, district_def};
pub use error::WorldError;
pub use grid::{GRID_COLS, GRID_ROWS, GridDims, MAX_GRID_SIDE};
pub use noise::NoiseField;
pub use overlay::WaterRule;
pub use partition::TileClass;
pub use rng::SeededRng;
pub use world_map::{District, Overlay, WorldMap};
