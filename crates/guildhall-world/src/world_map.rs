//! The immutable world map: partition, overlays, and derived district data.
//!
//! A [`WorldMap`] is a pure function of the grid dimensions and the district
//! definitions. It is built once at startup and shared read-only (typically
//! behind an `Arc`) by the allocator, the scorer, and the artifact exporter.
//!
//! Every grid cell is exactly one of outside, road, or district. District
//! cells may additionally carry a water or decoration overlay.

use guildhall_types::{DistrictCategory, Tile};
use tracing::{debug, info};

use crate::boundary::WorldBoundary;
use crate::bounds::DistrictBounds;
use crate::districts::{DISTRICT_DEFS, DistrictDef};
use crate::grid::GridDims;
use crate::overlay;
use crate::partition::{Partitioner, TileClass};

/// Overlay carried by a district tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overlay {
    /// Plain ground.
    #[default]
    None,
    /// Water.
    Water,
    /// A decoration (trees, stalls, crystals, ...).
    Decoration,
}

/// A district as realized on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: DistrictCategory,
    /// Voronoi seed point.
    pub seed: Tile,
    /// Owned tiles in scan order.
    pub tiles: Vec<Tile>,
    /// Bounds of `tiles`; `None` when the district received no tiles.
    pub bounds: Option<DistrictBounds>,
}

/// The generated world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMap {
    dims: GridDims,
    /// Row-major tile classification.
    classes: Vec<TileClass>,
    /// Row-major overlays; always `None` off-district.
    overlays: Vec<Overlay>,
    /// Row-major road adjacency of buildable tiles.
    road_adjacent: Vec<bool>,
    /// Districts in definition order.
    districts: Vec<District>,
}

impl WorldMap {
    /// Generate the 56×56 reference world.
    pub fn generate() -> Self {
        Self::generate_with(GridDims::REFERENCE, &DISTRICT_DEFS)
    }

    /// Generate a world for arbitrary dimensions and district definitions.
    pub fn generate_with(dims: GridDims, defs: &[DistrictDef]) -> Self {
        let mask = WorldBoundary::new(dims).mask();
        let classes = Partitioner::new(defs).partition(dims, &mask);

        let mut districts: Vec<District> = defs
            .iter()
            .map(|def| District {
                name: def.name.to_owned(),
                category: def.category,
                seed: Tile::new(def.seed_col, def.seed_row),
                tiles: Vec::new(),
                bounds: None,
            })
            .collect();
        for (tile, class) in dims.tiles().zip(&classes) {
            if let TileClass::District(category) = class
                && let Some(district) = districts.iter_mut().find(|d| d.category == *category)
            {
                district.tiles.push(tile);
            }
        }
        for district in &mut districts {
            district.bounds = DistrictBounds::from_tiles(&district.tiles);
        }

        let mut overlays = vec![Overlay::None; dims.len()];
        for (def, district) in defs.iter().zip(&districts) {
            let Some(bounds) = district.bounds else {
                continue;
            };
            let is_water = |tile: Tile| def.water.is_water(tile, &bounds);
            for &tile in &district.tiles {
                if is_water(tile)
                    && let Some(slot) = dims.index(tile).and_then(|i| overlays.get_mut(i))
                {
                    *slot = Overlay::Water;
                }
            }
            let decorations = overlay::decorate(&def.decoration, district.seed, &district.tiles, is_water);
            debug!(
                district = %def.category,
                decorations = decorations.len(),
                "placed decorations"
            );
            for tile in decorations {
                if let Some(slot) = dims.index(tile).and_then(|i| overlays.get_mut(i)) {
                    *slot = Overlay::Decoration;
                }
            }
        }

        let map = Self::from_parts(dims, classes, overlays, districts);
        info!(
            cols = dims.cols,
            rows = dims.rows,
            in_world = map.world_tile_count(),
            roads = map.roads().len(),
            water = map.water_tiles().len(),
            decorations = map.decoration_tiles().len(),
            "world generated"
        );
        map
    }

    /// Assemble a map from its parts and derive road adjacency.
    pub(crate) fn from_parts(
        dims: GridDims,
        classes: Vec<TileClass>,
        overlays: Vec<Overlay>,
        districts: Vec<District>,
    ) -> Self {
        let mut map = Self {
            dims,
            classes,
            overlays,
            road_adjacent: Vec::new(),
            districts,
        };
        map.road_adjacent = dims
            .tiles()
            .map(|tile| {
                map.is_buildable(tile)
                    && tile
                        .neighbors4()
                        .any(|n| map.class_of(n) == TileClass::Road)
            })
            .collect();
        map
    }

    // -------------------------------------------------------------------
    // Tile queries
    // -------------------------------------------------------------------

    /// Grid dimensions.
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Classification of `tile`; out-of-range tiles are outside.
    pub fn class_of(&self, tile: Tile) -> TileClass {
        self.dims
            .index(tile)
            .and_then(|i| self.classes.get(i))
            .copied()
            .unwrap_or(TileClass::Outside)
    }

    /// Overlay of `tile`.
    pub fn overlay_of(&self, tile: Tile) -> Overlay {
        self.dims
            .index(tile)
            .and_then(|i| self.overlays.get(i))
            .copied()
            .unwrap_or_default()
    }

    /// Whether `tile` is inside the world (road or district).
    pub fn is_in_world(&self, tile: Tile) -> bool {
        self.class_of(tile) != TileClass::Outside
    }

    /// Whether `tile` is a road.
    pub fn is_road(&self, tile: Tile) -> bool {
        self.class_of(tile) == TileClass::Road
    }

    /// Whether `tile` is water.
    pub fn is_water(&self, tile: Tile) -> bool {
        self.overlay_of(tile) == Overlay::Water
    }

    /// Whether `tile` carries a decoration.
    pub fn is_decoration(&self, tile: Tile) -> bool {
        self.overlay_of(tile) == Overlay::Decoration
    }

    /// Whether a plot may be placed on `tile`: a district tile with no
    /// overlay.
    pub fn is_buildable(&self, tile: Tile) -> bool {
        self.district_of(tile).is_some() && self.overlay_of(tile) == Overlay::None
    }

    /// The district owning `tile`, if any.
    pub fn district_of(&self, tile: Tile) -> Option<DistrictCategory> {
        self.class_of(tile).district()
    }

    /// Whether `tile` is buildable and touches a road on one of its four
    /// sides.
    pub fn is_road_adjacent(&self, tile: Tile) -> bool {
        self.dims
            .index(tile)
            .and_then(|i| self.road_adjacent.get(i))
            .copied()
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------
    // Collections
    // -------------------------------------------------------------------

    /// Districts in definition order.
    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// The district labelled `category`.
    pub fn district(&self, category: DistrictCategory) -> Option<&District> {
        self.districts.iter().find(|d| d.category == category)
    }

    /// Bounds of the district labelled `category`.
    pub fn bounds(&self, category: DistrictCategory) -> Option<&DistrictBounds> {
        self.district(category).and_then(|d| d.bounds.as_ref())
    }

    /// Number of in-world tiles.
    pub fn world_tile_count(&self) -> usize {
        self.classes
            .iter()
            .filter(|class| **class != TileClass::Outside)
            .count()
    }

    /// In-world tiles in scan order.
    pub fn world_tiles(&self) -> Vec<Tile> {
        self.tiles_where(|map, tile| map.is_in_world(tile))
    }

    /// Road tiles in scan order.
    pub fn roads(&self) -> Vec<Tile> {
        self.tiles_where(Self::is_road)
    }

    /// Water tiles in scan order.
    pub fn water_tiles(&self) -> Vec<Tile> {
        self.tiles_where(Self::is_water)
    }

    /// Decorated tiles in scan order.
    pub fn decoration_tiles(&self) -> Vec<Tile> {
        self.tiles_where(Self::is_decoration)
    }

    /// Road-adjacent buildable tiles in scan order.
    pub fn road_adjacent_tiles(&self) -> Vec<Tile> {
        self.tiles_where(Self::is_road_adjacent)
    }

    fn tiles_where(&self, predicate: impl Fn(&Self, Tile) -> bool) -> Vec<Tile> {
        self.dims
            .tiles()
            .filter(|&tile| predicate(self, tile))
            .collect()
    }
}
