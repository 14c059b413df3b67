//! JSON artifact form of the world map.
//!
//! The offline exporter writes this artifact for the interactive renderer.
//! Tile lists are `"col,row"` keys in scan order; field names are
//! camelCase. [`WorldMap::from_artifact`] reads an artifact back and checks
//! it is a consistent partition before accepting it.

use std::collections::BTreeMap;

use guildhall_types::{DistrictCategory, Tile};
use serde::{Deserialize, Serialize};

use crate::bounds::DistrictBounds;
use crate::error::WorldError;
use crate::grid::{GridDims, MAX_GRID_SIDE};
use crate::partition::TileClass;
use crate::world_map::{District, Overlay, WorldMap};

/// Artifact format version written by this build.
pub const ARTIFACT_VERSION: u32 = 1;

/// The identifying part of a district definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDistrictDef {
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: DistrictCategory,
    /// Seed column.
    pub seed_col: i32,
    /// Seed row.
    pub seed_row: i32,
}

/// Serialized world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMapArtifact {
    /// Format version.
    pub version: u32,
    /// Grid columns.
    pub grid_cols: u32,
    /// Grid rows.
    pub grid_rows: u32,
    /// In-world tiles.
    pub world_mask: Vec<Tile>,
    /// Road tiles.
    pub roads: Vec<Tile>,
    /// Water tiles.
    pub water: Vec<Tile>,
    /// Buildable tiles with a road neighbour.
    pub road_adjacent: Vec<Tile>,
    /// Decorated tiles.
    pub decorations: Vec<Tile>,
    /// Tiles per district.
    pub districts: BTreeMap<DistrictCategory, Vec<Tile>>,
    /// Bounds per non-empty district.
    pub district_bounds: BTreeMap<DistrictCategory, DistrictBounds>,
    /// District definitions in canonical order.
    pub district_defs: Vec<ArtifactDistrictDef>,
}

impl WorldMapArtifact {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, WorldError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON. The result is not validated; see
    /// [`WorldMap::from_artifact`].
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl WorldMap {
    /// Export the map as an artifact.
    pub fn to_artifact(&self) -> WorldMapArtifact {
        let dims = self.dims();
        WorldMapArtifact {
            version: ARTIFACT_VERSION,
            grid_cols: dims.cols,
            grid_rows: dims.rows,
            world_mask: self.world_tiles(),
            roads: self.roads(),
            water: self.water_tiles(),
            road_adjacent: self.road_adjacent_tiles(),
            decorations: self.decoration_tiles(),
            districts: self
                .districts()
                .iter()
                .map(|d| (d.category, d.tiles.clone()))
                .collect(),
            district_bounds: self
                .districts()
                .iter()
                .filter_map(|d| d.bounds.map(|b| (d.category, b)))
                .collect(),
            district_defs: self
                .districts()
                .iter()
                .map(|d| ArtifactDistrictDef {
                    name: d.name.clone(),
                    category: d.category,
                    seed_col: d.seed.col,
                    seed_row: d.seed.row,
                })
                .collect(),
        }
    }

    /// Rebuild a map from an artifact.
    ///
    /// Checks the version, the dimensions (each side at most
    /// [`MAX_GRID_SIDE`]), that every listed tile is on the
    /// grid, that roads and districts exactly partition the world mask,
    /// that overlays sit on district tiles, and that the declared road
    /// adjacency matches the partition. Bounds are recomputed.
    pub fn from_artifact(artifact: &WorldMapArtifact) -> Result<Self, WorldError> {
        if artifact.version != ARTIFACT_VERSION {
            return Err(WorldError::UnsupportedVersion {
                found: artifact.version,
                expected: ARTIFACT_VERSION,
            });
        }
        let dims = GridDims::new(artifact.grid_cols, artifact.grid_rows);
        if dims.is_empty() || dims.cols > MAX_GRID_SIDE || dims.rows > MAX_GRID_SIDE {
            return Err(WorldError::InvalidDimensions {
                cols: dims.cols,
                rows: dims.rows,
            });
        }

        let mut in_world = vec![false; dims.len()];
        for &tile in &artifact.world_mask {
            let slot = slot_mut(&mut in_world, dims, tile)?;
            if *slot {
                return Err(WorldError::DuplicateTile(tile));
            }
            *slot = true;
        }

        let mut classes = vec![TileClass::Outside; dims.len()];
        let mut claim = |tile: Tile, class: TileClass| -> Result<(), WorldError> {
            let inside = dims
                .index(tile)
                .and_then(|i| in_world.get(i))
                .copied()
                .ok_or(WorldError::OutOfGrid(tile))?;
            if !inside {
                return Err(WorldError::NotInWorld(tile));
            }
            let slot = slot_mut(&mut classes, dims, tile)?;
            if *slot != TileClass::Outside {
                return Err(WorldError::Overlap(tile));
            }
            *slot = class;
            Ok(())
        };
        for &tile in &artifact.roads {
            claim(tile, TileClass::Road)?;
        }
        for category in artifact.districts.keys() {
            if !artifact.district_defs.iter().any(|d| d.category == *category) {
                return Err(WorldError::UnknownDistrict(*category));
            }
        }

        let mut districts = Vec::with_capacity(artifact.district_defs.len());
        for def in &artifact.district_defs {
            let mut tiles = artifact
                .districts
                .get(&def.category)
                .cloned()
                .unwrap_or_default();
            for &tile in &tiles {
                claim(tile, TileClass::District(def.category))?;
            }
            tiles.sort_by_key(|t| (t.row, t.col));
            districts.push(District {
                name: def.name.clone(),
                category: def.category,
                seed: Tile::new(def.seed_col, def.seed_row),
                bounds: DistrictBounds::from_tiles(&tiles),
                tiles,
            });
        }

        for tile in dims.tiles() {
            let inside = dims.index(tile).and_then(|i| in_world.get(i)).copied();
            let class = dims.index(tile).and_then(|i| classes.get(i)).copied();
            if inside == Some(true) && class == Some(TileClass::Outside) {
                return Err(WorldError::Unclassified(tile));
            }
        }

        let mut overlays = vec![Overlay::None; dims.len()];
        let layers = [
            (&artifact.water, Overlay::Water),
            (&artifact.decorations, Overlay::Decoration),
        ];
        for (tiles, overlay) in layers {
            for &tile in tiles {
                let class = dims.index(tile).and_then(|i| classes.get(i)).copied();
                if !matches!(class, Some(TileClass::District(_))) {
                    return Err(WorldError::OverlayOutsideDistrict(tile));
                }
                let slot = slot_mut(&mut overlays, dims, tile)?;
                if *slot != Overlay::None {
                    return Err(WorldError::Overlap(tile));
                }
                *slot = overlay;
            }
        }

        let map = Self::from_parts(dims, classes, overlays, districts);
        let mut declared = artifact.road_adjacent.clone();
        declared.sort_by_key(|t| (t.row, t.col));
        if declared != map.road_adjacent_tiles() {
            return Err(WorldError::RoadAdjacencyMismatch);
        }
        Ok(map)
    }
}

fn slot_mut<T>(cells: &mut [T], dims: GridDims, tile: Tile) -> Result<&mut T, WorldError> {
    dims.index(tile)
        .and_then(|i| cells.get_mut(i))
        .ok_or(WorldError::OutOfGrid(tile))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn artifact_uses_camel_case_and_tile_keys() {
        let map = WorldMap::generate();
        let json = map.to_artifact().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["gridCols"], 56);
        assert!(value["worldMask"].is_array());
        assert!(value["roadAdjacent"].is_array());
        assert!(value["districts"]["townsquare"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("28,28")));
        assert_eq!(value["districtBounds"]["market"]["tileCount"], 524);
        assert_eq!(value["districtDefs"][0]["seedCol"], 28);
    }

    #[test]
    fn import_rebuilds_an_identical_map() {
        let map = WorldMap::generate();
        let json = map.to_artifact().to_json().unwrap();
        let artifact = WorldMapArtifact::from_json(&json).unwrap();
        let rebuilt = WorldMap::from_artifact(&artifact).unwrap();
        assert_eq!(rebuilt, map);
    }

    #[test]
    fn import_rejects_wrong_version() {
        let mut artifact = WorldMap::generate().to_artifact();
        artifact.version = 9;
        assert!(matches!(
            WorldMap::from_artifact(&artifact),
            Err(WorldError::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn import_rejects_road_inside_district() {
        let mut artifact = WorldMap::generate().to_artifact();
        artifact.roads.push(Tile::new(28, 28));
        assert!(matches!(
            WorldMap::from_artifact(&artifact),
            Err(WorldError::Overlap(tile)) if tile == Tile::new(28, 28)
        ));
    }

    #[test]
    fn import_rejects_unclassified_world_tiles() {
        let mut artifact = WorldMap::generate().to_artifact();
        let dropped = artifact.roads.pop().unwrap();
        artifact.road_adjacent.clear();
        assert!(matches!(
            WorldMap::from_artifact(&artifact),
            Err(WorldError::Unclassified(tile)) if tile == dropped
        ));
    }

    #[test]
    fn import_rejects_off_grid_tiles() {
        let mut artifact = WorldMap::generate().to_artifact();
        artifact.world_mask.push(Tile::new(56, 0));
        assert!(matches!(
            WorldMap::from_artifact(&artifact),
            Err(WorldError::OutOfGrid(_))
        ));
    }

    #[test]
    fn import_rejects_oversized_grids_before_allocating() {
        let mut artifact = WorldMap::generate().to_artifact();
        artifact.grid_cols = u32::MAX;
        artifact.grid_rows = u32::MAX;
        assert!(matches!(
            WorldMap::from_artifact(&artifact),
            Err(WorldError::InvalidDimensions { cols: u32::MAX, rows: u32::MAX })
        ));
        artifact.grid_cols = 4097;
        artifact.grid_rows = 56;
        assert!(matches!(
            WorldMap::from_artifact(&artifact),
            Err(WorldError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn malformed_tile_keys_fail_to_parse() {
        let json = r#"{"version":1,"gridCols":2,"gridRows":2,"worldMask":["0;0"],
            "roads":[],"water":[],"roadAdjacent":[],"decorations":[],
            "districts":{},"districtBounds":{},"districtDefs":[]}"#;
        assert!(matches!(
            WorldMapArtifact::from_json(json),
            Err(WorldError::Json(_))
        ));
    }
}
