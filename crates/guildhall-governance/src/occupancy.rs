//! Occupancy state: which guild holds which tile.
//!
//! A 1×1 plot is a single primary record. A 2×2 plot is a primary record on
//! its top-left tile plus three secondary records that point back at the
//! primary; the four are created and removed together. Quota, density, and
//! spacing are all counted over primary records only.
//!
//! The state round-trips through an [`OccupancySnapshot`], the JSON document
//! handed to the persistence adapter.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use guildhall_types::{DistrictCategory, GuildId, Tier, Tile};
use guildhall_world::WorldMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::allocator::PlotAllocator;
use crate::rules::AllocationRules;

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One occupied tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotAssignment {
    /// Key of this tile.
    pub plot_id: Tile,
    /// Column of this tile.
    pub col: i32,
    /// Row of this tile.
    pub row: i32,
    /// Holding guild.
    pub guild_id: GuildId,
    /// Tier the plot was assigned under.
    pub tier: Tier,
    /// District of the plot.
    pub district: DistrictCategory,
    /// Footprint side length (1 or 2).
    pub footprint: u8,
    /// When the plot was assigned.
    pub assigned_at: DateTime<Utc>,
    /// Whether this is the primary record of its plot.
    #[serde(default = "default_true")]
    pub is_primary: bool,
    /// For secondary records, the primary tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_plot: Option<Tile>,
}

const fn default_true() -> bool {
    true
}

impl PlotAssignment {
    /// A primary record.
    pub const fn primary(
        tile: Tile,
        guild_id: GuildId,
        tier: Tier,
        district: DistrictCategory,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            plot_id: tile,
            col: tile.col,
            row: tile.row,
            guild_id,
            tier,
            district,
            footprint: tier.footprint(),
            assigned_at,
            is_primary: true,
            primary_plot: None,
        }
    }

    /// A secondary record on `tile` backing `primary`.
    pub const fn secondary(primary: &Self, tile: Tile) -> Self {
        Self {
            plot_id: tile,
            col: tile.col,
            row: tile.row,
            guild_id: primary.guild_id,
            tier: primary.tier,
            district: primary.district,
            footprint: primary.footprint,
            assigned_at: primary.assigned_at,
            is_primary: false,
            primary_plot: Some(primary.plot_id),
        }
    }

    /// The primary tile of the plot this record belongs to.
    pub fn primary_tile(&self) -> Tile {
        if self.is_primary {
            self.plot_id
        } else {
            self.primary_plot.unwrap_or(self.plot_id)
        }
    }

    /// All tiles of this plot, primary first. Only meaningful on a primary.
    pub fn footprint_tiles(&self) -> Vec<Tile> {
        self.plot_id.footprint(self.footprint)
    }

    /// Footprint center used for spacing and scoring.
    pub fn center(&self) -> (f64, f64) {
        self.plot_id.footprint_center(self.footprint)
    }
}

/// Serialized occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySnapshot {
    /// Format version.
    pub version: u32,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Every record, primaries and secondaries, in tile order.
    pub assignments: Vec<PlotAssignment>,
}

/// What a restore kept and what it discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Records accepted.
    pub kept: usize,
    /// Records discarded, with the reason.
    pub dropped: Vec<(Tile, &'static str)>,
}

/// Mutable map from tile to assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyState {
    records: BTreeMap<Tile, PlotAssignment>,
}

impl OccupancyState {
    /// An empty state.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Number of occupied tiles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record on `tile`.
    pub fn get(&self, tile: Tile) -> Option<&PlotAssignment> {
        self.records.get(&tile)
    }

    /// Whether `tile` holds any record.
    pub fn is_occupied(&self, tile: Tile) -> bool {
        self.records.contains_key(&tile)
    }

    /// The primary record of the plot covering `tile`.
    pub fn primary_of(&self, tile: Tile) -> Option<&PlotAssignment> {
        let record = self.records.get(&tile)?;
        if record.is_primary {
            Some(record)
        } else {
            self.records
                .get(&record.primary_tile())
                .filter(|primary| primary.is_primary)
        }
    }

    /// Every record in tile order.
    pub fn records(&self) -> impl Iterator<Item = &PlotAssignment> {
        self.records.values()
    }

    /// Primary records in tile order.
    pub fn primaries(&self) -> impl Iterator<Item = &PlotAssignment> {
        self.records.values().filter(|r| r.is_primary)
    }

    /// Number of primary plots held by `guild`.
    pub fn guild_primary_count(&self, guild: GuildId) -> u32 {
        let count = self.primaries().filter(|r| r.guild_id == guild).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Primary plots held by `guild`, earliest assignment first.
    pub fn guild_primaries(&self, guild: GuildId) -> Vec<&PlotAssignment> {
        let mut plots: Vec<&PlotAssignment> =
            self.primaries().filter(|r| r.guild_id == guild).collect();
        plots.sort_by_key(|r| (r.assigned_at, r.plot_id.row, r.plot_id.col));
        plots
    }

    /// Summed tier weight of the buildings in `district`.
    pub fn district_density(&self, district: DistrictCategory) -> Decimal {
        self.primaries()
            .filter(|r| r.district == district)
            .map(|r| r.tier.density_weight())
            .fold(Decimal::ZERO, |acc, w| acc.saturating_add(w))
    }

    /// Number of buildings in `district`.
    pub fn district_building_count(&self, district: DistrictCategory) -> usize {
        self.primaries().filter(|r| r.district == district).count()
    }

    /// Insert a complete plot (primary plus secondaries).
    pub(crate) fn insert_plot(&mut self, records: Vec<PlotAssignment>) {
        for record in records {
            self.records.insert(record.plot_id, record);
        }
    }

    /// Remove every tile of the plot whose primary is `primary`. Returns the
    /// removed tiles.
    pub(crate) fn remove_plot(&mut self, primary: Tile) -> Vec<Tile> {
        let Some(record) = self.records.get(&primary) else {
            return Vec::new();
        };
        let tiles: Vec<Tile> = record
            .footprint_tiles()
            .into_iter()
            .filter(|tile| {
                self.records
                    .get(tile)
                    .is_some_and(|r| r.primary_tile() == primary)
            })
            .collect();
        for tile in &tiles {
            self.records.remove(tile);
        }
        tiles
    }

    // -------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------

    /// Capture the state.
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> OccupancySnapshot {
        OccupancySnapshot {
            version: SNAPSHOT_VERSION,
            saved_at,
            assignments: self.records.values().cloned().collect(),
        }
    }

    /// Rebuild a state from `snapshot`, keeping only plots that are valid
    /// on `world` under `rules`.
    ///
    /// Primaries are replayed in assignment order (ties in scan order)
    /// through the same checks a fresh assignment runs, so the rebuilt
    /// state holds every quota, spacing, and density invariant. Dropped:
    /// duplicate tiles, primaries whose footprint disagrees with their tier,
    /// primaries refused by a check (the reason is the refusal code),
    /// primaries whose district disagrees with the map, 2×2 plots missing a
    /// matching secondary, and secondaries with no surviving primary.
    pub fn restore(
        snapshot: OccupancySnapshot,
        world: &WorldMap,
        rules: &AllocationRules,
    ) -> (Self, RestoreReport) {
        let mut report = RestoreReport::default();
        let mut by_tile: BTreeMap<Tile, PlotAssignment> = BTreeMap::new();
        for mut record in snapshot.assignments {
            let tile = record.plot_id;
            record.col = tile.col;
            record.row = tile.row;
            if by_tile.contains_key(&tile) {
                report.dropped.push((tile, "duplicate tile"));
            } else {
                by_tile.insert(tile, record);
            }
        }

        let mut primaries: Vec<&PlotAssignment> =
            by_tile.values().filter(|r| r.is_primary).collect();
        primaries.sort_by_key(|r| (r.assigned_at, r.plot_id.row, r.plot_id.col));

        let allocator = PlotAllocator::new(world, rules);
        let mut state = Self::new();
        let mut claimed: BTreeSet<Tile> = BTreeSet::new();
        for primary in primaries {
            if let Some(reason) = replay_refusal(&allocator, &state, primary, &by_tile) {
                report.dropped.push((primary.plot_id, reason));
                continue;
            }
            let tiles = primary.footprint_tiles();
            let records: Vec<PlotAssignment> = tiles
                .iter()
                .filter_map(|tile| by_tile.get(tile).cloned())
                .collect();
            claimed.extend(tiles);
            state.insert_plot(records);
        }
        for (tile, record) in &by_tile {
            if !record.is_primary && !claimed.contains(tile) {
                report.dropped.push((*tile, "orphaned secondary"));
            }
        }

        report.kept = state.len();
        for (tile, reason) in &report.dropped {
            warn!(plot = %tile, reason, "dropped occupancy record on restore");
        }
        (state, report)
    }
}

/// Why `primary` cannot be replayed onto `state`, if anything.
fn replay_refusal(
    allocator: &PlotAllocator<'_>,
    state: &OccupancyState,
    primary: &PlotAssignment,
    by_tile: &BTreeMap<Tile, PlotAssignment>,
) -> Option<&'static str> {
    if primary.footprint != primary.tier.footprint() {
        return Some("footprint does not match tier");
    }
    match allocator.check(state, &primary.plot_id.key(), primary.guild_id, primary.tier) {
        Err(e) => return Some(e.code().as_str()),
        Ok((_, district)) if district != primary.district => return Some("district mismatch"),
        Ok(_) => {}
    }
    let complete = primary.footprint_tiles().iter().skip(1).all(|tile| {
        by_tile.get(tile).is_some_and(|r| {
            !r.is_primary
                && r.primary_plot == Some(primary.plot_id)
                && r.guild_id == primary.guild_id
                && r.tier == primary.tier
                && r.district == primary.district
                && r.footprint == primary.footprint
        })
    });
    if complete {
        None
    } else {
        Some("incomplete footprint")
    }
}
