//! The plot allocator: validate and apply assign/release commands.
//!
//! Assignment checks run in a fixed order and stop at the first failure:
//!
//! 1. the plot is buildable (unparseable ids count as unbuildable)
//! 2. the plot is unoccupied
//! 3. the guild is below its tier quota
//! 4. the plot belongs to a district
//! 5. every existing building is at least the minimum spacing away
//! 6. the district has density capacity for the tier
//! 7. for 2×2 tiers, every footprint tile is buildable, free, and in the
//!    same district (per tile in scan order)
//!
//! All checks run against the state before any write; a successful command
//! writes the whole plot at once.

use chrono::{DateTime, Utc};
use guildhall_types::{DistrictCategory, GuildId, Tier, Tile, distance};
use guildhall_world::WorldMap;
use tracing::debug;

use crate::error::AllocationError;
use crate::occupancy::{OccupancyState, PlotAssignment};
use crate::rules::AllocationRules;

/// Applies plot commands to an [`OccupancyState`] over a fixed world.
#[derive(Debug, Clone, Copy)]
pub struct PlotAllocator<'a> {
    world: &'a WorldMap,
    rules: &'a AllocationRules,
}

impl<'a> PlotAllocator<'a> {
    /// Create an allocator for `world` under `rules`.
    pub const fn new(world: &'a WorldMap, rules: &'a AllocationRules) -> Self {
        Self { world, rules }
    }

    /// Run every assignment check without writing. Returns the plot's
    /// district on success.
    pub fn check(
        &self,
        state: &OccupancyState,
        plot_id: &str,
        guild: GuildId,
        tier: Tier,
    ) -> Result<(Tile, DistrictCategory), AllocationError> {
        let tile = plot_id
            .parse::<Tile>()
            .ok()
            .filter(|&tile| self.world.is_buildable(tile))
            .ok_or_else(|| AllocationError::NotBuildable {
                plot: plot_id.to_owned(),
            })?;

        if let Some(existing) = state.get(tile) {
            return Err(AllocationError::Occupied {
                plot: tile,
                holder: existing.guild_id,
            });
        }

        let held = state.guild_primary_count(guild);
        if held >= tier.max_plots() {
            return Err(AllocationError::TierLimit {
                guild,
                tier,
                held,
                limit: tier.max_plots(),
            });
        }

        let district = self
            .world
            .district_of(tile)
            .ok_or(AllocationError::NoDistrict { plot: tile })?;

        check_spacing(state, tile, tier.footprint(), self.rules.min_spacing)?;

        let density = state.district_density(district);
        let weight = tier.density_weight();
        if density.saturating_add(weight) > self.rules.density_cap {
            return Err(AllocationError::DensityLimit {
                district,
                density,
                weight,
                cap: self.rules.density_cap,
            });
        }

        if tier.footprint() > 1 {
            check_footprint(self.world, state, tile, tier.footprint(), district)?;
        }

        Ok((tile, district))
    }

    /// Assign `plot_id` to `guild` at `tier`. On success the primary record
    /// is returned and the whole footprint is written.
    pub fn assign(
        &self,
        state: &mut OccupancyState,
        plot_id: &str,
        guild: GuildId,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> Result<PlotAssignment, AllocationError> {
        let (tile, district) = self.check(state, plot_id, guild, tier)?;
        let primary = PlotAssignment::primary(tile, guild, tier, district, now);
        let mut records = vec![primary.clone()];
        records.extend(
            tile.footprint(tier.footprint())
                .into_iter()
                .skip(1)
                .map(|secondary| PlotAssignment::secondary(&primary, secondary)),
        );
        state.insert_plot(records);
        debug!(plot = %tile, guild = %guild, tier = %tier, district = %district, "plot assigned");
        Ok(primary)
    }

    /// Release the plot covering `plot_id` on behalf of `guild`. Any tile
    /// of a 2×2 plot releases the whole plot. Returns the primary tile.
    pub fn release(
        &self,
        state: &mut OccupancyState,
        plot_id: &str,
        guild: GuildId,
    ) -> Result<Tile, AllocationError> {
        let not_assigned = || AllocationError::NotAssigned {
            plot: plot_id.to_owned(),
        };
        let tile = plot_id.parse::<Tile>().map_err(|_e| not_assigned())?;
        let primary = state.primary_of(tile).ok_or_else(not_assigned)?;
        if primary.guild_id != guild {
            return Err(AllocationError::NotOwner {
                plot: primary.plot_id,
                owner: primary.guild_id,
            });
        }
        let primary_tile = primary.plot_id;
        let removed = state.remove_plot(primary_tile);
        debug!(plot = %primary_tile, guild = %guild, tiles = removed.len(), "plot released");
        Ok(primary_tile)
    }
}

/// Reject `tile` if any existing building's footprint center is closer
/// than `min_spacing` to the center of a `footprint`-sized plot at `tile`.
pub(crate) fn check_spacing(
    state: &OccupancyState,
    tile: Tile,
    footprint: u8,
    min_spacing: f64,
) -> Result<(), AllocationError> {
    let center = tile.footprint_center(footprint);
    for existing in state.primaries() {
        let d = distance(center, existing.center());
        if d < min_spacing {
            return Err(AllocationError::SpacingViolation {
                plot: tile,
                neighbor: existing.plot_id,
                guild: existing.guild_id,
                distance: d,
                min_spacing,
            });
        }
    }
    Ok(())
}

/// Check every tile of a multi-tile footprint anchored at `tile`.
pub(crate) fn check_footprint(
    world: &WorldMap,
    state: &OccupancyState,
    tile: Tile,
    footprint: u8,
    district: DistrictCategory,
) -> Result<(), AllocationError> {
    for part in tile.footprint(footprint) {
        if !world.is_buildable(part) {
            return Err(AllocationError::FootprintBlocked { tile: part });
        }
        if state.is_occupied(part) {
            return Err(AllocationError::FootprintOccupied { tile: part });
        }
        match world.district_of(part) {
            Some(found) if found == district => {}
            Some(found) => {
                return Err(AllocationError::FootprintDistrict {
                    tile: part,
                    expected: district,
                    found,
                });
            }
            None => return Err(AllocationError::FootprintBlocked { tile: part }),
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use guildhall_types::AllocationCode;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn code(result: Result<PlotAssignment, AllocationError>) -> Option<AllocationCode> {
        result.err().map(|e| e.code())
    }

    #[test]
    fn unparseable_and_unbuildable_ids() {
        let world = WorldMap::generate();
        let rules = AllocationRules::default();
        let allocator = PlotAllocator::new(&world, &rules);
        let mut state = OccupancyState::new();
        let g = GuildId::new(1);
        for id in ["garbage", "28", "", "0,0", "999,999"] {
            assert_eq!(
                code(allocator.assign(&mut state, id, g, Tier::Bronze, now())),
                Some(AllocationCode::NotBuildable),
                "{id}"
            );
        }
        let road = world.roads().first().copied().unwrap();
        assert_eq!(
            code(allocator.assign(&mut state, &road.key(), g, Tier::Bronze, now())),
            Some(AllocationCode::NotBuildable)
        );
        assert!(state.is_empty());
    }

    #[test]
    fn spacing_uses_footprint_centers() {
        let world = WorldMap::generate();
        let rules = AllocationRules::default();
        let allocator = PlotAllocator::new(&world, &rules);
        let mut state = OccupancyState::new();
        allocator
            .assign(&mut state, "28,28", GuildId::new(1), Tier::Bronze, now())
            .unwrap();
        let err = check_spacing(&state, Tile::new(29, 29), 1, 2.0).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::SpacingViolation { guild, neighbor, distance, .. }
                if guild == GuildId::new(1)
                    && neighbor == Tile::new(28, 28)
                    && (distance - 2.0_f64.sqrt()).abs() < 1e-12
        ));
        assert!(check_spacing(&state, Tile::new(30, 28), 1, 2.0).is_ok());
        // A 2×2 plot at (26,26) is centered on (26.5,26.5): 2.12 tiles away.
        assert!(check_spacing(&state, Tile::new(26, 26), 2, 2.0).is_ok());
        // At (27,26) the center (27.5,26.5) is 1.58 tiles away.
        assert!(check_spacing(&state, Tile::new(27, 26), 2, 2.0).is_err());
    }

    #[test]
    fn release_requires_assignment_and_ownership() {
        let world = WorldMap::generate();
        let rules = AllocationRules::default();
        let allocator = PlotAllocator::new(&world, &rules);
        let mut state = OccupancyState::new();
        allocator
            .assign(&mut state, "28,28", GuildId::new(5), Tier::Bronze, now())
            .unwrap();

        let not_owner = allocator.release(&mut state, "28,28", GuildId::new(6));
        assert_eq!(not_owner.err().map(|e| e.code()), Some(AllocationCode::NotOwner));
        let missing = allocator.release(&mut state, "30,30", GuildId::new(5));
        assert_eq!(missing.err().map(|e| e.code()), Some(AllocationCode::NotAssigned));
        let garbage = allocator.release(&mut state, "x", GuildId::new(5));
        assert_eq!(garbage.err().map(|e| e.code()), Some(AllocationCode::NotAssigned));

        assert_eq!(
            allocator.release(&mut state, "28,28", GuildId::new(5)).unwrap(),
            Tile::new(28, 28)
        );
        assert!(state.is_empty());
    }

    #[test]
    fn tighter_rules_are_honored() {
        let world = WorldMap::generate();
        let rules = AllocationRules {
            min_spacing: 5.0,
            ..AllocationRules::default()
        };
        let allocator = PlotAllocator::new(&world, &rules);
        let mut state = OccupancyState::new();
        allocator
            .assign(&mut state, "28,28", GuildId::new(1), Tier::Bronze, now())
            .unwrap();
        let nearby = world
            .district(DistrictCategory::TownSquare)
            .unwrap()
            .tiles
            .iter()
            .copied()
            .find(|&t| {
                let d = distance((f64::from(t.col), f64::from(t.row)), (28.0, 28.0));
                world.is_buildable(t) && (2.0..5.0).contains(&d)
            })
            .unwrap();
        assert_eq!(
            code(allocator.assign(&mut state, &nearby.key(), GuildId::new(2), Tier::Bronze, now())),
            Some(AllocationCode::SpacingViolation)
        );
    }
}
