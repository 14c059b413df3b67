//! The world governance service: one world, one occupancy state, one store.
//!
//! The [`WorldMap`] is immutable and shared through an `Arc`. The
//! [`OccupancyState`] sits behind a `tokio::sync::RwLock`: commands hold the
//! write lock across the whole check-then-write pipeline, queries take the
//! read lock. A dirty flag tracks unsaved changes; [`flush`] snapshots under
//! the read lock and writes after releasing it. Flushes hold a separate
//! mutex from clearing the flag until the write lands, so an older snapshot
//! can never overwrite a newer one.
//!
//! [`flush`]: WorldGovernanceService::flush

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use guildhall_db::{PersistenceAdapter, PersistenceError, load_json, save_json};
use guildhall_types::{DistrictCategory, GuildId, Tier};
use guildhall_world::WorldMap;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::allocator::PlotAllocator;
use crate::occupancy::{OccupancySnapshot, OccupancyState, PlotAssignment, SNAPSHOT_VERSION};
use crate::response::CommandResponse;
use crate::rules::AllocationRules;
use crate::scoring::{self, DistrictStats, PlotSuggestion};

/// Owns the world, the occupancy state, and the persistence adapter.
pub struct WorldGovernanceService<P> {
    world: Arc<WorldMap>,
    rules: AllocationRules,
    state: RwLock<OccupancyState>,
    dirty: AtomicBool,
    flush_guard: Mutex<()>,
    store: P,
    key: String,
}

impl<P: PersistenceAdapter> WorldGovernanceService<P> {
    /// Create a service with empty occupancy.
    pub fn new(world: Arc<WorldMap>, rules: AllocationRules, store: P, key: impl Into<String>) -> Self {
        Self {
            world,
            rules,
            state: RwLock::new(OccupancyState::new()),
            dirty: AtomicBool::new(false),
            flush_guard: Mutex::new(()),
            store,
            key: key.into(),
        }
    }

    /// Create a service and restore occupancy from `store`.
    ///
    /// A missing snapshot starts empty. An unreadable snapshot, or one with
    /// an unknown version, is logged and also starts empty. Plots that are
    /// no longer valid on `world` under `rules` are dropped.
    pub async fn load(
        world: Arc<WorldMap>,
        rules: AllocationRules,
        store: P,
        key: impl Into<String>,
    ) -> Self {
        let service = Self::new(world, rules, store, key);
        match load_json::<OccupancySnapshot, P>(&service.store, &service.key).await {
            Ok(Some(snapshot)) if snapshot.version == SNAPSHOT_VERSION => {
                let saved_at = snapshot.saved_at;
                let (state, report) = OccupancyState::restore(snapshot, &service.world, &service.rules);
                info!(
                    key = %service.key,
                    backend = service.store.backend(),
                    %saved_at,
                    kept = report.kept,
                    dropped = report.dropped.len(),
                    "restored occupancy"
                );
                if !report.dropped.is_empty() {
                    service.dirty.store(true, Ordering::Release);
                }
                *service.state.write().await = state;
            }
            Ok(Some(snapshot)) => {
                warn!(
                    key = %service.key,
                    version = snapshot.version,
                    expected = SNAPSHOT_VERSION,
                    "unsupported occupancy snapshot version, starting empty"
                );
            }
            Ok(None) => {
                info!(key = %service.key, backend = service.store.backend(), "no occupancy snapshot, starting empty");
            }
            Err(e) => {
                warn!(key = %service.key, error = %e, "failed to load occupancy, starting empty");
            }
        }
        service
    }

    /// The shared world map.
    pub const fn world(&self) -> &Arc<WorldMap> {
        &self.world
    }

    /// The allocation rules in force.
    pub const fn rules(&self) -> &AllocationRules {
        &self.rules
    }

    /// Whether there are changes not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    // -------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------

    /// Assign `plot_id` to `guild` at `tier`, stamped with the current time.
    pub async fn assign_plot(&self, plot_id: &str, guild: GuildId, tier: Tier) -> CommandResponse {
        self.assign_plot_at(plot_id, guild, tier, Utc::now()).await
    }

    /// Assign `plot_id` to `guild` at `tier`, stamped with `now`.
    pub async fn assign_plot_at(
        &self,
        plot_id: &str,
        guild: GuildId,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> CommandResponse {
        let mut state = self.state.write().await;
        let result = PlotAllocator::new(&self.world, &self.rules).assign(&mut state, plot_id, guild, tier, now);
        match &result {
            Ok(_) => self.dirty.store(true, Ordering::Release),
            Err(e) => debug!(plot = plot_id, guild = %guild, code = %e.code(), "assign refused"),
        }
        result.into()
    }

    /// Release the plot covering `plot_id` on behalf of `guild`.
    pub async fn release_plot(&self, plot_id: &str, guild: GuildId) -> CommandResponse {
        let mut state = self.state.write().await;
        let result = PlotAllocator::new(&self.world, &self.rules).release(&mut state, plot_id, guild);
        match &result {
            Ok(_) => self.dirty.store(true, Ordering::Release),
            Err(e) => debug!(plot = plot_id, guild = %guild, code = %e.code(), "release refused"),
        }
        result.into()
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Ranked free plots in `district` for `tier`.
    pub async fn available_plots(&self, district: DistrictCategory, tier: Tier) -> Vec<PlotSuggestion> {
        let state = self.state.read().await;
        scoring::available_plots(&self.world, &state, &self.rules, district, tier)
    }

    /// Per-district statistics.
    pub async fn district_stats(&self) -> Vec<DistrictStats> {
        let state = self.state.read().await;
        scoring::district_stats(&self.world, &state, &self.rules)
    }

    /// Every record, primaries and secondaries, in tile order.
    pub async fn all_assignments(&self) -> Vec<PlotAssignment> {
        self.state.read().await.records().cloned().collect()
    }

    /// Primary plots held by `guild`, earliest first.
    pub async fn guild_primary_plots(&self, guild: GuildId) -> Vec<PlotAssignment> {
        self.state
            .read()
            .await
            .guild_primaries(guild)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The earliest primary plot held by `guild`.
    pub async fn guild_primary_plot(&self, guild: GuildId) -> Option<PlotAssignment> {
        self.state
            .read()
            .await
            .guild_primaries(guild)
            .first()
            .map(|p| (*p).clone())
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    /// Save the occupancy snapshot if anything changed since the last
    /// successful flush. Returns whether a snapshot was written.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error; the dirty flag stays set so the next
    /// flush retries.
    pub async fn flush(&self) -> Result<bool, PersistenceError> {
        let _guard = self.flush_guard.lock().await;
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }
        let snapshot = self.state.read().await.snapshot(Utc::now());
        let records = snapshot.assignments.len();
        if let Err(e) = save_json(&self.store, &self.key, &snapshot).await {
            self.dirty.store(true, Ordering::Release);
            return Err(e);
        }
        debug!(key = %self.key, backend = self.store.backend(), records, "flushed occupancy");
        Ok(true)
    }

    /// Flush every `period` until `shutdown` turns `true` (or its sender
    /// is dropped), then flush once more.
    pub async fn flush_periodically(&self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.flush().await {
                        warn!(error = %e, "periodic flush failed, will retry");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        match self.flush().await {
            Ok(wrote) => info!(wrote, "final occupancy flush"),
            Err(e) => warn!(error = %e, "final occupancy flush failed"),
        }
    }
}

impl<P> std::fmt::Debug for WorldGovernanceService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldGovernanceService")
            .field("rules", &self.rules)
            .field("key", &self.key)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
