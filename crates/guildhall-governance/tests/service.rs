//! Persistence behaviour of the world governance service: dirty tracking,
//! flushing, reload, and recovery from bad snapshots.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use guildhall_db::{
    FileStore, MemoryStore, PersistenceAdapter, PersistenceError, load_json,
};
use guildhall_governance::{
    AllocationRules, OccupancySnapshot, PlotAssignment, SNAPSHOT_VERSION, WorldGovernanceService,
};
use guildhall_types::{DistrictCategory, GuildId, Tier, Tile};
use guildhall_world::WorldMap;
use tokio::sync::watch;

const KEY: &str = "guildhall:occupancy";

fn world() -> Arc<WorldMap> {
    Arc::new(WorldMap::generate())
}

/// Memory store whose writes can be made to fail.
#[derive(Debug, Clone, Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl PersistenceAdapter for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::Acquire) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.set(key, blob).await
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::test]
async fn flush_writes_only_when_dirty() {
    let store = MemoryStore::new();
    let svc = WorldGovernanceService::new(world(), AllocationRules::default(), store.clone(), KEY);
    assert!(!svc.is_dirty());
    assert!(!svc.flush().await.unwrap());
    assert!(store.is_empty().await);

    assert!(svc.assign_plot("28,28", GuildId::new(1), Tier::Bronze).await.ok);
    assert!(svc.is_dirty());
    assert!(svc.flush().await.unwrap());
    assert!(!svc.is_dirty());
    assert!(!svc.flush().await.unwrap());

    let saved: OccupancySnapshot = load_json(&store, KEY).await.unwrap().unwrap();
    assert_eq!(saved.version, SNAPSHOT_VERSION);
    assert_eq!(saved.assignments.len(), 1);
    assert_eq!(saved.assignments[0].plot_id, Tile::new(28, 28));
}

#[tokio::test]
async fn refused_commands_do_not_dirty_the_state() {
    let svc = WorldGovernanceService::new(world(), AllocationRules::default(), MemoryStore::new(), KEY);
    assert!(!svc.assign_plot("0,0", GuildId::new(1), Tier::Bronze).await.ok);
    assert!(!svc.release_plot("28,28", GuildId::new(1)).await.ok);
    assert!(!svc.is_dirty());
}

#[tokio::test]
async fn failed_flush_keeps_the_dirty_flag() {
    let store = FlakyStore::default();
    let svc = WorldGovernanceService::new(world(), AllocationRules::default(), store.clone(), KEY);
    assert!(svc.assign_plot("28,28", GuildId::new(1), Tier::Bronze).await.ok);

    store.failing.store(true, Ordering::Release);
    assert!(matches!(svc.flush().await, Err(PersistenceError::Io(_))));
    assert!(svc.is_dirty());

    store.failing.store(false, Ordering::Release);
    assert!(svc.flush().await.unwrap());
    assert!(!svc.is_dirty());
}

#[tokio::test]
async fn file_store_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let world = world();
    let diamond_plot = {
        let svc = WorldGovernanceService::load(
            world.clone(),
            AllocationRules::default(),
            FileStore::new(dir.path()),
            KEY,
        )
        .await;
        assert!(svc.all_assignments().await.is_empty());
        assert!(svc.assign_plot("28,28", GuildId::new(1), Tier::Bronze).await.ok);
        let best = svc
            .available_plots(DistrictCategory::Arcane, Tier::Diamond)
            .await
            .first()
            .map(|p| p.plot_id)
            .unwrap();
        assert!(svc.assign_plot(&best.key(), GuildId::new(2), Tier::Diamond).await.ok);
        assert!(svc.flush().await.unwrap());
        best
    };

    let reloaded = WorldGovernanceService::load(
        world,
        AllocationRules::default(),
        FileStore::new(dir.path()),
        KEY,
    )
    .await;
    let records = reloaded.all_assignments().await;
    assert_eq!(records.len(), 5);
    assert!(!reloaded.is_dirty());
    let diamond = reloaded.guild_primary_plot(GuildId::new(2)).await.unwrap();
    assert_eq!(diamond.plot_id, diamond_plot);
    assert_eq!(diamond.footprint, 2);
    let refused = reloaded.assign_plot("28,28", GuildId::new(3), Tier::Bronze).await;
    assert!(!refused.ok);
}

#[tokio::test]
async fn corrupt_snapshot_starts_empty() {
    let store = MemoryStore::new();
    store.set(KEY, "{ not json".to_owned()).await.unwrap();
    let svc = WorldGovernanceService::load(world(), AllocationRules::default(), store, KEY).await;
    assert!(svc.all_assignments().await.is_empty());
    assert!(svc.assign_plot("28,28", GuildId::new(1), Tier::Bronze).await.ok);
}

#[tokio::test]
async fn unknown_snapshot_version_starts_empty() {
    let store = MemoryStore::new();
    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let snapshot = OccupancySnapshot {
        version: SNAPSHOT_VERSION + 1,
        saved_at: at,
        assignments: vec![PlotAssignment::primary(
            Tile::new(28, 28),
            GuildId::new(1),
            Tier::Bronze,
            DistrictCategory::TownSquare,
            at,
        )],
    };
    store
        .set(KEY, serde_json::to_string(&snapshot).unwrap())
        .await
        .unwrap();
    let svc = WorldGovernanceService::load(world(), AllocationRules::default(), store, KEY).await;
    assert!(svc.all_assignments().await.is_empty());
}

#[tokio::test]
async fn restore_drops_records_the_world_no_longer_supports() {
    let world = world();
    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let road = world.roads().first().copied().unwrap();
    let good = PlotAssignment::primary(
        Tile::new(28, 28),
        GuildId::new(1),
        Tier::Bronze,
        DistrictCategory::TownSquare,
        at,
    );
    let on_road = PlotAssignment::primary(
        road,
        GuildId::new(2),
        Tier::Bronze,
        DistrictCategory::TownSquare,
        at,
    );
    let snapshot = OccupancySnapshot {
        version: SNAPSHOT_VERSION,
        saved_at: at,
        assignments: vec![good.clone(), on_road],
    };
    let store = MemoryStore::new();
    store
        .set(KEY, serde_json::to_string(&snapshot).unwrap())
        .await
        .unwrap();

    let svc = WorldGovernanceService::load(world, AllocationRules::default(), store.clone(), KEY).await;
    assert_eq!(svc.all_assignments().await, vec![good]);
    assert!(svc.is_dirty());
    assert!(svc.flush().await.unwrap());
    let saved: OccupancySnapshot = load_json(&store, KEY).await.unwrap().unwrap();
    assert_eq!(saved.assignments.len(), 1);
}

#[tokio::test]
async fn periodic_flush_runs_a_final_flush_on_shutdown() {
    let store = MemoryStore::new();
    let svc = Arc::new(WorldGovernanceService::new(
        world(),
        AllocationRules::default(),
        store.clone(),
        KEY,
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let flusher = {
        let svc = Arc::clone(&svc);
        tokio::spawn(async move {
            svc.flush_periodically(Duration::from_secs(3600), shutdown_rx)
                .await;
        })
    };

    assert!(svc.assign_plot("28,28", GuildId::new(1), Tier::Bronze).await.ok);
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), flusher)
        .await
        .expect("flusher stops after shutdown")
        .unwrap();

    assert!(!svc.is_dirty());
    let saved: OccupancySnapshot = load_json(&store, KEY).await.unwrap().unwrap();
    assert_eq!(saved.assignments.len(), 1);
}

/// Memory store whose first write stalls.
#[derive(Debug, Clone)]
struct SlowFirstStore {
    inner: MemoryStore,
    first: Arc<AtomicBool>,
}

impl PersistenceAdapter for SlowFirstStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), PersistenceError> {
        if self.first.swap(false, Ordering::AcqRel) {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        self.inner.set(key, blob).await
    }

    fn backend(&self) -> &'static str {
        "slow-first"
    }
}

#[tokio::test]
async fn overlapping_flushes_never_persist_an_older_snapshot() {
    let store = SlowFirstStore {
        inner: MemoryStore::new(),
        first: Arc::new(AtomicBool::new(true)),
    };
    let svc = Arc::new(WorldGovernanceService::new(
        world(),
        AllocationRules::default(),
        store.clone(),
        KEY,
    ));
    assert!(svc.assign_plot("28,28", GuildId::new(1), Tier::Bronze).await.ok);

    let slow_flush = {
        let svc = Arc::clone(&svc);
        tokio::spawn(async move { svc.flush().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = svc
        .available_plots(DistrictCategory::Market, Tier::Bronze)
        .await
        .first()
        .map(|p| p.plot_id)
        .unwrap();
    assert!(svc.assign_plot(&second.key(), GuildId::new(2), Tier::Bronze).await.ok);
    svc.flush().await.unwrap();
    assert!(slow_flush.await.unwrap().unwrap());

    let saved: OccupancySnapshot = load_json(&store.inner, KEY).await.unwrap().unwrap();
    let in_memory = svc.all_assignments().await;
    assert_eq!(in_memory.len(), 2);
    assert_eq!(saved.assignments, in_memory);
    assert!(!svc.is_dirty());
}

#[tokio::test]
async fn restore_drops_plots_that_break_allocation_invariants() {
    let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
    let guild = GuildId::new(1);
    let first = PlotAssignment::primary(Tile::new(28, 28), guild, Tier::Bronze, DistrictCategory::TownSquare, at(1));
    let over_quota =
        PlotAssignment::primary(Tile::new(29, 28), guild, Tier::Bronze, DistrictCategory::TownSquare, at(2));
    let mut single_tile_gold =
        PlotAssignment::primary(Tile::new(27, 28), guild, Tier::Bronze, DistrictCategory::TownSquare, at(3));
    single_tile_gold.tier = Tier::Gold;
    let snapshot = OccupancySnapshot {
        version: SNAPSHOT_VERSION,
        saved_at: at(10),
        assignments: vec![single_tile_gold, first.clone(), over_quota],
    };
    let store = MemoryStore::new();
    store
        .set(KEY, serde_json::to_string(&snapshot).unwrap())
        .await
        .unwrap();

    let svc = WorldGovernanceService::load(world(), AllocationRules::default(), store, KEY).await;
    assert_eq!(svc.all_assignments().await, vec![first]);
    assert_eq!(svc.guild_primary_plots(guild).await.len(), 1);
    assert!(svc.is_dirty());
}
