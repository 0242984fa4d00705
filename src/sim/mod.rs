//! Frame update pipeline
//!
//! Everything that runs inside a tick lives here:
//! - Supporting infrastructure (trig tables, geometry cache, pools, grid, batches)
//! - Entity update stages in their fixed order
//! - Collision, death and expiry passes
//! - The frame governor and the orchestrator that commits each snapshot

pub mod batch;
pub mod behavior;
pub mod boss;
pub mod cleanup;
pub mod collision;
pub mod effects;
pub mod events;
pub mod fast_math;
pub mod geometry_cache;
pub mod governor;
pub mod pickups;
pub mod pool;
pub mod spatial;
pub mod spawn;
pub mod stages;
pub mod state;
pub mod stats;
pub mod tick;
pub mod upgrades;
pub mod weapons;

pub use batch::{BatchKind, BatchScheduler, process_batch};
pub use effects::{BuffKind, PlayerStats, StatusEffect, StatusKind, TemporaryBuff};
pub use events::{GameEvent, GameHooks};
pub use geometry_cache::GeometryCache;
pub use governor::{FrameDecision, FrameGovernor, PerformanceMetrics};
pub use pool::{ObjectPool, Poolable, Pools};
pub use spatial::SpatialGrid;
pub use state::{
    Boss, BossShieldNode, DashState, Enemy, EnemyKind, ExpOrb, GameState, HealthPickup,
    InputState, Key, Owner, Particle, ParticleKind, PermanentBuffs, Player, Projectile, Weapon,
};
pub use stats::SessionStats;
pub use tick::{Diagnostics, ResetOptions, Simulation, TickOutcome};
pub use upgrades::{OwnedUpgrades, Upgrade, UpgradeKind, UpgradeOption, basic_catalog};
