//! Tick orchestrator
//!
//! Owns the committed snapshot plus every per-session resource (grid, caches,
//! pools, scheduler, governor) and advances the game one frame at a time.
//! Each tick works on a clone of the snapshot and publishes it only if every
//! stage succeeded. Events raised during the tick reach the hooks after that.

use log::{debug, error, trace, warn};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::batch::BatchScheduler;
use super::boss;
use super::cleanup::{check_level_up, expire_particles, expire_projectiles, process_dead_enemies};
use super::collision::{resolve_player_hits, resolve_projectile_hits};
use super::effects::PlayerStatsCache;
use super::events::{GameHooks, dispatch};
use super::geometry_cache::GeometryCache;
use super::governor::{FrameDecision, FrameGovernor, PerformanceMetrics};
use super::pickups::collect_pickups;
use super::pool::Pools;
use super::spatial::SpatialGrid;
use super::spawn::{spawn_enemies, spawn_health_pickup};
use super::stages::{Frame, update_enemies, update_particles, update_player, update_projectiles};
use super::state::{GameState, Key, PermanentBuffs};
use super::stats::SessionStats;
use super::upgrades::{OwnedUpgrades, Upgrade, UpgradeKind, UpgradeOption, upgrade_options};
use super::weapons::fire_weapons;
use crate::clock::Clock;
use crate::consts::DEFAULT_SEED;
use crate::error::{TickError, TuningError, UpgradeError};
use crate::tuning::Tuning;

/// Delay before enemies spawn again after a resume
const RESUME_ENEMY_GRACE_MS: f64 = 500.0;
/// Delay before a health pickup can appear after a resume
const RESUME_PICKUP_GRACE_MS: f64 = 2000.0;

/// What a call to [`Simulation::tick`] did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A new snapshot was published
    Committed,
    /// The governor shed this frame
    Skipped,
    /// Paused, deactivated or game over: only governor metrics moved
    Inactive,
    /// A stage failed; the previous snapshot is still current
    Abandoned(TickError),
}

/// Everything `reset_game` needs to start a run
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    pub permanent_buffs: PermanentBuffs,
    pub achievement_buffs: PermanentBuffs,
    pub skin_id: String,
    pub nightmare: bool,
    pub modifier_ids: Vec<String>,
}

/// Read-only view for monitoring
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics<'a> {
    pub metrics: PerformanceMetrics,
    pub frame_counter: u64,
    pub abandoned_ticks: u64,
    pub stats: &'a SessionStats,
    pub live_enemies: usize,
    pub live_projectiles: usize,
    pub live_particles: usize,
    pub pooled_enemies: usize,
    pub pooled_projectiles: usize,
    pub pooled_particles: usize,
    pub geometry_cache_entries: usize,
    pub geometry_computations: u64,
}

pub struct Simulation<C: Clock, H: GameHooks = ()> {
    tuning: Tuning,
    clock: C,
    hooks: H,
    state: GameState,
    stats: SessionStats,
    rng: Pcg32,
    grid: SpatialGrid,
    cache: GeometryCache,
    pools: Pools,
    batch: BatchScheduler,
    governor: FrameGovernor,
    player_stats: PlayerStatsCache,
    owned: OwnedUpgrades,
    active: bool,
    abandoned_ticks: u64,
}

impl<C: Clock, H: GameHooks> Simulation<C, H> {
    pub fn new(tuning: Tuning, clock: C, hooks: H) -> Result<Self, TuningError> {
        Self::with_seed(tuning, clock, hooks, DEFAULT_SEED)
    }

    /// Fails if `tuning` holds values the simulation cannot run with
    pub fn with_seed(tuning: Tuning, clock: C, hooks: H, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let now = clock.now_ms();
        let state = GameState::new(&tuning, &PermanentBuffs::default(), "skin_default", now);
        Ok(Self {
            grid: SpatialGrid::new(tuning.spatial_cell_size),
            cache: GeometryCache::new(tuning.geometry_cache_clear_ms),
            pools: Pools::new(&tuning),
            batch: BatchScheduler::new(&tuning),
            governor: FrameGovernor::new(&tuning),
            player_stats: PlayerStatsCache::default(),
            owned: OwnedUpgrades::default(),
            stats: SessionStats::new(now, false),
            rng: Pcg32::seed_from_u64(seed),
            state,
            tuning,
            clock,
            hooks,
            active: true,
            abandoned_ticks: 0,
        })
    }

    /// Advance the game by `elapsed` seconds
    pub fn tick(&mut self, elapsed: f32) -> TickOutcome {
        let now = self.clock.now_ms();
        trace!("Tick at {:.0}ms, elapsed {:.4}s", now, elapsed);

        if self.governor.begin_frame(now) == FrameDecision::Skip {
            trace!("Frame {} skipped", self.governor.frame_counter());
            return TickOutcome::Skipped;
        }
        if !self.active || self.state.paused || self.state.game_over {
            return TickOutcome::Inactive;
        }

        // Restored on failure so a replay does not depend on abandoned ticks
        let rng = self.rng.clone();
        let batch = self.batch.clone();
        let player_stats = self.player_stats.clone();

        match self.step(now, elapsed) {
            Ok((state, stats)) => {
                self.state = state;
                self.stats = stats;
                let events = std::mem::take(&mut self.state.pending_events);
                for event in &events {
                    dispatch(&mut self.hooks, event, &self.stats);
                }
                TickOutcome::Committed
            }
            Err(err) => {
                self.rng = rng;
                self.batch = batch;
                self.player_stats = player_stats;
                self.abandoned_ticks += 1;
                error!("Tick abandoned: {}", err);
                TickOutcome::Abandoned(err)
            }
        }
    }

    /// Build the next snapshot from the current one
    fn step(&mut self, now: f64, dt: f32) -> Result<(GameState, SessionStats), TickError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(TickError::InvalidElapsed(dt));
        }
        let mut state = self.state.clone();
        let mut stats = self.stats.clone();
        state.pending_events.clear();

        self.cache.clear_if_stale(now);

        state.player.temporary_buffs.retain(|b| b.is_active(now));
        let player_stats = self.player_stats.get(
            &state.player.temporary_buffs,
            state.player.damage_reduction,
            now,
            self.tuning.player_stats_cache_ms,
        );
        let frame = Frame::new(now, dt, &self.tuning, player_stats);

        // Entity stages
        update_player(&mut state, &mut stats, &frame);
        update_enemies(&mut state, &mut self.grid, &mut self.batch, &frame);
        boss::update_boss(&mut state, &frame);
        update_projectiles(&mut state, &mut self.batch, &mut self.cache, &frame);
        update_particles(&mut state, &mut self.batch, &frame);

        // Collisions
        resolve_projectile_hits(
            &mut state,
            &self.grid,
            &mut self.pools.projectiles,
            &mut stats,
            &frame,
        );
        resolve_player_hits(&mut state, &self.grid, &mut stats, &frame);

        // Deaths and expiry
        process_dead_enemies(&mut state, &mut self.pools, &mut stats, &self.tuning, &mut self.rng);
        boss::resolve_boss_deaths(&mut state, &mut stats);
        expire_particles(&mut state, &mut self.pools.particles);
        expire_projectiles(&mut state, &mut self.pools, &self.tuning);

        // Progression
        collect_pickups(&mut state, &mut stats);
        check_level_up(&mut state, &mut stats, &self.tuning);

        state.game_time += dt;
        stats.time_survived = state.game_time;
        stats.score = state.score;

        // Schedules
        boss::advance_schedule(&mut state, &self.tuning);
        fire_weapons(&mut state, &mut self.pools.projectiles, &mut self.cache, &frame);
        spawn_enemies(&mut state, &mut self.pools.enemies, &self.tuning, now, &mut self.rng);
        spawn_health_pickup(&mut state, &self.tuning, now, &mut self.rng);

        state.validate()?;
        Ok((state, stats))
    }

    /// Start a new run, dropping every trace of the previous one
    pub fn reset_game(&mut self, options: ResetOptions) {
        let now = self.clock.now_ms();
        let buffs = options.permanent_buffs.combine(&options.achievement_buffs);
        let mut state = GameState::new(&self.tuning, &buffs, &options.skin_id, now);
        for id in &options.modifier_ids {
            if !state.player.apply_modifier(id) {
                warn!("Unknown modifier '{}' ignored", id);
            }
        }
        state.nightmare = options.nightmare;
        state.modifier_ids = options.modifier_ids;

        self.state = state;
        self.stats = SessionStats::new(now, options.nightmare);
        self.stats.level_reached = self.state.level;
        self.owned.clear();
        self.governor.reset();
        self.cache.reset(now);
        self.player_stats.invalidate();
        self.batch.reset();
        self.grid.clear();
        self.active = true;
        debug!(
            "Game reset: level {}, nightmare {}, skin {}",
            self.state.level, self.state.nightmare, options.skin_id
        );
    }

    /// Update a held key by host key name
    pub fn set_key_state(&mut self, key: &str, down: bool) {
        let Some(key) = Key::from_name(key) else {
            warn!("Unknown key '{}'", key);
            return;
        };
        if key == Key::Pause {
            if down {
                if self.state.paused {
                    self.resume();
                } else {
                    self.pause();
                }
            }
            return;
        }
        if self.state.paused {
            return;
        }
        self.state.keys.set(key, down);
    }

    /// Pause and release every held key
    pub fn pause(&mut self) {
        self.state.paused = true;
        self.state.keys.release_all();
        debug!("Paused");
    }

    /// Unpause, pushing spawn timers out so nothing bursts in at once
    pub fn resume(&mut self) {
        let now = self.clock.now_ms();
        let state = &mut self.state;
        state.paused = false;
        state.next_enemy_spawn_ms = state.next_enemy_spawn_ms.max(now + RESUME_ENEMY_GRACE_MS);
        state.next_health_pickup_ms = state
            .next_health_pickup_ms
            .max(now + RESUME_PICKUP_GRACE_MS);
        debug!("Resumed");
    }

    /// Apply an upgrade to the player and count it
    pub fn apply_upgrade(&mut self, upgrade: &Upgrade) -> Result<(), UpgradeError> {
        if let Err(err) = self.owned.check(upgrade) {
            warn!("Upgrade rejected: {}", err);
            return Err(err);
        }
        (upgrade.apply)(&mut self.state.player);
        self.owned.record(upgrade);
        if upgrade.kind == UpgradeKind::WeaponEvolution {
            self.stats.evolved_weapons.push(upgrade.id.clone());
        }
        self.player_stats.invalidate();
        debug!(
            "Upgrade '{}' applied (level {})",
            upgrade.id,
            self.owned.level(&upgrade.id)
        );
        Ok(())
    }

    /// Catalog entries that can still be taken
    pub fn upgrade_options<'a>(&self, catalog: &'a [Upgrade]) -> Vec<UpgradeOption<'a>> {
        upgrade_options(catalog, &self.owned)
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn owned_upgrades(&self) -> &OwnedUpgrades {
        &self.owned
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn diagnostics(&self) -> Diagnostics<'_> {
        Diagnostics {
            metrics: self.governor.metrics(),
            frame_counter: self.governor.frame_counter(),
            abandoned_ticks: self.abandoned_ticks,
            stats: &self.stats,
            live_enemies: self.state.enemies.len(),
            live_projectiles: self.state.projectiles.len(),
            live_particles: self.state.particles.len(),
            pooled_enemies: self.pools.enemies.len(),
            pooled_projectiles: self.pools.projectiles.len(),
            pooled_particles: self.pools.particles.len(),
            geometry_cache_entries: self.cache.len(),
            geometry_computations: self.cache.computations(),
        }
    }

    /// Direct access to the committed snapshot for hosts and tests that set
    /// up scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
