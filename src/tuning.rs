//! Data-driven game balance
//!
//! Every number the simulation consults that a designer might want to change.
//! Loaded from JSON by the host or left at `Default`.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// How the batch scheduler picks which entities of a kind get updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BatchPolicy {
    /// Always the leading `cap` entities. Tail entities of a long list stall.
    #[default]
    Head,
    /// Start where the previous tick stopped, wrapping around the list
    Rotating,
}

/// Balance and engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Spatial index / caches ===
    pub spatial_cell_size: f32,
    /// Geometry cache is dropped wholesale after this much wall-clock time
    pub geometry_cache_clear_ms: f64,
    /// Derived player stats are reused for this long
    pub player_stats_cache_ms: f64,

    // === Object pools ===
    pub particle_pool_cap: usize,
    pub projectile_pool_cap: usize,
    pub enemy_pool_cap: usize,

    // === Batch scheduler ===
    pub enemy_batch: usize,
    pub projectile_batch: usize,
    pub particle_batch: usize,
    pub batch_policy: BatchPolicy,

    // === Frame governor ===
    pub slow_frame_ms: f64,
    pub fast_frame_ms: f64,
    pub max_optimization_level: u8,
    pub perf_report_interval_ms: f64,

    // === Player ===
    pub dash_duration_ms: f64,
    pub dash_cooldown_ms: f64,
    pub dash_speed_multiplier: f32,
    pub hit_cooldown_ms: f64,
    pub player_base_health: f32,
    pub player_base_speed: f32,
    pub player_size: f32,
    pub pickup_radius: f32,

    // === Projectiles ===
    pub seek_steering: f32,
    pub default_seek_speed: f32,
    pub projectile_query_margin: f32,
    pub player_query_margin: f32,

    // === Progression ===
    pub initial_exp_to_next_level: u32,
    pub exp_level_multiplier: f32,

    // === Spawning ===
    pub enemy_spawn_initial_delay_ms: f64,
    pub enemy_spawn_interval_ms: f64,
    pub max_enemies: usize,
    pub nightmare_multiplier: f32,
    pub health_pickup_interval_min_ms: f64,
    pub health_pickup_interval_max_ms: f64,
    pub health_pickup_heal: f32,
    pub death_particles: usize,

    // === Boss ===
    pub stage_duration_secs: f32,
    pub boss_warning_secs: f32,
    pub boss_shield_nodes: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: 1280.0,
            playfield_height: 720.0,

            spatial_cell_size: 100.0,
            geometry_cache_clear_ms: 1000.0,
            player_stats_cache_ms: 100.0,

            particle_pool_cap: 200,
            projectile_pool_cap: 100,
            enemy_pool_cap: 50,

            enemy_batch: 30,
            projectile_batch: 40,
            particle_batch: 60,
            batch_policy: BatchPolicy::Head,

            slow_frame_ms: 20.0,
            fast_frame_ms: 10.0,
            max_optimization_level: 3,
            perf_report_interval_ms: 5000.0,

            dash_duration_ms: 200.0,
            dash_cooldown_ms: 2000.0,
            dash_speed_multiplier: 3.0,
            hit_cooldown_ms: 500.0,
            player_base_health: 100.0,
            player_base_speed: 200.0,
            player_size: 20.0,
            pickup_radius: 60.0,

            seek_steering: 0.3,
            default_seek_speed: 200.0,
            projectile_query_margin: 50.0,
            player_query_margin: 100.0,

            initial_exp_to_next_level: 100,
            exp_level_multiplier: 1.2,

            enemy_spawn_initial_delay_ms: 2000.0,
            enemy_spawn_interval_ms: 1000.0,
            max_enemies: 300,
            nightmare_multiplier: 1.5,
            health_pickup_interval_min_ms: 20_000.0,
            health_pickup_interval_max_ms: 40_000.0,
            health_pickup_heal: 25.0,
            death_particles: 4,

            stage_duration_secs: 300.0,
            boss_warning_secs: 5.0,
            boss_shield_nodes: 3,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.spatial_cell_size > 0.0) {
            return Err(invalid("spatial_cell_size", "must be positive"));
        }
        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return Err(invalid("playfield", "width and height must be positive"));
        }
        if self.enemy_batch == 0 || self.projectile_batch == 0 || self.particle_batch == 0 {
            return Err(invalid("batch", "per-kind caps must be at least 1"));
        }
        if self.fast_frame_ms >= self.slow_frame_ms {
            return Err(invalid(
                "fast_frame_ms",
                format!(
                    "{} must be below slow_frame_ms {}",
                    self.fast_frame_ms, self.slow_frame_ms
                ),
            ));
        }
        if self.max_optimization_level == 0 {
            return Err(invalid("max_optimization_level", "must be at least 1"));
        }
        if self.exp_level_multiplier < 1.0 {
            return Err(invalid("exp_level_multiplier", "must be at least 1.0"));
        }
        if self.initial_exp_to_next_level == 0 {
            return Err(invalid("initial_exp_to_next_level", "must be positive"));
        }
        if self.health_pickup_interval_min_ms > self.health_pickup_interval_max_ms {
            return Err(invalid("health_pickup_interval", "min exceeds max"));
        }
        Ok(())
    }

    /// Experience needed to leave `level`, following the multiplicative curve
    pub fn exp_threshold_for_level(&self, level: u32) -> u32 {
        let mut threshold = self.initial_exp_to_next_level;
        for _ in 1..level.max(1) {
            threshold = (threshold as f32 * self.exp_level_multiplier).floor() as u32;
        }
        threshold
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}
