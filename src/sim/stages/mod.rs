//! Entity update stages
//!
//! Run in a fixed order every tick: player, enemies, projectiles, particles.
//! Later stages read fields written by earlier ones.

pub mod enemies;
pub mod particles;
pub mod player;
pub mod projectiles;

pub use enemies::update_enemies;
pub use particles::update_particles;
pub use player::update_player;
pub use projectiles::update_projectiles;

use super::effects::PlayerStats;
use crate::tuning::Tuning;

/// Values shared by every stage of one tick
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Wall-clock time sampled once at the start of the tick
    pub now_ms: f64,
    /// Elapsed simulation time in seconds
    pub dt: f32,
    pub tuning: &'a Tuning,
    pub player_stats: PlayerStats,
}

impl<'a> Frame<'a> {
    pub fn new(now_ms: f64, dt: f32, tuning: &'a Tuning, player_stats: PlayerStats) -> Self {
        Self {
            now_ms,
            dt,
            tuning,
            player_stats,
        }
    }

    /// Elapsed time in milliseconds
    #[inline]
    pub fn dt_ms(&self) -> f32 {
        self.dt * 1000.0
    }
}
