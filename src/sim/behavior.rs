//! Per-kind enemy parameters and special behavior
//!
//! Every enemy kind maps to one `KindBehavior` record. Stages look the record
//! up once per enemy and call through it instead of matching on the kind.

use glam::Vec2;

use super::fast_math;
use super::state::{Enemy, EnemyKind, TrailPoint};
use crate::consts::TRAIL_LENGTH;

/// Base stats an enemy is spawned with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTemplate {
    pub health: f32,
    pub speed: f32,
    pub size: f32,
    pub damage: f32,
    pub exp_value: u32,
    /// Game time (seconds) after which this kind may spawn
    pub unlock_secs: f32,
    pub spawn_weight: u32,
}

/// Kind-specific hook run before movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Special {
    None,
    /// Drop a trail point every `interval_ms`, keeping the newest points
    DropTrail { interval_ms: f64 },
    /// Alternate between visible and hidden windows
    Cloak { visible_ms: f64, hidden_ms: f64 },
    /// Sideways oscillation added to movement
    Weave { amplitude: f32, period_ms: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindBehavior {
    pub template: EnemyTemplate,
    pub special: Special,
}

const fn template(
    health: f32,
    speed: f32,
    size: f32,
    damage: f32,
    exp_value: u32,
    unlock_secs: f32,
    spawn_weight: u32,
) -> EnemyTemplate {
    EnemyTemplate {
        health,
        speed,
        size,
        damage,
        exp_value,
        unlock_secs,
        spawn_weight,
    }
}

/// Behavior record for `kind`
pub const fn behavior(kind: EnemyKind) -> KindBehavior {
    match kind {
        EnemyKind::Grunt => KindBehavior {
            template: template(20.0, 60.0, 20.0, 10.0, 10, 0.0, 5),
            special: Special::None,
        },
        EnemyKind::Runner => KindBehavior {
            template: template(12.0, 110.0, 16.0, 6.0, 8, 30.0, 3),
            special: Special::None,
        },
        EnemyKind::Tank => KindBehavior {
            template: template(80.0, 35.0, 34.0, 20.0, 30, 90.0, 2),
            special: Special::None,
        },
        EnemyKind::Trailer => KindBehavior {
            template: template(30.0, 55.0, 22.0, 8.0, 15, 60.0, 2),
            special: Special::DropTrail { interval_ms: 500.0 },
        },
        EnemyKind::Cloaker => KindBehavior {
            template: template(25.0, 75.0, 20.0, 12.0, 20, 120.0, 2),
            special: Special::Cloak {
                visible_ms: 3000.0,
                hidden_ms: 1500.0,
            },
        },
        EnemyKind::Weaver => KindBehavior {
            template: template(18.0, 70.0, 18.0, 8.0, 12, 45.0, 3),
            special: Special::Weave {
                amplitude: 80.0,
                period_ms: 350.0,
            },
        },
    }
}

impl Special {
    /// Run the per-tick hook on `enemy`
    pub fn apply(&self, enemy: &mut Enemy, now_ms: f64) {
        match *self {
            Special::None | Special::Weave { .. } => {}
            Special::DropTrail { interval_ms } => {
                if now_ms - enemy.last_trail_drop_ms > interval_ms {
                    enemy.trail.push_back(TrailPoint {
                        pos: enemy.pos,
                        created_ms: now_ms,
                    });
                    enemy.last_trail_drop_ms = now_ms;
                    if enemy.trail.len() > TRAIL_LENGTH {
                        enemy.trail.pop_front();
                    }
                }
            }
            Special::Cloak {
                visible_ms,
                hidden_ms,
            } => {
                if now_ms > enemy.cloak_toggle_ms {
                    enemy.visible = !enemy.visible;
                    enemy.cloak_toggle_ms =
                        now_ms + if enemy.visible { visible_ms } else { hidden_ms };
                }
            }
        }
    }

    /// Perpendicular velocity added on top of the chase direction
    pub fn drift(&self, enemy: &Enemy, direction: Vec2, now_ms: f64) -> Vec2 {
        match *self {
            Special::Weave {
                amplitude,
                period_ms,
            } => {
                let phase = now_ms / period_ms + enemy.wave_offset as f64;
                let wave = fast_math::sin(phase) * amplitude;
                direction.perp() * wave
            }
            _ => Vec2::ZERO,
        }
    }

    /// Visibility window an enemy starts with
    pub fn initial_cloak(&self, now_ms: f64) -> Option<f64> {
        match *self {
            Special::Cloak { visible_ms, .. } => Some(now_ms + visible_ms),
            _ => None,
        }
    }
}
