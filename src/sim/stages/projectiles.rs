//! Projectile stage: integration, lifetime and target seeking

use super::Frame;
use crate::sim::batch::{BatchKind, BatchScheduler};
use crate::sim::geometry_cache::GeometryCache;
use crate::sim::state::GameState;

pub fn update_projectiles(
    state: &mut GameState,
    batch: &mut BatchScheduler,
    cache: &mut GeometryCache,
    frame: &Frame,
) {
    let dt = frame.dt;
    let dt_ms = frame.dt_ms();
    let steering = frame.tuning.seek_steering;
    let default_speed = frame.tuning.default_seek_speed;

    // Targets are looked up in the rest of the state while projectiles mutate
    let mut projectiles = std::mem::take(&mut state.projectiles);
    batch.process(BatchKind::Projectiles, &mut projectiles, |p| {
        p.pos += p.vel * dt;
        p.lifetime_ms -= dt_ms;

        if !p.seeking {
            return;
        }
        let Some(target) = p.target_id.and_then(|id| state.seek_target(id)) else {
            p.seeking = false;
            return;
        };

        let to_target = cache.direction(p.pos, target);
        let seek_speed = if p.base_speed > 0.0 {
            p.base_speed
        } else {
            default_speed
        };
        p.vel = p.vel * (1.0 - steering) + to_target * seek_speed * steering;
        let speed = p.vel.length();
        if speed > 0.0 {
            p.vel = p.vel / speed * seek_speed;
        }
    });
    state.projectiles = projectiles;
}
