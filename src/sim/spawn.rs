//! Enemy waves and health pickups
//!
//! Enemies come out of the pool, take their stats from the kind's template and
//! enter just outside a random playfield edge. Kinds unlock by game time.

use glam::Vec2;
use log::debug;
use rand::Rng;

use super::behavior::{KindBehavior, Special, behavior};
use super::pool::ObjectPool;
use super::state::{Enemy, EnemyKind, GameState, HealthPickup};
use crate::tuning::Tuning;

const HEALTH_PICKUP_SIZE: f32 = 16.0;
const PICKUP_EDGE_MARGIN: f32 = 50.0;
/// One extra enemy per wave for each minute survived
const WAVE_GROWTH_SECS: f32 = 60.0;

/// Weighted pick among kinds unlocked at `game_time`
pub fn pick_kind(game_time: f32, rng: &mut impl Rng) -> EnemyKind {
    let unlocked = || {
        EnemyKind::ALL
            .into_iter()
            .filter(move |&k| behavior(k).template.unlock_secs <= game_time)
    };
    let total: u32 = unlocked().map(|k| behavior(k).template.spawn_weight).sum();
    if total == 0 {
        return EnemyKind::Grunt;
    }
    let mut roll = rng.random_range(0..total);
    for kind in unlocked() {
        let weight = behavior(kind).template.spawn_weight;
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    EnemyKind::Grunt
}

/// A point just outside a random edge of the playfield
pub fn edge_position(tuning: &Tuning, margin: f32, rng: &mut impl Rng) -> Vec2 {
    let (w, h) = (tuning.playfield_width, tuning.playfield_height);
    let along_x = rng.random_range(0.0..w);
    let along_y = rng.random_range(0.0..h);
    match rng.random_range(0..4) {
        0 => Vec2::new(along_x, -margin),
        1 => Vec2::new(w + margin, along_y),
        2 => Vec2::new(along_x, h + margin),
        _ => Vec2::new(-margin, along_y),
    }
}

/// Reset a pooled enemy to a fresh `kind` at `pos`
pub fn init_enemy(
    enemy: &mut Enemy,
    id: u32,
    kind: EnemyKind,
    pos: Vec2,
    nightmare_scale: f32,
    now_ms: f64,
    rng: &mut impl Rng,
) {
    let KindBehavior { template, special } = behavior(kind);
    enemy.id = id;
    enemy.kind = kind;
    enemy.pos = pos;
    enemy.max_health = template.health * nightmare_scale;
    enemy.health = enemy.max_health;
    enemy.speed = template.speed;
    enemy.size = template.size;
    enemy.damage = template.damage * nightmare_scale;
    enemy.exp_value = template.exp_value;
    enemy.vulnerability = 1.0;
    enemy.visible = true;
    enemy.last_trail_drop_ms = now_ms;
    if let Some(toggle) = special.initial_cloak(now_ms) {
        enemy.cloak_toggle_ms = toggle;
    }
    if let Special::Weave { .. } = special {
        enemy.wave_offset = rng.random_range(0.0..std::f32::consts::TAU);
    }
}

/// Spawn a wave if the spawn timer is due. Returns the number spawned.
pub fn spawn_enemies(
    state: &mut GameState,
    pool: &mut ObjectPool<Enemy>,
    tuning: &Tuning,
    now_ms: f64,
    rng: &mut impl Rng,
) -> usize {
    if now_ms < state.next_enemy_spawn_ms || state.game_over {
        return 0;
    }
    state.next_enemy_spawn_ms = now_ms + tuning.enemy_spawn_interval_ms;

    let room = tuning.max_enemies.saturating_sub(state.enemies.len());
    let wave = 1 + (state.game_time / WAVE_GROWTH_SECS) as usize;
    let count = wave.min(room);
    let scale = if state.nightmare {
        tuning.nightmare_multiplier
    } else {
        1.0
    };

    for _ in 0..count {
        let kind = pick_kind(state.game_time, rng);
        let size = behavior(kind).template.size;
        let pos = edge_position(tuning, size, rng);
        let id = state.next_entity_id();
        let mut enemy = pool.acquire();
        init_enemy(&mut enemy, id, kind, pos, scale, now_ms, rng);
        state.enemies.push(enemy);
    }
    if count > 0 {
        debug!("Spawned {} enemies ({} alive)", count, state.enemies.len());
    }
    count
}

/// Drop a health pickup somewhere inside the playfield when its timer is due
pub fn spawn_health_pickup(
    state: &mut GameState,
    tuning: &Tuning,
    now_ms: f64,
    rng: &mut impl Rng,
) -> bool {
    if now_ms < state.next_health_pickup_ms || state.game_over {
        return false;
    }
    let (w, h) = (tuning.playfield_width, tuning.playfield_height);
    let margin = PICKUP_EDGE_MARGIN.min(w / 2.0).min(h / 2.0);
    let pos = Vec2::new(
        rng.random_range(margin..=w - margin),
        rng.random_range(margin..=h - margin),
    );
    let id = state.next_entity_id();
    state.health_pickups.push(HealthPickup {
        id,
        pos,
        size: HEALTH_PICKUP_SIZE,
        heal: tuning.health_pickup_heal,
    });
    let interval = tuning.health_pickup_interval_min_ms..=tuning.health_pickup_interval_max_ms;
    state.next_health_pickup_ms = now_ms + rng.random_range(interval);
    debug!("Health pickup at ({:.0}, {:.0})", pos.x, pos.y);
    true
}
