//! Auto-firing player weapons
//!
//! A weapon whose cooldown has elapsed fires one projectile at the nearest
//! live target in range. With nothing in range it stays ready.

use glam::Vec2;
use log::trace;

use super::geometry_cache::GeometryCache;
use super::pool::ObjectPool;
use super::stages::Frame;
use super::state::{GameState, Owner, Projectile};

/// Nearest live target within `range` of `from`: enemies, shield nodes, or
/// the boss once its shield is down
pub fn nearest_target(
    state: &GameState,
    cache: &mut GeometryCache,
    from: Vec2,
    range: f32,
) -> Option<(u32, Vec2)> {
    let enemies = state
        .enemies
        .iter()
        .filter(|e| e.health > 0.0 && e.visible)
        .map(|e| (e.id, e.pos));
    let nodes = state
        .boss_shield_nodes
        .iter()
        .filter(|n| n.health > 0.0)
        .map(|n| (n.id, n.pos));
    let boss = state
        .boss
        .iter()
        .filter(|b| b.health > 0.0 && !b.invulnerable)
        .map(|b| (b.id, b.pos));

    let mut best: Option<(u32, Vec2, f32)> = None;
    for (id, pos) in enemies.chain(nodes).chain(boss) {
        let d = cache.distance(from, pos);
        if d <= range && best.is_none_or(|(_, _, bd)| d < bd) {
            best = Some((id, pos, d));
        }
    }
    best.map(|(id, pos, _)| (id, pos))
}

/// Fire every ready weapon. Returns the number of projectiles launched.
pub fn fire_weapons(
    state: &mut GameState,
    pool: &mut ObjectPool<Projectile>,
    cache: &mut GeometryCache,
    frame: &Frame,
) -> usize {
    if state.game_over {
        return 0;
    }
    let now = frame.now_ms;
    let origin = state.player.pos;
    let damage_scale = state.player.damage_multiplier * frame.player_stats.damage_multiplier;
    let mut fired = 0;

    for slot in 0..state.player.weapons.len() {
        let weapon = &state.player.weapons[slot];
        let cooldown = weapon.cooldown_ms * frame.player_stats.cooldown_multiplier as f64;
        if now - weapon.last_fired_ms < cooldown {
            continue;
        }
        let Some((target_id, target_pos)) = nearest_target(state, cache, origin, weapon.range)
        else {
            continue;
        };

        let weapon = &state.player.weapons[slot];
        let dir = cache.direction(origin, target_pos);
        let mut p = pool.acquire();
        p.owner = Owner::Player;
        p.pos = origin;
        p.vel = dir * weapon.projectile_speed;
        p.size = weapon.projectile_size;
        p.damage = weapon.damage * damage_scale;
        p.lifetime_ms = weapon.lifetime_ms;
        p.pierce = weapon.pierce;
        p.seeking = weapon.seeking;
        p.target_id = Some(target_id);
        p.base_speed = weapon.projectile_speed;
        p.weapon_id = Some(weapon.id);

        state.player.weapons[slot].last_fired_ms = now;
        p.id = state.next_entity_id();
        trace!("Weapon {} fired at {}", state.player.weapons[slot].name, target_id);
        state.projectiles.push(p);
        fired += 1;
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::PlayerStats;
    use crate::sim::state::{Enemy, PermanentBuffs};
    use crate::tuning::Tuning;

    fn setup(tuning: &Tuning) -> (GameState, ObjectPool<Projectile>, GeometryCache) {
        let mut state = GameState::new(tuning, &PermanentBuffs::default(), "skin_default", 0.0);
        state.player.pos = Vec2::new(100.0, 100.0);
        (
            state,
            ObjectPool::new(tuning.projectile_pool_cap),
            GeometryCache::new(tuning.geometry_cache_clear_ms),
        )
    }

    fn enemy(id: u32, x: f32, y: f32) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, y),
            health: 10.0,
            size: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_fires_at_nearest_enemy() {
        let tuning = Tuning::default();
        let (mut state, mut pool, mut cache) = setup(&tuning);
        state.enemies.push(enemy(10, 400.0, 100.0));
        state.enemies.push(enemy(11, 100.0, 250.0));

        let frame = Frame::new(1000.0, 0.016, &tuning, PlayerStats::default());
        assert_eq!(fire_weapons(&mut state, &mut pool, &mut cache, &frame), 1);

        let p = &state.projectiles[0];
        assert_eq!(p.target_id, Some(11));
        assert!(p.vel.x.abs() < 1e-4 && p.vel.y > 0.0);
        assert_eq!(p.owner, Owner::Player);
        assert_eq!(state.player.weapons[0].last_fired_ms, 1000.0);
    }

    #[test]
    fn test_waits_for_cooldown_and_target() {
        let tuning = Tuning::default();
        let (mut state, mut pool, mut cache) = setup(&tuning);

        let frame = Frame::new(1000.0, 0.016, &tuning, PlayerStats::default());
        // Nothing in range: stays ready
        assert_eq!(fire_weapons(&mut state, &mut pool, &mut cache, &frame), 0);
        assert_eq!(state.player.weapons[0].last_fired_ms, 0.0);

        state.enemies.push(enemy(10, 150.0, 100.0));
        assert_eq!(fire_weapons(&mut state, &mut pool, &mut cache, &frame), 1);
        let soon = Frame::new(1500.0, 0.016, &tuning, PlayerStats::default());
        assert_eq!(fire_weapons(&mut state, &mut pool, &mut cache, &soon), 0);

        // Attack speed buff halves the cooldown
        let hasted = Frame::new(
            1500.0,
            0.016,
            &tuning,
            PlayerStats {
                cooldown_multiplier: 0.5,
                ..Default::default()
            },
        );
        assert_eq!(fire_weapons(&mut state, &mut pool, &mut cache, &hasted), 1);
    }

    #[test]
    fn test_damage_scales_with_multipliers() {
        let tuning = Tuning::default();
        let (mut state, mut pool, mut cache) = setup(&tuning);
        state.player.damage_multiplier = 1.5;
        state.enemies.push(enemy(10, 150.0, 100.0));
        let frame = Frame::new(
            1000.0,
            0.016,
            &tuning,
            PlayerStats {
                damage_multiplier: 2.0,
                ..Default::default()
            },
        );
        fire_weapons(&mut state, &mut pool, &mut cache, &frame);
        assert_eq!(state.projectiles[0].damage, 30.0);
    }

    #[test]
    fn test_out_of_range_enemy_is_ignored() {
        let tuning = Tuning::default();
        let (mut state, mut pool, mut cache) = setup(&tuning);
        state.enemies.push(enemy(10, 1200.0, 700.0));
        let frame = Frame::new(1000.0, 0.016, &tuning, PlayerStats::default());
        assert_eq!(fire_weapons(&mut state, &mut pool, &mut cache, &frame), 0);
        assert!(nearest_target(&state, &mut cache, state.player.pos, 400.0).is_none());
    }
}
