//! Collision resolution
//!
//! Both passes narrow candidates through the spatial grid, then do an exact
//! squared-distance test against the summed half sizes. Shield nodes and the
//! boss are few and are scanned directly after the grid candidates.

use glam::Vec2;
use log::{debug, trace};

use super::events::GameEvent;
use super::fast_math::distance_squared;
use super::pool::ObjectPool;
use super::spatial::SpatialGrid;
use super::stages::Frame;
use super::state::{GameState, Owner, Projectile};
use super::stats::SessionStats;

/// Strict overlap of two circles given by center and diameter
#[inline]
pub fn overlaps(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    let reach = a_size / 2.0 + b_size / 2.0;
    distance_squared(a, b) < reach * reach
}

/// What the projectile pass did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitReport {
    pub hits: usize,
    pub removed: usize,
}

/// Player projectiles against enemies, shield nodes and the boss.
///
/// Each projectile damages at most one target per tick. A projectile with no
/// pierce left is removed on its hit; otherwise its pierce count drops by one.
pub fn resolve_projectile_hits(
    state: &mut GameState,
    grid: &SpatialGrid,
    pool: &mut ObjectPool<Projectile>,
    stats: &mut SessionStats,
    frame: &Frame,
) -> HitReport {
    let margin = frame.tuning.projectile_query_margin;
    let mut report = HitReport::default();
    let mut candidates = Vec::new();
    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut spent = vec![false; projectiles.len()];

    for (slot, p) in projectiles.iter_mut().enumerate() {
        if p.owner != Owner::Player {
            continue;
        }

        let Some(damage_dealt) = strike(state, grid, &mut candidates, p, margin) else {
            continue;
        };
        report.hits += 1;

        if let Some(weapon) = p
            .weapon_id
            .and_then(|id| state.player.weapons.iter().find(|w| w.id == id))
        {
            stats.record_damage_dealt(&weapon.name, damage_dealt);
        }

        if p.pierce == 0 {
            spent[slot] = true;
        } else {
            p.pierce -= 1;
        }
    }

    let mut slot = 0;
    projectiles.retain_mut(|p| {
        let keep = !spent[slot];
        slot += 1;
        if !keep {
            pool.release(std::mem::take(p));
        }
        keep
    });
    report.removed = spent.iter().filter(|&&s| s).count();
    state.projectiles = projectiles;

    if report.hits > 0 {
        trace!("Projectile hits: {} ({} spent)", report.hits, report.removed);
    }
    report
}

/// Find the first target `p` overlaps, damage it and record the hit.
/// Returns the damage dealt.
fn strike(
    state: &mut GameState,
    grid: &SpatialGrid,
    candidates: &mut Vec<usize>,
    p: &mut Projectile,
    margin: f32,
) -> Option<f32> {
    grid.query_radius_into(p.pos, p.size + margin, candidates);
    for &idx in candidates.iter() {
        let Some(enemy) = state.enemies.get_mut(idx) else {
            continue;
        };
        if enemy.health <= 0.0 || p.hit_ids.contains(&enemy.id) {
            continue;
        }
        if overlaps(p.pos, p.size, enemy.pos, enemy.size) {
            let damage = p.damage * enemy.vulnerability;
            enemy.health -= damage;
            p.hit_ids.push(enemy.id);
            return Some(damage);
        }
    }

    for node in state.boss_shield_nodes.iter_mut() {
        if node.health <= 0.0 || p.hit_ids.contains(&node.id) {
            continue;
        }
        if overlaps(p.pos, p.size, node.pos, node.size) {
            node.health -= p.damage;
            p.hit_ids.push(node.id);
            return Some(p.damage);
        }
    }

    if let Some(boss) = state.boss.as_mut() {
        if boss.health > 0.0
            && !boss.invulnerable
            && !p.hit_ids.contains(&boss.id)
            && overlaps(p.pos, p.size, boss.pos, boss.size)
        {
            boss.health -= p.damage;
            p.hit_ids.push(boss.id);
            return Some(p.damage);
        }
    }
    None
}

/// Enemies and the boss against the player. Returns true if damage landed.
///
/// Skipped while the player is dashing or in overdrive. Only the first
/// overlapping attacker is considered, and the hit cooldown is shared across
/// all of them.
pub fn resolve_player_hits(
    state: &mut GameState,
    grid: &SpatialGrid,
    stats: &mut SessionStats,
    frame: &Frame,
) -> bool {
    let player = &state.player;
    if player.overdrive_active || player.is_dashing() || state.game_over {
        return false;
    }

    let radius = player.size + frame.tuning.player_query_margin;
    let mut attacker = None;
    for idx in grid.query_radius(player.pos, radius) {
        let Some(enemy) = state.enemies.get(idx) else {
            continue;
        };
        if enemy.health <= 0.0 {
            continue;
        }
        if overlaps(player.pos, player.size, enemy.pos, enemy.size) {
            attacker = Some(enemy.damage);
            break;
        }
    }
    if attacker.is_none() {
        attacker = state
            .boss
            .as_ref()
            .filter(|b| b.health > 0.0 && overlaps(player.pos, player.size, b.pos, b.size))
            .map(|b| b.damage);
    }

    let Some(raw_damage) = attacker else {
        return false;
    };
    if frame.now_ms - state.player.last_hit_ms <= frame.tuning.hit_cooldown_ms {
        return false;
    }

    let taken = raw_damage * (1.0 - frame.player_stats.final_damage_reduction);
    let boss_fight = state.boss.is_some();
    let player = &mut state.player;
    player.health -= taken;
    player.last_hit_ms = frame.now_ms;
    stats.record_damage_taken(taken, state.game_time, boss_fight);
    debug!("Player hit for {:.1}, health {:.1}", taken, player.health);

    if player.health <= 0.0 {
        player.health = 0.0;
        if !state.game_over {
            state.game_over = true;
            state.push_event(GameEvent::GameOver);
            debug!("Player died at game time {:.1}s", state.game_time);
        }
    }
    true
}
