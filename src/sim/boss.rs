//! Boss schedule and boss fight
//!
//! Each stage ends with a boss: a warning when the stage timer runs out, the
//! boss and its shield nodes after the warning delay, and a stage clear when
//! the boss dies. The boss cannot be damaged while any node is alive.

use glam::Vec2;
use log::debug;

use super::events::GameEvent;
use super::fast_math;
use super::stages::Frame;
use super::state::{Boss, BossShieldNode, ExpOrb, GameState};
use super::stats::SessionStats;
use crate::consts::{EXP_ORB_SIZE, SCORE_PER_KILL};
use crate::tuning::Tuning;

const BOSS_BASE_HEALTH: f32 = 400.0;
const BOSS_SIZE: f32 = 60.0;
const BOSS_SPEED: f32 = 45.0;
const BOSS_DAMAGE: f32 = 25.0;
const BOSS_EXP: u32 = 100;
const BOSS_SCORE_MULTIPLIER: u64 = 50;
const NODE_HEALTH: f32 = 60.0;
const NODE_SIZE: f32 = 24.0;
/// Node orbit angular speed in radians per millisecond
const NODE_ORBIT_RATE: f64 = 0.001;

/// Raise the warning when the stage timer runs out, then spawn the fight
/// once the warning delay has passed
pub fn advance_schedule(state: &mut GameState, tuning: &Tuning) {
    let stage_end = state.stage as f32 * tuning.stage_duration_secs;
    if !state.boss_event_triggered && state.boss.is_none() && state.game_time >= stage_end {
        state.boss_event_triggered = true;
        state.boss_spawn_at = Some(state.game_time + tuning.boss_warning_secs);
        state.push_event(GameEvent::BossWarning { stage: state.stage });
        debug!("Boss warning for stage {}", state.stage);
    }

    if let Some(at) = state.boss_spawn_at {
        if state.game_time >= at {
            state.boss_spawn_at = None;
            spawn_boss(state, tuning);
            state.push_event(GameEvent::BossFightStart);
        }
    }
}

fn spawn_boss(state: &mut GameState, tuning: &Tuning) {
    let scale = if state.nightmare {
        tuning.nightmare_multiplier
    } else {
        1.0
    };
    let health = BOSS_BASE_HEALTH * state.stage as f32 * scale;
    let pos = Vec2::new(tuning.playfield_width / 2.0, -BOSS_SIZE);
    let id = state.next_entity_id();
    state.boss = Some(Boss {
        id,
        pos,
        health,
        max_health: health,
        size: BOSS_SIZE,
        speed: BOSS_SPEED,
        damage: BOSS_DAMAGE * scale,
        exp_value: BOSS_EXP * state.stage,
        invulnerable: tuning.boss_shield_nodes > 0,
    });

    state.boss_shield_nodes.clear();
    for _ in 0..tuning.boss_shield_nodes {
        let id = state.next_entity_id();
        state.boss_shield_nodes.push(BossShieldNode {
            id,
            pos,
            health: NODE_HEALTH * scale,
            size: NODE_SIZE,
        });
    }
    debug!(
        "Boss {} spawned with {} health and {} shield nodes",
        id,
        health,
        state.boss_shield_nodes.len()
    );
}

/// Chase the player and keep the shield nodes orbiting the boss
pub fn update_boss(state: &mut GameState, frame: &Frame) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    let dir = fast_math::direction(boss.pos, state.player.pos);
    boss.pos += dir * boss.speed * frame.dt;

    let count = state.boss_shield_nodes.len().max(1) as f64;
    let orbit = boss.size;
    let center = boss.pos;
    for (i, node) in state.boss_shield_nodes.iter_mut().enumerate() {
        let angle = (frame.now_ms * NODE_ORBIT_RATE + i as f64 * std::f64::consts::TAU / count)
            .rem_euclid(std::f64::consts::TAU);
        node.pos = center + Vec2::new(fast_math::cos(angle), fast_math::sin(angle)) * orbit;
    }
}

/// Remove destroyed nodes, drop the shield when none remain, and settle a
/// dead boss. Returns true when the stage was cleared.
pub fn resolve_boss_deaths(state: &mut GameState, stats: &mut SessionStats) -> bool {
    state.boss_shield_nodes.retain(|n| n.health > 0.0);
    let nodes_alive = !state.boss_shield_nodes.is_empty();

    let Some(boss) = state.boss.as_mut() else {
        return false;
    };
    if boss.invulnerable && !nodes_alive {
        debug!("Boss shield down");
    }
    boss.invulnerable = nodes_alive;
    if boss.health > 0.0 {
        return false;
    }

    let (pos, exp_value) = (boss.pos, boss.exp_value);
    state.boss = None;
    let id = state.next_entity_id();
    state.exp_orbs.push(ExpOrb {
        id,
        pos,
        size: EXP_ORB_SIZE,
        value: exp_value,
    });
    state.score += SCORE_PER_KILL * BOSS_SCORE_MULTIPLIER;
    stats.bosses_defeated += 1;

    let cleared = state.stage;
    state.push_event(GameEvent::StageClear {
        stage: cleared,
        nightmare: state.nightmare,
    });
    state.stage += 1;
    state.boss_event_triggered = false;
    debug!("Stage {} cleared", cleared);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::PlayerStats;
    use crate::sim::state::PermanentBuffs;

    fn setup(tuning: &Tuning) -> GameState {
        GameState::new(tuning, &PermanentBuffs::default(), "skin_default", 0.0)
    }

    #[test]
    fn test_warning_then_fight() {
        let tuning = Tuning::default();
        let mut state = setup(&tuning);

        state.game_time = 299.0;
        advance_schedule(&mut state, &tuning);
        assert!(state.pending_events.is_empty());

        state.game_time = 300.0;
        advance_schedule(&mut state, &tuning);
        assert_eq!(state.pending_events, vec![GameEvent::BossWarning { stage: 1 }]);
        assert!(state.boss.is_none());

        // Warning is raised only once
        state.game_time = 302.0;
        advance_schedule(&mut state, &tuning);
        assert_eq!(state.pending_events.len(), 1);

        state.game_time = 305.0;
        advance_schedule(&mut state, &tuning);
        assert_eq!(state.pending_events.last(), Some(&GameEvent::BossFightStart));
        assert!(state.boss.as_ref().is_some_and(|b| b.invulnerable));
        assert_eq!(state.boss_shield_nodes.len(), 3);
    }

    #[test]
    fn test_shield_drops_with_last_node() {
        let tuning = Tuning::default();
        let mut state = setup(&tuning);
        state.game_time = 300.0;
        advance_schedule(&mut state, &tuning);
        state.game_time = 305.0;
        advance_schedule(&mut state, &tuning);
        let mut stats = SessionStats::default();

        for node in state.boss_shield_nodes.iter_mut().skip(1) {
            node.health = 0.0;
        }
        assert!(!resolve_boss_deaths(&mut state, &mut stats));
        assert_eq!(state.boss_shield_nodes.len(), 1);
        assert!(state.boss.as_ref().is_some_and(|b| b.invulnerable));

        state.boss_shield_nodes[0].health = -1.0;
        resolve_boss_deaths(&mut state, &mut stats);
        assert!(state.boss.as_ref().is_some_and(|b| !b.invulnerable));
    }

    #[test]
    fn test_boss_death_clears_stage() {
        let tuning = Tuning::default();
        let mut state = setup(&tuning);
        state.nightmare = true;
        state.game_time = 300.0;
        advance_schedule(&mut state, &tuning);
        state.game_time = 305.0;
        advance_schedule(&mut state, &tuning);
        state.boss_shield_nodes.clear();
        if let Some(boss) = state.boss.as_mut() {
            boss.health = 0.0;
        }
        let mut stats = SessionStats::default();

        assert!(resolve_boss_deaths(&mut state, &mut stats));
        assert!(state.boss.is_none());
        assert_eq!(state.stage, 2);
        assert_eq!(stats.bosses_defeated, 1);
        assert_eq!(state.exp_orbs.len(), 1);
        assert_eq!(state.score, 500);
        assert_eq!(
            state.pending_events.last(),
            Some(&GameEvent::StageClear {
                stage: 1,
                nightmare: true
            })
        );

        // Next boss only at the end of stage 2
        state.game_time = 400.0;
        state.pending_events.clear();
        advance_schedule(&mut state, &tuning);
        assert!(state.pending_events.is_empty());
    }

    #[test]
    fn test_boss_chases_and_nodes_orbit() {
        let tuning = Tuning::default();
        let mut state = setup(&tuning);
        state.game_time = 300.0;
        advance_schedule(&mut state, &tuning);
        state.game_time = 305.0;
        advance_schedule(&mut state, &tuning);
        let start = state.boss.as_ref().map(|b| b.pos).unwrap_or_default();

        let frame = Frame::new(1234.0, 1.0, &tuning, PlayerStats::default());
        update_boss(&mut state, &frame);
        let boss = state.boss.as_ref().map(|b| (b.pos, b.size)).unwrap_or_default();
        assert!(boss.0.distance(state.player.pos) < start.distance(state.player.pos));
        for node in &state.boss_shield_nodes {
            assert!((node.pos.distance(boss.0) - boss.1).abs() < 0.5);
        }
    }
}
