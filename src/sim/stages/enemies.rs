//! Enemy stage: status effects, kind hooks and chase movement

use super::Frame;
use crate::sim::batch::{BatchKind, BatchScheduler};
use crate::sim::behavior::behavior;
use crate::sim::effects::purge_and_summarize;
use crate::sim::fast_math;
use crate::sim::spatial::SpatialGrid;
use crate::sim::state::GameState;

/// Rebuild the grid from living enemies, then update this tick's batch
pub fn update_enemies(
    state: &mut GameState,
    grid: &mut SpatialGrid,
    batch: &mut BatchScheduler,
    frame: &Frame,
) {
    grid.rebuild(&state.enemies);

    let now = frame.now_ms;
    let dt = frame.dt;
    let target = state.player.pos;
    let duration_scale = state.player.status_effect_duration;

    batch.process(BatchKind::Enemies, &mut state.enemies, |enemy| {
        if enemy.health <= 0.0 {
            return;
        }

        let summary = purge_and_summarize(&mut enemy.status_effects, now, duration_scale);
        enemy.vulnerability = summary.vulnerability;

        let kind = behavior(enemy.kind);
        kind.special.apply(enemy, now);

        if summary.frozen || !enemy.visible {
            return;
        }
        let speed = enemy.speed * summary.speed_multiplier;
        let direction = if summary.feared {
            fast_math::direction(target, enemy.pos)
        } else {
            fast_math::direction(enemy.pos, target)
        };
        let drift = kind.special.drift(enemy, direction, now);
        enemy.pos += (direction * speed + drift) * dt;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::{PlayerStats, StatusEffect, StatusKind};
    use crate::sim::state::{Enemy, EnemyKind, PermanentBuffs};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn setup() -> (GameState, SpatialGrid, BatchScheduler, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning, &PermanentBuffs::default(), "skin_default", 0.0);
        state.player.pos = Vec2::new(500.0, 100.0);
        (
            state,
            SpatialGrid::new(tuning.spatial_cell_size),
            BatchScheduler::new(&tuning),
            tuning,
        )
    }

    fn grunt(id: u32, x: f32, y: f32) -> Enemy {
        Enemy {
            id,
            kind: EnemyKind::Grunt,
            pos: Vec2::new(x, y),
            health: 10.0,
            speed: 100.0,
            size: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_chases_player() {
        let (mut state, mut grid, mut batch, tuning) = setup();
        state.enemies.push(grunt(5, 100.0, 100.0));
        let frame = Frame::new(1000.0, 0.5, &tuning, PlayerStats::default());
        update_enemies(&mut state, &mut grid, &mut batch, &frame);
        assert!((state.enemies[0].pos.x - 150.0).abs() < 1e-3);
        assert!((state.enemies[0].pos.y - 100.0).abs() < 1e-3);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_slow_freeze_and_fear() {
        let (mut state, mut grid, mut batch, tuning) = setup();
        let mut slowed = grunt(1, 100.0, 100.0);
        slowed
            .status_effects
            .push(StatusEffect::new(StatusKind::Slow, 0.5, 0.0, 10_000.0));
        let mut frozen = grunt(2, 100.0, 200.0);
        frozen
            .status_effects
            .push(StatusEffect::new(StatusKind::Freeze, 1.0, 0.0, 10_000.0));
        let mut feared = grunt(3, 400.0, 100.0);
        feared
            .status_effects
            .push(StatusEffect::new(StatusKind::Fear, 1.0, 0.0, 10_000.0));
        feared
            .status_effects
            .push(StatusEffect::new(StatusKind::Vulnerability, 1.5, 0.0, 10_000.0));
        state.enemies.extend([slowed, frozen, feared]);

        let frame = Frame::new(1000.0, 1.0, &tuning, PlayerStats::default());
        update_enemies(&mut state, &mut grid, &mut batch, &frame);

        assert!((state.enemies[0].pos.x - 150.0).abs() < 1e-3);
        assert_eq!(state.enemies[1].pos, Vec2::new(100.0, 200.0));
        assert!((state.enemies[2].pos.x - 300.0).abs() < 1e-3);
        assert_eq!(state.enemies[2].vulnerability, 1.5);
    }

    #[test]
    fn test_expired_effects_are_purged() {
        let (mut state, mut grid, mut batch, tuning) = setup();
        let mut enemy = grunt(1, 100.0, 100.0);
        enemy
            .status_effects
            .push(StatusEffect::new(StatusKind::Freeze, 1.0, 0.0, 500.0));
        state.enemies.push(enemy);

        let frame = Frame::new(1000.0, 0.1, &tuning, PlayerStats::default());
        update_enemies(&mut state, &mut grid, &mut batch, &frame);
        assert!(state.enemies[0].status_effects.is_empty());
        assert!(state.enemies[0].pos.x > 100.0);
    }

    #[test]
    fn test_dead_and_hidden_enemies_hold_still() {
        let (mut state, mut grid, mut batch, tuning) = setup();
        let mut dead = grunt(1, 100.0, 100.0);
        dead.health = 0.0;
        let mut hidden = grunt(2, 100.0, 300.0);
        hidden.kind = EnemyKind::Cloaker;
        hidden.visible = false;
        hidden.cloak_toggle_ms = 5000.0;
        state.enemies.extend([dead, hidden]);

        let frame = Frame::new(1000.0, 1.0, &tuning, PlayerStats::default());
        update_enemies(&mut state, &mut grid, &mut batch, &frame);
        assert_eq!(state.enemies[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(state.enemies[1].pos, Vec2::new(100.0, 300.0));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_batch_cap_limits_updates() {
        let (mut state, mut grid, mut batch, tuning) = setup();
        batch.set_cap(BatchKind::Enemies, 1);
        state.enemies.push(grunt(1, 100.0, 100.0));
        state.enemies.push(grunt(2, 100.0, 100.0));

        let frame = Frame::new(1000.0, 1.0, &tuning, PlayerStats::default());
        update_enemies(&mut state, &mut grid, &mut batch, &frame);
        assert!(state.enemies[0].pos.x > 100.0);
        assert_eq!(state.enemies[1].pos.x, 100.0);
    }
}
