//! Death, expiry and level-up passes

use glam::Vec2;
use log::debug;
use rand::Rng;

use super::events::GameEvent;
use super::pool::{ObjectPool, Pools};
use super::state::{ExpOrb, GameState, Particle, ParticleKind};
use super::stats::SessionStats;
use crate::consts::{EXP_ORB_SIZE, SCORE_PER_KILL};
use crate::tuning::Tuning;

const DEATH_SPARK_LIFE_MS: f32 = 400.0;
const DEATH_SPARK_COLOR: u32 = 0xFF8C1A;

/// Credit, drop and recycle every enemy with no health left.
/// Returns the number of enemies removed.
pub fn process_dead_enemies(
    state: &mut GameState,
    pools: &mut Pools,
    stats: &mut SessionStats,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> usize {
    if state.enemies.iter().all(|e| e.health > 0.0) {
        return 0;
    }

    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| e.health <= 0.0);
    state.enemies = alive;

    let count = dead.len();
    for enemy in dead {
        stats.record_kill(enemy.kind);
        let id = state.next_entity_id();
        state.exp_orbs.push(ExpOrb {
            id,
            pos: enemy.pos,
            size: EXP_ORB_SIZE,
            value: enemy.exp_value,
        });
        state.score += SCORE_PER_KILL;
        emit_burst(
            &mut state.particles,
            &mut pools.particles,
            enemy.pos,
            tuning.death_particles,
            tuning.particle_pool_cap,
            rng,
        );
        pools.enemies.release(enemy);
    }

    debug!("{} enemies died, score {}", count, state.score);
    count
}

/// Spark burst from the particle pool, never growing the live list past `cap`
pub fn emit_burst(
    particles: &mut Vec<Particle>,
    pool: &mut ObjectPool<Particle>,
    pos: Vec2,
    count: usize,
    cap: usize,
    rng: &mut impl Rng,
) {
    let room = cap.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let angle: f32 = rng.random_range(0.0..std::f32::consts::TAU);
        let speed: f32 = rng.random_range(60.0..160.0);
        let mut spark = pool.acquire();
        spark.kind = ParticleKind::Spark;
        spark.pos = pos;
        spark.vel = Some(Vec2::from_angle(angle) * speed);
        spark.life_ms = DEATH_SPARK_LIFE_MS;
        spark.initial_life_ms = DEATH_SPARK_LIFE_MS;
        spark.radius = 3.0;
        spark.color = DEATH_SPARK_COLOR;
        particles.push(spark);
    }
}

/// Drop particles that ran out of life
pub fn expire_particles(state: &mut GameState, pool: &mut ObjectPool<Particle>) {
    state.particles.retain_mut(|p| {
        let keep = p.life_ms > 0.0;
        if !keep {
            pool.release(std::mem::take(p));
        }
        keep
    });
}

/// Drop projectiles that left the padded playfield or whose lifetime ran out
pub fn expire_projectiles(state: &mut GameState, pools: &mut Pools, tuning: &Tuning) {
    let (w, h) = (tuning.playfield_width, tuning.playfield_height);
    state.projectiles.retain_mut(|p| {
        let in_bounds = p.pos.x > -p.size
            && p.pos.x < w + p.size
            && p.pos.y > -p.size
            && p.pos.y < h + p.size;
        let keep = in_bounds && p.lifetime_ms > 0.0;
        if !keep {
            pools.projectiles.release(std::mem::take(p));
        }
        keep
    });
}

/// Spend experience on as many levels as it covers. Returns levels gained.
pub fn check_level_up(state: &mut GameState, stats: &mut SessionStats, tuning: &Tuning) -> u32 {
    let mut gained = 0;
    while state.experience >= state.exp_to_next_level {
        state.level += 1;
        state.experience -= state.exp_to_next_level;
        state.exp_to_next_level =
            (state.exp_to_next_level as f32 * tuning.exp_level_multiplier).floor() as u32;
        // A zero threshold would never stop
        state.exp_to_next_level = state.exp_to_next_level.max(1);
        state.push_event(GameEvent::LevelUp {
            free_upgrade: false,
        });
        gained += 1;
        debug!(
            "Level up to {} (next at {} xp)",
            state.level, state.exp_to_next_level
        );
    }
    stats.level_reached = stats.level_reached.max(state.level);
    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind, PermanentBuffs, Projectile};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(tuning: &Tuning) -> (GameState, Pools, SessionStats, Pcg32) {
        (
            GameState::new(tuning, &PermanentBuffs::default(), "skin_default", 0.0),
            Pools::new(tuning),
            SessionStats::new(0.0, false),
            Pcg32::seed_from_u64(7),
        )
    }

    #[test]
    fn test_dead_enemies_drop_orbs_and_score() {
        let tuning = Tuning::default();
        let (mut state, mut pools, mut stats, mut rng) = setup(&tuning);
        state.enemies.push(Enemy {
            id: 10,
            kind: EnemyKind::Runner,
            pos: Vec2::new(50.0, 60.0),
            health: -3.0,
            exp_value: 8,
            ..Default::default()
        });
        state.enemies.push(Enemy {
            id: 11,
            health: 5.0,
            ..Default::default()
        });

        let removed = process_dead_enemies(&mut state, &mut pools, &mut stats, &tuning, &mut rng);

        assert_eq!(removed, 1);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].id, 11);
        assert_eq!(state.score, 10);
        assert_eq!(stats.total_kills, 1);
        assert_eq!(stats.kills[&EnemyKind::Runner], 1);
        assert_eq!(state.exp_orbs.len(), 1);
        assert_eq!(state.exp_orbs[0].value, 8);
        assert_eq!(state.exp_orbs[0].pos, Vec2::new(50.0, 60.0));
        assert_eq!(state.particles.len(), tuning.death_particles);
        assert_eq!(pools.enemies.len(), 1);
    }

    #[test]
    fn test_burst_respects_particle_cap() {
        let tuning = Tuning::default();
        let (mut state, mut pools, _, mut rng) = setup(&tuning);
        state.particles = vec![Particle::default(); 9];
        emit_burst(&mut state.particles, &mut pools.particles, Vec2::ZERO, 4, 10, &mut rng);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_expiry_filters() {
        let tuning = Tuning::default();
        let (mut state, mut pools, _, _) = setup(&tuning);
        state.particles.push(Particle {
            life_ms: 0.0,
            ..Default::default()
        });
        state.particles.push(Particle {
            life_ms: 1.0,
            ..Default::default()
        });
        let alive = |x: f32, life: f32| Projectile {
            pos: Vec2::new(x, 100.0),
            size: 8.0,
            lifetime_ms: life,
            ..Default::default()
        };
        state.projectiles = vec![
            alive(100.0, 100.0),
            alive(-7.0, 100.0),
            alive(-8.0, 100.0),
            alive(1287.9, 100.0),
            alive(100.0, 0.0),
        ];

        expire_particles(&mut state, &mut pools.particles);
        expire_projectiles(&mut state, &mut pools, &tuning);

        assert_eq!(state.particles.len(), 1);
        let xs: Vec<f32> = state.projectiles.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![100.0, -7.0, 1287.9]);
        assert_eq!(pools.projectiles.len(), 2);
    }

    #[test]
    fn test_level_up_once_at_threshold() {
        let tuning = Tuning::default();
        let (mut state, _, mut stats, _) = setup(&tuning);
        state.experience = 100;

        assert_eq!(check_level_up(&mut state, &mut stats, &tuning), 1);
        assert_eq!(state.level, 2);
        assert_eq!(state.experience, 0);
        assert_eq!(state.exp_to_next_level, 120);
        assert_eq!(
            state.pending_events,
            vec![GameEvent::LevelUp {
                free_upgrade: false
            }]
        );
        assert_eq!(check_level_up(&mut state, &mut stats, &tuning), 0);
    }

    #[test]
    fn test_large_gain_levels_repeatedly() {
        let tuning = Tuning::default();
        let (mut state, _, mut stats, _) = setup(&tuning);
        state.experience = 100 + 120 + 10;
        assert_eq!(check_level_up(&mut state, &mut stats, &tuning), 2);
        assert_eq!(state.level, 3);
        assert_eq!(state.experience, 10);
        assert_eq!(stats.level_reached, 3);
    }
}
