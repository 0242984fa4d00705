//! Free lists for short-lived entities
//!
//! Released entities are wiped before they go back on the list, so nothing
//! acquired later carries a previous owner's fields. A full list drops the
//! surplus instead of growing past its ceiling.

use super::state::{Enemy, Particle, Projectile};
use crate::tuning::Tuning;

/// An entity that can be wiped back to its blank state for reuse
pub trait Poolable: Default {
    /// Reset every field. Implementations may keep heap capacity.
    fn wipe(&mut self);
}

#[derive(Debug)]
pub struct ObjectPool<T> {
    free: Vec<T>,
    capacity: usize,
}

impl<T: Poolable> ObjectPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Pop a blank entity, or build a fresh one if the list is empty
    pub fn acquire(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Wipe and keep the entity if there is room. Returns false when dropped.
    pub fn release(&mut self, mut item: T) -> bool {
        if self.free.len() >= self.capacity {
            return false;
        }
        item.wipe();
        self.free.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One pool per pooled entity kind
#[derive(Debug)]
pub struct Pools {
    pub particles: ObjectPool<Particle>,
    pub projectiles: ObjectPool<Projectile>,
    pub enemies: ObjectPool<Enemy>,
}

impl Pools {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            particles: ObjectPool::new(tuning.particle_pool_cap),
            projectiles: ObjectPool::new(tuning.projectile_pool_cap),
            enemies: ObjectPool::new(tuning.enemy_pool_cap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::{StatusEffect, StatusKind};
    use crate::sim::state::EnemyKind;
    use glam::Vec2;

    #[test]
    fn test_release_then_acquire_returns_blank_enemy() {
        let mut pool: ObjectPool<Enemy> = ObjectPool::new(4);
        let mut enemy = pool.acquire();
        enemy.id = 42;
        enemy.kind = EnemyKind::Trailer;
        enemy.pos = Vec2::new(10.0, 20.0);
        enemy.health = 3.0;
        enemy.status_effects.push(StatusEffect::new(StatusKind::Slow, 0.5, 0.0, 1000.0));
        enemy.trail.push_back(Default::default());

        assert!(pool.release(enemy));
        let reused = pool.acquire();
        assert_eq!(reused, Enemy::default());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_release_then_acquire_returns_blank_projectile() {
        let mut pool: ObjectPool<Projectile> = ObjectPool::new(1);
        let mut p = pool.acquire();
        p.id = 7;
        p.hit_ids.extend([1, 2, 3]);
        p.seeking = true;
        p.target_id = Some(9);
        pool.release(p);
        assert_eq!(pool.acquire(), Projectile::default());
    }

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut pool: ObjectPool<Particle> = ObjectPool::new(3);
        for _ in 0..10 {
            pool.release(Particle::default());
            assert!(pool.len() <= pool.capacity());
        }
        assert_eq!(pool.len(), 3);
        assert!(!pool.release(Particle::default()));
    }

    #[test]
    fn test_acquire_from_empty_allocates() {
        let mut pool: ObjectPool<Particle> = ObjectPool::new(2);
        assert!(pool.is_empty());
        assert_eq!(pool.acquire(), Particle::default());
    }

    #[test]
    fn test_pools_use_tuned_ceilings() {
        let pools = Pools::new(&Tuning::default());
        assert_eq!(pools.particles.capacity(), 200);
        assert_eq!(pools.projectiles.capacity(), 100);
        assert_eq!(pools.enemies.capacity(), 50);
    }
}
