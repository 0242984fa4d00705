//! Per-step memo of pairwise distances and directions
//!
//! Keys are the exact bit patterns of both positions, so only identical
//! coordinate pairs hit. Entries are never evicted individually: the whole
//! cache drops once the clear interval has passed. Between clears it grows
//! with every distinct pair looked up.

use std::collections::HashMap;

use glam::Vec2;

use super::fast_math;

type PairKey = [u32; 4];

#[inline]
fn pair_key(a: Vec2, b: Vec2) -> PairKey {
    [a.x.to_bits(), a.y.to_bits(), b.x.to_bits(), b.y.to_bits()]
}

#[derive(Debug)]
pub struct GeometryCache {
    distances: HashMap<PairKey, f32>,
    directions: HashMap<PairKey, Vec2>,
    clear_interval_ms: f64,
    last_clear_ms: f64,
    /// Number of lookups that had to compute (misses)
    computations: u64,
}

impl GeometryCache {
    pub fn new(clear_interval_ms: f64) -> Self {
        Self {
            distances: HashMap::new(),
            directions: HashMap::new(),
            clear_interval_ms,
            last_clear_ms: 0.0,
            computations: 0,
        }
    }

    /// Distance between `a` and `b`, computed at most once per clear window
    pub fn distance(&mut self, a: Vec2, b: Vec2) -> f32 {
        let computations = &mut self.computations;
        *self.distances.entry(pair_key(a, b)).or_insert_with(|| {
            *computations += 1;
            fast_math::distance(a, b)
        })
    }

    /// Unit direction from `from` toward `to` (zero when they coincide)
    pub fn direction(&mut self, from: Vec2, to: Vec2) -> Vec2 {
        let computations = &mut self.computations;
        *self.directions.entry(pair_key(from, to)).or_insert_with(|| {
            *computations += 1;
            fast_math::direction(from, to)
        })
    }

    /// Drop everything if the clear interval has passed since the last drop.
    /// Returns whether a clear happened.
    pub fn clear_if_stale(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_clear_ms > self.clear_interval_ms {
            self.distances.clear();
            self.directions.clear();
            self.last_clear_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Unconditional clear (game reset)
    pub fn reset(&mut self, now_ms: f64) {
        self.distances.clear();
        self.directions.clear();
        self.last_clear_ms = now_ms;
    }

    pub fn len(&self) -> usize {
        self.distances.len() + self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }
}
