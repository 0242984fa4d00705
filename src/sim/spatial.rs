//! Uniform grid over live enemies
//!
//! Rebuilt from scratch every tick and stores indices into the enemy list.
//! A radius query returns every index in a square block of cells around the
//! query point, one cell wider than the radius needs. Results are a superset
//! of the exact circle; callers do the exact distance test.

use std::collections::HashMap;

use glam::Vec2;

use super::state::Enemy;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    #[inline]
    fn cell_key(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let key = self.cell_key(pos);
        self.cells.entry(key).or_default().push(index);
    }

    /// Clear and re-register every enemy with health left
    pub fn rebuild(&mut self, enemies: &[Enemy]) {
        self.clear();
        for (i, enemy) in enemies.iter().enumerate() {
            if enemy.health > 0.0 {
                self.insert(i, enemy.pos);
            }
        }
    }

    /// Indices in cells overlapping the padded square around `pos`
    pub fn query_radius(&self, pos: Vec2, radius: f32) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_radius_into(pos, radius, &mut out);
        out
    }

    /// Same as [`query_radius`](Self::query_radius) into a reused buffer
    pub fn query_radius_into(&self, pos: Vec2, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let reach = ((radius / self.cell_size).ceil() as i64).saturating_add(1);
        let (cx, cy) = self.cell_key(pos);
        // Keys saturate at the i32 edges, so the block is clamped there too
        let span = |c: i32| {
            let lo = (c as i64).saturating_sub(reach).max(i32::MIN as i64);
            let hi = (c as i64).saturating_add(reach).min(i32::MAX as i64);
            (lo as i32, hi as i32)
        };
        let ((x0, x1), (y0, y1)) = (span(cx), span(cy));
        let block = (x1 as i64 - x0 as i64 + 1).saturating_mul(y1 as i64 - y0 as i64 + 1);
        if block > self.cells.len() as i64 {
            // Fewer occupied cells than cells in the block: walk those instead,
            // in the same column-major order as the block walk
            let mut hit: Vec<_> = self
                .cells
                .iter()
                .filter(|&(&(ix, iy), _)| (x0..=x1).contains(&ix) && (y0..=y1).contains(&iy))
                .collect();
            hit.sort_unstable_by_key(|&(&key, _)| key);
            for (_, ids) in hit {
                out.extend_from_slice(ids);
            }
            return;
        }
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                if let Some(ids) = self.cells.get(&(ix, iy)) {
                    out.extend_from_slice(ids);
                }
            }
        }
    }

    /// Number of indices currently stored
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
