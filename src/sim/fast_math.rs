//! Table-driven trig and small vector helpers
//!
//! sin/cos come from 3600-entry tables (0.1 degree steps over one turn).
//! Angles whose slot falls outside the table (negative or non-finite input)
//! read as 0.0 rather than wrapping; callers only feed non-negative phases.

use std::sync::LazyLock;

use glam::Vec2;

use crate::consts::{TRIG_INDEX_SCALE, TRIG_TABLE_SIZE};

/// Precomputed sin/cos tables
pub struct TrigTable {
    sin: Vec<f32>,
    cos: Vec<f32>,
}

impl TrigTable {
    fn build() -> Self {
        let step = |i: usize| i as f64 / TRIG_INDEX_SCALE;
        Self {
            sin: (0..TRIG_TABLE_SIZE).map(|i| step(i).sin() as f32).collect(),
            cos: (0..TRIG_TABLE_SIZE).map(|i| step(i).cos() as f32).collect(),
        }
    }

    #[inline]
    fn slot(angle: f64) -> Option<usize> {
        if !angle.is_finite() {
            return None;
        }
        let index = (angle * TRIG_INDEX_SCALE).floor() % TRIG_TABLE_SIZE as f64;
        (index >= 0.0).then_some(index as usize)
    }

    #[inline]
    pub fn sin(&self, angle: f64) -> f32 {
        Self::slot(angle)
            .and_then(|i| self.sin.get(i).copied())
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn cos(&self, angle: f64) -> f32 {
        Self::slot(angle)
            .and_then(|i| self.cos.get(i).copied())
            .unwrap_or(0.0)
    }
}

static TRIG: LazyLock<TrigTable> = LazyLock::new(TrigTable::build);

/// Lookup-table sine
#[inline]
pub fn sin(angle: f64) -> f32 {
    TRIG.sin(angle)
}

/// Lookup-table cosine
#[inline]
pub fn cos(angle: f64) -> f32 {
    TRIG.cos(angle)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    distance_squared(a, b).sqrt()
}

#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Unit vector in the direction of `v`, or zero for a zero-length input
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 { v / len } else { Vec2::ZERO }
}

/// Unit direction from `from` toward `to`
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    normalize(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_table_matches_std_within_resolution() {
        for deg in [0.0_f64, 30.0, 45.0, 90.0, 180.0, 270.0, 359.0] {
            let rad = deg.to_radians();
            // One slot is 0.1 degrees, so floor() can be off by that much
            assert!((sin(rad) as f64 - rad.sin()).abs() < 2e-3, "sin {deg}");
            assert!((cos(rad) as f64 - rad.cos()).abs() < 2e-3, "cos {deg}");
        }
    }

    #[test]
    fn test_angles_wrap_past_full_turn() {
        let a = 0.5;
        assert!((sin(a + 2.0 * PI) - sin(a)).abs() < 2e-3);
        assert!((sin(a + 200.0 * PI) - sin(a)).abs() < 2e-3);
    }

    #[test]
    fn test_out_of_table_angles_read_zero() {
        assert_eq!(sin(-0.5), 0.0);
        assert_eq!(cos(-0.5), 0.0);
        assert_eq!(sin(f64::NAN), 0.0);
        assert_eq!(cos(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Vec2::new(12.5, -3.0);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_direction_points_at_target() {
        let d = direction(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
        assert!((d - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(
            ax in -1e4f32..1e4, ay in -1e4f32..1e4,
            bx in -1e4f32..1e4, by in -1e4f32..1e4,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(distance(a, b), distance(b, a));
            prop_assert_eq!(distance_squared(a, b), distance_squared(b, a));
        }

        #[test]
        fn prop_normalize_has_unit_length(x in -1e4f32..1e4, y in -1e4f32..1e4) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > 1e-3);
            prop_assert!((normalize(v).length() - 1.0).abs() < 1e-5);
        }
    }
}
