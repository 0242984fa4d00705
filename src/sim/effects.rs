//! Timed status effects on enemies and temporary buffs on the player
//!
//! Both follow the same activity rule: active while `now < start + duration`,
//! where the duration may be stretched by a target-specific multiplier.

use serde::{Deserialize, Serialize};

/// Effects applied to enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Slow,
    Freeze,
    Vulnerability,
    Fear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, magnitude: f32, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            kind,
            magnitude,
            start_ms,
            duration_ms,
        }
    }

    #[inline]
    pub fn is_active(&self, now_ms: f64, duration_scale: f32) -> bool {
        now_ms < self.start_ms + self.duration_ms * duration_scale as f64
    }
}

/// What the active effects on one enemy add up to this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSummary {
    /// Lowest active slow magnitude (1.0 when not slowed)
    pub speed_multiplier: f32,
    pub frozen: bool,
    pub feared: bool,
    /// Highest active vulnerability magnitude (1.0 when none)
    pub vulnerability: f32,
}

impl Default for StatusSummary {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            frozen: false,
            feared: false,
            vulnerability: 1.0,
        }
    }
}

/// Drop expired effects and summarize the survivors
pub fn purge_and_summarize(
    effects: &mut Vec<StatusEffect>,
    now_ms: f64,
    duration_scale: f32,
) -> StatusSummary {
    effects.retain(|e| e.is_active(now_ms, duration_scale));

    let mut summary = StatusSummary::default();
    for effect in effects.iter() {
        match effect.kind {
            StatusKind::Slow => {
                summary.speed_multiplier = summary.speed_multiplier.min(effect.magnitude)
            }
            StatusKind::Freeze => summary.frozen = true,
            StatusKind::Vulnerability => {
                summary.vulnerability = summary.vulnerability.max(effect.magnitude)
            }
            StatusKind::Fear => summary.feared = true,
        }
    }
    summary
}

/// Buffs applied to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    MoveSpeed,
    AttackSpeed,
    DamageAmp,
    Regen,
    DamageReduction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryBuff {
    pub kind: BuffKind,
    pub magnitude: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl TemporaryBuff {
    pub fn new(kind: BuffKind, magnitude: f32, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            kind,
            magnitude,
            start_ms,
            duration_ms,
        }
    }

    #[inline]
    pub fn is_active(&self, now_ms: f64) -> bool {
        now_ms < self.start_ms + self.duration_ms
    }
}

/// Player multipliers derived from active buffs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub speed_multiplier: f32,
    pub cooldown_multiplier: f32,
    pub damage_multiplier: f32,
    pub damage_reduction_multiplier: f32,
    pub regen_per_second: f32,
    /// `1 - (1 - base) * damage_reduction_multiplier`
    pub final_damage_reduction: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            cooldown_multiplier: 1.0,
            damage_multiplier: 1.0,
            damage_reduction_multiplier: 1.0,
            regen_per_second: 0.0,
            final_damage_reduction: 0.0,
        }
    }
}

impl PlayerStats {
    pub fn derive(buffs: &[TemporaryBuff], base_damage_reduction: f32, now_ms: f64) -> Self {
        let mut stats = Self::default();
        for buff in buffs.iter().filter(|b| b.is_active(now_ms)) {
            match buff.kind {
                BuffKind::MoveSpeed => stats.speed_multiplier *= buff.magnitude,
                BuffKind::AttackSpeed => stats.cooldown_multiplier *= buff.magnitude,
                BuffKind::DamageAmp => stats.damage_multiplier *= buff.magnitude,
                BuffKind::Regen => stats.regen_per_second += buff.magnitude,
                BuffKind::DamageReduction => stats.damage_reduction_multiplier *= buff.magnitude,
            }
        }
        stats.final_damage_reduction =
            1.0 - (1.0 - base_damage_reduction) * stats.damage_reduction_multiplier;
        stats
    }
}

/// Derived stats reused for a short wall-clock window
#[derive(Debug, Clone, Default)]
pub struct PlayerStatsCache {
    stats: PlayerStats,
    computed_at_ms: Option<f64>,
}

impl PlayerStatsCache {
    pub fn get(
        &mut self,
        buffs: &[TemporaryBuff],
        base_damage_reduction: f32,
        now_ms: f64,
        max_age_ms: f64,
    ) -> PlayerStats {
        if let Some(at) = self.computed_at_ms {
            if now_ms - at < max_age_ms {
                return self.stats;
            }
        }
        self.stats = PlayerStats::derive(buffs, base_damage_reduction, now_ms);
        self.computed_at_ms = Some(now_ms);
        self.stats
    }

    pub fn invalidate(&mut self) {
        self.computed_at_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_active_window() {
        let effect = StatusEffect::new(StatusKind::Slow, 0.5, 1000.0, 500.0);
        assert!(effect.is_active(1499.0, 1.0));
        assert!(!effect.is_active(1501.0, 1.0));
        // Scaled duration
        assert!(effect.is_active(1501.0, 2.0));
        assert!(!effect.is_active(2001.0, 2.0));
    }

    #[test]
    fn test_summary_takes_min_slow_and_max_vulnerability() {
        let mut effects = vec![
            StatusEffect::new(StatusKind::Slow, 0.7, 0.0, 1000.0),
            StatusEffect::new(StatusKind::Slow, 0.4, 0.0, 1000.0),
            StatusEffect::new(StatusKind::Vulnerability, 1.2, 0.0, 1000.0),
            StatusEffect::new(StatusKind::Vulnerability, 1.5, 0.0, 1000.0),
        ];
        let summary = purge_and_summarize(&mut effects, 10.0, 1.0);
        assert_eq!(summary.speed_multiplier, 0.4);
        assert_eq!(summary.vulnerability, 1.5);
        assert!(!summary.frozen);
        assert!(!summary.feared);
    }

    #[test]
    fn test_purge_removes_expired_before_summary() {
        let mut effects = vec![
            StatusEffect::new(StatusKind::Freeze, 1.0, 0.0, 100.0),
            StatusEffect::new(StatusKind::Fear, 1.0, 0.0, 5000.0),
        ];
        let summary = purge_and_summarize(&mut effects, 200.0, 1.0);
        assert_eq!(effects.len(), 1);
        assert!(!summary.frozen);
        assert!(summary.feared);
    }

    #[test]
    fn test_player_stats_multiply_and_sum() {
        let buffs = vec![
            TemporaryBuff::new(BuffKind::MoveSpeed, 1.5, 0.0, 1000.0),
            TemporaryBuff::new(BuffKind::MoveSpeed, 2.0, 0.0, 1000.0),
            TemporaryBuff::new(BuffKind::Regen, 1.0, 0.0, 1000.0),
            TemporaryBuff::new(BuffKind::Regen, 2.5, 0.0, 1000.0),
            TemporaryBuff::new(BuffKind::DamageReduction, 0.5, 0.0, 1000.0),
            TemporaryBuff::new(BuffKind::DamageAmp, 3.0, 0.0, 10.0),
        ];
        let stats = PlayerStats::derive(&buffs, 0.2, 500.0);
        assert_eq!(stats.speed_multiplier, 3.0);
        assert_eq!(stats.regen_per_second, 3.5);
        // Expired damage amp is ignored
        assert_eq!(stats.damage_multiplier, 1.0);
        // 1 - 0.8 * 0.5
        assert!((stats.final_damage_reduction - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_no_buffs_keeps_base_reduction() {
        let stats = PlayerStats::derive(&[], 0.25, 0.0);
        assert!((stats.final_damage_reduction - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_stats_cache_reused_within_window() {
        let mut cache = PlayerStatsCache::default();
        let fast = vec![TemporaryBuff::new(BuffKind::MoveSpeed, 2.0, 0.0, 10_000.0)];

        let first = cache.get(&[], 0.0, 1000.0, 100.0);
        assert_eq!(first.speed_multiplier, 1.0);
        // New buff is not seen until the window passes
        assert_eq!(cache.get(&fast, 0.0, 1050.0, 100.0).speed_multiplier, 1.0);
        assert_eq!(cache.get(&fast, 0.0, 1100.0, 100.0).speed_multiplier, 2.0);

        cache.invalidate();
        assert_eq!(cache.get(&[], 0.0, 1101.0, 100.0).speed_multiplier, 1.0);
    }
}
