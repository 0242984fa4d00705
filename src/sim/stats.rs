//! Per-session statistics
//!
//! Owned by the simulation for one play session and cleared on reset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::EnemyKind;
use crate::consts::EARLY_DAMAGE_WINDOW_SECS;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub kills: BTreeMap<EnemyKind, u32>,
    pub total_kills: u32,
    pub damage_taken: f32,
    /// Damage taken while game time was under five minutes
    pub damage_taken_first_5_minutes: f32,
    pub damage_taken_during_boss: f32,
    /// Keyed by weapon name
    pub damage_dealt_by_weapon: BTreeMap<String, f32>,
    pub level_reached: u32,
    pub time_survived: f32,
    pub score: u64,
    pub dash_used: bool,
    pub total_dashes: u32,
    pub time_without_moving_ms: f64,
    pub last_move_ms: f64,
    pub total_xp_orbs_collected: u32,
    pub health_pickups_collected: u32,
    pub bosses_defeated: u32,
    pub evolved_weapons: Vec<String>,
    pub nightmare: bool,
}

impl SessionStats {
    pub fn new(now_ms: f64, nightmare: bool) -> Self {
        Self {
            kills: EnemyKind::ALL.iter().map(|&k| (k, 0)).collect(),
            level_reached: 1,
            last_move_ms: now_ms,
            nightmare,
            ..Default::default()
        }
    }

    pub fn record_kill(&mut self, kind: EnemyKind) {
        *self.kills.entry(kind).or_insert(0) += 1;
        self.total_kills += 1;
    }

    pub fn record_damage_taken(&mut self, amount: f32, game_time: f32, boss_fight: bool) {
        self.damage_taken += amount;
        if game_time < EARLY_DAMAGE_WINDOW_SECS {
            self.damage_taken_first_5_minutes += amount;
        }
        if boss_fight {
            self.damage_taken_during_boss += amount;
        }
    }

    pub fn record_damage_dealt(&mut self, weapon: &str, amount: f32) {
        *self
            .damage_dealt_by_weapon
            .entry(weapon.to_string())
            .or_insert(0.0) += amount;
    }

    pub fn record_dash(&mut self) {
        self.dash_used = true;
        self.total_dashes += 1;
    }

    /// Movement tracking from wall-clock time
    pub fn track_movement(&mut self, moved: bool, now_ms: f64) {
        if moved {
            self.last_move_ms = now_ms;
            self.time_without_moving_ms = 0.0;
        } else {
            self.time_without_moving_ms = now_ms - self.last_move_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_zero_kills_for_every_kind() {
        let stats = SessionStats::new(0.0, false);
        assert_eq!(stats.kills.len(), EnemyKind::ALL.len());
        assert!(stats.kills.values().all(|&k| k == 0));
        assert_eq!(stats.level_reached, 1);
    }

    #[test]
    fn test_early_damage_bucket() {
        let mut stats = SessionStats::default();
        stats.record_damage_taken(10.0, 299.0, false);
        stats.record_damage_taken(5.0, 300.0, true);
        assert_eq!(stats.damage_taken, 15.0);
        assert_eq!(stats.damage_taken_first_5_minutes, 10.0);
        assert_eq!(stats.damage_taken_during_boss, 5.0);
    }

    #[test]
    fn test_time_without_moving() {
        let mut stats = SessionStats::new(1000.0, false);
        stats.track_movement(false, 1500.0);
        assert_eq!(stats.time_without_moving_ms, 500.0);
        stats.track_movement(true, 1600.0);
        assert_eq!(stats.time_without_moving_ms, 0.0);
        stats.track_movement(false, 1700.0);
        assert_eq!(stats.time_without_moving_ms, 100.0);
    }

    #[test]
    fn test_kills_and_weapon_damage() {
        let mut stats = SessionStats::default();
        stats.record_kill(EnemyKind::Runner);
        stats.record_kill(EnemyKind::Runner);
        stats.record_damage_dealt("pulse_blaster", 4.0);
        stats.record_damage_dealt("pulse_blaster", 6.0);
        assert_eq!(stats.kills[&EnemyKind::Runner], 2);
        assert_eq!(stats.total_kills, 2);
        assert_eq!(stats.damage_dealt_by_weapon["pulse_blaster"], 10.0);
    }
}
