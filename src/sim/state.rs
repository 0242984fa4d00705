//! Game state and entity types
//!
//! One `GameState` is live at a time. Each tick clones it, mutates the clone
//! and publishes the clone only if every stage succeeded.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{StatusEffect, TemporaryBuff};
use super::events::GameEvent;
use super::pool::Poolable;
use crate::error::TickError;
use crate::tuning::Tuning;

/// Keys the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Dash,
    Pause,
}

impl Key {
    /// Map a host key name (case-insensitive) to a key
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Up),
            "s" | "arrowdown" => Some(Key::Down),
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            " " | "space" => Some(Key::Dash),
            "p" | "escape" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Currently held keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dash: bool,
}

impl InputState {
    pub fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Dash => self.dash = down,
            Key::Pause => {}
        }
    }

    pub fn any_movement(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Raw (unnormalized) movement axis, +y is down
    pub fn movement_axis(&self) -> Vec2 {
        let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
        Vec2::new(axis(self.right, self.left), axis(self.down, self.up))
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// Dash state machine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DashState {
    #[default]
    Idle,
    Dashing {
        until_ms: f64,
    },
}

/// Long-lived stat bonuses supplied by the host at reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermanentBuffs {
    pub max_health_bonus: f32,
    pub speed_multiplier: f32,
    pub damage_multiplier: f32,
    pub damage_reduction: f32,
    pub pickup_radius_bonus: f32,
    pub dash_cooldown_modifier: f32,
    pub dash_duration_modifier: f32,
    pub status_effect_duration: f32,
    pub initial_level: u32,
}

impl Default for PermanentBuffs {
    fn default() -> Self {
        Self {
            max_health_bonus: 0.0,
            speed_multiplier: 1.0,
            damage_multiplier: 1.0,
            damage_reduction: 0.0,
            pickup_radius_bonus: 0.0,
            dash_cooldown_modifier: 1.0,
            dash_duration_modifier: 1.0,
            status_effect_duration: 1.0,
            initial_level: 1,
        }
    }
}

impl PermanentBuffs {
    /// Stack two bonus sets: additive bonuses add, multipliers multiply,
    /// reductions stack multiplicatively on the damage that gets through.
    pub fn combine(&self, other: &PermanentBuffs) -> PermanentBuffs {
        PermanentBuffs {
            max_health_bonus: self.max_health_bonus + other.max_health_bonus,
            speed_multiplier: self.speed_multiplier * other.speed_multiplier,
            damage_multiplier: self.damage_multiplier * other.damage_multiplier,
            damage_reduction: 1.0
                - (1.0 - self.damage_reduction) * (1.0 - other.damage_reduction),
            pickup_radius_bonus: self.pickup_radius_bonus + other.pickup_radius_bonus,
            dash_cooldown_modifier: self.dash_cooldown_modifier * other.dash_cooldown_modifier,
            dash_duration_modifier: self.dash_duration_modifier * other.dash_duration_modifier,
            status_effect_duration: self.status_effect_duration * other.status_effect_duration,
            initial_level: self.initial_level.max(other.initial_level),
        }
    }
}

/// An auto-firing weapon slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: u32,
    pub name: String,
    pub level: u32,
    pub damage: f32,
    pub cooldown_ms: f64,
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub pierce: u32,
    pub lifetime_ms: f32,
    pub range: f32,
    pub seeking: bool,
    pub last_fired_ms: f64,
}

impl Weapon {
    /// The weapon every run starts with
    pub fn starter(id: u32) -> Self {
        Self {
            id,
            name: "pulse_blaster".to_string(),
            level: 1,
            damage: 10.0,
            cooldown_ms: 800.0,
            projectile_speed: 320.0,
            projectile_size: 8.0,
            pierce: 0,
            lifetime_ms: 2000.0,
            range: 400.0,
            seeking: true,
            last_fired_ms: 0.0,
        }
    }
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage_multiplier: f32,
    /// Base damage reduction before temporary buffs (0..1)
    pub damage_reduction: f32,
    pub pickup_radius: f32,
    pub last_hit_ms: f64,
    pub dash: DashState,
    pub dash_cooldown_until_ms: f64,
    pub dash_direction: Vec2,
    pub last_move_direction: Vec2,
    pub dash_cooldown_modifier: f32,
    pub dash_duration_modifier: f32,
    /// Stretches status effects this player applies
    pub status_effect_duration: f32,
    /// Invulnerable while active
    pub overdrive_active: bool,
    pub temporary_buffs: Vec<TemporaryBuff>,
    pub weapons: Vec<Weapon>,
    pub skin_id: String,
    pub initial_level: u32,
}

impl Player {
    pub fn new(id: u32, tuning: &Tuning, buffs: &PermanentBuffs, skin_id: &str) -> Self {
        let max_health = tuning.player_base_health + buffs.max_health_bonus;
        Self {
            id,
            pos: Vec2::new(tuning.playfield_width / 2.0, tuning.playfield_height / 2.0),
            size: tuning.player_size,
            health: max_health,
            max_health,
            speed: tuning.player_base_speed * buffs.speed_multiplier,
            damage_multiplier: buffs.damage_multiplier,
            damage_reduction: buffs.damage_reduction.clamp(0.0, 1.0),
            pickup_radius: tuning.pickup_radius + buffs.pickup_radius_bonus,
            last_hit_ms: f64::NEG_INFINITY,
            dash: DashState::Idle,
            dash_cooldown_until_ms: 0.0,
            dash_direction: Vec2::X,
            last_move_direction: Vec2::X,
            dash_cooldown_modifier: buffs.dash_cooldown_modifier,
            dash_duration_modifier: buffs.dash_duration_modifier,
            status_effect_duration: buffs.status_effect_duration,
            overdrive_active: false,
            temporary_buffs: Vec::new(),
            weapons: Vec::new(),
            skin_id: skin_id.to_string(),
            initial_level: buffs.initial_level.max(1),
        }
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        matches!(self.dash, DashState::Dashing { .. })
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Apply a run modifier by id. Returns false for unknown ids.
    pub fn apply_modifier(&mut self, id: &str) -> bool {
        match id {
            "glass_cannon" => {
                self.max_health *= 0.5;
                self.health = self.max_health;
                self.damage_multiplier *= 1.5;
            }
            "fortified" => {
                self.speed *= 0.8;
                self.damage_reduction = 1.0 - (1.0 - self.damage_reduction) * 0.8;
            }
            "hasty" => {
                self.speed *= 1.25;
                self.max_health *= 0.8;
                self.health = self.max_health;
            }
            _ => return false,
        }
        true
    }
}

/// Enemy kinds. Kind-specific behavior lives in the behavior table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum EnemyKind {
    #[default]
    Grunt,
    Runner,
    Tank,
    /// Leaves a trail of timestamped points
    Trailer,
    /// Toggles visibility on a timer
    Cloaker,
    /// Weaves side to side while approaching
    Weaver,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Grunt,
        EnemyKind::Runner,
        EnemyKind::Tank,
        EnemyKind::Trailer,
        EnemyKind::Cloaker,
        EnemyKind::Weaver,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub created_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub size: f32,
    pub damage: f32,
    pub exp_value: u32,
    pub status_effects: Vec<StatusEffect>,
    /// Damage multiplier from the strongest active vulnerability
    pub vulnerability: f32,
    pub visible: bool,
    pub cloak_toggle_ms: f64,
    pub trail: VecDeque<TrailPoint>,
    pub last_trail_drop_ms: f64,
    pub wave_offset: f32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            id: 0,
            kind: EnemyKind::default(),
            pos: Vec2::ZERO,
            health: 0.0,
            max_health: 0.0,
            speed: 0.0,
            size: 0.0,
            damage: 0.0,
            exp_value: 0,
            status_effects: Vec::new(),
            vulnerability: 1.0,
            visible: true,
            cloak_toggle_ms: 0.0,
            trail: VecDeque::new(),
            last_trail_drop_ms: 0.0,
            wave_offset: 0.0,
        }
    }
}

impl Poolable for Enemy {
    fn wipe(&mut self) {
        let mut effects = std::mem::take(&mut self.status_effects);
        let mut trail = std::mem::take(&mut self.trail);
        effects.clear();
        trail.clear();
        *self = Self {
            status_effects: effects,
            trail,
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub damage: f32,
    pub lifetime_ms: f32,
    /// Extra hits allowed before removal
    pub pierce: u32,
    /// Ids of targets this projectile already damaged
    pub hit_ids: Vec<u32>,
    pub seeking: bool,
    pub target_id: Option<u32>,
    pub base_speed: f32,
    pub weapon_id: Option<u32>,
}

impl Poolable for Projectile {
    fn wipe(&mut self) {
        let mut hit_ids = std::mem::take(&mut self.hit_ids);
        hit_ids.clear();
        *self = Self {
            hit_ids,
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleKind {
    #[default]
    Spark,
    /// Expanding ring whose radius tracks elapsed life
    Pulse,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Option<Vec2>,
    pub life_ms: f32,
    pub initial_life_ms: f32,
    pub radius: f32,
    pub target_radius: f32,
    pub color: u32,
}

impl Poolable for Particle {
    fn wipe(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpOrb {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPickup {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub heal: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub size: f32,
    pub speed: f32,
    pub damage: f32,
    pub exp_value: u32,
    /// Set while any shield node is alive
    pub invulnerable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossShieldNode {
    pub id: u32,
    pub pos: Vec2,
    pub health: f32,
    pub size: f32,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub exp_orbs: Vec<ExpOrb>,
    pub health_pickups: Vec<HealthPickup>,
    pub boss: Option<Boss>,
    pub boss_shield_nodes: Vec<BossShieldNode>,
    pub score: u64,
    pub experience: u32,
    pub level: u32,
    pub exp_to_next_level: u32,
    /// Seconds of simulated play
    pub game_time: f32,
    pub paused: bool,
    pub game_over: bool,
    pub keys: InputState,
    pub next_enemy_spawn_ms: f64,
    pub next_health_pickup_ms: f64,
    pub boss_event_triggered: bool,
    /// Game time at which the announced boss arrives
    pub boss_spawn_at: Option<f32>,
    pub stage: u32,
    pub nightmare: bool,
    pub modifier_ids: Vec<String>,
    /// Events raised by the tick being built, delivered after commit
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh run state. `now_ms` seeds the spawn timers.
    pub fn new(tuning: &Tuning, buffs: &PermanentBuffs, skin_id: &str, now_ms: f64) -> Self {
        let mut state = Self {
            player: Player::new(1, tuning, buffs, skin_id),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            exp_orbs: Vec::new(),
            health_pickups: Vec::new(),
            boss: None,
            boss_shield_nodes: Vec::new(),
            score: 0,
            experience: 0,
            level: 1,
            exp_to_next_level: tuning.initial_exp_to_next_level,
            game_time: 0.0,
            paused: false,
            game_over: false,
            keys: InputState::default(),
            next_enemy_spawn_ms: now_ms + tuning.enemy_spawn_initial_delay_ms,
            next_health_pickup_ms: now_ms + tuning.health_pickup_interval_min_ms,
            boss_event_triggered: false,
            boss_spawn_at: None,
            stage: 1,
            nightmare: false,
            modifier_ids: Vec::new(),
            pending_events: Vec::new(),
            next_id: 2,
        };

        state.level = state.player.initial_level;
        state.exp_to_next_level = tuning.exp_threshold_for_level(state.level);
        let weapon_id = state.next_entity_id();
        state.player.weapons.push(Weapon::starter(weapon_id));
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Position of a live seek target with this id: an enemy, a vulnerable
    /// boss, or a shield node.
    pub fn seek_target(&self, id: u32) -> Option<Vec2> {
        if let Some(enemy) = self.enemies.iter().find(|e| e.id == id && e.health > 0.0) {
            return Some(enemy.pos);
        }
        if let Some(boss) = &self.boss {
            if boss.id == id && boss.health > 0.0 && !boss.invulnerable {
                return Some(boss.pos);
            }
        }
        self.boss_shield_nodes
            .iter()
            .find(|n| n.id == id && n.health > 0.0)
            .map(|n| n.pos)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Reject a working copy that picked up non-finite values
    pub fn validate(&self) -> Result<(), TickError> {
        let p = &self.player;
        if !(p.pos.is_finite() && p.health.is_finite()) {
            return Err(TickError::NonFinitePlayer {
                x: p.pos.x,
                y: p.pos.y,
                health: p.health,
            });
        }
        if let Some(e) = self.enemies.iter().find(|e| !e.pos.is_finite()) {
            return Err(TickError::NonFiniteEntity {
                kind: "enemy",
                id: e.id,
            });
        }
        if let Some(pr) = self.projectiles.iter().find(|p| !p.pos.is_finite()) {
            return Err(TickError::NonFiniteEntity {
                kind: "projectile",
                id: pr.id,
            });
        }
        if let Some(boss) = self.boss.as_ref().filter(|b| !b.pos.is_finite()) {
            return Err(TickError::NonFiniteEntity {
                kind: "boss",
                id: boss.id,
            });
        }
        Ok(())
    }
}
