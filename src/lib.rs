//! Horde Sim - per-frame simulation core for a top-down survival action game
//!
//! Core modules:
//! - `sim`: Frame update pipeline (stages, collisions, cleanup, governor)
//! - `tuning`: Data-driven game balance
//! - `clock`: Wall-clock source shared by every stage of a tick
//! - `error`: Error taxonomy for ticks, upgrades and configuration

pub mod clock;
pub mod error;
pub mod sim;
pub mod tuning;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{TickError, TuningError, UpgradeError};
pub use sim::{GameEvent, GameHooks, GameState, SessionStats, Simulation, TickOutcome};
pub use tuning::{BatchPolicy, Tuning};

/// Fixed constants that are not part of the tunable balance data
pub mod consts {
    /// Number of entries in the sin/cos lookup tables (0.1 degree resolution)
    pub const TRIG_TABLE_SIZE: usize = 3600;
    /// Table index scale: `angle * TRIG_INDEX_SCALE` gives the table slot
    pub const TRIG_INDEX_SCALE: f64 = 1800.0 / std::f64::consts::PI;

    /// Maximum trail points a trail-dropping enemy keeps
    pub const TRAIL_LENGTH: usize = 20;

    /// Score awarded for each enemy killed
    pub const SCORE_PER_KILL: u64 = 10;

    /// Damage taken before this much game time also counts toward the early bucket
    pub const EARLY_DAMAGE_WINDOW_SECS: f32 = 300.0;

    /// Size of an experience orb dropped by a dead enemy
    pub const EXP_ORB_SIZE: f32 = 10.0;

    /// Seed used when the host does not provide one
    pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;
}
