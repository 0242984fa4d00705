//! Error types
//!
//! None of these reach the player. Tick errors abandon the working copy and the
//! previous snapshot stays current; upgrade and tuning errors go back to the
//! host that made the call.

/// A failure while building the next snapshot
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    #[error("elapsed time must be finite and non-negative, got {0}")]
    InvalidElapsed(f32),

    #[error("player state became non-finite (x={x}, y={y}, health={health})")]
    NonFinitePlayer { x: f32, y: f32, health: f32 },

    #[error("{kind} {id} has a non-finite position")]
    NonFiniteEntity { kind: &'static str, id: u32 },
}

/// Rejected upgrade application
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    #[error("upgrade '{id}' is already at its max level {max_level}")]
    MaxLevelReached { id: String, max_level: u32 },
}

/// Invalid balance data
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
