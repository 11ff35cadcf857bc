//! Outbound notifications for renderers and the stats collaborator

use serde::{Deserialize, Serialize};

use super::state::{FoodKind, PowerUpKind};

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Wall,
    SelfCollision,
    Obstacle,
}

/// Final numbers of a finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub score: u64,
    pub stage: u32,
    pub length: usize,
    pub level: u32,
    pub elapsed_ticks: u64,
    /// Engine-side play time (sum of tick intervals)
    pub elapsed_ms: u64,
    pub food_eaten: u32,
    pub power_ups_granted: u32,
    pub cause: DeathCause,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    FoodEaten { kind: FoodKind },
    PowerUpGranted { kind: PowerUpKind },
    EvolutionReached { stage: u32 },
    LevelUp { level: u32 },
    GameOver { summary: SessionSummary },
}

/// Result of a single [`tick`](super::tick::tick)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved and the session goes on
    Continue,
    /// Paused or already over; nothing changed
    Idle,
    GameOver(SessionSummary),
}
