//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per scheduler interval, no wall clock
//! - Seeded RNG only, stored in the state
//! - Stable iteration order (insertion order of food and obstacles)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod events;
pub mod evolution;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{MoveResolution, resolve_move};
pub use effects::Modifiers;
pub use events::{DeathCause, GameEvent, SessionSummary, TickOutcome};
pub use evolution::{Ability, EvolutionLadder, EvolutionStage};
pub use state::{
    Counters, Direction, Food, FoodKind, GamePhase, GameState, Grid, Obstacle, PowerUp,
    PowerUpKind, Segment, SegmentKind, Snake,
};
pub use tick::tick;
