//! Neon Snake - A grid snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, effects, spawning)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (grid preset, evolution ladder)
//! - `web`: wasm bindings for the browser front end

pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{GridPreset, LadderKind, Settings};
pub use tuning::{ConfigError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Base tick interval before speed modifiers (ms)
    pub const INITIAL_TICK_MS: u32 = 150;
    /// Tick interval floor; the speed formula goes negative at high stages
    pub const MIN_TICK_MS: u32 = 40;
    /// Interval reduction while a speed power-up is active (ms)
    pub const SPEED_POWER_UP_BONUS_MS: u32 = 50;
    /// Interval reduction per evolution stage (ms)
    pub const STAGE_SPEED_BONUS_MS: u32 = 20;
    /// Interval reduction granted by the speed_boost ability (ms)
    pub const SPEED_ABILITY_BONUS_MS: u32 = 30;

    /// Starting snake length
    pub const INITIAL_LENGTH: usize = 3;
    /// Points per unit of food value
    pub const POINTS_PER_VALUE: u64 = 10;
    /// Extra tail segments appended by size food
    pub const SIZE_FOOD_EXTRA_SEGMENTS: usize = 2;

    /// Random placement attempts before a spawn gives up
    pub const SPAWN_ATTEMPTS: u32 = 50;
    /// Random cells tried by auto-teleport before giving up
    pub const TELEPORT_ATTEMPTS: u32 = 50;
    /// Manhattan radius of the food magnet
    pub const MAGNET_RADIUS: i32 = 3;

    /// Food items kept on the board at most
    pub const MAX_FOOD: usize = 3;
    /// Per-tick food spawn probability
    pub const FOOD_SPAWN_CHANCE: f64 = 0.3;
    /// Per-tick obstacle spawn probability
    pub const OBSTACLE_SPAWN_CHANCE: f64 = 0.1;
    /// Obstacles never spawn below this level
    pub const OBSTACLE_MIN_LEVEL: u32 = 3;
    /// Share of new obstacles that move
    pub const MOVING_OBSTACLE_CHANCE: f64 = 0.3;
    /// Moving obstacle speed (cells per tick)
    pub const OBSTACLE_SPEED: f32 = 0.1;

    /// Score per level before leveling up
    pub const POINTS_PER_LEVEL: u64 = 200;

    /// Default grid (desktop layout)
    pub const GRID_WIDTH: i32 = 25;
    pub const GRID_HEIGHT: i32 = 20;
}

/// Wrap a coordinate into `[0, size)`
#[inline]
pub fn wrap_coord(value: i32, size: i32) -> i32 {
    value.rem_euclid(size)
}

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: glam::IVec2, b: glam::IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}
