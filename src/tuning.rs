//! Data-driven game balance
//!
//! Every number the simulation uses beyond the grid itself lives in
//! [`Tuning`], so variants of the game are JSON files rather than code paths.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::evolution::EvolutionLadder;
use crate::sim::state::{FoodKind, PowerUpKind};

/// Errors raised while building or loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small (minimum 4x1)")]
    InvalidGrid { width: i32, height: i32 },
    #[error("invalid tuning value: {0}")]
    InvalidValue(&'static str),
    #[error("evolution ladder must contain at least one stage")]
    EmptyLadder,
    #[error("evolution stage 0 must start at length 0, not {0}")]
    LadderStartsAboveZero(usize),
    #[error("stage {stage} threshold {threshold} must exceed previous threshold {previous}")]
    UnorderedLadder {
        stage: usize,
        threshold: usize,
        previous: usize,
    },
    #[error("failed to parse tuning: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row of the food table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodSpec {
    pub kind: FoodKind,
    pub value: u32,
    /// Independent spawn probability, tested in table order
    pub chance: f64,
}

/// Lifetime of each timed power-up (ticks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpDurations {
    pub speed: u32,
    pub shield: u32,
    pub teleport: u32,
}

impl Default for PowerUpDurations {
    fn default() -> Self {
        Self {
            speed: 300,
            shield: 200,
            teleport: 400,
        }
    }
}

impl PowerUpDurations {
    /// `None` for instant effects
    pub fn for_kind(&self, kind: PowerUpKind) -> Option<u32> {
        match kind {
            PowerUpKind::Speed => Some(self.speed),
            PowerUpKind::Shield => Some(self.shield),
            PowerUpKind::Teleport => Some(self.teleport),
            PowerUpKind::Size => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Food table in spawn priority order
    pub food: Vec<FoodSpec>,
    pub power_up_ticks: PowerUpDurations,
    pub ladder: EvolutionLadder,

    // === Speed ===
    pub base_tick_ms: u32,
    pub min_tick_ms: u32,
    pub speed_power_up_bonus_ms: u32,
    pub stage_speed_bonus_ms: u32,
    pub speed_ability_bonus_ms: u32,

    // === Spawning ===
    pub max_food: usize,
    pub food_spawn_chance: f64,
    pub obstacle_spawn_chance: f64,
    pub obstacle_min_level: u32,
    pub moving_obstacle_chance: f64,
    pub obstacle_speed: f32,
    pub spawn_attempts: u32,

    // === Abilities ===
    pub teleport_attempts: u32,
    pub magnet_radius: i32,

    // === Scoring ===
    pub points_per_value: u64,
    pub size_extra_segments: usize,
    pub points_per_level: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            food: vec![
                FoodSpec {
                    kind: FoodKind::Normal,
                    value: 1,
                    chance: 0.6,
                },
                FoodSpec {
                    kind: FoodKind::Speed,
                    value: 2,
                    chance: 0.15,
                },
                FoodSpec {
                    kind: FoodKind::Size,
                    value: 3,
                    chance: 0.1,
                },
                FoodSpec {
                    kind: FoodKind::Shield,
                    value: 2,
                    chance: 0.1,
                },
                FoodSpec {
                    kind: FoodKind::Teleport,
                    value: 4,
                    chance: 0.05,
                },
            ],
            power_up_ticks: PowerUpDurations::default(),
            ladder: EvolutionLadder::extended(),

            base_tick_ms: INITIAL_TICK_MS,
            min_tick_ms: MIN_TICK_MS,
            speed_power_up_bonus_ms: SPEED_POWER_UP_BONUS_MS,
            stage_speed_bonus_ms: STAGE_SPEED_BONUS_MS,
            speed_ability_bonus_ms: SPEED_ABILITY_BONUS_MS,

            max_food: MAX_FOOD,
            food_spawn_chance: FOOD_SPAWN_CHANCE,
            obstacle_spawn_chance: OBSTACLE_SPAWN_CHANCE,
            obstacle_min_level: OBSTACLE_MIN_LEVEL,
            moving_obstacle_chance: MOVING_OBSTACLE_CHANCE,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_attempts: SPAWN_ATTEMPTS,

            teleport_attempts: TELEPORT_ATTEMPTS,
            magnet_radius: MAGNET_RADIUS,

            points_per_value: POINTS_PER_VALUE,
            size_extra_segments: SIZE_FOOD_EXTRA_SEGMENTS,
            points_per_level: POINTS_PER_LEVEL,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning file; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn with_ladder(mut self, ladder: EvolutionLadder) -> Self {
        self.ladder = ladder;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.food.iter().any(|f| f.kind == FoodKind::Normal) {
            return Err(ConfigError::InvalidValue("food table needs a normal entry"));
        }
        if self.food.iter().any(|f| !(0.0..=1.0).contains(&f.chance)) {
            return Err(ConfigError::InvalidValue("food chance must be within 0..=1"));
        }
        if self.food.iter().any(|f| f.value == 0) {
            return Err(ConfigError::InvalidValue("food value must be positive"));
        }
        for chance in [
            self.food_spawn_chance,
            self.obstacle_spawn_chance,
            self.moving_obstacle_chance,
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::InvalidValue("spawn chance must be within 0..=1"));
            }
        }
        if self.min_tick_ms == 0 || self.base_tick_ms < self.min_tick_ms {
            return Err(ConfigError::InvalidValue(
                "tick interval floor must be positive and below the base interval",
            ));
        }
        if self.spawn_attempts == 0 || self.teleport_attempts == 0 {
            return Err(ConfigError::InvalidValue("attempt budgets must be positive"));
        }
        if self.magnet_radius < 0 || self.obstacle_speed.is_nan() || self.obstacle_speed < 0.0 {
            return Err(ConfigError::InvalidValue("negative magnet radius or obstacle speed"));
        }
        if self.points_per_level == 0 {
            return Err(ConfigError::InvalidValue("points per level must be positive"));
        }
        self.ladder.validate()
    }

    /// Table entry for `kind`, if it can spawn at all
    pub fn food_spec(&self, kind: FoodKind) -> Option<&FoodSpec> {
        self.food.iter().find(|f| f.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.food_spec(FoodKind::Teleport).map(|f| f.value), Some(4));
        assert_eq!(tuning.power_up_ticks.for_kind(PowerUpKind::Size), None);
        assert_eq!(tuning.power_up_ticks.for_kind(PowerUpKind::Shield), Some(200));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_tick_ms": 200, "max_food": 5 }"#).unwrap();
        assert_eq!(tuning.base_tick_ms, 200);
        assert_eq!(tuning.max_food, 5);
        assert_eq!(tuning.ladder.len(), 9);
    }

    #[test]
    fn test_json_ladder() {
        let json = r#"{
            "ladder": [
                { "name": "Hatchling", "min_length": 0 },
                { "name": "Ghost", "min_length": 5, "abilities": ["ghost_mode"] }
            ]
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.ladder.max_stage(), 1);
        assert!(tuning.ladder.has_ability(1, crate::sim::Ability::GhostMode));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "min_tick_ms": 0 }"#),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "food_spawn_chance": 1.5 }"#),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "ladder": [] }"#),
            Err(ConfigError::EmptyLadder)
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(ConfigError::Json(_))));
    }
}
