//! Evolution ladder
//!
//! Stages are a data table: each one has a minimum snake length and a set of
//! ability tags. Promotion is one-way and jumps straight to the highest stage
//! the current length qualifies for.

use serde::{Deserialize, Serialize};

use crate::tuning::ConfigError;

/// Ability tags granted by a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    SpeedBoost,
    Armor,
    QuantumTunnel,
    GhostMode,
    FoodMagnet,
    DoublePoints,
    AutoTeleport,
    /// Implies every other ability
    DivinePower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    pub min_length: usize,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl EvolutionStage {
    fn new(name: &str, min_length: usize, abilities: &[Ability]) -> Self {
        Self {
            name: name.to_string(),
            min_length,
            abilities: abilities.to_vec(),
        }
    }
}

/// Ordered stage table, stage 0 first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvolutionLadder {
    stages: Vec<EvolutionStage>,
}

impl Default for EvolutionLadder {
    fn default() -> Self {
        Self::extended()
    }
}

impl EvolutionLadder {
    pub fn new(stages: Vec<EvolutionStage>) -> Result<Self, ConfigError> {
        let ladder = Self { stages };
        ladder.validate()?;
        Ok(ladder)
    }

    /// Nine stages, one ability each, ending in Divine
    pub fn extended() -> Self {
        use Ability::*;
        Self {
            stages: vec![
                EvolutionStage::new("Basic", 0, &[]),
                EvolutionStage::new("Swift", 10, &[SpeedBoost]),
                EvolutionStage::new("Armored", 20, &[Armor]),
                EvolutionStage::new("Quantum", 35, &[QuantumTunnel]),
                EvolutionStage::new("Phantom", 50, &[GhostMode]),
                EvolutionStage::new("Magnetic", 70, &[FoodMagnet]),
                EvolutionStage::new("Crystal", 95, &[DoublePoints]),
                EvolutionStage::new("Cosmic", 125, &[AutoTeleport]),
                EvolutionStage::new("Divine", 160, &[DivinePower]),
            ],
        }
    }

    /// The original four-stage ladder
    pub fn basic() -> Self {
        let mut ladder = Self::extended();
        ladder.stages.truncate(4);
        ladder
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let first = self.stages.first().ok_or(ConfigError::EmptyLadder)?;
        if first.min_length != 0 {
            return Err(ConfigError::LadderStartsAboveZero(first.min_length));
        }
        for (i, pair) in self.stages.windows(2).enumerate() {
            if pair[1].min_length <= pair[0].min_length {
                return Err(ConfigError::UnorderedLadder {
                    stage: i + 1,
                    threshold: pair[1].min_length,
                    previous: pair[0].min_length,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Index of the terminal stage
    pub fn max_stage(&self) -> u32 {
        self.stages.len().saturating_sub(1) as u32
    }

    pub fn stage(&self, index: u32) -> Option<&EvolutionStage> {
        self.stages.get(index as usize)
    }

    pub fn name(&self, index: u32) -> &str {
        self.stage(index).map(|s| s.name.as_str()).unwrap_or("?")
    }

    /// Whether `stage` grants `ability` (directly or through DivinePower)
    pub fn has_ability(&self, stage: u32, ability: Ability) -> bool {
        self.stage(stage).is_some_and(|s| {
            s.abilities
                .iter()
                .any(|&a| a == ability || a == Ability::DivinePower)
        })
    }

    /// Highest stage above `current` that `length` qualifies for
    pub fn promotion(&self, current: u32, length: usize) -> Option<u32> {
        self.stages
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| length >= s.min_length)
            .map(|(i, _)| i as u32)
            .filter(|&i| i > current)
    }
}
