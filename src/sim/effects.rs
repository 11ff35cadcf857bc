//! Power-up and evolution-ability effects
//!
//! [`Modifiers`] folds timed power-ups and the current stage's ability tags
//! into plain flags once per tick. Power-ups and abilities compose with OR.

use glam::IVec2;

use super::collision::resolve_move;
use super::evolution::Ability;
use super::spawn::random_free_cell;
use super::state::{GameState, PowerUpKind};
use crate::manhattan;
use crate::tuning::Tuning;

/// Effect flags for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Out-of-range moves wrap instead of hitting the wall
    pub wrap: bool,
    /// Moving into the body is harmless
    pub self_immune: bool,
    /// Obstacles are passed through and counted
    pub ghost: bool,
    /// Obstacles are passed through silently
    pub obstacle_immune: bool,
    pub magnet: bool,
    pub auto_teleport: bool,
    pub double_points: bool,
    pub speed_power_up: bool,
    pub speed_ability: bool,
}

impl Modifiers {
    pub fn resolve(state: &GameState) -> Self {
        let shield = state.has_power_up(PowerUpKind::Shield);
        let armor = state.has_ability(Ability::Armor);

        Self {
            // Shield and armor never grant wrap
            wrap: state.has_power_up(PowerUpKind::Teleport)
                || state.has_ability(Ability::QuantumTunnel),
            self_immune: shield || armor,
            ghost: state.has_ability(Ability::GhostMode),
            obstacle_immune: shield || armor,
            magnet: state.has_ability(Ability::FoodMagnet),
            auto_teleport: state.has_ability(Ability::AutoTeleport),
            double_points: state.has_ability(Ability::DoublePoints),
            speed_power_up: state.has_power_up(PowerUpKind::Speed),
            speed_ability: state.has_ability(Ability::SpeedBoost),
        }
    }
}

/// Effective scheduler interval, never below the tuning floor
pub fn tick_interval_ms(state: &GameState) -> u32 {
    let mods = Modifiers::resolve(state);
    let t = &state.tuning;

    let mut reduction = state.stage.saturating_mul(t.stage_speed_bonus_ms);
    if mods.speed_power_up {
        reduction = reduction.saturating_add(t.speed_power_up_bonus_ms);
    }
    if mods.speed_ability {
        reduction = reduction.saturating_add(t.speed_ability_bonus_ms);
    }
    t.base_tick_ms.saturating_sub(reduction).max(t.min_tick_ms)
}

/// Score delta for eating one food item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodPoints {
    pub points: u64,
    /// Share of `points` that came from double points
    pub bonus: u64,
}

pub fn food_points(tuning: &Tuning, value: u32, double_points: bool) -> FoodPoints {
    let base = u64::from(value) * tuning.points_per_value;
    if double_points {
        let points = base * 2;
        FoodPoints {
            points,
            bonus: points / 2,
        }
    } else {
        FoodPoints {
            points: base,
            bonus: 0,
        }
    }
}

/// Pull nearby food one cell toward the head. Returns the number nudged.
///
/// Each axis moves by at most one cell. A blocked diagonal step falls back to
/// a single-axis step; fully blocked food stays where it is.
pub fn apply_food_magnet(state: &mut GameState) -> u32 {
    let head = state.snake.head();
    let radius = state.tuning.magnet_radius;
    let mut nudged = 0;

    for i in 0..state.food.len() {
        let pos = state.food[i].pos;
        if manhattan(pos, head) > radius {
            continue;
        }
        let step = (head - pos).signum();
        if step == IVec2::ZERO {
            continue;
        }

        let candidates = [pos + step, pos + IVec2::new(step.x, 0), pos + IVec2::new(0, step.y)];
        let target = candidates
            .into_iter()
            .filter(|&c| c != pos)
            .find(|&c| state.grid.contains(c) && !state.is_occupied(c));

        if let Some(target) = target {
            state.food[i].pos = target;
            nudged += 1;
        }
    }

    state.counters.magnet_pulls += nudged;
    nudged
}

/// Jump the head to a random free cell if the pending move would be fatal.
///
/// Returns true when the head was relocated; the normal move is then skipped.
pub fn try_auto_teleport(state: &mut GameState, mods: &Modifiers) -> bool {
    if !resolve_move(state, mods, state.direction).is_fatal() {
        return false;
    }

    let attempts = state.tuning.teleport_attempts;
    let snake = &state.snake;
    let food = &state.food;
    let obstacles = &state.obstacles;
    let cell = random_free_cell(&mut state.rng, state.grid, attempts, |c| {
        snake.occupies(c)
            || food.iter().any(|f| f.pos == c)
            || obstacles.iter().any(|o| o.cell() == c)
    });

    match cell {
        Some(cell) => {
            log::debug!("Auto-teleport {:?} -> {:?}", state.snake.head(), cell);
            state.snake.set_head(cell);
            state.counters.auto_teleports += 1;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Food, FoodKind, Grid, Obstacle, PowerUp, Snake};

    fn bare_state() -> GameState {
        let mut state = GameState::new(Grid::new(10, 10).unwrap(), 5);
        state.food.clear();
        state
    }

    fn power_up(kind: PowerUpKind) -> PowerUp {
        PowerUp {
            kind,
            remaining_ticks: 10,
            active: true,
        }
    }

    #[test]
    fn test_interval_formula_and_floor() {
        let mut state = bare_state();
        assert_eq!(tick_interval_ms(&state), 150);

        state.power_ups.push(power_up(PowerUpKind::Speed));
        assert_eq!(tick_interval_ms(&state), 100);

        // Stage 1 (speed_boost): 150 - 50 - 20 - 30
        state.stage = 1;
        assert_eq!(tick_interval_ms(&state), 50);

        // Divine: formula goes negative, floor kicks in
        state.stage = 8;
        assert_eq!(tick_interval_ms(&state), state.tuning.min_tick_ms);
    }

    #[test]
    fn test_modifiers_compose() {
        let mut state = bare_state();
        assert_eq!(Modifiers::resolve(&state), Modifiers::default());

        state.power_ups.push(power_up(PowerUpKind::Shield));
        let mods = Modifiers::resolve(&state);
        assert!(mods.self_immune && mods.obstacle_immune);
        assert!(!mods.wrap);

        state.power_ups.clear();
        state.stage = 3;
        assert!(Modifiers::resolve(&state).wrap);

        state.stage = 8;
        let mods = Modifiers::resolve(&state);
        assert!(mods.wrap && mods.ghost && mods.self_immune && mods.magnet);
        assert!(mods.auto_teleport && mods.double_points && mods.speed_ability);
    }

    #[test]
    fn test_food_points() {
        let tuning = Tuning::default();
        assert_eq!(food_points(&tuning, 3, false), FoodPoints { points: 30, bonus: 0 });
        assert_eq!(food_points(&tuning, 3, true), FoodPoints { points: 60, bonus: 30 });
    }

    #[test]
    fn test_magnet_pulls_food_closer() {
        let mut state = bare_state();
        // Head at (5,5)
        state.food.push(Food {
            pos: IVec2::new(7, 6),
            kind: FoodKind::Normal,
            value: 1,
            weight: 0.6,
        });
        state.food.push(Food {
            pos: IVec2::new(9, 9),
            kind: FoodKind::Normal,
            value: 1,
            weight: 0.6,
        });

        assert_eq!(apply_food_magnet(&mut state), 1);
        assert_eq!(state.food[0].pos, IVec2::new(6, 5));
        assert_eq!(state.food[1].pos, IVec2::new(9, 9));
        assert_eq!(state.counters.magnet_pulls, 1);
    }

    #[test]
    fn test_magnet_never_lands_on_snake() {
        let mut state = bare_state();
        // Diagonal to the head: the diagonal step is the head itself
        state.food.push(Food {
            pos: IVec2::new(6, 6),
            kind: FoodKind::Normal,
            value: 1,
            weight: 0.6,
        });
        apply_food_magnet(&mut state);
        let pos = state.food[0].pos;
        assert!(!state.snake.occupies(pos));
        // Falls back to the x-axis step
        assert_eq!(pos, IVec2::new(5, 6));
    }

    #[test]
    fn test_auto_teleport_only_when_fatal() {
        let mut state = bare_state();
        state.stage = 7;
        let mods = Modifiers::resolve(&state);
        assert!(!try_auto_teleport(&mut state, &mods));

        state.snake =
            Snake::from_cells([IVec2::new(9, 2), IVec2::new(8, 2), IVec2::new(7, 2)]).unwrap();
        state.obstacles.push(Obstacle::stationary(IVec2::new(0, 0)));
        assert!(try_auto_teleport(&mut state, &mods));
        let head = state.snake.head();
        assert_ne!(head, IVec2::new(9, 2));
        assert!(state.grid.contains(head));
        assert_ne!(head, IVec2::new(0, 0));
        assert_eq!(state.counters.auto_teleports, 1);
        assert_eq!(state.snake.len(), 3);
    }
}
