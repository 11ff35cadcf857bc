//! Demo-mode steering
//!
//! Drives the snake for the attract screen and the headless runner. Greedy:
//! never picks a move the engine would treat as fatal, avoids dead-end cells,
//! then heads for the nearest food.

use glam::IVec2;

use super::collision::{MoveResolution, resolve_move};
use super::effects::Modifiers;
use super::state::{Direction, GamePhase, GameState};
use crate::manhattan;

/// Pick a direction for the next tick, or `None` to keep going straight
pub fn steer(state: &GameState) -> Option<Direction> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let mods = Modifiers::resolve(state);
    let head = state.snake.head();
    let target = state
        .food
        .iter()
        .map(|f| f.pos)
        .min_by_key(|&pos| manhattan(pos, head));

    Direction::ALL
        .into_iter()
        .filter(|d| !d.is_reverse_of(state.direction))
        .filter_map(|d| match resolve_move(state, &mods, d) {
            MoveResolution::Clear { cell, .. } => Some((d, cell)),
            MoveResolution::Fatal(_) => None,
        })
        .min_by_key(|&(d, cell)| {
            let boxed_in = open_neighbours(state, &mods, cell) == 0;
            let distance = target.map_or(0, |t| manhattan(cell, t));
            (boxed_in, distance, d != state.direction)
        })
        .map(|(d, _)| d)
}

/// Exits from `cell` that are neither wall, body nor obstacle
fn open_neighbours(state: &GameState, mods: &Modifiers, cell: IVec2) -> usize {
    Direction::ALL
        .iter()
        .map(|d| cell + d.vector())
        .filter_map(|n| {
            if state.grid.contains(n) {
                Some(n)
            } else if mods.wrap {
                Some(state.grid.wrap(n))
            } else {
                None
            }
        })
        .filter(|&n| n != state.snake.head())
        .filter(|&n| mods.self_immune || !state.snake.occupies(n))
        .filter(|&n| mods.ghost || mods.obstacle_immune || !state.obstacle_at(n))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Food, FoodKind, Grid, Snake};
    use crate::sim::tick::tick;
    use crate::sim::TickOutcome;

    fn bare_state() -> GameState {
        let mut state = GameState::new(Grid::new(10, 10).unwrap(), 8);
        state.food.clear();
        state
    }

    #[test]
    fn test_turns_away_from_wall() {
        let mut state = bare_state();
        state.snake =
            Snake::from_cells([IVec2::new(9, 5), IVec2::new(8, 5), IVec2::new(7, 5)]).unwrap();
        let dir = steer(&state).unwrap();
        assert!(dir == Direction::Up || dir == Direction::Down);
    }

    #[test]
    fn test_heads_for_food() {
        let mut state = bare_state();
        state.food.push(Food {
            pos: IVec2::new(5, 1),
            kind: FoodKind::Normal,
            value: 1,
            weight: 0.6,
        });
        assert_eq!(steer(&state), Some(Direction::Up));
    }

    #[test]
    fn test_survives_a_while() {
        let mut state = GameState::new(Grid::default(), 2024);
        for _ in 0..200 {
            if let Some(dir) = steer(&state) {
                state.set_desired_direction(dir);
            }
            if let TickOutcome::GameOver(_) = tick(&mut state) {
                break;
            }
        }
        // Short runs on an empty-ish board should never crash into a wall
        assert!(state.time_ticks >= 50);
    }
}
