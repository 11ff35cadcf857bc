//! Move resolution against walls, the snake's own body and obstacles
//!
//! Shared by the mover and by auto-teleport, which asks the same question one
//! step early: "would this move kill us?"

use glam::IVec2;

use super::effects::Modifiers;
use super::events::DeathCause;
use super::state::{Direction, GameState};

/// Outcome of stepping the head one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResolution {
    /// Safe destination; `ghost_pass` when it crossed an obstacle in ghost mode
    Clear { cell: IVec2, ghost_pass: bool },
    Fatal(DeathCause),
}

impl MoveResolution {
    pub fn is_fatal(&self) -> bool {
        matches!(self, MoveResolution::Fatal(_))
    }
}

/// Resolve the head's next cell when travelling `dir`.
///
/// Checks run in a fixed order: wall (or wrap), self, obstacle. Self
/// collision is tested against the body before this tick's tail drop.
pub fn resolve_move(state: &GameState, mods: &Modifiers, dir: Direction) -> MoveResolution {
    let mut cell = state.snake.head() + dir.vector();

    if !state.grid.contains(cell) {
        if !mods.wrap {
            return MoveResolution::Fatal(DeathCause::Wall);
        }
        cell = state.grid.wrap(cell);
    }

    if !mods.self_immune && state.snake.occupies(cell) {
        return MoveResolution::Fatal(DeathCause::SelfCollision);
    }

    let mut ghost_pass = false;
    if state.obstacle_at(cell) {
        if mods.ghost {
            ghost_pass = true;
        } else if !mods.obstacle_immune {
            return MoveResolution::Fatal(DeathCause::Obstacle);
        }
    }

    MoveResolution::Clear { cell, ghost_pass }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Grid, Obstacle, Snake};

    fn state_with_snake(cells: &[(i32, i32)]) -> GameState {
        let mut state = GameState::new(Grid::new(10, 10).unwrap(), 11);
        state.food.clear();
        state.snake = Snake::from_cells(cells.iter().map(|&(x, y)| IVec2::new(x, y))).unwrap();
        state
    }

    #[test]
    fn test_wall_is_fatal_without_wrap() {
        let state = state_with_snake(&[(0, 5), (1, 5), (2, 5)]);
        let mods = Modifiers::default();
        assert_eq!(
            resolve_move(&state, &mods, Direction::Left),
            MoveResolution::Fatal(DeathCause::Wall)
        );
    }

    #[test]
    fn test_wrap_lands_inside_grid() {
        let state = state_with_snake(&[(0, 5), (1, 5), (2, 5)]);
        let mods = Modifiers {
            wrap: true,
            ..Default::default()
        };
        assert_eq!(
            resolve_move(&state, &mods, Direction::Left),
            MoveResolution::Clear {
                cell: IVec2::new(9, 5),
                ghost_pass: false
            }
        );
    }

    #[test]
    fn test_shield_does_not_wrap() {
        let state = state_with_snake(&[(9, 0), (8, 0), (7, 0)]);
        let mods = Modifiers {
            self_immune: true,
            obstacle_immune: true,
            ..Default::default()
        };
        assert!(resolve_move(&state, &mods, Direction::Up).is_fatal());
    }

    #[test]
    fn test_self_collision_includes_tail() {
        // Head at (1,1) turning down into the tail at (1,2)
        let state = state_with_snake(&[(1, 1), (2, 1), (2, 2), (1, 2)]);
        assert_eq!(
            resolve_move(&state, &Modifiers::default(), Direction::Down),
            MoveResolution::Fatal(DeathCause::SelfCollision)
        );
    }

    #[test]
    fn test_obstacle_policies() {
        let mut state = state_with_snake(&[(5, 5), (4, 5), (3, 5)]);
        state.obstacles.push(Obstacle::stationary(IVec2::new(6, 5)));

        assert_eq!(
            resolve_move(&state, &Modifiers::default(), Direction::Right),
            MoveResolution::Fatal(DeathCause::Obstacle)
        );

        let shielded = Modifiers {
            obstacle_immune: true,
            ..Default::default()
        };
        assert_eq!(
            resolve_move(&state, &shielded, Direction::Right),
            MoveResolution::Clear {
                cell: IVec2::new(6, 5),
                ghost_pass: false
            }
        );

        let ghost = Modifiers {
            ghost: true,
            obstacle_immune: true,
            ..Default::default()
        };
        assert_eq!(
            resolve_move(&state, &ghost, Direction::Right),
            MoveResolution::Clear {
                cell: IVec2::new(6, 5),
                ghost_pass: true
            }
        );
    }
}
