//! Food and obstacle placement
//!
//! All placement is rejection sampling with a fixed attempt budget, so a
//! nearly full grid makes spawns quietly fail instead of spinning.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Food, FoodKind, GameState, Grid, Obstacle};
use crate::tuning::{FoodSpec, Tuning};

/// Try up to `attempts` random cells; first one not `occupied` wins
pub(crate) fn random_free_cell(
    rng: &mut Pcg32,
    grid: Grid,
    attempts: u32,
    occupied: impl Fn(IVec2) -> bool,
) -> Option<IVec2> {
    for _ in 0..attempts {
        let cell = IVec2::new(
            rng.random_range(0..grid.width()),
            rng.random_range(0..grid.height()),
        );
        if !occupied(cell) {
            return Some(cell);
        }
    }
    None
}

/// Roll each table entry in order; the first hit wins, normal otherwise
pub fn pick_food(tuning: &Tuning, rng: &mut Pcg32) -> FoodSpec {
    tuning
        .food
        .iter()
        .find(|spec| rng.random::<f64>() < spec.chance)
        .or_else(|| tuning.food_spec(FoodKind::Normal))
        .copied()
        .unwrap_or(FoodSpec {
            kind: FoodKind::Normal,
            value: 1,
            chance: 1.0,
        })
}

/// Place one food item. Returns false when no free cell was found.
pub fn spawn_food(state: &mut GameState) -> bool {
    let spec = pick_food(&state.tuning, &mut state.rng);

    let snake = &state.snake;
    let food = &state.food;
    let obstacles = &state.obstacles;
    let cell = random_free_cell(&mut state.rng, state.grid, state.tuning.spawn_attempts, |c| {
        snake.occupies(c)
            || food.iter().any(|f| f.pos == c)
            || obstacles.iter().any(|o| o.cell() == c)
    });

    let Some(pos) = cell else {
        log::debug!("No room for {:?} food", spec.kind);
        return false;
    };
    state.food.push(Food {
        pos,
        kind: spec.kind,
        value: spec.value,
        weight: spec.chance,
    });
    true
}

/// Place one obstacle, gated by level. Returns false when nothing spawned.
pub fn spawn_obstacle(state: &mut GameState) -> bool {
    if state.level < state.tuning.obstacle_min_level {
        return false;
    }

    let snake = &state.snake;
    let food = &state.food;
    let obstacles = &state.obstacles;
    let cell = random_free_cell(&mut state.rng, state.grid, state.tuning.spawn_attempts, |c| {
        snake.occupies(c)
            || food.iter().any(|f| f.pos == c)
            || obstacles.iter().any(|o| o.cell() == c)
    });
    let Some(cell) = cell else {
        log::debug!("No room for an obstacle");
        return false;
    };

    let rng = &mut state.rng;
    let obstacle = if rng.random::<f64>() < state.tuning.moving_obstacle_chance {
        let dir = Vec2::new(
            if rng.random::<bool>() { 1.0 } else { -1.0 },
            if rng.random::<bool>() { 1.0 } else { -1.0 },
        );
        Obstacle::moving(cell, dir, state.tuning.obstacle_speed)
    } else {
        Obstacle::stationary(cell)
    };
    log::debug!("Obstacle at {:?} (moving: {})", cell, obstacle.moving);
    state.obstacles.push(obstacle);
    true
}

/// Per-tick spawn cadence: food while below the cap, obstacles below `level`
pub fn spawn_tick(state: &mut GameState) {
    if state.food.len() < state.tuning.max_food
        && state.rng.random::<f64>() < state.tuning.food_spawn_chance
    {
        spawn_food(state);
    }
    if state.obstacles.len() < state.level as usize
        && state.rng.random::<f64>() < state.tuning.obstacle_spawn_chance
    {
        spawn_obstacle(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn bare_state(width: i32, height: i32, seed: u64) -> GameState {
        let mut state = GameState::new(Grid::new(width, height).unwrap(), seed);
        state.food.clear();
        state
    }

    #[test]
    fn test_pick_food_defaults_to_normal() {
        let mut tuning = Tuning::default();
        for spec in &mut tuning.food {
            spec.chance = 0.0;
        }
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(pick_food(&tuning, &mut rng).kind, FoodKind::Normal);
        }
    }

    #[test]
    fn test_pick_food_respects_order() {
        let mut tuning = Tuning::default();
        for spec in &mut tuning.food {
            spec.chance = if spec.kind == FoodKind::Normal { 0.0 } else { 1.0 };
        }
        let mut rng = Pcg32::seed_from_u64(2);
        // Speed comes right after normal in the table
        assert_eq!(pick_food(&tuning, &mut rng).kind, FoodKind::Speed);
    }

    #[test]
    fn test_full_grid_gives_up() {
        let mut state = bare_state(4, 1, 3);
        // Snake covers 3 of 4 cells; block the last one
        let free = (0..4)
            .map(|x| IVec2::new(x, 0))
            .find(|c| !state.snake.occupies(*c))
            .unwrap();
        state.obstacles.push(Obstacle::stationary(free));
        assert!(!spawn_food(&mut state));
        assert!(state.food.is_empty());
    }

    #[test]
    fn test_obstacles_gated_by_level() {
        let mut state = bare_state(10, 10, 4);
        assert!(!spawn_obstacle(&mut state));
        state.level = 3;
        assert!(spawn_obstacle(&mut state));
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_moving_obstacles_get_diagonal_motion() {
        let mut state = bare_state(10, 10, 5);
        state.level = 10;
        state.tuning.moving_obstacle_chance = 1.0;
        assert!(spawn_obstacle(&mut state));
        let o = &state.obstacles[0];
        assert!(o.moving);
        assert_eq!(o.dir.abs(), Vec2::ONE);
        assert_eq!(o.speed, state.tuning.obstacle_speed);
    }

    proptest! {
        #[test]
        fn prop_spawns_land_on_free_cells(seed in any::<u64>(), rocks in 0usize..40) {
            let mut state = bare_state(8, 8, seed);
            state.level = 100;
            for _ in 0..rocks {
                spawn_obstacle(&mut state);
            }
            for _ in 0..10 {
                spawn_food(&mut state);
            }

            let mut seen = std::collections::HashSet::new();
            for cell in state.snake.cells() {
                seen.insert(cell);
            }
            for f in &state.food {
                prop_assert!(state.grid.contains(f.pos));
                prop_assert!(seen.insert(f.pos), "food on occupied cell {:?}", f.pos);
            }
            for o in &state.obstacles {
                prop_assert!(seen.insert(o.cell()), "obstacle on occupied cell {:?}", o.cell());
            }
        }
    }
}
