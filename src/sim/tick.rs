//! Fixed-interval simulation tick
//!
//! One call advances the snake by exactly one cell. Order per tick:
//! 1. commit the buffered direction
//! 2. pre-move effects (food magnet, auto-teleport)
//! 3. move, collide, eat, grow, evolve
//! 4. obstacles drift, power-ups count down
//! 5. spawning, then level-up

use super::collision::{MoveResolution, resolve_move};
use super::effects::{self, Modifiers};
use super::events::{DeathCause, GameEvent, TickOutcome};
use super::spawn;
use super::state::{Food, GamePhase, GameState, PowerUp, PowerUpKind};

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.phase != GamePhase::Playing {
        return TickOutcome::Idle;
    }

    if let Some(next) = state.take_pending_direction() {
        // Re-checked here in case the direction changed since it was buffered
        if !next.is_reverse_of(state.direction) {
            state.direction = next;
        }
    }

    let mods = Modifiers::resolve(state);
    let interval = effects::tick_interval_ms(state);

    if mods.magnet {
        effects::apply_food_magnet(state);
    }
    let teleported = mods.auto_teleport && effects::try_auto_teleport(state, &mods);

    if !teleported {
        if let Err(cause) = advance_snake(state, &mods) {
            return end_game(state, cause);
        }
    }

    let grid = state.grid;
    for obstacle in &mut state.obstacles {
        obstacle.advance(grid);
    }
    decay_power_ups(state);

    spawn::spawn_tick(state);
    check_level_up(state);

    state.time_ticks += 1;
    state.elapsed_ms += u64::from(interval);
    TickOutcome::Continue
}

/// Move one cell along the committed direction
fn advance_snake(state: &mut GameState, mods: &Modifiers) -> Result<(), DeathCause> {
    let (cell, ghost_pass) = match resolve_move(state, mods, state.direction) {
        MoveResolution::Clear { cell, ghost_pass } => (cell, ghost_pass),
        MoveResolution::Fatal(cause) => return Err(cause),
    };

    if ghost_pass {
        state.counters.ghost_passes += 1;
    }

    state.snake.push_head(cell);
    match state.food_index_at(cell) {
        Some(index) => {
            let food = state.food.remove(index);
            eat(state, &food, mods);
        }
        None => state.snake.pop_tail(),
    }
    state.snake.retag();
    Ok(())
}

/// Score, power-up and evolution side effects of eating. The tail was kept.
fn eat(state: &mut GameState, food: &Food, mods: &Modifiers) {
    let gain = effects::food_points(&state.tuning, food.value, mods.double_points);
    state.score += gain.points;
    state.counters.crystal_bonus += gain.bonus;
    state.counters.food_eaten += 1;
    state.emit(GameEvent::FoodEaten { kind: food.kind });

    if let Some(kind) = food.kind.power_up() {
        grant_power_up(state, kind);
    }

    if let Some(stage) = state.tuning.ladder.promotion(state.stage, state.snake.len()) {
        state.stage = stage;
        log::info!(
            "Evolved to stage {} ({}) at length {}",
            stage,
            state.tuning.ladder.name(stage),
            state.snake.len()
        );
        state.emit(GameEvent::EvolutionReached { stage });
    }
}

fn grant_power_up(state: &mut GameState, kind: PowerUpKind) {
    match state.tuning.power_up_ticks.for_kind(kind) {
        Some(ticks) => state.power_ups.push(PowerUp {
            kind,
            remaining_ticks: ticks,
            active: true,
        }),
        // Size is instant growth
        None => state.snake.grow_tail(state.tuning.size_extra_segments),
    }
    state.counters.power_ups_granted += 1;
    state.emit(GameEvent::PowerUpGranted { kind });
}

fn decay_power_ups(state: &mut GameState) {
    for power_up in &mut state.power_ups {
        power_up.remaining_ticks = power_up.remaining_ticks.saturating_sub(1);
    }
    state.power_ups.retain(|p| p.remaining_ticks > 0);
}

fn check_level_up(state: &mut GameState) {
    if state.score > u64::from(state.level) * state.tuning.points_per_level {
        state.level += 1;
        log::info!("Level {} (score {})", state.level, state.score);
        state.emit(GameEvent::LevelUp { level: state.level });
    }
}

/// Terminal transition; the rest of the snapshot is left untouched
fn end_game(state: &mut GameState, cause: DeathCause) -> TickOutcome {
    state.phase = GamePhase::GameOver;
    let summary = state.summary(cause);
    log::info!(
        "Game over ({:?}): score {}, length {}, stage {}",
        cause,
        summary.score,
        summary.length,
        summary.stage
    );
    state.emit(GameEvent::GameOver {
        summary: summary.clone(),
    });
    TickOutcome::GameOver(summary)
}
