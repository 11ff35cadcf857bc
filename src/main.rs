//! Neon Snake entry point
//!
//! Native builds play one headless autopilot session and print its summary.
//! The browser build is driven through `neon_snake::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_snake::Settings;
    use neon_snake::sim::{GameEvent, GameState, TickOutcome, autopilot, tick};

    env_logger::init();

    // Usage: neon-snake [seed] [max_ticks]
    let mut args = std::env::args().skip(1);
    let settings = Settings::load();
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .or(settings.seed)
        .unwrap_or_else(rand::random);
    let max_ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10_000);

    log::info!(
        "Neon Snake (native) starting: {} grid, {:?} ladder, seed {}",
        settings.grid.as_str(),
        settings.ladder,
        seed
    );

    let mut state = GameState::with_tuning(settings.grid(), seed, settings.tuning());
    let mut summary = None;

    while state.time_ticks < max_ticks {
        if let Some(dir) = autopilot::steer(&state) {
            state.set_desired_direction(dir);
        }
        let outcome = tick(&mut state);

        // Evolution, level and game-over are already logged by the engine
        for event in state.drain_events() {
            if let GameEvent::FoodEaten { .. } | GameEvent::PowerUpGranted { .. } = event {
                log::debug!("{:?}", event);
            }
        }

        if let TickOutcome::GameOver(s) = outcome {
            summary = Some(s);
            break;
        }
    }

    match summary {
        Some(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode summary: {}", e),
        },
        None => {
            log::info!("Tick budget exhausted");
            println!(
                "Survived {} ticks: score {}, length {}, stage {}, level {}",
                state.time_ticks,
                state.score,
                state.snake.len(),
                state.stage,
                state.level
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is neon_snake::web::start, this is just to satisfy the compiler
}
