//! Browser bindings
//!
//! The JS side owns the animation clock, input and canvas. It calls `tick`
//! every `tickIntervalMs()` and draws the returned JSON snapshot.

use glam::IVec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Grid, TickOutcome, autopilot, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Neon Snake wasm module loaded");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TickReport<'a> {
    snapshot: &'a GameState,
    events: Vec<GameEvent>,
    game_over: bool,
    interval_ms: u32,
}

#[wasm_bindgen]
pub struct SnakeHandle {
    state: GameState,
}

#[wasm_bindgen]
impl SnakeHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(width: i32, height: i32, seed: f64) -> Result<SnakeHandle, JsValue> {
        let settings = Settings::load();
        let grid = Grid::new(width, height).map_err(js_err)?;
        let seed = settings.seed.unwrap_or(seed as u64);
        Ok(Self {
            state: GameState::with_tuning(grid, seed, settings.tuning()),
        })
    }

    /// Build from the saved grid preset and ladder
    #[wasm_bindgen(js_name = fromSettings)]
    pub fn from_settings(seed: f64) -> SnakeHandle {
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(seed as u64);
        Self {
            state: GameState::with_tuning(settings.grid(), seed, settings.tuning()),
        }
    }

    /// Build with the grid preset that suits the page width
    #[wasm_bindgen(js_name = fromViewport)]
    pub fn from_viewport(width_px: f64, seed: f64) -> SnakeHandle {
        let settings = Settings::load().with_viewport(width_px);
        let seed = settings.seed.unwrap_or(seed as u64);
        Self {
            state: GameState::with_tuning(settings.grid(), seed, settings.tuning()),
        }
    }

    /// Persist a settings profile (`{ grid, ladder, seed }`); applies on the next handle
    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(json: &str) -> Result<(), JsValue> {
        let settings: Settings = serde_json::from_str(json).map_err(js_err)?;
        settings.save();
        Ok(())
    }

    #[wasm_bindgen(js_name = startSession)]
    pub fn start_session(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        let grid = Grid::new(width, height).map_err(js_err)?;
        self.state.start_session(grid);
        Ok(())
    }

    /// Buffer a direction from raw input; false when ignored
    #[wasm_bindgen(js_name = setDirection)]
    pub fn set_direction(&mut self, x: i32, y: i32) -> bool {
        self.state.set_desired_vector(IVec2::new(x, y))
    }

    /// Let the demo autopilot choose the next direction
    #[wasm_bindgen(js_name = autopilotDirection)]
    pub fn autopilot_direction(&mut self) -> bool {
        match autopilot::steer(&self.state) {
            Some(dir) => self.state.set_desired_direction(dir),
            None => false,
        }
    }

    /// Advance one tick and return `{ snapshot, events, gameOver, intervalMs }`
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let outcome = tick(&mut self.state);
        let report = TickReport {
            events: self.state.drain_events(),
            game_over: matches!(outcome, TickOutcome::GameOver(_)) || self.state.is_over(),
            interval_ms: self.state.tick_interval_ms(),
            snapshot: &self.state,
        };
        serde_json::to_string(&report).map_err(js_err)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(js_err)
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> u32 {
        self.state.tick_interval_ms()
    }
}
