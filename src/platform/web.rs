//! Browser binding
//!
//! The page owns rendering and the `requestAnimationFrame` loop. It calls
//! `start_loop` once per loop it schedules and passes the returned
//! generation to every `frame`; a `false` return means that loop must stop.

use wasm_bindgen::prelude::*;

use super::FrameDriver;
use crate::audio::AudioManager;
use crate::levels::{builtin_levels, levels_from_json};
use crate::settings::Settings;
use crate::sim::{GameState, GameStatus, TickInput, tick};
use crate::tuning::Tuning;

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    audio: AudioManager,
    driver: FrameDriver,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json`, `settings_json` and `levels_json` may be empty for
    /// the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str, settings_json: &str, levels_json: &str) -> WebGame {
        let tuning = if tuning_json.is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json_or_default(tuning_json)
        };
        let settings = if settings_json.is_empty() {
            Settings::default()
        } else {
            Settings::from_json_or_default(settings_json)
        };
        let levels = if levels_json.is_empty() {
            builtin_levels()
        } else {
            levels_from_json(levels_json).unwrap_or_else(|e| {
                log::warn!("Invalid levels ({}), using built-in set", e);
                builtin_levels()
            })
        };

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::with_config(seed, tuning, levels);
        state.particle_cap = settings.max_particles();

        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        log::info!("Gate Gauntlet ready (seed {})", seed);
        WebGame {
            state,
            audio,
            driver: FrameDriver::new(),
            input: TickInput::default(),
        }
    }

    /// Pointer moved; the page converts it to an angle from vertical
    pub fn aim(&mut self, angle: f32) {
        self.input.aim_angle = Some(angle);
    }

    /// Pointer clicked
    pub fn fire(&mut self) {
        self.input.fire = true;
    }

    /// Start (or restart) a run. Must come from a user gesture: it also
    /// unlocks audio.
    pub fn start(&mut self) {
        self.audio.unlock();
        self.input.start = true;
    }

    /// Register a new frame loop, retiring the previous one
    pub fn start_loop(&mut self) -> u32 {
        self.driver.start()
    }

    pub fn stop_loop(&mut self) {
        self.driver.stop();
    }

    /// Advance one frame. Returns false when this loop should stop.
    pub fn frame(&mut self, generation: u32) -> bool {
        if !self.driver.accepts(generation) {
            return false;
        }

        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
        let events = self.state.drain_events();
        self.audio.play_events(&events);

        if self.state.status == GameStatus::GameOver {
            self.driver.stop();
            return false;
        }
        true
    }

    /// JSON snapshot of everything the renderer draws
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_default()
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
