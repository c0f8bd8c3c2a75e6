//! Gate Gauntlet entry point
//!
//! The browser build is driven by `platform::web`. Natively there is no
//! window, so this runs a seeded headless autoplay and logs how it went.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gate_gauntlet::audio::AudioManager;
    use gate_gauntlet::platform::FrameDriver;
    use gate_gauntlet::sim::{GameState, GameStatus, TickInput, tick};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Five minutes at 60 fps
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// Frames between autoplay shots
    const FIRE_EVERY: u32 = 20;

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1);
    log::info!("Gate Gauntlet (native, headless) starting with seed {}", seed);

    let mut state = GameState::new(seed);
    let mut audio = AudioManager::new();
    let mut driver = FrameDriver::new();
    let mut aim_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);

    audio.unlock();
    let generation = driver.start();
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );

    let mut frame = 0;
    while driver.accepts(generation) && frame < MAX_FRAMES {
        let fire = frame % FIRE_EVERY == 0;
        let input = TickInput {
            aim_angle: fire.then(|| aim_rng.random_range(-1.2..1.2)),
            fire,
            start: false,
        };
        tick(&mut state, &input);
        audio.play_events(&state.drain_events());

        if state.status == GameStatus::GameOver {
            driver.stop();
        }
        frame += 1;
    }

    println!(
        "seed {}: {:?} after {} frames, level {}, score {}, chevrons {}/7, cause {:?}",
        seed,
        state.status,
        frame,
        state.level_index + 1,
        state.score,
        state.locked.len(),
        state.game_over_cause
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
