//! Platform layer
//!
//! Hosts drive the simulation from their display-refresh callback. The
//! `FrameDriver` makes sure only one such loop is ever live: every start
//! hands out a new generation and frames from older generations are refused,
//! so a loop left over from before a restart stops on its next frame.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Guard for the single active tick loop
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    generation: u32,
    running: bool,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new loop, retiring any previous one. Returns its generation.
    pub fn start(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.running = true;
        log::debug!("Frame driver {} started", self.generation);
        self.generation
    }

    /// Stop the current loop
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Frame driver {} stopped", self.generation);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a frame callback from `generation` should tick
    pub fn accepts(&self, generation: u32) -> bool {
        self.running && generation == self.generation
    }
}
