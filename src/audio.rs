//! Audio system
//!
//! Fire-and-forget sound effects. On the web they are synthesized with the
//! Web Audio API (no external files); natively the backend is silent.
//!
//! Browsers refuse audio until a user gesture, so nothing plays before
//! [`AudioManager::unlock`]. Calls made earlier are dropped, not queued.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Orb leaves the launcher
    Fire,
    /// Orb locks into the grid
    Snap,
    /// Cluster popped
    Match,
    /// A new chevron locked
    ChevronLock,
    /// All seven chevrons locked
    GateOpen,
    GameOver,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Fire => "fire",
            SoundEffect::Snap => "snap",
            SoundEffect::Match => "match",
            SoundEffect::ChevronLock => "chevron_lock",
            SoundEffect::GateOpen => "gate_open",
            SoundEffect::GameOver => "game_over",
        }
    }
}

impl From<GameEvent> for SoundEffect {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Fire => SoundEffect::Fire,
            GameEvent::Snap => SoundEffect::Snap,
            GameEvent::Match => SoundEffect::Match,
            GameEvent::ChevronLock => SoundEffect::ChevronLock,
            GameEvent::GateOpen => SoundEffect::GateOpen,
            GameEvent::GameOver => SoundEffect::GameOver,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    unlocked: bool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Effects that made it past the unlock and volume gates
    dispatched: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx: None,
            unlocked: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            dispatched: 0,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Enable playback. Call from a user gesture (click/tap); repeat calls
    /// are harmless.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;

        #[cfg(target_arch = "wasm32")]
        {
            // May fail outside a secure context; audio just stays silent
            self.ctx = AudioContext::new().ok();
            match &self.ctx {
                Some(ctx) => {
                    let _ = ctx.resume();
                }
                None => log::warn!("Failed to create AudioContext - audio disabled"),
            }
        }

        log::info!("Audio unlocked");
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play every sound a tick raised
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for &event in events {
            self.play(event.into());
        }
    }

    /// Play a sound effect. Never fails; problems are swallowed.
    pub fn play(&mut self, effect: SoundEffect) {
        if !self.unlocked {
            return;
        }
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.dispatched += 1;

        #[cfg(target_arch = "wasm32")]
        self.synthesize(effect, vol);

        #[cfg(not(target_arch = "wasm32"))]
        log::debug!("sfx {} (vol {:.2})", effect.name(), vol);
    }
}

// === Sound generators ===

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    fn synthesize(&self, effect: SoundEffect, vol: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Fire => self.play_fire(ctx, vol),
            SoundEffect::Snap => self.play_snap(ctx, vol),
            SoundEffect::Match => self.play_match(ctx, vol),
            SoundEffect::ChevronLock => self.play_chevron_lock(ctx, vol),
            SoundEffect::GateOpen => self.play_gate_open(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Fire - rising zap
    fn play_fire(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.18)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(880.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Snap - short click
    fn play_snap(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 320.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.07).ok();
    }

    /// Match - bright two-note pop
    fn play_match(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [660.0, 990.0].iter().enumerate() {
            let delay = i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Chevron lock - heavy mechanical clunk
    fn play_chevron_lock(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(90.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(45.0, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        // Latch click on top of the clunk
        if let Some((osc, gain)) = self.create_osc(ctx, 1400.0, OscillatorType::Triangle) {
            let click = t + 0.06;
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().set_value_at_time(vol * 0.15, click).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, click + 0.04)
                .ok();
            osc.start_with_when(click).ok();
            osc.stop_with_when(click + 0.05).ok();
        }
    }

    /// Gate open - the wormhole kawoosh, a swelling sweep under a bright arpeggio
    fn play_gate_open(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(0.01, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.2, t + 0.35)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.1)
                .ok();
            osc.frequency().set_value_at_time(110.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(660.0, t + 0.35)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 1.0)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.15).ok();
        }

        for (i, freq) in [523.25, 659.25, 783.99, 1046.5, 1318.5].iter().enumerate() {
            let start = t + 0.3 + i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.22, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.7)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.75).ok();
            }
        }
    }

    /// Game over - the gate powering down
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 320.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.18, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.12, t + 0.8)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.3)
                .ok();
            osc.frequency().set_value_at_time(320.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(55.0, t + 1.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.35).ok();
        }

        // Dull thud once the hum dies out
        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            let thud = t + 1.05;
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().set_value_at_time(vol * 0.45, thud).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, thud + 0.45)
                .ok();
            osc.frequency().set_value_at_time(70.0, thud).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(35.0, thud + 0.4)
                .ok();
            osc.start_with_when(thud).ok();
            osc.stop_with_when(thud + 0.5).ok();
        }
    }
}
