//! Audio cues
//!
//! Procedurally generated 8-bit sounds - no external files needed!
//! Recipes and the music sequencer are plain data so any backend can play
//! them; the Web Audio backend lives behind `wasm32`.

use rand::Rng;
use serde::Serialize;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Obstacle damaged but still standing
    Tap,
    /// Obstacle destroyed
    Smash,
    /// Coin picked up
    Coin,
    /// Run ended in a collision
    Crash,
    /// Menu/HUD button
    Button,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Tap { .. } => Some(SoundEffect::Tap),
            GameEvent::Smash { .. } => Some(SoundEffect::Smash),
            GameEvent::Collect { .. } => Some(SoundEffect::Coin),
            GameEvent::Crash { .. } => Some(SoundEffect::Crash),
            _ => None,
        }
    }

    /// Tones making up this effect
    pub fn recipe(&self) -> &'static [Tone] {
        const TAP: &[Tone] = &[Tone::new(440.0, Waveform::Square, 0.1, 0.1)];
        const BUTTON: &[Tone] = &[Tone::new(600.0, Waveform::Sine, 0.1, 0.15)];
        const SMASH: &[Tone] = &[
            Tone::new(150.0, Waveform::Sawtooth, 0.3, 0.2),
            Tone::new(80.0, Waveform::Square, 0.2, 0.2),
        ];
        const COIN: &[Tone] = &[
            Tone::new(880.0, Waveform::Sine, 0.1, 0.1),
            Tone::new(1100.0, Waveform::Sine, 0.15, 0.1).delayed(0.05),
        ];
        const CRASH: &[Tone] = &[
            Tone::new(60.0, Waveform::Sawtooth, 0.5, 0.3),
            Tone::new(40.0, Waveform::Square, 0.4, 0.3),
        ];

        match self {
            SoundEffect::Tap => TAP,
            SoundEffect::Button => BUTTON,
            SoundEffect::Smash => SMASH,
            SoundEffect::Coin => COIN,
            SoundEffect::Crash => CRASH,
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single decaying oscillator note
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub freq: f32,
    pub waveform: Waveform,
    /// Seconds until the gain has decayed
    pub duration: f32,
    /// Peak gain
    pub volume: f32,
    /// Seconds after the cue starts
    pub delay: f32,
}

impl Tone {
    pub const fn new(freq: f32, waveform: Waveform, duration: f32, volume: f32) -> Self {
        Self {
            freq,
            waveform,
            duration,
            volume,
            delay: 0.0,
        }
    }

    pub const fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Background music tempo
pub const MUSIC_BPM: f32 = 130.0;

/// C2, Eb2, F2, G2
const BASS_SCALE: [f32; 4] = [65.41, 77.78, 87.31, 98.00];
/// C minor pentatonic
const MELODY_SCALE: [f32; 6] = [261.63, 311.13, 349.23, 392.00, 466.16, 523.25];
/// Melody patterns (scale degree, -1 = rest)
const PATTERNS: [[i8; 8]; 2] = [[0, 2, 3, 5, 4, 3, 2, 0], [0, -1, 2, 3, 5, 3, 2, 0]];

/// Endless 8-bit loop, one eighth note per step
#[derive(Debug, Clone, Default)]
pub struct MusicSequencer {
    step: u32,
}

impl MusicSequencer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Seconds between steps
    pub fn step_duration() -> f32 {
        60.0 / MUSIC_BPM / 2.0
    }

    /// Tones for the current step, then advance
    pub fn next_step<R: Rng>(&mut self, rng: &mut R) -> Vec<Tone> {
        let step = self.step;
        let mut tones = Vec::with_capacity(2);

        if step % 2 == 0 {
            let bass = BASS_SCALE[(step / 4) as usize % BASS_SCALE.len()];
            tones.push(Tone::new(bass, Waveform::Square, 0.2, 0.1));
        }

        let pattern = &PATTERNS[(step / 16) as usize % PATTERNS.len()];
        let degree = pattern[step as usize % pattern.len()];
        // Accent every 4th step, otherwise a 30% chance of a note
        let play = step % 4 == 0 || rng.random::<f32>() > 0.7;
        if degree >= 0 && play {
            let freq = MELODY_SCALE[degree as usize % MELODY_SCALE.len()];
            tones.push(Tone::new(freq, Waveform::Triangle, 0.15, 0.08));
        }

        self.step = self.step.wrapping_add(1);
        tones
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, OscillatorType};

    use super::{SoundEffect, Tone, Waveform};
    use crate::settings::Settings;

    /// Web Audio playback for cues and music steps
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
            }
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Suspend while the page is hidden
        pub fn suspend(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.suspend();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            for tone in effect.recipe() {
                self.play_tone(tone, self.sfx_volume);
            }
        }

        pub fn play_music(&self, tones: &[Tone]) {
            for tone in tones {
                self.play_tone(tone, self.music_volume);
            }
        }

        fn play_tone(&self, tone: &Tone, gain_scale: f32) -> Option<()> {
            if gain_scale <= 0.0 {
                return None;
            }
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time() + tone.delay as f64;
            let end = t + tone.duration as f64;
            osc.frequency().set_value_at_time(tone.freq, t).ok()?;
            gain.gain()
                .set_value_at_time(tone.volume * gain_scale, t)
                .ok()?;
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(end).ok()?;
            Some(())
        }
    }
}
