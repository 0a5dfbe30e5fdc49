//! Browser bridge
//!
//! Exposes the session controller to JavaScript. The page owns the canvas,
//! the animation frame loop and the DOM; it calls in with input and frame
//! deltas and gets events back as JSON.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, MusicSequencer};
use crate::profile::Profile;
use crate::session::{SessionController, SessionEvent, SessionPhase};
use crate::settings::Settings;
use crate::sim::{GameMode, MapKind};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    crate::init_logging();
    log::info!("Clear Ahead starting...");
}

/// One browser tab's game
#[wasm_bindgen]
pub struct WebSession {
    inner: SessionController,
    audio: AudioManager,
    music: MusicSequencer,
    music_rng: Pcg32,
    /// Milliseconds until the next music step
    music_wait_ms: f32,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSession {
        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let audio = AudioManager::new(&settings);
        let inner = SessionController::new(Profile::load(), settings, seed);
        log::info!("Session initialized with seed: {}", seed);

        WebSession {
            inner,
            audio,
            music: MusicSequencer::new(),
            music_rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
            music_wait_ms: 0.0,
        }
    }

    /// Apply a menu selection; unknown names keep the current value
    pub fn configure(&mut self, mode: &str, map: &str, character: &str) -> String {
        let mode = GameMode::from_str(mode).unwrap_or(self.inner.mode());
        let map = MapKind::from_str(map).unwrap_or(self.inner.map());
        self.inner.configure(mode, map, character);
        self.flush()
    }

    pub fn start(&mut self) -> String {
        // First user gesture: audio may start now
        self.audio.resume();
        self.inner.start();
        self.flush()
    }

    pub fn pause(&mut self) -> String {
        self.inner.pause();
        self.flush()
    }

    pub fn resume(&mut self) -> String {
        self.inner.resume();
        self.flush()
    }

    pub fn restart(&mut self) -> String {
        self.inner.restart();
        self.flush()
    }

    pub fn return_to_menu(&mut self) -> String {
        self.inner.return_to_menu();
        self.flush()
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.inner.pointer_move(x, y);
    }

    pub fn trigger_hit(&mut self) -> String {
        self.inner.trigger_hit();
        self.flush()
    }

    /// Advance one animation frame; returns the frame's events
    pub fn tick(&mut self, dt_ms: f32) -> String {
        self.inner.tick(dt_ms);
        self.step_music(dt_ms);
        self.flush()
    }

    /// Page hidden or shown again
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.audio.resume();
            return;
        }
        self.inner.pause();
        if self.inner.settings().mute_on_blur {
            self.audio.suspend();
        }
        self.inner.drain_events();
    }

    pub fn buy_character(&mut self, id: &str) -> String {
        let result = self.inner.buy_character(id);
        self.play_pending();
        to_json(&result)
    }

    pub fn buy_map(&mut self, map: &str) -> String {
        let Some(map) = MapKind::from_str(map) else {
            return to_json(&crate::profile::Purchase::Unknown);
        };
        let result = self.inner.buy_map(map);
        self.play_pending();
        to_json(&result)
    }

    pub fn toggle_sound(&mut self) {
        let mut settings = self.inner.settings().clone();
        settings.toggle_sound();
        self.apply_settings(settings);
    }

    pub fn toggle_music(&mut self) {
        let mut settings = self.inner.settings().clone();
        settings.toggle_music();
        self.apply_settings(settings);
    }

    /// Replace preferences from a JSON document
    pub fn set_settings(&mut self, json: &str) {
        self.apply_settings(Settings::from_json(json));
    }

    pub fn phase(&self) -> String {
        self.inner.phase().as_str().to_string()
    }

    pub fn game_over_ready(&self) -> bool {
        self.inner.game_over_ready()
    }

    pub fn profile_json(&self) -> String {
        self.inner.profile().to_json()
    }

    pub fn settings_json(&self) -> String {
        to_json(self.inner.settings())
    }

    pub fn catalog_json(&self) -> String {
        to_json(&(&crate::catalog::CHARACTERS, &crate::catalog::MAPS))
    }

    /// Frame snapshot for the renderer; `null` in the menu
    pub fn render_view(&self) -> String {
        to_json(&self.inner.render_view())
    }
}

impl Default for WebSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSession {
    fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.inner.set_settings(settings);
    }

    fn step_music(&mut self, dt_ms: f32) {
        if self.inner.phase() != SessionPhase::Playing || !self.inner.settings().music_enabled {
            self.music_wait_ms = 0.0;
            return;
        }
        self.music_wait_ms -= crate::sim::clamp_frame_ms(dt_ms);
        if self.music_wait_ms <= 0.0 {
            let tones = self.music.next_step(&mut self.music_rng);
            self.audio.play_music(&tones);
            self.music_wait_ms += MusicSequencer::step_duration() * 1000.0;
        }
    }

    /// Play queued sounds and drop the rest
    fn play_pending(&mut self) {
        for event in self.inner.drain_events() {
            if let SessionEvent::Sound(effect) = event {
                self.audio.play(effect);
            }
        }
    }

    /// Play sounds, then hand every event to the page
    fn flush(&mut self) -> String {
        let events = self.inner.drain_events();
        for event in &events {
            if let SessionEvent::Sound(effect) = event {
                self.audio.play(*effect);
            }
        }
        to_json(&events)
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Failed to serialize: {}", e);
        "null".to_string()
    })
}
