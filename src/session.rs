//! Session controller
//!
//! Owns the run lifecycle (start, pause, game over, menu), bridges the
//! player's profile into a fresh `RunState` per run and translates simulation
//! events into what the outer layers show and play.

use glam::Vec2;
use serde::Serialize;

use crate::audio::SoundEffect;
use crate::consts::*;
use crate::profile::{Profile, Purchase};
use crate::settings::Settings;
use crate::sim::{
    self, GameEvent, GameMode, MapKind, ProgressSnapshot, RenderView, RunState, SimConfig,
};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SessionPhase {
    /// Menu; configuration changes allowed
    Start,
    Playing,
    Paused,
    /// Run finished; `since_ms` counts up to the retry/menu gate
    GameOver { since_ms: f32 },
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Start => "start",
            SessionPhase::Playing => "playing",
            SessionPhase::Paused => "paused",
            SessionPhase::GameOver { .. } => "game_over",
        }
    }
}

/// Final stats of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Whole distance units
    pub distance: u32,
    pub currency: u32,
    pub smashed: u32,
    pub high_score: u32,
    pub new_high_score: bool,
    /// Profile total after banking this run
    pub total_coins: u32,
}

/// Events for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    Progress(ProgressSnapshot),
    Milestone { distance: u32, message: String },
    TutorialShow,
    TutorialDismissed,
    RunEnded(RunSummary),
    /// A locked item was requested; open the shop instead
    ShowShop,
    Sound(SoundEffect),
}

/// Seed stride between consecutive runs
const SEED_STEP: u64 = 0x9e37_79b9_7f4a_7c15;

/// Drives one player's runs
pub struct SessionController {
    profile: Profile,
    settings: Settings,
    phase: SessionPhase,
    mode: GameMode,
    /// Requested map; may be locked until `start` checks it
    map: MapKind,
    run: Option<RunState>,
    pointer: Vec2,
    next_seed: u64,
    tutorial_showing: bool,
    last_summary: Option<RunSummary>,
    events: Vec<SessionEvent>,
}

impl SessionController {
    pub fn new(mut profile: Profile, settings: Settings, seed: u64) -> Self {
        if profile.grant_welcome_bonus() {
            profile.save();
        }
        log::info!(
            "Session ready: {} coins, best {}m, {} on {}",
            profile.total_coins,
            profile.high_score,
            profile.mode.as_str(),
            profile.map.as_str()
        );

        Self {
            mode: profile.mode,
            map: profile.map,
            profile,
            settings,
            phase: SessionPhase::Start,
            run: None,
            pointer: Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            next_seed: seed,
            tutorial_showing: false,
            last_summary: None,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn map(&self) -> MapKind {
        self.map
    }

    /// Active run, if any
    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    pub fn is_tutorial_showing(&self) -> bool {
        self.tutorial_showing
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the preferences; particle cap applies from the next run
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings.save();
    }

    // === Configuration (menu only) ===

    /// Apply a menu selection in one call
    pub fn configure(&mut self, mode: GameMode, map: MapKind, character: &str) {
        self.set_mode(mode);
        self.set_map(map);
        self.select_character(character);
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        if !self.in_menu("set_mode") {
            return;
        }
        self.mode = mode;
        self.profile.set_mode(mode);
        self.profile.save();
    }

    /// Request a map. Locked maps are remembered; `start` redirects to the shop.
    pub fn set_map(&mut self, map: MapKind) {
        if !self.in_menu("set_map") {
            return;
        }
        self.map = map;
        if self.profile.select_map(map) {
            self.profile.save();
        }
    }

    /// Select an owned character. Returns false and opens the shop if locked.
    pub fn select_character(&mut self, id: &str) -> bool {
        if !self.in_menu("select_character") {
            return false;
        }
        if self.profile.select_character(id) {
            self.profile.save();
            true
        } else {
            log::debug!("Character {} is locked", id);
            self.events.push(SessionEvent::ShowShop);
            false
        }
    }

    pub fn buy_character(&mut self, id: &str) -> Purchase {
        let result = self.profile.buy_character(id);
        self.after_purchase(result)
    }

    pub fn buy_map(&mut self, map: MapKind) -> Purchase {
        let result = self.profile.buy_map(map);
        if result == Purchase::Bought {
            self.map = map;
        }
        self.after_purchase(result)
    }

    fn after_purchase(&mut self, result: Purchase) -> Purchase {
        if result == Purchase::Bought {
            self.profile.save();
            self.events.push(SessionEvent::Sound(SoundEffect::Coin));
        }
        result
    }

    // === Lifecycle ===

    /// Start a run with the current selection
    pub fn start(&mut self) {
        if !self.in_menu("start") {
            return;
        }
        self.events.push(SessionEvent::Sound(SoundEffect::Button));
        if !self.profile.owns_map(self.map) {
            log::info!("Map {} is locked, opening shop", self.map.as_str());
            self.events.push(SessionEvent::ShowShop);
            return;
        }
        self.begin_run();
    }

    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Playing {
            log::debug!("Ignoring pause in {}", self.phase.as_str());
            return;
        }
        self.phase = SessionPhase::Paused;
        log::info!("Paused");
    }

    pub fn resume(&mut self) {
        if self.phase != SessionPhase::Paused {
            log::debug!("Ignoring resume in {}", self.phase.as_str());
            return;
        }
        self.phase = SessionPhase::Playing;
        log::info!("Resumed");
    }

    /// Fresh run with the same configuration (pause menu or game over)
    pub fn restart(&mut self) {
        if !self.can_leave_run("restart") {
            return;
        }
        self.events.push(SessionEvent::Sound(SoundEffect::Button));
        self.begin_run();
    }

    /// Abandon the run and go back to the menu
    pub fn return_to_menu(&mut self) {
        if !self.can_leave_run("return_to_menu") {
            return;
        }
        self.events.push(SessionEvent::Sound(SoundEffect::Button));
        self.run = None;
        self.tutorial_showing = false;
        self.phase = SessionPhase::Start;
        log::info!("Back to menu");
    }

    /// True once retry/menu are offered after a crash
    pub fn game_over_ready(&self) -> bool {
        matches!(self.phase, SessionPhase::GameOver { since_ms } if since_ms >= GAME_OVER_DELAY_MS)
    }

    // === Input ===

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer = Vec2::new(x, y);
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Tap at the pointer position
    pub fn trigger_hit(&mut self) {
        if self.phase != SessionPhase::Playing {
            log::debug!("Ignoring tap in {}", self.phase.as_str());
            return;
        }
        let Some(run) = self.run.as_mut() else {
            return;
        };

        let report = sim::apply_hit(run, self.pointer);
        if report.hits > 0 && self.tutorial_showing {
            self.tutorial_showing = false;
            self.profile.tutorial_done = true;
            self.profile.save();
            self.events.push(SessionEvent::TutorialDismissed);
            log::debug!("Tutorial dismissed");
        }
        self.relay_run_events();
    }

    // === Frame ===

    /// Advance by one frame of real time (milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        match self.phase {
            SessionPhase::Playing => {
                let Some(run) = self.run.as_mut() else {
                    return;
                };
                sim::tick(run, sim::clamp_frame_ms(dt_ms));
                self.relay_run_events();
                if self.run.as_ref().is_some_and(|r| r.crashed) {
                    self.finish_run();
                }
            }
            SessionPhase::GameOver { since_ms } => {
                // Real time: the gate is not bound by the simulation step cap
                let elapsed = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
                self.phase = SessionPhase::GameOver {
                    since_ms: since_ms + elapsed,
                };
            }
            SessionPhase::Start | SessionPhase::Paused => {}
        }
    }

    /// Snapshot for drawing; `None` in the menu
    pub fn render_view(&self) -> Option<RenderView<'_>> {
        let run = self.run.as_ref()?;
        let mut view = RenderView::new(run, self.pointer);
        if !self.settings.effective_screen_shake() {
            view.screen_shake = 0.0;
        }
        if !self.settings.effective_crash_flash() {
            view.flash = 0.0;
        }
        Some(view)
    }

    fn begin_run(&mut self) {
        let config = SimConfig::new(self.mode, self.map)
            .with_look(self.profile.character().look)
            .with_max_particles(self.settings.max_particles());
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(SEED_STEP);

        log::info!(
            "Starting {} run on {} (seed {})",
            self.mode.as_str(),
            self.map.as_str(),
            seed
        );
        self.run = Some(RunState::new(config, seed));
        self.tutorial_showing = false;
        self.phase = SessionPhase::Playing;
    }

    /// Bank the crashed run and enter game over
    fn finish_run(&mut self) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        let distance = run.distance.floor() as u32;
        let (currency, smashed) = (run.currency, run.smashed);

        let new_high_score = self.profile.record_run(distance, currency);
        self.profile.save();

        let summary = RunSummary {
            distance,
            currency,
            smashed,
            high_score: self.profile.high_score,
            new_high_score,
            total_coins: self.profile.total_coins,
        };
        log::info!(
            "Run over: {}m, {} coins, {} smashed{}",
            distance,
            currency,
            smashed,
            if new_high_score { " (new best)" } else { "" }
        );

        self.tutorial_showing = false;
        self.last_summary = Some(summary);
        self.phase = SessionPhase::GameOver { since_ms: 0.0 };
        self.events.push(SessionEvent::RunEnded(summary));
    }

    /// Translate queued simulation events
    fn relay_run_events(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        for event in run.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.events.push(SessionEvent::Sound(effect));
            }
            match event {
                GameEvent::Progress(snapshot) => {
                    self.events.push(SessionEvent::Progress(snapshot));
                }
                GameEvent::Milestone { distance, message } => {
                    self.events.push(SessionEvent::Milestone {
                        distance,
                        message: message.to_string(),
                    });
                }
                GameEvent::TutorialShow => {
                    if !self.profile.tutorial_done && !self.tutorial_showing {
                        self.tutorial_showing = true;
                        self.events.push(SessionEvent::TutorialShow);
                    }
                }
                _ => {}
            }
        }
    }

    fn in_menu(&self, command: &str) -> bool {
        if self.phase == SessionPhase::Start {
            true
        } else {
            log::debug!("Ignoring {} in {}", command, self.phase.as_str());
            false
        }
    }

    fn can_leave_run(&self, command: &str) -> bool {
        let allowed = self.phase == SessionPhase::Paused || self.game_over_ready();
        if !allowed {
            log::debug!("Ignoring {} in {}", command, self.phase.as_str());
        }
        allowed
    }
}
