//! Clear Ahead - A side-scrolling tap-to-smash arcade runner
//!
//! Core modules:
//! - `sim`: Run simulation (terrain, spawning, collisions, per-tick update)
//! - `session`: Run lifecycle and configuration bridging
//! - `catalog`: Characters and maps offered in the shop
//! - `profile`: Persisted player progress (coins, unlocks, selections)
//! - `settings`: Persisted preferences
//! - `audio`: Sound cue recipes and Web Audio playback

pub mod audio;
pub mod catalog;
pub mod profile;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{Character, CharacterLook, MapItem};
pub use profile::{Profile, Purchase};
pub use session::{RunSummary, SessionController, SessionEvent, SessionPhase};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Logical canvas size (all positions are in canvas pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 450.0;

    /// Frame interval every per-tick delta is expressed against (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 16.67;
    /// Largest frame delta a single tick may simulate
    pub const MAX_FRAME_MS: f32 = 50.0;

    /// Terrain baseline and clamp range
    pub const BASE_GROUND_Y: f32 = 320.0;
    pub const MIN_GROUND_Y: f32 = 150.0;
    pub const MAX_GROUND_Y: f32 = CANVAS_HEIGHT - 60.0;
    /// Canvas pixels of terrain scrolled per unit of distance
    pub const WORLD_SCALE: f32 = 100.0;

    /// Player sprite (fixed horizontal position, square)
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Lethal hitbox inset (sides, bottom)
    pub const PLAYER_HITBOX_INSET_X: f32 = 12.0;
    pub const PLAYER_HITBOX_INSET_BOTTOM: f32 = 5.0;

    /// Distance gained per unit of speed per reference frame
    pub const DISTANCE_SCALE: f32 = 0.01;
    /// Distance needed to gain one unit of speed
    pub const SPEED_RAMP_DIVISOR: f32 = 250.0;
    pub const BASE_SPEED_EASY: f32 = 5.0;
    pub const BASE_SPEED_HARD: f32 = 6.0;

    /// Obstacle cadence (ms)
    pub const OBSTACLE_INTERVAL_EASY: f32 = 2000.0;
    pub const OBSTACLE_INTERVAL_HARD: f32 = 1600.0;
    pub const OBSTACLE_MIN_INTERVAL: f32 = 900.0;
    /// Interval shrink per unit of speed (ms)
    pub const OBSTACLE_INTERVAL_DECAY: f32 = 30.0;
    pub const FIRST_OBSTACLE_DELAY: f32 = 1000.0;

    /// Collectible cadence (ms)
    pub const COLLECTIBLE_INTERVAL: f32 = 1200.0;
    pub const FIRST_COLLECTIBLE_DELAY: f32 = 1500.0;
    pub const COLLECTIBLE_SIZE: f32 = 20.0;

    /// Spawn edge and prune edge (canvas x)
    pub const SPAWN_X: f32 = CANVAS_WIDTH + 100.0;
    pub const PRUNE_X: f32 = -300.0;
    /// Falling crates start above the visible area
    pub const FALLING_SPAWN_Y: f32 = -100.0;
    /// Fall speed as a fraction of run speed
    pub const FALL_SPEED_FACTOR: f32 = 0.8;
    /// Hard-mode rocks outrun the background
    pub const HARD_ROCK_SCROLL: f32 = 1.4;
    /// Rolling rock spin per reference frame (radians)
    pub const ROCK_SPIN: f32 = 0.15;

    /// Forgiving margin around obstacles for taps
    pub const HIT_TOLERANCE: f32 = 30.0;

    /// Distance between milestone notifications
    pub const MILESTONE_STEP: u32 = 100;
    /// Progress snapshot cadence (ticks)
    pub const PROGRESS_EVERY_TICKS: u64 = 2;

    /// Feedback intensities on crash, decayed by one per tick
    pub const CRASH_SHAKE: f32 = 15.0;
    pub const CRASH_FLASH: f32 = 20.0;

    /// Particle physics per reference frame
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const PARTICLE_DECAY: f32 = 0.02;
    /// Default particle cap
    pub const MAX_PARTICLES: usize = 256;

    /// Retry/menu unlock delay after a crash (ms)
    pub const GAME_OVER_DELAY_MS: f32 = 2000.0;
}

/// Initialize logging for the current platform.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::try_init();
    }
}

