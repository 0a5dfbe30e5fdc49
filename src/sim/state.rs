//! Run state and entity types
//!
//! A `RunState` is created at run start, mutated only by `tick` and the hit
//! resolver, and dropped when the run is abandoned or replaced.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::spawner::Spawner;
use super::terrain;
use crate::consts::*;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Crate,
    Rock,
    Log,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Crate, ObstacleKind::Rock, ObstacleKind::Log];
}

/// Vertical motion of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Snapped to the terrain every tick
    Grounded,
    /// Dropping from above until it meets the terrain
    Falling,
}

/// An obstacle entity (axis-aligned box, y down, `pos` is the top-left corner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u8,
    pub max_health: u8,
    /// Terminal: excluded from collisions and rendering
    pub smashed: bool,
    pub motion: Motion,
    /// Render rotation (radians)
    pub rotation: f32,
    /// Rotation per reference frame (0 = static)
    pub spin: f32,
    /// Scroll speed relative to the background
    pub scroll_factor: f32,
}

impl Obstacle {
    pub fn is_falling(&self) -> bool {
        self.motion == Motion::Falling
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Canvas x of the obstacle's center column
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// A coin floating above the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Terminal
    pub collected: bool,
}

/// A particle for visual feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// RGBA, `0xRRGGBBAA`
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
}

/// Ambient snowflake (Snow map)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snowflake {
    pub pos: Vec2,
    pub fall_speed: f32,
    pub size: f32,
}

/// Throttled progress report for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub distance: f32,
    pub currency: u32,
    pub smashed: u32,
    pub speed: f32,
}

/// Events produced while simulating; drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// An obstacle took damage but survived
    Tap { id: u32 },
    /// An obstacle was destroyed
    Smash { id: u32, kind: ObstacleKind },
    /// A collectible was picked up
    Collect { id: u32, value: u32 },
    /// The player ran into an obstacle; the run is over
    Crash { id: u32 },
    /// A falling obstacle reached the ground
    Landed { id: u32 },
    /// A distance milestone was crossed
    Milestone { distance: u32, message: &'static str },
    /// First obstacle of the run appeared
    TutorialShow,
    Progress(ProgressSnapshot),
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct RunState {
    pub config: SimConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (obstacle types, drop positions, coin heights)
    pub rng: Pcg32,
    /// Cosmetic RNG (particles, snow); never consulted by gameplay
    pub fx_rng: Pcg32,
    pub distance: f32,
    pub speed: f32,
    pub currency: u32,
    pub smashed: u32,
    /// Derived from the terrain every tick
    pub player_y: f32,
    pub player_tilt: f32,
    /// Highest milestone threshold already reported
    pub last_milestone: u32,
    /// Simulation tick counter
    pub frame: u64,
    pub spawner: Spawner,
    pub tutorial_triggered: bool,
    /// Set by a lethal collision; a crashed run no longer advances
    pub crashed: bool,
    pub screen_shake: f32,
    pub flash: f32,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,
    pub snowflakes: Vec<Snowflake>,
    /// Pending events (see [`RunState::drain_events`])
    pub events: Vec<GameEvent>,
    next_id: u32,
}

/// Snowflakes kept alive on the Snow map
pub const SNOWFLAKE_COUNT: usize = 50;

/// Stream id of the cosmetic RNG
const FX_STREAM: u64 = 0x5eed_f00d;

impl RunState {
    /// Create a fresh run
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut fx_rng = Pcg32::seed_from_u64(seed ^ FX_STREAM);
        let snowflakes = if config.map.has_snowfall() {
            (0..SNOWFLAKE_COUNT)
                .map(|_| super::particles::random_snowflake(&mut fx_rng))
                .collect()
        } else {
            Vec::new()
        };

        let player_x = PLAYER_X + PLAYER_SIZE / 2.0;
        let player_y = terrain::ground_height(player_x, 0.0, config.map) - PLAYER_SIZE;
        let player_tilt = terrain::slope_angle(player_x, 0.0, config.map);

        Self {
            speed: config.mode.base_speed(),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng,
            distance: 0.0,
            currency: 0,
            smashed: 0,
            player_y,
            player_tilt,
            last_milestone: 0,
            frame: 0,
            spawner: Spawner::new(),
            tutorial_triggered: false,
            crashed: false,
            screen_shake: 0.0,
            flash: 0.0,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            snowflakes,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            distance: self.distance,
            currency: self.currency,
            smashed: self.smashed,
            speed: self.speed,
        }
    }

    /// Player sprite bounds as (top-left, size)
    pub fn player_bounds(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(PLAYER_X, self.player_y),
            Vec2::splat(PLAYER_SIZE),
        )
    }

    /// Ground height at `canvas_x` for the current distance
    pub fn ground_at(&self, canvas_x: f32) -> f32 {
        terrain::ground_height(canvas_x, self.distance, self.config.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameMode, MapKind};

    #[test]
    fn test_new_run_defaults() {
        let state = RunState::new(SimConfig::new(GameMode::Hard, MapKind::Forest), 7);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.speed, BASE_SPEED_HARD);
        assert_eq!(state.currency, 0);
        assert_eq!(state.last_milestone, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.snowflakes.is_empty());
        assert!((state.player_y - (state.ground_at(PLAYER_X + PLAYER_SIZE / 2.0) - PLAYER_SIZE)).abs() < 1e-4);
    }

    #[test]
    fn test_snow_map_has_snowflakes() {
        let state = RunState::new(SimConfig::new(GameMode::Easy, MapKind::Snow), 7);
        assert_eq!(state.snowflakes.len(), SNOWFLAKE_COUNT);
    }

    #[test]
    fn test_entity_ids_are_monotonic() {
        let mut state = RunState::new(SimConfig::default(), 1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}
