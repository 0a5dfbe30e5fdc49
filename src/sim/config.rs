//! Per-run configuration
//!
//! Everything a run needs to know about the outside world is captured here
//! at run start and never changes until the next run.

use serde::{Deserialize, Serialize};

use crate::catalog::CharacterLook;
use crate::consts::*;

/// Difficulty mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Easy,
    Hard,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Easy => "EASY",
            GameMode::Hard => "HARD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(GameMode::Easy),
            "hard" => Some(GameMode::Hard),
            _ => None,
        }
    }

    /// Starting speed of a run
    pub fn base_speed(&self) -> f32 {
        match self {
            GameMode::Easy => BASE_SPEED_EASY,
            GameMode::Hard => BASE_SPEED_HARD,
        }
    }

    /// Obstacle interval before speed shortens it (ms)
    pub fn obstacle_interval(&self) -> f32 {
        match self {
            GameMode::Easy => OBSTACLE_INTERVAL_EASY,
            GameMode::Hard => OBSTACLE_INTERVAL_HARD,
        }
    }

    /// Extra health added to every obstacle
    pub fn health_bonus(&self) -> u8 {
        match self {
            GameMode::Easy => 0,
            GameMode::Hard => 1,
        }
    }

    /// Currency per collectible
    pub fn coin_value(&self) -> u32 {
        match self {
            GameMode::Easy => 1,
            GameMode::Hard => 2,
        }
    }
}

/// Map (terrain shape, obstacle table and theme)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapKind {
    #[default]
    Forest,
    Snow,
    Road,
    Beach,
}

impl MapKind {
    pub const ALL: [MapKind; 4] = [MapKind::Forest, MapKind::Snow, MapKind::Road, MapKind::Beach];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapKind::Forest => "FOREST",
            MapKind::Snow => "SNOW",
            MapKind::Road => "ROAD",
            MapKind::Beach => "BEACH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forest" => Some(MapKind::Forest),
            "snow" => Some(MapKind::Snow),
            "road" => Some(MapKind::Road),
            "beach" => Some(MapKind::Beach),
            _ => None,
        }
    }

    /// Flat maps damp every terrain wave
    pub fn is_flat(&self) -> bool {
        matches!(self, MapKind::Road | MapKind::Beach)
    }

    /// Whether hard-mode rocks visibly roll on this map
    pub fn rocks_roll(&self) -> bool {
        !matches!(self, MapKind::Road | MapKind::Snow)
    }

    /// Whether the map carries falling snow
    pub fn has_snowfall(&self) -> bool {
        *self == MapKind::Snow
    }
}

/// Immutable configuration for one run
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    pub mode: GameMode,
    pub map: MapKind,
    /// Appearance of the selected character (renderer only)
    pub look: CharacterLook,
    /// Particle cap (cosmetic)
    pub max_particles: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Easy,
            map: MapKind::Forest,
            look: CharacterLook::default(),
            max_particles: MAX_PARTICLES,
        }
    }
}

impl SimConfig {
    pub fn new(mode: GameMode, map: MapKind) -> Self {
        Self {
            mode,
            map,
            ..Default::default()
        }
    }

    pub fn with_look(mut self, look: CharacterLook) -> Self {
        self.look = look;
        self
    }

    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }
}
