//! Run simulation module
//!
//! All gameplay logic lives here:
//! - Frame-rate independent: every delta scales with elapsed time
//! - Seeded RNG only, cosmetic randomness on its own stream
//! - Events are queued on the run and drained by the caller
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod config;
pub mod particles;
pub mod spawner;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod view;

pub use collision::{Aabb, HitReport, apply_hit};
pub use config::{GameMode, MapKind, SimConfig};
pub use state::{
    Collectible, GameEvent, Motion, Obstacle, ObstacleKind, Particle, ProgressSnapshot, RunState,
    Snowflake,
};
pub use terrain::{ground_height, slope_angle};
pub use tick::{clamp_frame_ms, milestone_message, speed_at, tick};
pub use view::{PlayerPose, RenderView};
