//! Read-only render snapshot
//!
//! Taken once per drawn frame. Borrowing the run keeps the renderer from
//! mutating anything.

use glam::Vec2;
use serde::Serialize;

use super::config::MapKind;
use super::state::{Collectible, Obstacle, Particle, RunState, Snowflake};
use super::terrain;
use crate::catalog::CharacterLook;
use crate::consts::*;

/// Where and how the player sprite is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerPose {
    /// Top-left corner of the sprite
    pub pos: Vec2,
    pub size: f32,
    /// Terrain tilt (radians)
    pub tilt: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderView<'a> {
    pub map: MapKind,
    pub look: CharacterLook,
    pub distance: f32,
    pub frame: u64,
    pub player: PlayerPose,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    pub particles: &'a [Particle],
    pub snowflakes: &'a [Snowflake],
    pub screen_shake: f32,
    pub flash: f32,
    /// Last known pointer position (crosshair)
    pub pointer: Vec2,
}

impl<'a> RenderView<'a> {
    pub fn new(state: &'a RunState, pointer: Vec2) -> Self {
        Self {
            map: state.config.map,
            look: state.config.look,
            distance: state.distance,
            frame: state.frame,
            player: PlayerPose {
                pos: Vec2::new(PLAYER_X, state.player_y),
                size: PLAYER_SIZE,
                tilt: state.player_tilt,
            },
            obstacles: &state.obstacles,
            collectibles: &state.collectibles,
            particles: &state.particles,
            snowflakes: &state.snowflakes,
            screen_shake: state.screen_shake,
            flash: state.flash,
            pointer,
        }
    }

    /// Obstacles that should be drawn (smashed ones are skipped)
    pub fn visible_obstacles(&self) -> impl Iterator<Item = &'a Obstacle> + 'a {
        self.obstacles.iter().filter(|o| !o.smashed)
    }

    /// Sample the ground under a canvas column
    pub fn ground_at(&self, canvas_x: f32) -> f32 {
        terrain::ground_height(canvas_x, self.distance, self.map)
    }

    /// Ground outline across the canvas, one point every `step` pixels
    pub fn ground_profile(&self, step: f32) -> Vec<Vec2> {
        let step = step.max(1.0);
        let columns = (CANVAS_WIDTH / step).ceil() as usize;
        (0..=columns)
            .map(|i| {
                let x = (i as f32 * step).min(CANVAS_WIDTH);
                Vec2::new(x, self.ground_at(x))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner::spawn_obstacle;
    use crate::sim::{ObstacleKind, SimConfig};

    #[test]
    fn test_view_mirrors_state() {
        let mut state = RunState::new(SimConfig::default(), 1);
        spawn_obstacle(&mut state, ObstacleKind::Crate);
        spawn_obstacle(&mut state, ObstacleKind::Rock);
        state.obstacles[0].smashed = true;
        state.obstacles[0].health = 0;

        let view = RenderView::new(&state, Vec2::new(3.0, 4.0));
        assert_eq!(view.obstacles.len(), 2);
        assert_eq!(view.visible_obstacles().count(), 1);
        assert_eq!(view.player.pos.y, state.player_y);
        assert_eq!(view.pointer, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_ground_profile_spans_canvas() {
        let state = RunState::new(SimConfig::default(), 1);
        let view = RenderView::new(&state, Vec2::ZERO);
        let profile = view.ground_profile(10.0);
        assert_eq!(profile.len(), 81);
        assert_eq!(profile[0].x, 0.0);
        assert_eq!(profile[80].x, CANVAS_WIDTH);
        assert_eq!(profile[0].y, view.ground_at(0.0));
    }
}
