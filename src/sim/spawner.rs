//! Obstacle and collectible spawning
//!
//! Two logical countdowns advanced only from inside `tick`. Obstacles come
//! faster as the run speeds up; collectibles keep a fixed cadence.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{GameMode, MapKind};
use super::state::{Collectible, GameEvent, Motion, Obstacle, ObstacleKind, RunState};
use super::terrain;
use crate::consts::*;

/// Countdown timers (ms)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub obstacle_timer: f32,
    pub collectible_timer: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            obstacle_timer: FIRST_OBSTACLE_DELAY,
            collectible_timer: FIRST_COLLECTIBLE_DELAY,
        }
    }
}

/// Size and toughness of one obstacle type on one map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpec {
    pub width: f32,
    pub height: f32,
    pub health: u8,
}

const fn spec(width: f32, height: f32, health: u8) -> ObstacleSpec {
    ObstacleSpec {
        width,
        height,
        health,
    }
}

/// Base obstacle table for a map (before the difficulty bonus)
pub fn obstacle_spec(map: MapKind, kind: ObstacleKind) -> ObstacleSpec {
    match (map, kind) {
        (MapKind::Beach, ObstacleKind::Crate) => spec(60.0, 45.0, 2),
        (MapKind::Beach, ObstacleKind::Rock) => spec(30.0, 30.0, 1),
        (MapKind::Beach, ObstacleKind::Log) => spec(110.0, 55.0, 3),
        (MapKind::Road, ObstacleKind::Crate) => spec(40.0, 40.0, 1),
        (MapKind::Road, ObstacleKind::Rock) => spec(70.0, 35.0, 2),
        (MapKind::Road, ObstacleKind::Log) => spec(110.0, 55.0, 3),
        (_, ObstacleKind::Crate) => spec(40.0, 40.0, 1),
        (_, ObstacleKind::Rock) => spec(50.0, 55.0, 2),
        (_, ObstacleKind::Log) => spec(70.0, 80.0, 3),
    }
}

/// Next obstacle interval at the given speed (ms)
pub fn obstacle_interval(mode: GameMode, speed: f32) -> f32 {
    (mode.obstacle_interval() - speed * OBSTACLE_INTERVAL_DECAY).max(OBSTACLE_MIN_INTERVAL)
}

/// Count down both timers by `dt_ms`, spawning whatever comes due
pub fn tick_spawner(state: &mut RunState, dt_ms: f32) {
    tick_obstacle_timer(state, dt_ms);
    tick_collectible_timer(state, dt_ms);
}

/// Count down the obstacle timer; spawn and rearm when it runs out
pub fn tick_obstacle_timer(state: &mut RunState, dt_ms: f32) {
    state.spawner.obstacle_timer -= dt_ms;
    if state.spawner.obstacle_timer <= 0.0 {
        let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
        spawn_obstacle(state, kind);
        state.spawner.obstacle_timer = obstacle_interval(state.config.mode, state.speed);
    }
}

/// Count down the collectible timer; spawn and rearm when it runs out
pub fn tick_collectible_timer(state: &mut RunState, dt_ms: f32) {
    state.spawner.collectible_timer -= dt_ms;
    if state.spawner.collectible_timer <= 0.0 {
        spawn_collectible(state);
        state.spawner.collectible_timer = COLLECTIBLE_INTERVAL;
    }
}

/// Add an obstacle of `kind` to the run. Returns its id.
///
/// Hard-mode crates drop in from above somewhere in the right 40% of the
/// screen; everything else rests on the terrain at the spawn edge.
pub fn spawn_obstacle(state: &mut RunState, kind: ObstacleKind) -> u32 {
    let mode = state.config.mode;
    let map = state.config.map;
    let base = obstacle_spec(map, kind);
    let health = base.health + mode.health_bonus();
    let size = Vec2::new(base.width, base.height);

    let (pos, motion) = if mode == GameMode::Hard && kind == ObstacleKind::Crate {
        let x = CANVAS_WIDTH * (0.6 + state.rng.random::<f32>() * 0.4);
        (Vec2::new(x, FALLING_SPAWN_Y), Motion::Falling)
    } else {
        let ground = terrain::ground_height(SPAWN_X, state.distance, map);
        (Vec2::new(SPAWN_X, ground - size.y), Motion::Grounded)
    };

    let hard_rock = mode == GameMode::Hard && kind == ObstacleKind::Rock;
    let scroll_factor = if hard_rock { HARD_ROCK_SCROLL } else { 1.0 };
    let spin = if hard_rock && map.rocks_roll() {
        -ROCK_SPIN
    } else {
        0.0
    };

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        pos,
        size,
        health,
        max_health: health,
        smashed: false,
        motion,
        rotation: 0.0,
        spin,
        scroll_factor,
    });
    log::debug!("Spawned {:?} #{} ({:?}, hp {})", kind, id, motion, health);

    if !state.tutorial_triggered {
        state.tutorial_triggered = true;
        state.events.push(GameEvent::TutorialShow);
    }

    id
}

/// Add a coin floating 25-40 px above the ground at the spawn edge. Returns its id.
pub fn spawn_collectible(state: &mut RunState) -> u32 {
    let ground = terrain::ground_height(SPAWN_X, state.distance, state.config.map);
    let lift = 25.0 + state.rng.random::<f32>() * 15.0;
    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        pos: Vec2::new(SPAWN_X, ground - lift),
        size: Vec2::splat(COLLECTIBLE_SIZE),
        collected: false,
    });
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;

    fn run(mode: GameMode, map: MapKind) -> RunState {
        RunState::new(SimConfig::new(mode, map), 42)
    }

    #[test]
    fn test_interval_shrinks_with_speed_and_is_floored() {
        assert_eq!(obstacle_interval(GameMode::Easy, 5.0), 1850.0);
        assert!(obstacle_interval(GameMode::Easy, 10.0) < obstacle_interval(GameMode::Easy, 5.0));
        assert_eq!(obstacle_interval(GameMode::Easy, 1000.0), OBSTACLE_MIN_INTERVAL);
        assert_eq!(obstacle_interval(GameMode::Hard, 1000.0), OBSTACLE_MIN_INTERVAL);
    }

    #[test]
    fn test_first_obstacle_after_initial_delay() {
        let mut state = run(GameMode::Easy, MapKind::Forest);
        tick_obstacle_timer(&mut state, FIRST_OBSTACLE_DELAY - 1.0);
        assert!(state.obstacles.is_empty());
        tick_obstacle_timer(&mut state, 1.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawner.obstacle_timer, obstacle_interval(GameMode::Easy, state.speed));
    }

    #[test]
    fn test_tutorial_fires_once() {
        let mut state = run(GameMode::Easy, MapKind::Forest);
        spawn_obstacle(&mut state, ObstacleKind::Rock);
        spawn_obstacle(&mut state, ObstacleKind::Log);
        let shows = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::TutorialShow)
            .count();
        assert_eq!(shows, 1);
    }

    #[test]
    fn test_grounded_spawn_rests_on_terrain() {
        let mut state = run(GameMode::Easy, MapKind::Forest);
        spawn_obstacle(&mut state, ObstacleKind::Log);
        let obs = &state.obstacles[0];
        assert_eq!(obs.motion, Motion::Grounded);
        assert_eq!(obs.pos.x, SPAWN_X);
        let ground = terrain::ground_height(SPAWN_X, 0.0, MapKind::Forest);
        assert!((obs.pos.y + obs.size.y - ground).abs() < 1e-4);
        assert_eq!(obs.health, 3);
        assert_eq!(obs.max_health, 3);
    }

    #[test]
    fn test_hard_mode_adds_health() {
        let mut state = run(GameMode::Hard, MapKind::Beach);
        spawn_obstacle(&mut state, ObstacleKind::Rock);
        assert_eq!(state.obstacles[0].health, 2);
        assert_eq!(state.obstacles[0].size, Vec2::new(30.0, 30.0));
    }

    #[test]
    fn test_hard_crates_fall_from_above() {
        let mut state = run(GameMode::Hard, MapKind::Forest);
        for _ in 0..20 {
            spawn_obstacle(&mut state, ObstacleKind::Crate);
        }
        for obs in &state.obstacles {
            assert!(obs.is_falling());
            assert_eq!(obs.pos.y, FALLING_SPAWN_Y);
            assert!(obs.pos.x >= CANVAS_WIDTH * 0.6 && obs.pos.x <= CANVAS_WIDTH);
        }
    }

    #[test]
    fn test_hard_rocks_roll_only_on_rolling_maps() {
        let mut forest = run(GameMode::Hard, MapKind::Forest);
        spawn_obstacle(&mut forest, ObstacleKind::Rock);
        assert_eq!(forest.obstacles[0].scroll_factor, HARD_ROCK_SCROLL);
        assert_eq!(forest.obstacles[0].spin, -ROCK_SPIN);

        let mut road = run(GameMode::Hard, MapKind::Road);
        spawn_obstacle(&mut road, ObstacleKind::Rock);
        assert_eq!(road.obstacles[0].scroll_factor, HARD_ROCK_SCROLL);
        assert_eq!(road.obstacles[0].spin, 0.0);

        let mut easy = run(GameMode::Easy, MapKind::Forest);
        spawn_obstacle(&mut easy, ObstacleKind::Rock);
        assert_eq!(easy.obstacles[0].scroll_factor, 1.0);
    }

    #[test]
    fn test_collectible_floats_above_ground() {
        let mut state = run(GameMode::Easy, MapKind::Forest);
        tick_collectible_timer(&mut state, FIRST_COLLECTIBLE_DELAY);
        assert_eq!(state.collectibles.len(), 1);
        assert_eq!(state.spawner.collectible_timer, COLLECTIBLE_INTERVAL);
        let coin = &state.collectibles[0];
        let ground = terrain::ground_height(SPAWN_X, 0.0, MapKind::Forest);
        let lift = ground - coin.pos.y;
        assert!((25.0..=40.0).contains(&lift));
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let kinds = |seed| {
            let mut state = RunState::new(SimConfig::default(), seed);
            for _ in 0..10 {
                state.spawner.obstacle_timer = 0.0;
                tick_obstacle_timer(&mut state, 1.0);
            }
            state.obstacles.iter().map(|o| o.kind).collect::<Vec<_>>()
        };
        assert_eq!(kinds(9), kinds(9));
    }
}
