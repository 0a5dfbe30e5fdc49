//! Per-frame simulation tick
//!
//! Core loop that advances a run by one frame of real time. Every per-tick
//! delta is scaled by `dt / REFERENCE_FRAME_MS`, so a 30 Hz driver and a
//! 120 Hz driver cover the same ground per second.

use glam::Vec2;

use super::collision::{self, is_lethal};
use super::config::MapKind;
use super::particles::{self, LANDING_BURST, colors};
use super::spawner;
use super::state::{GameEvent, Motion, Obstacle, RunState};
use super::terrain;
use crate::consts::*;

/// Clamp a raw frame delta to what one tick may simulate.
///
/// Negative and non-finite deltas count as no time at all.
pub fn clamp_frame_ms(dt_ms: f32) -> f32 {
    if dt_ms.is_finite() {
        dt_ms.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    }
}

/// Speed for a given distance
#[inline]
pub fn speed_at(base_speed: f32, distance: f32) -> f32 {
    base_speed + distance / SPEED_RAMP_DIVISOR
}

/// Milestone message for a threshold
pub fn milestone_message(threshold: u32) -> &'static str {
    match threshold {
        0..500 => "Keep smashing!",
        500..1000 => "Unstoppable runner!",
        _ => "Legendary!",
    }
}

/// Advance the run by `dt_ms` milliseconds of real time.
///
/// Callers are expected to cap `dt_ms` (see [`clamp_frame_ms`]); only
/// negative and non-finite values are sanitized here. A crashed run does
/// not advance.
pub fn tick(state: &mut RunState, dt_ms: f32) {
    if state.crashed {
        return;
    }

    let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
    let m = dt_ms / REFERENCE_FRAME_MS;
    let map = state.config.map;

    // Distance, then speed from distance
    state.distance += state.speed * DISTANCE_SCALE * m;
    state.speed = speed_at(state.config.mode.base_speed(), state.distance);

    // Player rides the terrain
    let player_x = PLAYER_X + PLAYER_SIZE / 2.0;
    state.player_y = terrain::ground_height(player_x, state.distance, map) - PLAYER_SIZE;
    state.player_tilt = terrain::slope_angle(player_x, state.distance, map);

    spawner::tick_spawner(state, dt_ms);

    if map.has_snowfall() {
        particles::advance_snow(state, m);
    }

    check_milestones(state);

    advance_obstacles(state, m);

    // Collectibles scroll with the background
    let scroll = state.speed * m;
    for i in 0..state.collectibles.len() {
        state.collectibles[i].pos.x -= scroll;
        collision::check_pickup(state, i);
    }

    particles::advance_particles(&mut state.particles, m);

    // Drop what is behind the player or already resolved
    state.obstacles.retain(|o| o.pos.x > PRUNE_X && !o.smashed);
    state.collectibles.retain(|c| c.pos.x > PRUNE_X && !c.collected);

    // Feedback decays by a fixed amount per tick
    state.screen_shake = (state.screen_shake - 1.0).max(0.0);
    state.flash = (state.flash - 1.0).max(0.0);

    state.frame += 1;
    if state.frame % PROGRESS_EVERY_TICKS == 0 {
        let snapshot = state.progress();
        state.events.push(GameEvent::Progress(snapshot));
    }
}

/// Report every milestone threshold newly covered, lowest first
fn check_milestones(state: &mut RunState) {
    let reached = state.distance.floor() as u32;
    while state.last_milestone + MILESTONE_STEP <= reached {
        state.last_milestone += MILESTONE_STEP;
        let threshold = state.last_milestone;
        let message = milestone_message(threshold);
        log::debug!("Milestone {}m: {}", threshold, message);
        state.events.push(GameEvent::Milestone {
            distance: threshold,
            message,
        });
    }
}

/// Scroll, spin, drop or snap every obstacle, then run the lethal check.
///
/// Each obstacle gets exactly one update per tick; damage only ever arrives
/// between ticks.
fn advance_obstacles(state: &mut RunState, m: f32) {
    let map = state.config.map;
    let distance = state.distance;
    let speed = state.speed;
    let player_y = state.player_y;

    let mut landings: Vec<(u32, Vec2)> = Vec::new();
    let mut lethal: Option<u32> = None;

    for obs in state.obstacles.iter_mut() {
        if step_obstacle(obs, speed, distance, map, m) {
            landings.push((obs.id, Vec2::new(obs.center_x(), obs.pos.y + obs.size.y)));
        }
        if lethal.is_none() && is_lethal(obs, player_y) {
            lethal = Some(obs.id);
        }
    }

    for (id, at) in landings {
        state.events.push(GameEvent::Landed { id });
        particles::burst(state, at, colors::DUST, LANDING_BURST);
    }

    if let Some(id) = lethal {
        collision::crash(state, id);
    }
}

/// Move one obstacle. Returns true if it touched down this tick.
fn step_obstacle(obs: &mut Obstacle, speed: f32, distance: f32, map: MapKind, m: f32) -> bool {
    obs.pos.x -= speed * obs.scroll_factor * m;
    obs.rotation += obs.spin * m;

    let ground = terrain::ground_height(obs.center_x(), distance, map);
    let rest_y = ground - obs.size.y;

    match obs.motion {
        Motion::Falling => {
            obs.pos.y += speed * FALL_SPEED_FACTOR * m;
            if obs.pos.y >= rest_y {
                obs.pos.y = rest_y;
                obs.motion = Motion::Grounded;
                return true;
            }
            false
        }
        Motion::Grounded => {
            obs.pos.y = rest_y;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::apply_hit;
    use crate::sim::spawner::spawn_obstacle;
    use crate::sim::{Collectible, GameMode, ObstacleKind, SimConfig};
    use proptest::prelude::*;

    const FRAME: f32 = REFERENCE_FRAME_MS;

    /// Smash everything on screen, the way a perfect player would
    fn clear_path(state: &mut RunState) {
        for i in 0..state.obstacles.len() {
            while !state.obstacles[i].smashed {
                let target = state.obstacles[i].center();
                apply_hit(state, target);
            }
        }
    }

    fn milestones(events: &[GameEvent]) -> Vec<(u32, &'static str)> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Milestone { distance, message } => Some((*distance, *message)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_speed_follows_distance() {
        let mut state = RunState::new(SimConfig::default(), 1);
        let before = state.distance;
        tick(&mut state, FRAME);
        assert!(state.distance > before);
        assert!((state.distance - BASE_SPEED_EASY * DISTANCE_SCALE).abs() < 1e-5);
        assert_eq!(state.speed, speed_at(BASE_SPEED_EASY, state.distance));
    }

    #[test]
    fn test_first_milestone_fires_once() {
        let mut state = RunState::new(SimConfig::new(GameMode::Easy, MapKind::Forest), 2024);
        let mut events = Vec::new();

        while state.distance < 100.0 {
            clear_path(&mut state);
            tick(&mut state, FRAME);
            events.extend(state.drain_events());
            assert!(!state.crashed, "perfect play never crashes");
        }

        assert_eq!(milestones(&events), vec![(100, "Keep smashing!")]);
        assert_eq!(state.last_milestone, 100);
    }

    #[test]
    fn test_large_jump_fires_every_threshold_in_order() {
        let mut state = RunState::new(SimConfig::default(), 3);
        state.distance = 95.0;
        // 10_000 * 0.01 * 3 frames = 300 more distance in one tick
        state.speed = 10_000.0;
        tick(&mut state, FRAME * 3.0);

        let fired = milestones(&state.drain_events());
        assert_eq!(
            fired.iter().map(|m| m.0).collect::<Vec<_>>(),
            vec![100, 200, 300]
        );
        assert_eq!(state.last_milestone, 300);

        // Nothing fires again until the next threshold
        state.speed = 1.0;
        tick(&mut state, FRAME);
        assert!(milestones(&state.drain_events()).is_empty());
    }

    #[test]
    fn test_milestone_tiers() {
        assert_eq!(milestone_message(100), "Keep smashing!");
        assert_eq!(milestone_message(400), "Keep smashing!");
        assert_eq!(milestone_message(500), "Unstoppable runner!");
        assert_eq!(milestone_message(900), "Unstoppable runner!");
        assert_eq!(milestone_message(1000), "Legendary!");
        assert_eq!(milestone_message(4200), "Legendary!");
    }

    #[test]
    fn test_collision_ends_run_regardless_of_health() {
        let mut state = RunState::new(SimConfig::default(), 4);
        let id = spawn_obstacle(&mut state, ObstacleKind::Log);
        {
            let obs = &mut state.obstacles[0];
            obs.health = 200;
            obs.max_health = 200;
            obs.pos.x = PLAYER_X;
        }
        state.events.clear();

        tick(&mut state, FRAME);
        assert!(state.crashed);
        assert!(state.events.contains(&GameEvent::Crash { id }));
        // Contact never damages or smashes the obstacle
        assert!(!state.obstacles[0].smashed);
        assert_eq!(state.obstacles[0].health, 200);
        assert_eq!(state.smashed, 0);

        // Frozen from here on
        let distance = state.distance;
        tick(&mut state, FRAME);
        assert_eq!(state.distance, distance);
    }

    #[test]
    fn test_falling_obstacle_is_lethal() {
        let mut state = RunState::new(SimConfig::new(GameMode::Hard, MapKind::Forest), 12);
        let id = spawn_obstacle(&mut state, ObstacleKind::Crate);
        state.obstacles[0].pos = Vec2::new(PLAYER_X, state.player_y - 20.0);
        assert!(state.obstacles[0].is_falling());
        state.events.clear();

        tick(&mut state, FRAME);
        assert!(state.crashed);
        assert!(state.events.contains(&GameEvent::Crash { id }));
        let obs = &state.obstacles[0];
        assert!(obs.is_falling(), "still airborne when it hit");
        assert!(!obs.smashed);
    }

    #[test]
    fn test_easy_coin_scrolls_into_player() {
        let mut state = RunState::new(SimConfig::new(GameMode::Easy, MapKind::Forest), 13);
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            // Just ahead of the player; one frame of scrolling brings it in
            pos: Vec2::new(PLAYER_X + PLAYER_SIZE + 2.0, state.player_y + 10.0),
            size: Vec2::splat(COLLECTIBLE_SIZE),
            collected: false,
        });

        tick(&mut state, FRAME);
        assert_eq!(state.currency, 1);
        assert!(state.events.contains(&GameEvent::Collect { id, value: 1 }));
        // Collected coins are pruned in the same tick
        assert!(state.collectibles.is_empty());

        for _ in 0..5 {
            tick(&mut state, FRAME);
        }
        assert_eq!(state.currency, 1);
    }

    #[test]
    fn test_hard_crate_lands_exactly_once() {
        let mut state = RunState::new(SimConfig::new(GameMode::Hard, MapKind::Forest), 77);
        state.spawner.obstacle_timer = f32::INFINITY;
        let id = spawn_obstacle(&mut state, ObstacleKind::Crate);
        state.obstacles[0].pos.x = CANVAS_WIDTH;

        let crate_ref = |s: &RunState| s.obstacles.iter().find(|o| o.id == id).cloned();
        let start = crate_ref(&state).expect("crate spawned");
        assert!(start.is_falling());
        assert!(start.pos.y + start.size.y < 0.0, "starts above the visible area");

        let mut landed = 0;
        for _ in 0..200 {
            tick(&mut state, FRAME);
            landed += state
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::Landed { id })
                .count();
            let obs = crate_ref(&state).expect("crate still on screen");
            if !obs.is_falling() {
                break;
            }
        }

        for _ in 0..10 {
            tick(&mut state, FRAME);
            landed += state
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::Landed { id })
                .count();
        }

        let obs = crate_ref(&state).expect("crate still on screen");
        assert_eq!(landed, 1);
        assert_eq!(obs.motion, Motion::Grounded);
        let ground = state.ground_at(obs.center_x());
        assert!((obs.pos.y - (ground - obs.size.y)).abs() < 1e-3);
    }

    #[test]
    fn test_progress_every_second_tick() {
        let mut state = RunState::new(SimConfig::default(), 5);
        let mut reports = 0;
        for _ in 0..10 {
            tick(&mut state, FRAME);
            reports += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Progress(_)))
                .count();
        }
        assert_eq!(reports, 5);
    }

    #[test]
    fn test_obstacles_pruned_behind_player() {
        let mut state = RunState::new(SimConfig::default(), 6);
        spawn_obstacle(&mut state, ObstacleKind::Crate);
        state.obstacles[0].pos.x = PRUNE_X + 1.0;
        tick(&mut state, FRAME);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_smashed_obstacles_are_pruned() {
        let mut state = RunState::new(SimConfig::default(), 6);
        spawn_obstacle(&mut state, ObstacleKind::Crate);
        let target = state.obstacles[0].center();
        apply_hit(&mut state, target);
        tick(&mut state, FRAME);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.smashed, 1);
    }

    #[test]
    fn test_feedback_decays_to_zero() {
        let mut state = RunState::new(SimConfig::default(), 7);
        state.screen_shake = 2.0;
        state.flash = 1.0;
        tick(&mut state, FRAME);
        assert_eq!(state.screen_shake, 1.0);
        assert_eq!(state.flash, 0.0);
        tick(&mut state, FRAME);
        assert_eq!(state.screen_shake, 0.0);
    }

    #[test]
    fn test_zero_dt_moves_nothing() {
        let mut state = RunState::new(SimConfig::default(), 8);
        spawn_obstacle(&mut state, ObstacleKind::Rock);
        let x = state.obstacles[0].pos.x;
        tick(&mut state, 0.0);
        tick(&mut state, -5.0);
        tick(&mut state, f32::NAN);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.obstacles[0].pos.x, x);
    }

    #[test]
    fn test_clamp_frame_ms() {
        assert_eq!(clamp_frame_ms(16.0), 16.0);
        assert_eq!(clamp_frame_ms(500.0), MAX_FRAME_MS);
        assert_eq!(clamp_frame_ms(-1.0), 0.0);
        assert_eq!(clamp_frame_ms(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two runs with the same seed see the same obstacles
        let mut a = RunState::new(SimConfig::new(GameMode::Hard, MapKind::Beach), 99999);
        let mut b = RunState::new(SimConfig::new(GameMode::Hard, MapKind::Beach), 99999);
        for _ in 0..300 {
            tick(&mut a, FRAME);
            tick(&mut b, FRAME);
        }
        assert_eq!(a.distance.to_bits(), b.distance.to_bits());
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.pos, y.pos);
        }
    }

    proptest! {
        #[test]
        fn prop_distance_never_decreases(frames in proptest::collection::vec(-20.0f32..80.0, 1..200)) {
            let mut state = RunState::new(SimConfig::default(), 1234);
            let mut last = state.distance;
            for dt in frames {
                tick(&mut state, clamp_frame_ms(dt));
                prop_assert!(state.distance >= last);
                prop_assert!(state.speed >= 0.0);
                prop_assert_eq!(state.speed, speed_at(BASE_SPEED_EASY, state.distance));
                last = state.distance;
            }
        }

        #[test]
        fn prop_health_stays_in_range(taps in proptest::collection::vec((0.0f32..900.0, 0.0f32..450.0), 0..60)) {
            let mut state = RunState::new(SimConfig::new(GameMode::Hard, MapKind::Road), 55);
            for kind in ObstacleKind::ALL {
                spawn_obstacle(&mut state, kind);
            }
            for (x, y) in taps {
                apply_hit(&mut state, Vec2::new(x, y));
                for obs in &state.obstacles {
                    prop_assert!(obs.health <= obs.max_health);
                    prop_assert_eq!(obs.smashed, obs.health == 0);
                }
            }
        }
    }
}
