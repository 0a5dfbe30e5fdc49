//! Cosmetic effects: particle bursts and ambient snow
//!
//! Nothing here feeds back into gameplay. All randomness comes from the
//! run's cosmetic RNG stream.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::config::MapKind;
use super::state::{ObstacleKind, Particle, RunState, Snowflake};
use crate::consts::*;

/// Particle colors (`0xRRGGBBAA`)
pub mod colors {
    pub const COIN_GOLD: u32 = 0xffd700ff;
    pub const DUST: u32 = 0xffffff80;
    pub const WOOD: u32 = 0x8b4513ff;
    pub const SNOW: u32 = 0xffffffff;
    pub const BARRIER_RED: u32 = 0xe74c3cff;
    pub const ASPHALT: u32 = 0x333333ff;
    pub const WATER: u32 = 0x3498dbff;
}

/// Burst sizes
pub const SMASH_BURST: usize = 15;
pub const TAP_BURST: usize = 5;
pub const COIN_BURST: usize = 8;
pub const LANDING_BURST: usize = 4;

/// Debris color for an obstacle on a given map
pub fn debris_color(map: MapKind, kind: ObstacleKind) -> u32 {
    match map {
        MapKind::Road if kind == ObstacleKind::Crate => colors::BARRIER_RED,
        MapKind::Road => colors::ASPHALT,
        MapKind::Snow => colors::SNOW,
        MapKind::Forest => colors::WOOD,
        MapKind::Beach => colors::WATER,
    }
}

/// Spawn `count` particles at `origin`, respecting the run's particle cap
pub fn burst(state: &mut RunState, origin: Vec2, color: u32, count: usize) {
    let room = state
        .config
        .max_particles
        .saturating_sub(state.particles.len());

    for _ in 0..count.min(room) {
        let rng = &mut state.fx_rng;
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 8.0,
            (rng.random::<f32>() - 2.0) * 6.0,
        );
        let size = rng.random::<f32>() * 5.0 + 2.0;
        state.particles.push(Particle {
            pos: origin,
            vel,
            size,
            color,
            life: 1.0,
        });
    }
}

/// Advance particles by one tick (`m` = frame multiplier) and drop dead ones
pub fn advance_particles(particles: &mut Vec<Particle>, m: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * m;
        p.vel.y += PARTICLE_GRAVITY * m;
        p.life -= PARTICLE_DECAY * m;
    }
    particles.retain(|p| p.life > 0.0);
}

/// A snowflake somewhere on screen
pub fn random_snowflake(rng: &mut Pcg32) -> Snowflake {
    Snowflake {
        pos: Vec2::new(
            rng.random::<f32>() * CANVAS_WIDTH,
            rng.random::<f32>() * CANVAS_HEIGHT,
        ),
        fall_speed: 0.5 + rng.random::<f32>() * 1.5,
        size: 2.0 + rng.random::<f32>() * 3.0,
    }
}

/// Drift snow with the run: fall, scroll at half speed, wrap around the canvas
pub fn advance_snow(state: &mut RunState, m: f32) {
    let drift = state.speed * 0.5 * m;
    for flake in state.snowflakes.iter_mut() {
        flake.pos.y += flake.fall_speed * m;
        flake.pos.x -= drift;
        if flake.pos.y > CANVAS_HEIGHT {
            flake.pos.y = -10.0;
            flake.pos.x = state.fx_rng.random::<f32>() * CANVAS_WIDTH;
        }
        if flake.pos.x < 0.0 {
            flake.pos.x = CANVAS_WIDTH;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameMode, SimConfig};

    #[test]
    fn test_particles_fall_and_expire() {
        let mut particles = vec![Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            size: 3.0,
            color: colors::WOOD,
            life: 1.0,
        }];

        advance_particles(&mut particles, 1.0);
        assert_eq!(particles[0].pos, Vec2::new(1.0, -2.0));
        assert!((particles[0].vel.y - (-2.0 + PARTICLE_GRAVITY)).abs() < 1e-6);
        assert!((particles[0].life - 0.98).abs() < 1e-6);

        // Life runs out after ~50 reference frames
        for _ in 0..60 {
            advance_particles(&mut particles, 1.0);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_burst_respects_cap() {
        let config = SimConfig::new(GameMode::Easy, MapKind::Forest).with_max_particles(10);
        let mut state = RunState::new(config, 3);
        burst(&mut state, Vec2::ZERO, colors::WOOD, 8);
        burst(&mut state, Vec2::ZERO, colors::WOOD, 8);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_burst_particles_start_alive() {
        let mut state = RunState::new(SimConfig::default(), 3);
        burst(&mut state, Vec2::new(5.0, 6.0), colors::COIN_GOLD, COIN_BURST);
        assert_eq!(state.particles.len(), COIN_BURST);
        for p in &state.particles {
            assert_eq!(p.life, 1.0);
            assert_eq!(p.pos, Vec2::new(5.0, 6.0));
            assert!((2.0..7.0).contains(&p.size));
            assert!(p.vel.y <= 0.0);
        }
    }

    #[test]
    fn test_debris_colors() {
        assert_eq!(debris_color(MapKind::Road, ObstacleKind::Crate), colors::BARRIER_RED);
        assert_eq!(debris_color(MapKind::Road, ObstacleKind::Log), colors::ASPHALT);
        assert_eq!(debris_color(MapKind::Forest, ObstacleKind::Rock), colors::WOOD);
    }

    #[test]
    fn test_snow_wraps_inside_canvas() {
        let mut state = RunState::new(SimConfig::new(GameMode::Easy, MapKind::Snow), 11);
        for _ in 0..500 {
            advance_snow(&mut state, 1.0);
        }
        for flake in &state.snowflakes {
            assert!(flake.pos.x >= 0.0 && flake.pos.x <= CANVAS_WIDTH);
            assert!(flake.pos.y >= -10.0 && flake.pos.y <= CANVAS_HEIGHT);
        }
    }
}
