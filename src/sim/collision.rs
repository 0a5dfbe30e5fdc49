//! Collision detection and damage resolution
//!
//! Everything is axis-aligned: the player is a box, obstacles and coins are
//! boxes, and a tap is a point tested against an obstacle box grown by a
//! forgiving margin.

use glam::Vec2;

use super::particles::{self, COIN_BURST, SMASH_BURST, TAP_BURST, colors};
use super::state::{Collectible, GameEvent, Obstacle, RunState};
use crate::consts::*;

/// Axis-aligned box (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap; boxes that only share an edge do not touch
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Inclusive point test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Grow the box by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

impl Collectible {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Lethal hitbox: the sprite inset on the sides and at the feet
pub fn player_hitbox(player_y: f32) -> Aabb {
    Aabb {
        min: Vec2::new(PLAYER_X + PLAYER_HITBOX_INSET_X, player_y),
        max: Vec2::new(
            PLAYER_X + PLAYER_SIZE - PLAYER_HITBOX_INSET_X,
            player_y + PLAYER_SIZE - PLAYER_HITBOX_INSET_BOTTOM,
        ),
    }
}

/// Pickup box: the full sprite
pub fn player_pickup_box(player_y: f32) -> Aabb {
    Aabb::new(Vec2::new(PLAYER_X, player_y), Vec2::splat(PLAYER_SIZE))
}

/// Whether an obstacle would kill the player. Smashed obstacles never do;
/// remaining health is irrelevant.
pub fn is_lethal(obstacle: &Obstacle, player_y: f32) -> bool {
    !obstacle.smashed && player_hitbox(player_y).overlaps(&obstacle.bounds())
}

/// End the run because of obstacle `id`. Only the first crash counts.
pub fn crash(state: &mut RunState, id: u32) {
    if state.crashed {
        return;
    }
    state.crashed = true;
    state.screen_shake = CRASH_SHAKE;
    state.flash = CRASH_FLASH;
    state.events.push(GameEvent::Crash { id });
    log::info!(
        "Crashed into obstacle #{} at distance {:.1}",
        id,
        state.distance
    );
}

/// Pick up the collectible at `index` if the player touches it
pub fn check_pickup(state: &mut RunState, index: usize) {
    let pickup_box = player_pickup_box(state.player_y);
    let coin = &mut state.collectibles[index];
    if coin.collected || !pickup_box.overlaps(&coin.bounds()) {
        return;
    }

    coin.collected = true;
    let (id, at) = (coin.id, coin.pos);
    let value = state.config.mode.coin_value();
    state.currency += value;
    state.events.push(GameEvent::Collect { id, value });
    particles::burst(state, at, colors::COIN_GOLD, COIN_BURST);
}

/// Outcome of one tap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitReport {
    /// Obstacles damaged (smashed ones included)
    pub hits: u32,
    /// Obstacles destroyed by this tap
    pub smashes: u32,
}

/// Apply one tap at `point` to every live obstacle near it.
///
/// There is no z-order pick: overlapping obstacles are all damaged.
pub fn apply_hit(state: &mut RunState, point: Vec2) -> HitReport {
    let mut report = HitReport::default();
    if state.crashed {
        return report;
    }

    let map = state.config.map;
    let mut bursts = Vec::new();

    for obs in state.obstacles.iter_mut() {
        if obs.smashed || !obs.bounds().expand(HIT_TOLERANCE).contains(point) {
            continue;
        }

        obs.health = obs.health.saturating_sub(1);
        report.hits += 1;
        let color = particles::debris_color(map, obs.kind);

        if obs.health == 0 {
            obs.smashed = true;
            report.smashes += 1;
            state.smashed += 1;
            state.events.push(GameEvent::Smash {
                id: obs.id,
                kind: obs.kind,
            });
            bursts.push((obs.center(), color, SMASH_BURST));
        } else {
            state.events.push(GameEvent::Tap { id: obs.id });
            bursts.push((obs.center(), color, TAP_BURST));
        }
    }

    for (at, color, count) in bursts {
        particles::burst(state, at, color, count);
    }

    report
}
