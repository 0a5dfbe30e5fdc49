//! Procedural terrain
//!
//! Ground height is a closed-form sum of sines over world position, so any
//! canvas column can be sampled at any distance without storing history.

use super::config::MapKind;
use crate::consts::*;

/// (amplitude, wavelength) of each terrain wave, largest first
const WAVES: [(f32, f32); 4] = [(40.0, 800.0), (30.0, 300.0), (15.0, 150.0), (8.0, 60.0)];

/// Amplitude multiplier on flat maps
const FLAT_FACTOR: f32 = 0.2;

/// Horizontal offset of the forward sample used for slopes
pub const SLOPE_SAMPLE_DX: f32 = 10.0;

/// Ground surface y (canvas pixels, y down) under `canvas_x` after the run
/// has covered `distance`.
pub fn ground_height(canvas_x: f32, distance: f32, map: MapKind) -> f32 {
    let world_x = canvas_x + distance * WORLD_SCALE;
    let factor = if map.is_flat() { FLAT_FACTOR } else { 1.0 };

    let waves: f32 = WAVES
        .iter()
        .map(|&(amplitude, wavelength)| (world_x / wavelength).sin() * amplitude * factor)
        .sum();

    (BASE_GROUND_Y + waves).clamp(MIN_GROUND_Y, MAX_GROUND_Y)
}

/// Slope angle (radians) of the ground at `canvas_x`; positive means downhill
/// to the right.
pub fn slope_angle(canvas_x: f32, distance: f32, map: MapKind) -> f32 {
    let here = ground_height(canvas_x, distance, map);
    let ahead = ground_height(canvas_x + SLOPE_SAMPLE_DX, distance, map);
    (ahead - here).atan2(SLOPE_SAMPLE_DX)
}
