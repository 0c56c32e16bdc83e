/// Random generation: enemy spawns, explosion bursts and the starfield.
///
/// All randomness comes through the injected `rng`, so callers control
/// determinism (tests use a seeded `StdRng`).

use rand::Rng;

use crate::entities::{
    Enemy, Particle, Playfield, Star, ENEMY_MAX_SPEED, ENEMY_MIN_SPEED, ENEMY_SPAWN_Y,
    ENEMY_WIDTH,
};
use crate::render::Rgb;

/// Particles per explosion.
pub const EXPLOSION_PARTICLES: usize = 8;
/// Largest particle velocity component.
pub const EXPLOSION_SPREAD: f32 = 3.0;

/// One spawn draw: with probability `spawn_rate`, an enemy at a random column
/// just above the top edge.
pub fn maybe_spawn_enemy(field: &Playfield, spawn_rate: f32, rng: &mut impl Rng) -> Option<Enemy> {
    if rng.gen::<f32>() >= spawn_rate {
        return None;
    }
    let x = rng.gen::<f32>() * (field.width - ENEMY_WIDTH).max(0.0);
    let speed = rng.gen_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED);
    Enemy::new(x, ENEMY_SPAWN_Y, speed).ok()
}

/// A burst of fading particles at `(x, y)`.
pub fn explosion(x: f32, y: f32, color: Rgb, rng: &mut impl Rng) -> Vec<Particle> {
    (0..EXPLOSION_PARTICLES)
        .filter_map(|_| {
            let speed_x = rng.gen_range(-EXPLOSION_SPREAD..=EXPLOSION_SPREAD);
            let speed_y = rng.gen_range(-EXPLOSION_SPREAD..=EXPLOSION_SPREAD);
            Particle::new(x, y, speed_x, speed_y, color).ok()
        })
        .collect()
}

/// Scatter `count` stars over the whole playfield.
pub fn starfield(field: &Playfield, count: usize, rng: &mut impl Rng) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            x: rng.gen::<f32>() * field.width,
            y: rng.gen::<f32>() * field.height,
            speed: rng.gen_range(0.5..2.5),
            size: rng.gen_range(1.0..3.0),
        })
        .collect()
}
