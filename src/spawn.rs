//! Particle factory.
//!
//! [`spawn_particle`] converts a resolved [`BurstConfig`] into one
//! particle's initial kinematic and visual state. It is a pure function of
//! the configuration and the random source carried by [`SpawnContext`] -
//! no side effects, no error paths.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

use crate::config::BurstConfig;
use crate::particle::Particle;

/// Context for spawning one particle: its index within the burst plus the
/// random source.
///
/// ```ignore
/// let config = BurstConfig::default().with_origin(640.0, 720.0);
/// let particles: Vec<Particle> = (0..config.particle_count)
///     .map(|i| {
///         let mut ctx = SpawnContext::new(i, config.particle_count);
///         spawn_particle(&config, &mut ctx)
///     })
///     .collect();
/// ```
pub struct SpawnContext {
    /// Index of the particle being spawned (0 to count-1).
    pub index: u32,
    /// Total number of particles in the burst.
    pub count: u32,
    /// Internal RNG - use the helper methods instead of accessing directly.
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a spawn context seeded from the index and the current time,
    /// so runs differ but particles within a run are reproducible.
    pub fn new(index: u32, count: u32) -> Self {
        let seed = index as u64
            ^ std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42);
        Self::seeded(index, count, seed)
    }

    /// Create a spawn context with an explicit seed, for deterministic
    /// bursts.
    pub fn seeded(index: u32, count: u32, seed: u64) -> Self {
        Self {
            index,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Normalized progress through the burst (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        self.index as f32 / self.count as f32
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    /// Uniformly pick one element of a non-empty slice.
    #[inline]
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }
}

/// Build one particle from a resolved configuration.
///
/// Initial direction is the negated launch angle (surface y grows
/// downward) with the spread cone applied as `0.5·spread − uniform(0,
/// spread)`; gravity is pre-scaled ×3 here so the per-tick update adds it
/// directly.
pub fn spawn_particle(config: &BurstConfig, ctx: &mut SpawnContext) -> Particle {
    let rad_angle = config.angle.to_radians();
    let rad_spread = config.spread.to_radians();

    Particle {
        x: config.origin_x,
        y: config.origin_y,
        wobble: ctx.random() * 10.0,
        wobble_speed: (ctx.random() * 0.1 + 0.05).min(0.11),
        velocity: config.start_velocity * 0.5 + ctx.random() * config.start_velocity,
        direction: -rad_angle + (0.5 * rad_spread - ctx.random() * rad_spread),
        tilt_angle: ctx.random_range(0.25, 0.75) * PI,
        color: *ctx.pick(&config.colors),
        shape: ctx.pick(&config.shapes).clone(),
        tick: 0,
        total_ticks: config.ticks.max(1),
        decay: config.decay,
        drift: config.drift,
        random: ctx.random() + 2.0,
        tilt_sin: 0.0,
        tilt_cos: 0.0,
        wobble_x: 0.0,
        wobble_y: 0.0,
        gravity: config.gravity * 3.0,
        scalar: config.scalar,
        flat: config.flat,
        progress: 0.0,
    }
}
