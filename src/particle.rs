//! Particle state and per-tick physics.
//!
//! A particle's clock is its tick count - there is no wall-clock timing
//! anywhere in the simulation. One [`Particle::update`] call advances one
//! tick: integrate position, damp velocity, advance the wobble and tilt
//! phases, re-roll the jitter seed, and report whether the particle is
//! still alive.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::color::Color;
use crate::shape::Shape;

/// One confetti particle.
///
/// Built by [`crate::spawn::spawn_particle`]; mutated only by
/// [`Particle::update`] on the simulation thread.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position x in pixels.
    pub x: f32,
    /// Position y in pixels (grows downward).
    pub y: f32,
    /// Velocity magnitude in pixels per tick; decays geometrically.
    pub velocity: f32,
    /// Direction of travel in radians (surface convention: negated angle).
    pub direction: f32,
    /// Wobble phase driving lateral flutter and shape rotation.
    pub wobble: f32,
    /// Wobble phase advance per tick.
    pub wobble_speed: f32,
    /// Wobble-offset x, recomputed each tick.
    pub wobble_x: f32,
    /// Wobble-offset y, recomputed each tick.
    pub wobble_y: f32,
    /// Tilt phase for shape faceting.
    pub tilt_angle: f32,
    /// Cached sin of the tilt phase.
    pub tilt_sin: f32,
    /// Cached cos of the tilt phase.
    pub tilt_cos: f32,
    /// Elapsed ticks.
    pub tick: u32,
    /// Lifespan budget in ticks.
    pub total_ticks: u32,
    /// Velocity damping factor per tick.
    pub decay: f32,
    /// Downward acceleration per tick (pre-scaled at spawn).
    pub gravity: f32,
    /// Horizontal bias per tick.
    pub drift: f32,
    /// Jitter seed in [2, 3), re-rolled every tick; sizes the corner
    /// offsets of square/star silhouettes. Pinned to 1 when flat.
    pub random: f32,
    /// Fill color.
    pub color: Color,
    /// Silhouette.
    pub shape: Shape,
    /// Uniform size multiplier.
    pub scalar: f32,
    /// Wobble disabled; shape stays upright.
    pub flat: bool,
    /// Age fraction at the latest update, drives opacity.
    pub progress: f32,
}

impl Particle {
    /// Advance one tick. Returns whether the particle survives.
    ///
    /// `region_height` is the surface height in pixels; a particle below
    /// it is dead regardless of remaining ticks. The liveness check runs
    /// against the incremented tick while the opacity progress keeps the
    /// pre-increment value, so a particle's final draw still fades rather
    /// than popping.
    pub fn update(&mut self, rng: &mut SmallRng, region_height: f32) -> bool {
        self.x += self.direction.cos() * self.velocity + self.drift;
        self.y += self.direction.sin() * self.velocity + self.gravity;
        self.velocity *= self.decay;

        if self.flat {
            self.wobble = 0.0;
            self.wobble_x = self.x + 10.0 * self.scalar;
            self.wobble_y = self.y + 10.0 * self.scalar;
            self.tilt_sin = 0.0;
            self.tilt_cos = 0.0;
            self.random = 1.0;
        } else {
            self.wobble += self.wobble_speed;
            self.wobble_x = self.x + 10.0 * self.scalar * self.wobble.cos();
            self.wobble_y = self.y + 10.0 * self.scalar * self.wobble.sin();
            self.tilt_angle += 0.1;
            self.tilt_sin = self.tilt_angle.sin();
            self.tilt_cos = self.tilt_angle.cos();
            self.random = rng.gen::<f32>() + 2.0;
        }

        self.progress = self.tick as f32 / self.total_ticks as f32;
        self.tick += 1;

        self.tick < self.total_ticks && self.y < region_height
    }

    /// Opacity for the current tick: fades linearly from 1 to 0 over the
    /// lifespan.
    #[inline]
    pub fn opacity(&self) -> f32 {
        1.0 - self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_particle() -> Particle {
        Particle {
            x: 100.0,
            y: 100.0,
            velocity: 10.0,
            direction: -std::f32::consts::FRAC_PI_2,
            wobble: 0.0,
            wobble_speed: 0.08,
            wobble_x: 0.0,
            wobble_y: 0.0,
            tilt_angle: 0.5,
            tilt_sin: 0.0,
            tilt_cos: 0.0,
            tick: 0,
            total_ticks: 200,
            decay: 0.9,
            gravity: 3.0,
            drift: 0.0,
            random: 2.5,
            color: Color::rgb(255, 0, 0),
            shape: Shape::Square,
            scalar: 1.0,
            flat: false,
            progress: 0.0,
        }
    }

    #[test]
    fn test_velocity_decays_geometrically() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut p = test_particle();
        p.gravity = 0.0;
        let v0 = p.velocity;
        for _ in 0..10 {
            p.update(&mut rng, 10_000.0);
        }
        let expected = v0 * p.decay.powi(10);
        assert!((p.velocity - expected).abs() < 1e-3);
    }

    #[test]
    fn test_dies_exactly_at_tick_budget() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut p = test_particle();
        p.total_ticks = 5;
        for call in 1..=5u32 {
            let alive = p.update(&mut rng, 10_000.0);
            if call < 5 {
                assert!(alive, "alive through call {}", call);
            } else {
                assert!(!alive, "dead exactly at call 5");
            }
        }
        assert_eq!(p.tick, 5);
    }

    #[test]
    fn test_dies_below_region() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut p = test_particle();
        p.velocity = 0.0;
        p.gravity = 50.0;
        assert!(p.update(&mut rng, 400.0));
        assert!(p.update(&mut rng, 400.0));
        assert!(p.update(&mut rng, 400.0));
        assert!(p.update(&mut rng, 400.0));
        assert!(p.update(&mut rng, 400.0));
        // y = 100 + 6*50 = 400, no longer < 400
        assert!(!p.update(&mut rng, 400.0));
    }

    #[test]
    fn test_opacity_linear_in_ticks() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut p = test_particle();
        p.total_ticks = 10;
        for t in 0..10u32 {
            p.update(&mut rng, 10_000.0);
            let expected = 1.0 - t as f32 / 10.0;
            assert!((p.opacity() - expected).abs() < 1e-6);
            assert!(p.opacity() > 0.0);
        }
    }

    #[test]
    fn test_flat_pins_wobble() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut p = test_particle();
        p.flat = true;
        p.scalar = 2.0;
        for _ in 0..3 {
            p.update(&mut rng, 10_000.0);
            assert_eq!(p.wobble, 0.0);
            assert_eq!(p.wobble_x, p.x + 20.0);
            assert_eq!(p.wobble_y, p.y + 20.0);
            assert_eq!(p.tilt_sin, 0.0);
            assert_eq!(p.tilt_cos, 0.0);
            assert_eq!(p.random, 1.0);
        }
    }

    #[test]
    fn test_jitter_rerolled_every_tick() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut p = test_particle();
        p.update(&mut rng, 10_000.0);
        let first = p.random;
        assert!((2.0..3.0).contains(&first));
        p.update(&mut rng, 10_000.0);
        assert!((2.0..3.0).contains(&p.random));
        assert_ne!(p.random, first);
    }

    #[test]
    fn test_straight_up_kinematics() {
        // angle 90° negated: x frozen, y decreases by the velocity
        let mut rng = SmallRng::seed_from_u64(7);
        let mut p = test_particle();
        p.gravity = 0.0;
        p.total_ticks = 1;
        let alive = p.update(&mut rng, 10_000.0);
        assert!(!alive);
        assert!((p.x - 100.0).abs() < 1e-4);
        assert!((p.y - 90.0).abs() < 1e-4);
    }
}
