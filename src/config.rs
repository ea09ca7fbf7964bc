//! Burst configuration.
//!
//! A [`BurstConfig`] is the fully resolved option set for one confetti
//! burst: every field has a concrete value by the time it reaches the
//! factory, so spawning never consults defaults or the environment.
//!
//! # Quick Start
//!
//! ```ignore
//! use confetti::{BurstConfig, Simulation};
//!
//! let mut sim = Simulation::new(1280, 720);
//!
//! // Stock cannon: 50 particles straight up from the given origin
//! sim.fire(&BurstConfig::default().with_origin(640.0, 720.0));
//!
//! // Tuned burst
//! sim.fire(
//!     &BurstConfig::default()
//!         .with_origin(640.0, 360.0)
//!         .with_particle_count(150)
//!         .with_spread(70.0)
//!         .with_start_velocity(35.0),
//! );
//! ```
//!
//! # Presets
//!
//! Common celebration patterns as one-liners, in the spirit of the stock
//! browser effect:
//!
//! ```ignore
//! sim.fire(&BurstConfig::fireworks(640.0, 300.0));
//! sim.fire(&BurstConfig::snow(1280.0));
//! sim.fire(&BurstConfig::side_cannon(0.0, 500.0, 45.0));
//! ```

use crate::color::Color;
use crate::shape::Shape;

/// Resolved configuration for one confetti burst.
///
/// Angles are degrees, positions are pixels in surface space (y grows
/// downward), and lifetimes are ticks - one tick per rendered frame,
/// independent of wall-clock time.
#[derive(Debug, Clone)]
pub struct BurstConfig {
    /// Number of particles the burst spawns.
    pub particle_count: u32,
    /// Launch direction in degrees; 90 is straight up.
    pub angle: f32,
    /// Cone width around the launch direction, in degrees.
    pub spread: f32,
    /// Base launch speed in pixels per tick; each particle samples
    /// 0.5-1.5× this value.
    pub start_velocity: f32,
    /// Geometric velocity damping per tick (0 < decay ≤ 1).
    pub decay: f32,
    /// Downward pull. 1 is full gravity, 0 floats.
    pub gravity: f32,
    /// Constant horizontal bias per tick; positive drifts right.
    pub drift: f32,
    /// Lifespan budget in ticks.
    pub ticks: u32,
    /// Burst origin x in pixels.
    pub origin_x: f32,
    /// Burst origin y in pixels.
    pub origin_y: f32,
    /// Palette sampled per particle. Never empty.
    pub colors: Vec<Color>,
    /// Shape set sampled per particle. Never empty.
    pub shapes: Vec<Shape>,
    /// Uniform size multiplier for all shapes.
    pub scalar: f32,
    /// Disable wobble so shapes stay upright (text/emoji bitmaps).
    pub flat: bool,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            angle: 90.0,
            spread: 45.0,
            start_velocity: 45.0,
            decay: 0.9,
            gravity: 1.0,
            drift: 0.0,
            ticks: 200,
            origin_x: 0.0,
            origin_y: 0.0,
            colors: Color::default_palette(),
            shapes: vec![Shape::Square, Shape::Circle],
            scalar: 1.0,
            flat: false,
        }
    }
}

impl BurstConfig {
    /// Create a config with stock defaults.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Firework pop: a dense radial burst at the given point.
    pub fn fireworks(x: f32, y: f32) -> Self {
        Self {
            particle_count: 120,
            spread: 360.0,
            start_velocity: 30.0,
            decay: 0.92,
            ticks: 100,
            origin_x: x,
            origin_y: y,
            scalar: 1.2,
            ..Self::default()
        }
    }

    /// Slow white flakes drifting down from the top edge.
    ///
    /// `width` is the surface width; the origin is centered on it.
    pub fn snow(width: f32) -> Self {
        Self {
            particle_count: 80,
            angle: 270.0,
            spread: 100.0,
            start_velocity: 8.0,
            decay: 0.96,
            gravity: 0.4,
            drift: 1.0,
            ticks: 300,
            origin_x: width / 2.0,
            origin_y: 0.0,
            colors: vec![Color::rgb(0xff, 0xff, 0xff)],
            shapes: vec![Shape::Circle],
            scalar: 0.8,
            ..Self::default()
        }
    }

    /// Edge cannon aimed into the scene, for paired left/right volleys.
    pub fn side_cannon(x: f32, y: f32, angle: f32) -> Self {
        Self {
            particle_count: 60,
            angle,
            spread: 55.0,
            start_velocity: 55.0,
            origin_x: x,
            origin_y: y,
            ..Self::default()
        }
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    /// Set the number of particles to spawn.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the launch angle in degrees (90 = straight up).
    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }

    /// Set the spread cone width in degrees.
    pub fn with_spread(mut self, degrees: f32) -> Self {
        self.spread = degrees;
        self
    }

    /// Set the base launch speed in pixels per tick.
    pub fn with_start_velocity(mut self, velocity: f32) -> Self {
        self.start_velocity = velocity;
        self
    }

    /// Set the per-tick velocity damping factor.
    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    /// Set the gravity multiplier (1 = full, 0 = float).
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the horizontal drift per tick.
    pub fn with_drift(mut self, drift: f32) -> Self {
        self.drift = drift;
        self
    }

    /// Set the lifespan budget in ticks. Clamped to at least 1 so age
    /// progress stays finite.
    pub fn with_ticks(mut self, ticks: u32) -> Self {
        self.ticks = ticks.max(1);
        self
    }

    /// Set the burst origin in pixels.
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Replace the color palette. An empty palette is ignored - the
    /// factory relies on at least one color being present.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        if !colors.is_empty() {
            self.colors = colors;
        }
        self
    }

    /// Replace the shape set. An empty set is ignored - the factory
    /// relies on at least one shape being present.
    pub fn with_shapes(mut self, shapes: Vec<Shape>) -> Self {
        if !shapes.is_empty() {
            self.shapes = shapes;
        }
        self
    }

    /// Set the uniform size multiplier.
    pub fn with_scalar(mut self, scalar: f32) -> Self {
        self.scalar = scalar;
        self
    }

    /// Pin shapes upright by disabling wobble.
    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BurstConfig::default();
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.angle, 90.0);
        assert_eq!(config.ticks, 200);
        assert_eq!(config.colors.len(), 7);
        assert_eq!(config.shapes.len(), 2);
    }

    #[test]
    fn test_builder_chain() {
        let config = BurstConfig::new()
            .with_origin(100.0, 200.0)
            .with_particle_count(10)
            .with_spread(0.0);
        assert_eq!(config.origin_x, 100.0);
        assert_eq!(config.origin_y, 200.0);
        assert_eq!(config.particle_count, 10);
        assert_eq!(config.spread, 0.0);
    }

    #[test]
    fn test_empty_sets_ignored() {
        let config = BurstConfig::new().with_colors(vec![]).with_shapes(vec![]);
        assert!(!config.colors.is_empty());
        assert!(!config.shapes.is_empty());
    }

    #[test]
    fn test_ticks_clamped_to_one() {
        assert_eq!(BurstConfig::new().with_ticks(0).ticks, 1);
    }
}
