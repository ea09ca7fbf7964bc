//! # confetti - CPU confetti particle engine
//!
//! Celebration bursts simulated and rasterized entirely in software: a
//! tick-based particle simulation draws onto an RGBA pixel canvas, and an
//! optional window viewer presents the finished frames.
//!
//! ## Quick Start
//!
//! ```ignore
//! use confetti::{BurstConfig, Simulation, Viewer};
//!
//! let mut sim = Simulation::new(1280, 720);
//! sim.fire(&BurstConfig::default().with_origin(640.0, 720.0));
//!
//! // Present in a window...
//! Viewer::new(sim).run()?;
//!
//! // ...or render headless and export the frames yourself:
//! let mut sim = Simulation::new(1280, 720);
//! sim.fire(&BurstConfig::fireworks(640.0, 300.0));
//! while sim.frame() {
//!     // sim.surface() holds the RGBA pixels for this frame
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Bursts
//!
//! A [`BurstConfig`] is a fully resolved option set - launch angle,
//! spread cone, start velocity, decay, gravity, drift, tick budget,
//! origin, palette, shapes. [`Simulation::fire`] turns it into particles
//! and starts the frame loop if it was idle.
//!
//! ### Ticks
//!
//! Particle lifetime is counted in ticks - one tick per rendered frame,
//! never wall-clock time. A particle dies when its tick budget runs out
//! or it falls below the viewport, and fades linearly all the way there.
//!
//! ### Shapes
//!
//! Five silhouettes, resolved at construction time: squares, circles,
//! stars, custom SVG path outlines, and RGBA bitmaps. See [`Shape`].
//!
//! ### Simulation states
//!
//! | State | Meaning |
//! |-------|---------|
//! | Idle | no particles, no scheduled frame, surface released if internal |
//! | Running | live particles, one frame pass at a time |
//!
//! The loop terminates itself when the last particle dies; [`Simulation::reset`]
//! forces it at any time. Each [`Simulation`] is fully self-contained, so
//! independent instances can run side by side.

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod particle;
pub mod render;
pub mod shape;
pub mod simulation;
pub mod spawn;
pub mod time;
pub mod viewer;

pub use canvas::Canvas;
pub use color::Color;
pub use config::BurstConfig;
pub use error::{ColorError, ShapeError, ViewerError};
pub use glam::Vec2;
pub use particle::Particle;
pub use render::{draw_particle, Capabilities};
pub use shape::{BitmapShape, PathShape, Shape};
pub use simulation::Simulation;
pub use spawn::{spawn_particle, SpawnContext};
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use confetti::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::color::Color;
    pub use crate::config::BurstConfig;
    pub use crate::render::Capabilities;
    pub use crate::shape::Shape;
    pub use crate::simulation::Simulation;
    pub use crate::spawn::{spawn_particle, SpawnContext};
    pub use crate::viewer::Viewer;
    pub use crate::Vec2;
}
