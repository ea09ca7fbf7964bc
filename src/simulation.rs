//! Simulation context: the live particle set and its frame loop.
//!
//! A [`Simulation`] owns everything one confetti instance needs - the
//! live particles, the drawing surface, and the random source - so
//! multiple independent instances can run side by side. There is no
//! process-wide state.
//!
//! # State machine
//!
//! | State | Surface | Particles | Frames |
//! |-------|---------|-----------|--------|
//! | Idle | none (unless supplied) | empty | none scheduled |
//! | Running | allocated | non-empty | one pass per [`Simulation::frame`] |
//!
//! Firing a burst moves Idle → Running, lazily allocating the surface if
//! the caller didn't supply one. A frame whose filtering empties the set
//! moves Running → Idle and releases the surface if and only if the
//! simulation allocated it. [`Simulation::reset`] forces Running → Idle
//! at any time and is idempotent.
//!
//! # Quick Start
//!
//! ```ignore
//! use confetti::{BurstConfig, Simulation};
//!
//! let mut sim = Simulation::new(1280, 720);
//! sim.fire(&BurstConfig::default().with_origin(640.0, 720.0));
//!
//! // Drive it yourself...
//! while sim.frame() {}
//!
//! // ...or let the helper run it dry.
//! sim.fire(&BurstConfig::fireworks(640.0, 300.0));
//! sim.run_headless();
//! ```
//!
//! The whole engine is single-threaded and cooperative: one update+draw
//! pass at a time, appends only between passes. Particle lifetime is
//! counted in ticks, never wall-clock time.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::config::BurstConfig;
use crate::particle::Particle;
use crate::render::{self, Capabilities};
use crate::spawn::{spawn_particle, SpawnContext};

/// One independent confetti instance.
pub struct Simulation {
    particles: Vec<Particle>,
    canvas: Option<Canvas>,
    /// True when the simulation allocated the canvas itself (and so may
    /// release it); an externally supplied surface is never dropped.
    owns_canvas: bool,
    width: u32,
    height: u32,
    running: bool,
    capabilities: Capabilities,
    rng: SmallRng,
}

impl Simulation {
    /// Create an idle simulation for a `width × height` pixel viewport.
    /// The surface is allocated lazily on the first burst.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            particles: Vec::new(),
            canvas: None,
            owns_canvas: false,
            width,
            height,
            running: false,
            capabilities: Capabilities::all(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a simulation drawing onto a caller-supplied surface.
    ///
    /// The surface is kept (only cleared) across [`Simulation::reset`];
    /// releasing it is the caller's business.
    pub fn with_surface(canvas: Canvas) -> Self {
        let (width, height) = (canvas.width(), canvas.height());
        Self {
            particles: Vec::new(),
            canvas: Some(canvas),
            owns_canvas: false,
            width,
            height,
            running: false,
            capabilities: Capabilities::all(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Seed the random source for reproducible bursts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Restrict which shape variants the renderer rasterizes directly;
    /// the rest degrade to squares.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Whether a frame pass is scheduled (Running state).
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of live particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// The drawing surface, if one currently exists.
    #[inline]
    pub fn surface(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Viewport size in pixels, whether or not the surface is allocated.
    #[inline]
    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Spawn a burst and start the loop if idle.
    ///
    /// Declines silently - no particles, no loop - when no surface exists
    /// and none can be allocated (zero-area viewport). A best-effort
    /// visual never raises from here.
    pub fn fire(&mut self, config: &BurstConfig) {
        let count = config.particle_count;
        let mut burst = Vec::with_capacity(count as usize);
        for index in 0..count {
            let mut ctx = SpawnContext::seeded(index, count, self.rng.gen());
            burst.push(spawn_particle(config, &mut ctx));
        }
        self.append(burst);
    }

    /// Append pre-built particles to the live set, moving Idle → Running.
    ///
    /// Same surface rules as [`Simulation::fire`]: without a usable
    /// surface the append declines silently.
    pub fn append(&mut self, particles: Vec<Particle>) {
        if particles.is_empty() || !self.ensure_surface() {
            return;
        }
        self.particles.extend(particles);
        self.running = true;
    }

    /// Run one frame: clear, update every particle, drop the expired,
    /// draw the survivors. Returns `false` once the simulation is Idle
    /// (no pass ran, or this pass emptied the set).
    pub fn frame(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let Some(canvas) = self.canvas.as_mut() else {
            // Running without a surface cannot happen through the public
            // API; recover to Idle rather than panic mid-animation.
            self.running = false;
            self.particles.clear();
            return false;
        };

        canvas.clear();
        let region_height = canvas.height() as f32;
        let rng = &mut self.rng;
        let capabilities = &self.capabilities;
        self.particles.retain_mut(|particle| {
            let alive = particle.update(rng, region_height);
            // The dying tick still draws; the fade finishes on screen.
            render::draw_particle(canvas, particle, capabilities);
            alive
        });

        if self.particles.is_empty() {
            self.finish();
            return false;
        }
        true
    }

    /// Drive [`Simulation::frame`] until the set empties. Returns the
    /// number of frames run.
    pub fn run_headless(&mut self) -> u64 {
        if !self.running {
            return 0;
        }
        let mut frames = 0;
        loop {
            let more = self.frame();
            frames += 1;
            if !more {
                return frames;
            }
        }
    }

    /// Force Running → Idle: clear the set, cancel the loop, release the
    /// surface if this simulation allocated it. Safe to call repeatedly
    /// and from Idle.
    pub fn reset(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.clear();
        }
        self.particles.clear();
        self.running = false;
        if self.owns_canvas {
            self.canvas = None;
            self.owns_canvas = false;
        }
    }

    /// Allocate the lazy surface if needed. False when the viewport has
    /// no area and no external surface exists.
    fn ensure_surface(&mut self) -> bool {
        if self.canvas.is_some() {
            return true;
        }
        if self.width == 0 || self.height == 0 {
            return false;
        }
        self.canvas = Some(Canvas::new(self.width, self.height));
        self.owns_canvas = true;
        true
    }

    /// Loop exhausted: back to Idle, dropping an internally allocated
    /// surface.
    fn finish(&mut self) {
        self.running = false;
        if self.owns_canvas {
            self.canvas = None;
            self.owns_canvas = false;
        }
    }
}
