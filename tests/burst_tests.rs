//! Integration tests for the burst lifecycle.
//!
//! These drive the engine through its public surface only: configure a
//! burst, fire it into a simulation, and observe particle state, frame
//! behavior, and surface handling from outside.

use confetti::{BurstConfig, Canvas, Capabilities, Color, Shape, Simulation, SpawnContext};

// ============================================================================
// Factory properties
// ============================================================================

fn spawn_one(config: &BurstConfig, seed: u64) -> confetti::Particle {
    let mut ctx = SpawnContext::seeded(0, 1, seed);
    confetti::spawn_particle(config, &mut ctx)
}

#[test]
fn test_lifetime_is_exactly_the_tick_budget() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let mut rng = SmallRng::seed_from_u64(0);
    for total_ticks in [1u32, 2, 10, 200] {
        let config = BurstConfig::default()
            .with_origin(100.0, 100.0)
            .with_gravity(0.0)
            .with_ticks(total_ticks);
        let mut particle = spawn_one(&config, u64::from(total_ticks));
        // Keep it on screen so only the tick budget matters
        particle.gravity = 0.0;

        let mut deaths = 0;
        for call in 1..=total_ticks {
            let alive = particle.update(&mut rng, f32::INFINITY);
            if call == total_ticks {
                assert!(!alive, "dead exactly at call {}", call);
                deaths += 1;
            } else {
                assert!(alive, "alive at call {} of {}", call, total_ticks);
            }
        }
        assert_eq!(deaths, 1);
    }
}

#[test]
fn test_velocity_decay_curve() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let mut rng = SmallRng::seed_from_u64(1);
    let config = BurstConfig::default()
        .with_gravity(0.0)
        .with_drift(0.0)
        .with_decay(0.85)
        .with_ticks(1000);
    let mut particle = spawn_one(&config, 42);
    let v0 = particle.velocity;
    for _ in 0..25 {
        particle.update(&mut rng, f32::INFINITY);
    }
    let expected = v0 * 0.85f32.powi(25);
    assert!(
        (particle.velocity - expected).abs() < 1e-3,
        "velocity {} vs expected {}",
        particle.velocity,
        expected
    );
}

#[test]
fn test_opacity_fades_linearly() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let mut rng = SmallRng::seed_from_u64(2);
    let config = BurstConfig::default().with_ticks(20).with_gravity(0.0);
    let mut particle = spawn_one(&config, 7);
    for t in 0..20u32 {
        particle.update(&mut rng, f32::INFINITY);
        let expected = 1.0 - t as f32 / 20.0;
        assert!((particle.opacity() - expected).abs() < 1e-6);
        assert!(particle.opacity() >= 0.0 && particle.opacity() <= 1.0);
    }
}

#[test]
fn test_zero_spread_shares_one_direction() {
    let config = BurstConfig::default().with_angle(33.0).with_spread(0.0);
    let mut directions = Vec::new();
    for index in 0..20 {
        let mut ctx = SpawnContext::seeded(index, 20, index as u64 * 977);
        directions.push(confetti::spawn_particle(&config, &mut ctx).direction);
    }
    let first = directions[0];
    assert!(directions.iter().all(|d| (d - first).abs() < 1e-6));
    assert!((first - -33.0f32.to_radians()).abs() < 1e-6);
}

#[test]
fn test_flat_particles_never_wobble() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let mut rng = SmallRng::seed_from_u64(3);
    let config = BurstConfig::default()
        .with_flat(true)
        .with_scalar(1.5)
        .with_ticks(50);
    let mut particle = spawn_one(&config, 99);
    for _ in 0..50 {
        if !particle.update(&mut rng, f32::INFINITY) {
            break;
        }
        assert_eq!(particle.wobble, 0.0);
        assert_eq!(particle.wobble_x, particle.x + 15.0);
        assert_eq!(particle.wobble_y, particle.y + 15.0);
    }
}

#[test]
fn test_straight_up_burst_end_to_end() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    // angle 90, spread 0, no decay, no gravity, no drift, one tick
    let config = BurstConfig::default()
        .with_angle(90.0)
        .with_spread(0.0)
        .with_start_velocity(10.0)
        .with_decay(1.0)
        .with_gravity(0.0)
        .with_drift(0.0)
        .with_ticks(1)
        .with_origin(100.0, 100.0);
    let mut particle = spawn_one(&config, 5);
    let velocity = particle.velocity;
    assert!((5.0..15.0).contains(&velocity));

    let mut rng = SmallRng::seed_from_u64(4);
    let alive = particle.update(&mut rng, 10_000.0);

    assert!(!alive, "one-tick budget dies on the first update");
    assert!((particle.x - 100.0).abs() < 1e-4, "cos(-π/2) = 0 freezes x");
    assert!(
        (particle.y - (100.0 - velocity)).abs() < 1e-3,
        "sin(-π/2) = -1 moves y up by the sampled velocity"
    );
}

// ============================================================================
// Simulation lifecycle
// ============================================================================

#[test]
fn test_bulk_fire_appends_exact_count() {
    let mut sim = Simulation::new(640, 480).with_seed(10);
    let before = sim.particle_count();
    sim.fire(
        &BurstConfig::default()
            .with_origin(320.0, 240.0)
            .with_particle_count(50),
    );
    assert_eq!(sim.particle_count() - before, 50);
}

#[test]
fn test_burst_runs_to_exhaustion() {
    let mut sim = Simulation::new(640, 480).with_seed(11);
    sim.fire(
        &BurstConfig::default()
            .with_origin(320.0, 240.0)
            .with_particle_count(25)
            .with_ticks(30),
    );
    let frames = sim.run_headless();
    assert!(frames >= 1 && frames <= 30);
    assert!(!sim.is_running());
    assert_eq!(sim.particle_count(), 0);
    assert!(sim.surface().is_none());
}

#[test]
fn test_reset_is_indistinguishable_from_fresh() {
    let mut fired = Simulation::new(640, 480).with_seed(12);
    fired.fire(&BurstConfig::default().with_origin(320.0, 240.0));
    fired.reset();

    let fresh = Simulation::new(640, 480);
    assert_eq!(fired.is_running(), fresh.is_running());
    assert_eq!(fired.particle_count(), fresh.particle_count());
    assert_eq!(fired.surface().is_none(), fresh.surface().is_none());
}

#[test]
fn test_reset_keeps_external_surface() {
    let mut sim = Simulation::with_surface(Canvas::new(320, 240)).with_seed(13);
    sim.fire(&BurstConfig::default().with_origin(160.0, 120.0));
    sim.frame();
    sim.reset();
    let surface = sim.surface().expect("external surface survives reset");
    assert!(surface.pixels().iter().all(|&b| b == 0), "reset clears it");
}

#[test]
fn test_appending_mid_run_extends_the_loop() {
    let mut sim = Simulation::new(640, 480).with_seed(14);
    sim.fire(
        &BurstConfig::default()
            .with_origin(320.0, 240.0)
            .with_particle_count(5)
            .with_ticks(4),
    );
    assert!(sim.frame());
    // A second burst between frames keeps the loop alive past the first
    // burst's budget
    sim.fire(
        &BurstConfig::default()
            .with_origin(320.0, 240.0)
            .with_particle_count(5)
            .with_ticks(40),
    );
    let mut frames = 1;
    while sim.frame() {
        frames += 1;
    }
    frames += 1;
    assert!(frames > 4, "ran {} frames", frames);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_all_shapes_render_through_the_public_loop() {
    let shapes = vec![
        Shape::Square,
        Shape::Circle,
        Shape::Star,
        Shape::from_path("M0 0 L10 0 L5 8 Z").expect("valid path"),
        Shape::from_rgba(vec![255; 8 * 8 * 4], 8, 8).expect("valid bitmap"),
    ];
    let mut sim = Simulation::new(200, 200).with_seed(15);
    sim.fire(
        &BurstConfig::default()
            .with_origin(100.0, 100.0)
            .with_particle_count(40)
            .with_shapes(shapes)
            .with_ticks(100)
            .with_start_velocity(5.0),
    );
    sim.frame();
    let painted = sim
        .surface()
        .expect("running simulation has a surface")
        .pixels()
        .chunks(4)
        .filter(|p| p[3] > 0)
        .count();
    assert!(painted > 50, "only {} pixels painted", painted);
}

#[test]
fn test_restricted_capabilities_still_render() {
    let mut sim = Simulation::new(200, 200)
        .with_seed(16)
        .with_capabilities(Capabilities::minimal());
    sim.fire(
        &BurstConfig::default()
            .with_origin(100.0, 100.0)
            .with_shapes(vec![Shape::from_path("M0 0 L10 0 L5 8 Z").expect("valid path")])
            .with_ticks(50)
            .with_start_velocity(5.0),
    );
    sim.frame();
    let painted = sim
        .surface()
        .expect("running simulation has a surface")
        .pixels()
        .chunks(4)
        .filter(|p| p[3] > 0)
        .count();
    assert!(painted > 0, "fallback squares still paint");
}

#[test]
fn test_colors_reach_the_surface() {
    let mut sim = Simulation::new(100, 100).with_seed(17);
    sim.fire(
        &BurstConfig::default()
            .with_origin(50.0, 50.0)
            .with_colors(vec![Color::rgb(0, 255, 0)])
            .with_start_velocity(2.0)
            .with_ticks(100),
    );
    sim.frame();
    let pixels = sim.surface().expect("surface").pixels();
    let has_green = pixels
        .chunks(4)
        .any(|p| p[3] > 0 && p[1] > 200 && p[0] < 50 && p[2] < 50);
    assert!(has_green);
}

// ============================================================================
// Viewer shader
// ============================================================================

#[test]
fn test_blit_shader_is_valid_wgsl() {
    let module = naga::front::wgsl::parse_str(confetti::viewer::BLIT_SHADER)
        .expect("blit shader parses");
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).expect("blit shader validates");
}
