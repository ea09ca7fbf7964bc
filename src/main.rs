use confetti::{BurstConfig, Simulation, Viewer};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn main() {
    let mut sim = Simulation::new(WIDTH, HEIGHT);
    sim.fire(
        &BurstConfig::default()
            .with_origin(WIDTH as f32 / 2.0, HEIGHT as f32)
            .with_particle_count(150)
            .with_spread(70.0),
    );

    println!("Space fires another burst, Esc quits.");

    let viewer = Viewer::new(sim)
        .with_refire(BurstConfig::fireworks(WIDTH as f32 / 2.0, HEIGHT as f32 / 3.0));
    if let Err(e) = viewer.run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
