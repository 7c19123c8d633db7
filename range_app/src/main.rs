//! Target range
//!
//! Headless driver for the actor kernel: builds a walled range with targets
//! from a level file, plays a scripted session of turns and shots at a fixed
//! frame time, and logs every target hit.
//!
//! Usage: `target_range [level.toml] [kernel.toml]`

mod error;
mod level;
mod range;

use std::time::Duration;

use actor_kernel::config::{Config, KernelConfig};
use actor_kernel::foundation::logging;
use actor_kernel::foundation::time::FrameClock;
use actor_kernel::input::{InputSystem, RawInput};
use actor_kernel::scene::World;

use crate::error::AppError;
use crate::level::Level;
use crate::range::TargetRange;

const DEFAULT_LEVEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/level.toml");
const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/kernel.toml");

fn run(level_path: &str, config_path: &str) -> Result<(), AppError> {
    let config = KernelConfig::load_from_file(config_path)?;
    logging::init_with_level(logging::parse_level(&config.logging.level));
    log::info!("Loaded kernel config from {}", config_path);

    let level = Level::load(level_path)?;
    log::info!("Loaded level {} ({} frames)", level_path, level.frames);

    let frames = level.frames;
    let mut range = TargetRange::new(World::default(), level);
    let mut input = InputSystem::new(config.input.clone());
    let mut clock = FrameClock::new(&config.frame);
    let frame_time = Duration::from_secs_f32(config.frame.target_frame_time);

    for frame in 0..frames {
        let delta_time = clock.advance(frame_time);

        input.prepare_for_update();
        input.update(&RawInput {
            keys: range.level().keys_on(frame),
            ..RawInput::default()
        });

        range.step(frame, input.state(), delta_time);
    }

    let world = range.world();
    log::info!(
        "Session over after {} frames ({:.2}s): {} shots, {} hits, {} balls in flight",
        clock.frame_count(),
        clock.total_time(),
        range.shots_fired(),
        range.total_hits(),
        range.live_balls()
    );
    log::info!(
        "Player ended at {:?}; {} actors, {} render proxies, {} sounds still playing",
        world.transform(range.player()).position(),
        world.actor_count(),
        world.render().len(),
        world.audio().active_count()
    );
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {panic_info}");
    }));

    let mut args = std::env::args().skip(1);
    let level_path = args.next().unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    if let Err(err) = run(&level_path, &config_path) {
        // Logging may not be up yet if the config failed to load
        logging::init();
        log::error!("Target range failed: {}", err);
        std::process::exit(1);
    }
}
