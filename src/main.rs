//! Merge Drop headless runner
//!
//! Mounts a game, plays a short scripted session of taps and drags, and logs
//! the resulting board. Usage: `merge-drop [config.json]`

use std::process::ExitCode;

use merge_drop::consts::SIM_DT;
use merge_drop::input::PointerEvent;
use merge_drop::sim::GameEvent;
use merge_drop::{GameConfig, GameError, GameLoop};

/// Seconds of simulated play
const SESSION_SECONDS: f32 = 12.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Merge Drop (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: GameConfig) -> Result<(), GameError> {
    let width = config.playfield.width;
    let mut game = GameLoop::new();
    game.mount(config)?;

    // One gesture every 1.5s, alternating taps and drags across the field
    let frames = (SESSION_SECONDS / SIM_DT) as u32;
    let gesture_every = (1.5 / SIM_DT) as u32;
    let mut gestures = 0u32;

    for frame in 0..frames {
        if frame % gesture_every == 0 {
            let x = width * (0.2 + 0.15 * (gestures % 5) as f32);
            if gestures % 2 == 0 {
                tap(&mut game, x)?;
            } else {
                drag(&mut game, width / 2.0, x - width / 2.0)?;
            }
            gestures += 1;
        }

        game.frame(SIM_DT);
        for event in game.drain_events() {
            match event {
                GameEvent::Spawned { id, value, x } => {
                    log::info!("Dropped #{} ({}) at x={:.0}", id.0, value.0, x)
                }
                GameEvent::CommitIgnored { x } => log::info!("Drop at x={x:.0} ignored"),
                other => log::debug!("{other:?}"),
            }
        }
    }

    for ball in game.snapshot() {
        log::info!(
            "Ball #{:>2} value={:<2} at ({:>6.1}, {:>6.1})",
            ball.id.0,
            ball.value.0,
            ball.pos.x,
            ball.pos.y
        );
    }

    game.unmount();
    Ok(())
}

fn tap(game: &mut GameLoop, x: f32) -> Result<(), GameError> {
    game.pointer(PointerEvent::Down { x, y: 400.0 })?;
    game.pointer(PointerEvent::Up { x, y: 400.0 })?;
    Ok(())
}

fn drag(game: &mut GameLoop, from: f32, dx: f32) -> Result<(), GameError> {
    game.pointer(PointerEvent::Down { x: from, y: 400.0 })?;
    for i in 1..=4 {
        game.pointer(PointerEvent::Move {
            dx: dx * i as f32 / 4.0,
            dy: 0.0,
        })?;
    }
    game.pointer(PointerEvent::Up {
        x: from + dx,
        y: 400.0,
    })?;
    Ok(())
}
