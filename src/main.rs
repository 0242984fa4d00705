//! Horde Sim headless runner
//!
//! Drives the simulation with a manual clock and scripted input, takes the
//! first offered upgrade on every level-up and prints the session stats as
//! JSON when the run ends.
//!
//! Usage: `horde-sim [frames] [tuning.json]`

use std::sync::mpsc::{Receiver, channel};

use horde_sim::sim::{ResetOptions, basic_catalog};
use horde_sim::{GameEvent, ManualClock, Simulation, TickOutcome, Tuning};

/// Host frame interval (60 Hz)
const FRAME_MS: f64 = 1000.0 / 60.0;
const DEFAULT_FRAMES: u64 = 60 * 60 * 3;
const START_MS: f64 = 1_000_000.0;

/// Movement keys held for a few seconds each, round and round
const SCRIPT: [&str; 4] = ["w", "d", "s", "a"];
const SCRIPT_STEP_FRAMES: u64 = 180;

fn load_tuning(path: Option<&str>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Could not load tuning from {}: {}, using defaults", path, e);
            Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let frames = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let tuning = load_tuning(args.get(2).map(String::as_str));

    log::info!("Horde Sim starting: {} frames", frames);

    let clock = ManualClock::new(START_MS);
    let (tx, rx) = channel();
    let mut sim = match Simulation::new(tuning, clock.clone(), tx) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };
    sim.reset_game(ResetOptions {
        skin_id: "skin_default".to_string(),
        ..Default::default()
    });

    let catalog = basic_catalog();
    let mut held: Option<&str> = None;
    let mut game_over = false;

    for frame in 0..frames {
        let next = SCRIPT[(frame / SCRIPT_STEP_FRAMES) as usize % SCRIPT.len()];
        if held != Some(next) {
            if let Some(key) = held {
                sim.set_key_state(key, false);
            }
            sim.set_key_state(next, true);
            held = Some(next);
        }
        // Dash once per script step
        sim.set_key_state("space", frame % SCRIPT_STEP_FRAMES == 0);

        clock.advance(FRAME_MS);
        if let TickOutcome::Abandoned(err) = sim.tick((FRAME_MS / 1000.0) as f32) {
            log::warn!("Frame {} abandoned: {}", frame, err);
        }

        game_over |= handle_events(&mut sim, &rx, &catalog);
        if game_over {
            log::info!("Game over after {} frames", frame + 1);
            break;
        }
    }

    let diag = sim.diagnostics();
    log::info!(
        "Frames {}, skipped {}, abandoned {}, enemies {}, projectiles {}, particles {}",
        diag.frame_counter,
        diag.metrics.total_skipped,
        diag.abandoned_ticks,
        diag.live_enemies,
        diag.live_projectiles,
        diag.live_particles
    );
    log::info!(
        "Geometry cache: {} entries, {} computations",
        diag.geometry_cache_entries,
        diag.geometry_computations
    );

    match serde_json::to_string_pretty(sim.stats()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize stats: {}", e),
    }
}

/// React to delivered events. Returns true on game over.
fn handle_events<C, H>(
    sim: &mut Simulation<C, H>,
    rx: &Receiver<GameEvent>,
    catalog: &[horde_sim::sim::Upgrade],
) -> bool
where
    C: horde_sim::Clock,
    H: horde_sim::GameHooks,
{
    let mut game_over = false;
    for event in rx.try_iter() {
        match event {
            GameEvent::LevelUp { .. } => {
                let pick = sim.upgrade_options(catalog).first().map(|o| o.upgrade);
                match pick {
                    Some(upgrade) => {
                        if let Err(e) = sim.apply_upgrade(upgrade) {
                            log::warn!("{}", e);
                        } else {
                            log::info!(
                                "Level {}: took '{}'",
                                sim.state().level,
                                upgrade.id
                            );
                        }
                    }
                    None => log::info!("Level {}: nothing left to take", sim.state().level),
                }
            }
            GameEvent::BossWarning { stage } => log::info!("Boss incoming for stage {}", stage),
            GameEvent::BossFightStart => log::info!("Boss fight started"),
            GameEvent::StageClear { stage, nightmare } => {
                log::info!("Stage {} cleared (nightmare: {})", stage, nightmare)
            }
            GameEvent::GameOver => game_over = true,
        }
    }
    game_over
}

#[cfg(target_arch = "wasm32")]
fn main() {}
