//! Robot Room entry point
//!
//! Headless driver: builds a room, feeds the clock a synthetic frame
//! timestamp stream and reports what happened.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use robot_room::Settings;
use robot_room::persistence;
use robot_room::scenario::generate_room;
use robot_room::sim::{Pausable, RewindOutcome, RoomSnapshot, SimulationClock};

/// Run a robot room headless for a fixed stretch of simulated time
#[derive(Debug, Parser)]
#[command(name = "robot-room", version)]
struct Args {
    /// Settings JSON (defaults are used for anything it omits)
    settings: Option<PathBuf>,

    /// Scene JSON to start from instead of a generated room
    scene: Option<PathBuf>,

    /// Where to write the final scene
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Robot Room starting...");

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let room = match &args.scene {
        Some(path) => match persistence::load_from_path(path) {
            Ok(snapshot) => {
                let mut room = snapshot.build();
                room.set_max_turn_retries(settings.max_turn_retries);
                room
            }
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => generate_room(
            settings.seed,
            &settings,
            settings.robot_count,
            settings.block_count,
        ),
    };
    if !room.is_in_valid_state() {
        log::warn!("Starting from a room where robots overlap or leave the bounds");
    }

    let mut clock = SimulationClock::new(room);
    clock.resume();

    let interval = settings.frame_interval_nanos();
    let mut drained = 0usize;
    for frame in 0..=settings.frame_count() {
        clock.on_tick(frame * interval);
        // Stand-in for a presentation layer
        drained += clock.room_mut().drain_changes().len();
    }
    clock.pause();

    log::info!(
        "Ran {:.3}s: {} snapshots, {} change events",
        clock.elapsed_nanos() as f64 / 1e9,
        clock.snapshots().len(),
        drained
    );
    for robot in clock.room().robots() {
        log::info!(
            "Robot {:?} at ({:.1}, {:.1}) heading {:.1}",
            robot.id(),
            robot.center_x(),
            robot.center_y(),
            robot.current_angle()
        );
    }

    if let Some(second) = settings.rewind_to_second {
        match clock.rewind_to_second(second) {
            RewindOutcome::Restored { second } => {
                log::info!("Rewound to {second}s, room valid: {}", clock.room().is_in_valid_state());
            }
            outcome => log::info!("Rewind to {second}s: {outcome:?}"),
        }
    }

    if let Some(path) = &args.out {
        let snapshot = RoomSnapshot::capture(clock.room());
        if let Err(e) = persistence::save_to_path(&snapshot, path) {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_paths() {
        let args = Args::try_parse_from(["robot-room", "s.json", "scene.json", "out.json"]).unwrap();
        assert_eq!(args.settings, Some(PathBuf::from("s.json")));
        assert_eq!(args.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(args.out, Some(PathBuf::from("out.json")));

        let none = Args::try_parse_from(["robot-room"]).unwrap();
        assert!(none.settings.is_none() && none.scene.is_none() && none.out.is_none());
    }

    #[test]
    fn test_extra_argument_is_rejected() {
        assert!(Args::try_parse_from(["robot-room", "a", "b", "c", "d"]).is_err());
    }
}
