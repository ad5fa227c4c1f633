//! Railyard realtime mode: the simulation ticks on a background thread
//! while the main thread plays the renderer.
//!
//! Demonstrates:
//!   1. Starting a `RealtimeSimulation`
//!   2. Submitting placement commands and reading receipts
//!   3. Polling snapshots and draining the redraw queue each "frame"
//!   4. Cooperative shutdown and recovering the simulation
//!
//! Run with:
//!   RUST_LOG=info cargo run --example realtime

use std::thread;
use std::time::Duration;

use railyard_core::{CellCoord, Command, CommandPayload, Orientation, Placeable};
use railyard_engine::{RealtimeSimulation, SimConfig, TrainSpawn};

const FRAME: Duration = Duration::from_millis(50);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rt = RealtimeSimulation::new(SimConfig {
        width: 16,
        height: 8,
        tick_rate_hz: 60.0,
        train_speed: 0.1,
        trains: vec![TrainSpawn {
            cell: CellCoord::new(4, 3),
            heading: Orientation::Right,
        }],
        ..SimConfig::default()
    })?;

    // A straight line with a station in the middle.
    let mut commands: Vec<Command> = (1..12)
        .filter(|x| !(5..8).contains(x))
        .map(|x| {
            Command::new(CommandPayload::Place {
                origin: CellCoord::new(x, 3),
                placeable: Placeable::rail(Orientation::Right),
            })
        })
        .collect();
    commands.push(Command::new(CommandPayload::Place {
        origin: CellCoord::new(5, 3),
        placeable: Placeable::station(3, 1),
    }));
    // Overlaps the station; rejected.
    commands.push(Command::new(CommandPayload::Place {
        origin: CellCoord::new(6, 3),
        placeable: Placeable::rail(Orientation::Up),
    }));

    let receipts = rt.submit_commands(commands)?;
    for receipt in receipts.iter().filter(|r| !r.accepted) {
        println!(
            "command {} rejected: {:?}",
            receipt.command_index, receipt.reason_code
        );
    }

    for frame in 0..20 {
        thread::sleep(FRAME);
        let dirty = rt.drain_redraws();
        let Some(snap) = rt.latest_snapshot() else {
            continue;
        };
        for train in &snap.trains {
            println!(
                "frame {frame:>2} tick {:>4}: train {} at ({:.2}, {:.2}) heading {} | {} dirty cell(s)",
                snap.tick,
                train.id,
                train.x,
                train.y,
                train.heading,
                dirty.len()
            );
        }
    }

    let report = rt.shutdown();
    println!("shutdown: {report:?}");
    let sim = rt.take_simulation()?;
    println!(
        "recovered simulation at tick {} with {} network(s)",
        sim.tick_id(),
        sim.registry().len()
    );
    Ok(())
}
