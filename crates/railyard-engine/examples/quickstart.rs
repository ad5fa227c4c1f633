//! Railyard quickstart: lay a loop of track, drop a train on it, and step
//! the simulation in lockstep.
//!
//! Demonstrates:
//!   1. Building a `Simulation` from a `SimConfig`
//!   2. Placing rails and curves, and merging a piece onto a straight rail
//!   3. Querying network membership
//!   4. Stepping and reading train state
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example quickstart

use railyard_core::{CellCoord, Orientation, Placeable};
use railyard_engine::{SimConfig, Simulation, TrainSpawn};
use railyard_grid::MovingObject;

// ─── Layout ─────────────────────────────────────────────────────

const LEFT: i32 = 2;
const TOP: i32 = 2;
const RIGHT: i32 = 9;
const BOTTOM: i32 = 6;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimConfig {
        width: 12,
        height: 10,
        train_speed: 0.1,
        seed: 42,
        trains: vec![TrainSpawn {
            cell: CellCoord::new(LEFT + 1, TOP),
            heading: Orientation::Right,
        }],
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config)?;

    // Corners, then the straight edges between them.
    sim.place(CellCoord::new(LEFT, TOP), Placeable::curved(Orientation::Right))?;
    sim.place(CellCoord::new(RIGHT, TOP), Placeable::curved(Orientation::Down))?;
    sim.place(CellCoord::new(RIGHT, BOTTOM), Placeable::curved(Orientation::Left))?;
    sim.place(CellCoord::new(LEFT, BOTTOM), Placeable::curved(Orientation::Up))?;
    for x in LEFT + 1..RIGHT {
        sim.place(CellCoord::new(x, TOP), Placeable::rail(Orientation::Right))?;
        sim.place(CellCoord::new(x, BOTTOM), Placeable::rail(Orientation::Right))?;
    }
    for y in TOP + 1..BOTTOM {
        sim.place(CellCoord::new(LEFT, y), Placeable::rail(Orientation::Down))?;
        sim.place(CellCoord::new(RIGHT, y), Placeable::rail(Orientation::Down))?;
    }

    // A crossing in the middle of the top edge: click a vertical piece
    // onto the straight rail already there.
    let crossing = CellCoord::new((LEFT + RIGHT) / 2, TOP);
    sim.click(crossing, Some(Placeable::rail(Orientation::Up)))?;

    println!(
        "{} tiles in {} network(s); crossing is in {:?}",
        sim.grid().layer().tile_count(),
        sim.registry().len(),
        sim.network_of_cell(crossing)
    );

    for _ in 0..12 {
        for _ in 0..10 {
            sim.step();
        }
        for train in sim.trains() {
            println!("tick {:>4}: {train} in cell {}", sim.tick_id(), train.cell());
        }
    }

    let metrics = sim.last_metrics();
    println!(
        "last tick took {}us, updated {} object(s)",
        metrics.total_us, metrics.updated_objects
    );
    Ok(())
}
