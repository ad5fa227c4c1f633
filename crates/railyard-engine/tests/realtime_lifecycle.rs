//! Integration test: realtime tick thread lifecycle.
//!
//! Commands submitted from several threads all get receipts, snapshots
//! advance while readers poll, and shutdown hands back a simulation that
//! keeps stepping in lockstep.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use railyard_core::{CellCoord, Command, CommandPayload, Orientation, Placeable, TickId};
use railyard_engine::{RealtimeSimulation, SimConfig, TrainSpawn};

fn config() -> SimConfig {
    SimConfig {
        width: 16,
        height: 16,
        tick_rate_hz: 200.0,
        trains: vec![TrainSpawn {
            cell: CellCoord::new(0, 0),
            heading: Orientation::Right,
        }],
        ..SimConfig::default()
    }
}

fn wait_for_tick(rt: &RealtimeSimulation, tick: u64) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if rt.latest_snapshot().is_some_and(|s| s.tick.0 >= tick) {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn snapshots_advance_while_running() {
    let mut rt = RealtimeSimulation::new(config()).unwrap();
    assert!(wait_for_tick(&rt, 5), "tick thread made no progress");
    let snap = rt.latest_snapshot().unwrap();
    assert_eq!(snap.trains.len(), 1);
    assert_eq!(snap.metrics.tick, snap.tick);

    let report = rt.shutdown();
    assert!(report.tick_joined);
    assert!(report.final_tick.is_some_and(|t| t >= TickId(5)));
}

#[test]
fn concurrent_submitters_all_get_receipts() {
    let rt = Arc::new(RealtimeSimulation::new(config()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|row| {
            let rt = Arc::clone(&rt);
            thread::spawn(move || {
                let commands = (0..4)
                    .map(|x| {
                        Command::new(CommandPayload::Place {
                            origin: CellCoord::new(x, row + 2),
                            placeable: Placeable::rail(Orientation::Right),
                        })
                    })
                    .collect();
                rt.submit_commands(commands).unwrap()
            })
        })
        .collect();
    for handle in handles {
        let receipts = handle.join().unwrap();
        assert_eq!(receipts.len(), 4);
        assert!(receipts.iter().all(|r| r.accepted));
    }

    let mut rt = Arc::try_unwrap(rt).unwrap_or_else(|_| panic!("still shared"));
    let mut sim = rt.take_simulation().unwrap();
    assert_eq!(sim.grid().layer().tile_count(), 16);
    // One network per row.
    assert_eq!(sim.registry().len(), 4);

    let tick = sim.tick_id();
    sim.step();
    assert_eq!(sim.tick_id(), TickId(tick.0 + 1));
}

#[test]
fn redraws_reach_readers() {
    let rt = RealtimeSimulation::new(config()).unwrap();
    rt.submit_commands(vec![Command::new(CommandPayload::Place {
        origin: CellCoord::new(4, 4),
        placeable: Placeable::station(2, 1),
    })])
    .unwrap();
    let cells = rt.drain_redraws();
    assert!(cells.contains(&CellCoord::new(4, 4)));
    assert!(cells.contains(&CellCoord::new(5, 4)));
    assert!(rt.drain_redraws().is_empty());
}

#[test]
fn cooperative_stop_is_acknowledged() {
    let mut rt = RealtimeSimulation::new(config()).unwrap();
    rt.request_stop();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !rt.is_stopped() {
        assert!(Instant::now() < deadline, "tick thread ignored stop request");
        thread::yield_now();
    }
    assert!(rt.take_simulation().is_ok());
    assert!(matches!(
        rt.take_simulation(),
        Err(railyard_engine::ConfigError::SimulationRecoveryFailed)
    ));
}
