//! Tick loop and command draining for realtime mode.
//!
//! The tick thread owns the [`Simulation`] exclusively (moved in via
//! `thread::spawn`) and hands it back through its `JoinHandle` when it
//! stops. Commands arrive over a bounded crossbeam channel; receipts go
//! back over a per-batch reply channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use railyard_core::{Command, Receipt};

use crate::ring::SnapshotRing;
use crate::simulation::Simulation;

/// Commands from one `submit_commands` call and where to send receipts.
pub(crate) struct IngressBatch {
    pub commands: Vec<Command>,
    pub reply: Sender<Vec<Receipt>>,
}

/// State held by the tick thread's main loop.
pub(crate) struct TickThreadState {
    sim: Simulation,
    ring: Arc<SnapshotRing>,
    cmd_rx: Receiver<IngressBatch>,
    shutdown_flag: Arc<AtomicBool>,
    tick_stopped: Arc<AtomicBool>,
    tick_budget: Duration,
}

impl TickThreadState {
    pub fn new(
        sim: Simulation,
        ring: Arc<SnapshotRing>,
        cmd_rx: Receiver<IngressBatch>,
        shutdown_flag: Arc<AtomicBool>,
        tick_stopped: Arc<AtomicBool>,
    ) -> Self {
        let tick_budget = Duration::from_secs_f64(1.0 / sim.config().tick_rate_hz);
        Self {
            sim,
            ring,
            cmd_rx,
            shutdown_flag,
            tick_stopped,
            tick_budget,
        }
    }

    /// Main tick loop. Runs until `shutdown_flag` is set, then returns
    /// the simulation to whoever joins the thread.
    pub fn run(mut self) -> Simulation {
        log::info!("tick thread running every {:?}", self.tick_budget);
        while !self.shutdown_requested() {
            let tick_start = Instant::now();

            // 1. Commands submitted since the last tick.
            self.drain_command_channel();

            // 2. Tick.
            self.sim.step();

            // 3. Publish.
            self.ring.push(self.sim.snapshot());

            // 4. Sleep for the rest of the budget.
            self.sleep_until(tick_start + self.tick_budget);
        }

        self.tick_stopped.store(true, Ordering::Release);
        log::info!("tick thread stopped at tick {}", self.sim.tick_id());
        self.sim
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_flag.load(Ordering::Acquire)
    }

    fn drain_command_channel(&mut self) {
        while let Ok(batch) = self.cmd_rx.try_recv() {
            let receipts = self.sim.apply_commands(batch.commands);
            // The submitter may have given up on the reply.
            let _ = batch.reply.send(receipts);
        }
    }

    /// Park until `deadline`. `unpark` from the shutdown path wakes the
    /// thread early; spurious wakeups park again.
    fn sleep_until(&self, deadline: Instant) {
        loop {
            if self.shutdown_requested() {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            thread::park_timeout(deadline - now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use railyard_core::{CellCoord, CommandPayload, Orientation, Placeable};

    #[test]
    fn loop_applies_commands_then_returns_simulation() {
        let sim = Simulation::new(SimConfig {
            width: 4,
            height: 4,
            tick_rate_hz: 1000.0,
            ..SimConfig::default()
        })
        .unwrap();
        let ring = Arc::new(SnapshotRing::new(4));
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(4);
        let shutdown = Arc::new(AtomicBool::new(false));
        let stopped = Arc::new(AtomicBool::new(false));
        let state = TickThreadState::new(
            sim,
            Arc::clone(&ring),
            cmd_rx,
            Arc::clone(&shutdown),
            Arc::clone(&stopped),
        );
        let handle = thread::spawn(move || state.run());

        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        cmd_tx
            .send(IngressBatch {
                commands: vec![Command::new(CommandPayload::Place {
                    origin: CellCoord::new(0, 0),
                    placeable: Placeable::rail(Orientation::Up),
                })],
                reply: reply_tx,
            })
            .unwrap();
        let receipts = reply_rx.recv().unwrap();
        assert!(receipts[0].accepted);

        shutdown.store(true, Ordering::Release);
        handle.thread().unpark();
        let sim = handle.join().unwrap();
        assert!(stopped.load(Ordering::Acquire));
        assert_eq!(sim.grid().layer().tile_count(), 1);
        assert!(ring.latest().is_some());
    }
}
