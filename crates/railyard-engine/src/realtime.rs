//! User-facing [`RealtimeSimulation`] API and shutdown state machine.
//!
//! The simulation runs on a dedicated tick thread at the configured rate
//! while any number of reader threads pull snapshots and redraw cells.
//!
//! # Architecture
//!
//! ```text
//! User Thread(s)                Tick Thread
//!     |                             |
//!     |--submit_commands()--------->| cmd_rx.try_recv()
//!     |   [cmd_tx: bounded(64)]     | sim.apply_commands()
//!     |<--receipts via reply_tx-----| sim.step()
//!     |                             | ring.push(snapshot)
//!     |                             | park_timeout(budget - elapsed)
//!     |                             |
//!     |--latest_snapshot()--> ring.latest()
//!     |--drain_redraws()----> redraw queue
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use railyard_core::{CellCoord, Command, Receipt, TickId};
use railyard_grid::RedrawQueue;

use crate::config::{ConfigError, SimConfig};
use crate::ring::SnapshotRing;
use crate::simulation::Simulation;
use crate::snapshot::WorldSnapshot;
use crate::tick_thread::{IngressBatch, TickThreadState};

/// Capacity of the command channel between user threads and the tick
/// thread.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// How long `shutdown` waits for the tick thread to acknowledge before
/// joining it anyway.
const DRAIN_BUDGET: Duration = Duration::from_millis(33);

// ── Error types ──────────────────────────────────────────────────

/// Error submitting commands to the tick thread.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The tick thread has shut down.
    Shutdown,
    /// The command channel is full (back-pressure).
    ChannelFull,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shutdown => write!(f, "tick thread has shut down"),
            Self::ChannelFull => write!(f, "command channel full"),
        }
    }
}

impl std::error::Error for SubmitError {}

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from [`RealtimeSimulation::shutdown`].
#[derive(Debug)]
pub struct ShutdownReport {
    /// Total time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Time spent waiting for the tick thread to acknowledge.
    pub drain_ms: u64,
    /// Whether the tick thread was joined successfully.
    pub tick_joined: bool,
    /// Last tick the recovered simulation executed.
    pub final_tick: Option<TickId>,
}

// ── ShutdownState ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownState {
    Running,
    Draining,
    Stopped,
}

// ── RealtimeSimulation ───────────────────────────────────────────

/// A [`Simulation`] stepping on its own thread at `tick_rate_hz`.
///
/// The tick thread is the only writer. Readers see immutable
/// [`WorldSnapshot`]s and the shared redraw queue.
pub struct RealtimeSimulation {
    ring: Arc<SnapshotRing>,
    redraw: Arc<RedrawQueue>,
    cmd_tx: Option<crossbeam_channel::Sender<IngressBatch>>,
    shutdown_flag: Arc<AtomicBool>,
    tick_stopped: Arc<AtomicBool>,
    tick_thread: Option<JoinHandle<Simulation>>,
    state: ShutdownState,
    /// Recovered from the tick thread on shutdown. The Mutex keeps this
    /// type Sync, since observers are only Send.
    recovered: Mutex<Option<Simulation>>,
}

// Compile-time assertion: readers share RealtimeSimulation across threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<RealtimeSimulation>();
};

impl RealtimeSimulation {
    /// Build a simulation from `config` and start ticking it.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::from_simulation(Simulation::new(config)?)
    }

    /// Start ticking an existing simulation, keeping its tiles, trains
    /// and observers.
    pub fn from_simulation(sim: Simulation) -> Result<Self, ConfigError> {
        let ring = Arc::new(SnapshotRing::new(sim.config().ring_buffer_size));
        ring.push(sim.snapshot());
        let redraw = Arc::clone(sim.redraw_queue());

        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let tick_stopped = Arc::new(AtomicBool::new(false));
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY);

        let state = TickThreadState::new(
            sim,
            Arc::clone(&ring),
            cmd_rx,
            Arc::clone(&shutdown_flag),
            Arc::clone(&tick_stopped),
        );
        let tick_thread = thread::Builder::new()
            .name("railyard-tick".into())
            .spawn(move || state.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("tick thread: {e}"),
            })?;

        Ok(Self {
            ring,
            redraw,
            cmd_tx: Some(cmd_tx),
            shutdown_flag,
            tick_stopped,
            tick_thread: Some(tick_thread),
            state: ShutdownState::Running,
            recovered: Mutex::new(None),
        })
    }

    /// Submit commands to be applied at the start of the next tick.
    ///
    /// Blocks only until the tick thread replies with the receipts, which
    /// takes at most one tick period.
    pub fn submit_commands(&self, commands: Vec<Command>) -> Result<Vec<Receipt>, SubmitError> {
        let cmd_tx = self.cmd_tx.as_ref().ok_or(SubmitError::Shutdown)?;

        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        let batch = IngressBatch {
            commands,
            reply: reply_tx,
        };

        cmd_tx.try_send(batch).map_err(|e| match e {
            crossbeam_channel::TrySendError::Full(_) => SubmitError::ChannelFull,
            crossbeam_channel::TrySendError::Disconnected(_) => SubmitError::Shutdown,
        })?;

        reply_rx.recv().map_err(|_| SubmitError::Shutdown)
    }

    /// The most recently published snapshot.
    pub fn latest_snapshot(&self) -> Option<Arc<WorldSnapshot>> {
        self.ring.latest()
    }

    /// The snapshot ring, for readers that track publish positions.
    pub fn snapshot_ring(&self) -> &Arc<SnapshotRing> {
        &self.ring
    }

    /// The shared redraw queue.
    pub fn redraw_queue(&self) -> &Arc<RedrawQueue> {
        &self.redraw
    }

    /// Take every cell queued for redraw since the last drain.
    pub fn drain_redraws(&self) -> Vec<CellCoord> {
        self.redraw.drain()
    }

    /// Ask the tick thread to stop after its current tick. Does not wait.
    pub fn request_stop(&self) {
        self.shutdown_flag.store(true, Ordering::Release);
        if let Some(handle) = &self.tick_thread {
            handle.thread().unpark();
        }
    }

    /// Whether the tick thread has acknowledged a stop request.
    pub fn is_stopped(&self) -> bool {
        self.tick_stopped.load(Ordering::Acquire)
    }

    /// Stop the tick thread, join it and keep the simulation for
    /// [`take_simulation`](Self::take_simulation).
    ///
    /// 1. **Running → Draining:** set the stop flag, unpark the tick
    ///    thread, and wait up to 33ms for it to acknowledge.
    /// 2. **Draining → Stopped:** drop the command channel and join.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if self.state == ShutdownState::Stopped {
            return ShutdownReport {
                total_ms: 0,
                drain_ms: 0,
                tick_joined: true,
                final_tick: self.recovered_tick(),
            };
        }

        let start = Instant::now();

        // Phase 1: Running → Draining
        self.state = ShutdownState::Draining;
        self.request_stop();
        let drain_deadline = start + DRAIN_BUDGET;
        while !self.is_stopped() && Instant::now() < drain_deadline {
            thread::yield_now();
        }
        let drain_ms = start.elapsed().as_millis() as u64;

        // Phase 2: Draining → Stopped
        self.state = ShutdownState::Stopped;
        self.cmd_tx.take();
        let tick_joined = match self.tick_thread.take() {
            Some(handle) => match handle.join() {
                Ok(sim) => {
                    *self.recovered.lock().unwrap_or_else(PoisonError::into_inner) = Some(sim);
                    true
                }
                Err(_) => {
                    log::error!("tick thread panicked; simulation is lost");
                    false
                }
            },
            None => true,
        };

        let report = ShutdownReport {
            total_ms: start.elapsed().as_millis() as u64,
            drain_ms,
            tick_joined,
            final_tick: self.recovered_tick(),
        };
        log::info!("realtime simulation shut down: {report:?}");
        report
    }

    /// Shut down if still running and hand back the simulation.
    pub fn take_simulation(&mut self) -> Result<Simulation, ConfigError> {
        if self.state != ShutdownState::Stopped {
            self.shutdown();
        }
        self.recovered
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(ConfigError::SimulationRecoveryFailed)
    }

    fn recovered_tick(&self) -> Option<TickId> {
        self.recovered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Simulation::tick_id)
    }
}

impl Drop for RealtimeSimulation {
    fn drop(&mut self) {
        if self.state != ShutdownState::Stopped {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railyard_core::{CommandPayload, Orientation, Placeable};

    fn fast_config() -> SimConfig {
        SimConfig {
            width: 8,
            height: 8,
            tick_rate_hz: 500.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn initial_snapshot_is_published() {
        let rt = RealtimeSimulation::new(fast_config()).unwrap();
        let snap = rt.latest_snapshot().unwrap();
        assert_eq!((snap.width, snap.height), (8, 8));
    }

    #[test]
    fn submit_applies_on_tick_thread() {
        let mut rt = RealtimeSimulation::new(fast_config()).unwrap();
        let receipts = rt
            .submit_commands(vec![Command::new(CommandPayload::Place {
                origin: CellCoord::new(3, 3),
                placeable: Placeable::rail(Orientation::Right),
            })])
            .unwrap();
        assert!(receipts[0].accepted);
        assert!(rt.drain_redraws().contains(&CellCoord::new(3, 3)));

        let report = rt.shutdown();
        assert!(report.tick_joined);
        let sim = rt.take_simulation().unwrap();
        assert_eq!(sim.grid().layer().tile_count(), 1);
    }

    #[test]
    fn submit_after_shutdown_fails() {
        let mut rt = RealtimeSimulation::new(fast_config()).unwrap();
        rt.shutdown();
        assert_eq!(
            rt.submit_commands(Vec::new()),
            Err(SubmitError::Shutdown)
        );
        let again = rt.shutdown();
        assert_eq!(again.total_ms, 0);
    }

    #[test]
    fn slow_tick_rate_still_stops_promptly() {
        let mut rt = RealtimeSimulation::new(SimConfig {
            tick_rate_hz: 0.5,
            ..fast_config()
        })
        .unwrap();
        let report = rt.shutdown();
        assert!(report.tick_joined);
        assert!(rt.is_stopped());
        assert!(report.total_ms < 1000, "took {}ms", report.total_ms);
    }
}
