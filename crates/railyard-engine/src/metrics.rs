//! Per-tick metrics for the simulation.

use railyard_core::TickId;

/// Timing and bookkeeping collected during a single tick.
///
/// The simulation fills these in after each `step()`; realtime readers
/// find the latest copy in each published snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// The tick these metrics describe.
    pub tick: TickId,
    /// Wall-clock time for the whole tick, in microseconds.
    pub total_us: u64,
    /// Objects whose quick update ran.
    pub updated_objects: usize,
    /// Whether slow updates ran this tick.
    pub slow_update: bool,
    /// Live networks after the tick.
    pub live_networks: usize,
}
