//! Trains, the simulation context and realtime execution for Railyard.
//!
//! - [`Simulation`] is the lockstep context: it owns the grid and the
//!   network registry, applies commands, and steps on demand.
//! - [`RealtimeSimulation`] moves a `Simulation` onto a tick thread and
//!   publishes [`WorldSnapshot`]s through a [`SnapshotRing`].
//! - [`Train`] is the moving object both modes tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod realtime;
pub mod ring;
pub mod simulation;
pub mod snapshot;
pub(crate) mod tick_thread;
pub mod train;

pub use config::{ConfigError, SimConfig, TrainSpawn};
pub use metrics::StepMetrics;
pub use realtime::{RealtimeSimulation, ShutdownReport, SubmitError};
pub use ring::SnapshotRing;
pub use simulation::Simulation;
pub use snapshot::{TileView, TrainView, WorldSnapshot};
pub use train::Train;
