//! Railyard: a grid-based rail simulation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Railyard sub-crates. For most users, adding `railyard` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use railyard::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig {
//!     width: 8,
//!     height: 4,
//!     trains: vec![TrainSpawn { cell: CellCoord::new(1, 1), heading: Orientation::Right }],
//!     ..SimConfig::default()
//! })
//! .unwrap();
//!
//! for x in 0..8 {
//!     sim.place(CellCoord::new(x, 1), Placeable::rail(Orientation::Right)).unwrap();
//! }
//! assert_eq!(sim.registry().len(), 1);
//!
//! let metrics = sim.step();
//! assert_eq!(metrics.tick, railyard::types::TickId(1));
//! assert_eq!(metrics.updated_objects, 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `railyard-core` | Orientations, masks, coordinates, IDs, commands, errors |
//! | [`grid`] | `railyard-grid` | Tiles, the tile layer, the grid and its events |
//! | [`network`] | `railyard-network` | Train networks and the registry |
//! | [`engine`] | `railyard-engine` | Trains, lockstep and realtime simulation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`railyard-core`).
///
/// Contains [`types::Orientation`], [`types::ConnectionMask`], cell
/// coordinates, identifiers, commands, receipts, and error types.
pub use railyard_core as types;

/// Grid occupancy and tiles (`railyard-grid`).
///
/// [`grid::Grid`] owns placement and the tick schedule; [`grid::GridEvent`]
/// describes every structural change.
pub use railyard_grid as grid;

/// Rail network connectivity (`railyard-network`).
pub use railyard_network as network;

/// Trains and simulation drivers (`railyard-engine`).
///
/// [`engine::Simulation`] for lockstep stepping,
/// [`engine::RealtimeSimulation`] for a background tick thread.
pub use railyard_engine as engine;

/// Common imports for typical Railyard usage.
///
/// ```rust
/// use railyard::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use railyard_core::{
        CellCoord, CellRect, Command, CommandPayload, ConnectionMask, NetworkId, ObjectId,
        Orientation, Placeable, PlaceableKind, Receipt,
    };

    // Errors
    pub use railyard_core::{GridError, PlacementError};

    // Grid
    pub use railyard_grid::{GridEvent, GridObserver, MovingObject, Tile, TileKind};

    // Network
    pub use railyard_network::NetworkRegistry;

    // Engine
    pub use railyard_engine::{
        ConfigError, RealtimeSimulation, SimConfig, Simulation, StepMetrics, SubmitError,
        Train, TrainSpawn, WorldSnapshot,
    };
}
