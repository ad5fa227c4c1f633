//! Grid occupancy, rail tiles and structural events for Railyard.
//!
//! The grid is split in two layers. [`TileLayer`] owns the cell array and
//! every stationary [`Tile`]; [`Grid`] adds the moving objects, the tick
//! schedule, and the queue of [`GridEvent`]s consumed by the network
//! registry. Moving objects see the tile layer read-only through an
//! [`UpdateContext`] while they update, so a tick never aliases the
//! state it reads.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod event;
pub mod grid;
pub mod layer;
pub mod redraw;
pub mod tile;
pub mod update;

pub use event::{GridEvent, GridObserver, RailArgs};
pub use grid::{Grid, TickReport, DEFAULT_SLOW_UPDATE_INTERVAL};
pub use layer::TileLayer;
pub use redraw::RedrawQueue;
pub use tile::{footprints_attach, tiles_attach, Tile, TileKind};
pub use update::{MovingObject, RouteQuery, TrackRoutes, UpdateContext, Updateable};
