//! Core types for the Railyard rail simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Railyard workspace:
//! the orientation algebra, rail connection masks, grid coordinates,
//! identifiers, placement commands, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod coord;
pub mod error;
pub mod id;
pub mod mask;
pub mod orientation;

pub use command::{Command, CommandPayload, Placeable, PlaceableKind, Receipt};
pub use coord::{CellCoord, CellRect};
pub use error::{GridError, MaskError, NetworkError, PlacementError, TileError};
pub use id::{NetworkId, ObjectId, TickId};
pub use mask::ConnectionMask;
pub use orientation::{Orientation, OrientationSet};
