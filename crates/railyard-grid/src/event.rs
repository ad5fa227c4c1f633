//! Structural notifications emitted by grid mutations.

use railyard_core::{CellCoord, CellRect, ConnectionMask, ObjectId, OrientationSet};

use crate::tile::Tile;

/// Snapshot of a rail tile at the moment it was added, removed or changed.
///
/// Carries enough placement data that consumers can reason about a tile
/// after it has left the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RailArgs {
    /// The tile.
    pub tile: ObjectId,
    /// Top-left cell.
    pub origin: CellCoord,
    /// Covered cells.
    pub footprint: CellRect,
    /// Connection mask at event time.
    pub mask: ConnectionMask,
    /// Decoded connection sides at event time.
    pub sides: OrientationSet,
}

impl RailArgs {
    /// Capture `tile` as it is now.
    pub fn of(tile: &Tile) -> Self {
        let mask = tile.mask();
        Self {
            tile: tile.id(),
            origin: tile.origin(),
            footprint: tile.footprint(),
            mask,
            sides: mask.sides(),
        }
    }
}

/// One structural change, in the order the grid performed it.
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    /// A stationary or moving object joined the grid.
    ObjectAdded {
        /// The object.
        id: ObjectId,
    },
    /// A stationary or moving object left the grid.
    ObjectRemoved {
        /// The object.
        id: ObjectId,
    },
    /// A rail-capable tile was placed.
    RailAdded(RailArgs),
    /// A rail-capable tile was removed.
    RailRemoved(RailArgs),
    /// A plain rail's mask grew after a piece was merged onto it.
    RailUpdated {
        /// The tile after the merge.
        args: RailArgs,
        /// Mask before the merge.
        previous: ConnectionMask,
    },
}

impl GridEvent {
    /// The object the event is about.
    pub fn object(&self) -> ObjectId {
        match self {
            Self::ObjectAdded { id } | Self::ObjectRemoved { id } => *id,
            Self::RailAdded(args) | Self::RailRemoved(args) => args.tile,
            Self::RailUpdated { args, .. } => args.tile,
        }
    }
}

/// Subscriber for grid events, run synchronously after the registry has
/// processed each event.
pub trait GridObserver {
    /// Handle one event.
    fn on_event(&mut self, event: &GridEvent);
}
