//! Placeable selections, player commands, and receipts.

use crate::coord::CellCoord;
use crate::error::PlacementError;
use crate::id::{ObjectId, TickId};
use crate::orientation::Orientation;

/// The closed set of things a player can place.
///
/// Each variant carries its own construction parameters; the grid's tile
/// factory matches on the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaceableKind {
    /// A straight rail. Further pieces can be merged onto it.
    Rail,
    /// A quarter-circle rail.
    CurvedRail,
    /// A station with a `width × height` footprint.
    Station {
        /// Columns covered.
        width: u32,
        /// Rows covered.
        height: u32,
    },
}

/// A placeable kind together with the orientation it will be placed in.
///
/// # Examples
///
/// ```
/// use railyard_core::{Orientation, Placeable, PlaceableKind};
///
/// let curve = Placeable::new(PlaceableKind::CurvedRail, Orientation::Right);
/// assert_eq!(curve.footprint(), (1, 1));
///
/// let station = Placeable::station(3, 2);
/// assert_eq!(station.orientation, Orientation::Left);
/// assert_eq!(station.footprint(), (3, 2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placeable {
    /// What to build.
    pub kind: PlaceableKind,
    /// Facing of the new tile.
    pub orientation: Orientation,
}

impl Placeable {
    /// Pair a kind with an orientation.
    pub const fn new(kind: PlaceableKind, orientation: Orientation) -> Self {
        Self { kind, orientation }
    }

    /// A straight rail facing `orientation`.
    pub const fn rail(orientation: Orientation) -> Self {
        Self::new(PlaceableKind::Rail, orientation)
    }

    /// A curved rail facing `orientation`.
    pub const fn curved(orientation: Orientation) -> Self {
        Self::new(PlaceableKind::CurvedRail, orientation)
    }

    /// A station in its default orientation (`Left`).
    pub const fn station(width: u32, height: u32) -> Self {
        Self::new(PlaceableKind::Station { width, height }, Orientation::Left)
    }

    /// Footprint as `(width, height)`.
    pub fn footprint(&self) -> (u32, u32) {
        match self.kind {
            PlaceableKind::Rail | PlaceableKind::CurvedRail => (1, 1),
            PlaceableKind::Station { width, height } => (width, height),
        }
    }

    /// Whether this piece can be merged onto an existing straight rail.
    pub fn is_rail_piece(&self) -> bool {
        matches!(self.kind, PlaceableKind::Rail | PlaceableKind::CurvedRail)
    }
}

/// A command submitted by the input layer.
///
/// Commands in one batch are applied in `arrival_seq` order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    /// The operation to perform.
    pub payload: CommandPayload,
    /// Monotonic arrival sequence number, set on submission.
    pub arrival_seq: u64,
}

impl Command {
    /// Wrap a payload with `arrival_seq = 0`; the ingress path restamps it.
    pub fn new(payload: CommandPayload) -> Self {
        Self {
            payload,
            arrival_seq: 0,
        }
    }
}

/// All command payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandPayload {
    /// A player click: place the selection into an empty cell, or merge a
    /// rail piece onto the straight rail already there.
    Click {
        /// The clicked cell.
        cell: CellCoord,
        /// Currently selected placeable, if any.
        selection: Option<Placeable>,
    },
    /// Place a new stationary object with its footprint starting at `origin`.
    Place {
        /// Top-left cell of the footprint.
        origin: CellCoord,
        /// What to place.
        placeable: Placeable,
    },
    /// Remove whatever stationary object covers `cell`.
    Remove {
        /// Any cell of the target's footprint.
        cell: CellCoord,
    },
}

/// Receipt returned for each command in a submitted batch.
///
/// # Examples
///
/// ```
/// use railyard_core::{PlacementError, Receipt, TickId};
///
/// let receipt = Receipt {
///     accepted: false,
///     applied_tick_id: None,
///     reason_code: Some(PlacementError::Occupied { x: 1, y: 1 }),
///     command_index: 0,
///     object: None,
/// };
///
/// assert!(!receipt.accepted);
/// assert_eq!(receipt.applied_tick_id, None::<TickId>);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Whether the command took effect.
    pub accepted: bool,
    /// The tick boundary at which the command was applied.
    pub applied_tick_id: Option<TickId>,
    /// The reason the command was refused, if it was.
    pub reason_code: Option<PlacementError>,
    /// Index of this command within the submitted batch.
    pub command_index: usize,
    /// The object created, merged into, or removed.
    pub object: Option<ObjectId>,
}

impl Receipt {
    /// Receipt for an applied command.
    pub fn applied(command_index: usize, tick: TickId, object: ObjectId) -> Self {
        Self {
            accepted: true,
            applied_tick_id: Some(tick),
            reason_code: None,
            command_index,
            object: Some(object),
        }
    }

    /// Receipt for a refused command.
    pub fn rejected(command_index: usize, reason: PlacementError) -> Self {
        Self {
            accepted: false,
            applied_tick_id: None,
            reason_code: Some(reason),
            command_index,
            object: None,
        }
    }
}
