//! Error types for the Railyard simulation, organized by subsystem:
//! masks, tile construction, grid construction, placement, and the
//! network registry.

use std::error::Error;
use std::fmt;

use crate::id::{NetworkId, ObjectId};

/// Raw connection bits that are not a subset of the `ALL` mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskError {
    /// At least one bit outside `ConnectionMask::ALL` is set.
    InvalidBits {
        /// The rejected bits.
        bits: u16,
    },
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBits { bits } => {
                write!(f, "connection bits {bits:#06x} are not a subset of ALL")
            }
        }
    }
}

impl Error for MaskError {}

/// Errors from tile construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileError {
    /// Footprint width or height is zero or beyond the `i32` coordinate range.
    InvalidFootprint {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Origin has a negative coordinate.
    NegativeCoordinate {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
    },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFootprint { width, height } => {
                write!(f, "tile footprint {width}x{height} must be at least 1x1")
            }
            Self::NegativeCoordinate { x, y } => {
                write!(f, "tile origin ({x}, {y}) has a negative coordinate")
            }
        }
    }
}

impl Error for TileError {}

/// Errors from grid construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is zero, or the cell count overflows.
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "grid dimensions {width}x{height} are invalid")
            }
        }
    }
}

impl Error for GridError {}

/// Why a placement, removal, or merge request was refused.
///
/// A refused request never mutates the grid. Used as the
/// [`Receipt::reason_code`](crate::command::Receipt) of rejected commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementError {
    /// Footprint width or height is zero.
    InvalidFootprint {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Part of the footprint lies outside the grid.
    OutOfBounds {
        /// First offending column.
        x: i32,
        /// First offending row.
        y: i32,
    },
    /// Part of the footprint is already claimed.
    Occupied {
        /// First occupied column.
        x: i32,
        /// First occupied row.
        y: i32,
    },
    /// The target cell holds nothing.
    Vacant {
        /// Target column.
        x: i32,
        /// Target row.
        y: i32,
    },
    /// No object with this ID is on the grid.
    UnknownObject {
        /// The unknown ID.
        id: ObjectId,
    },
    /// The target cannot take an extra rail piece.
    NotMergeable {
        /// Target column.
        x: i32,
        /// Target row.
        y: i32,
    },
    /// A click arrived with nothing selected to place.
    NoSelection,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFootprint { width, height } => {
                write!(f, "footprint {width}x{height} must be at least 1x1")
            }
            Self::OutOfBounds { x, y } => write!(f, "cell ({x}, {y}) is out of bounds"),
            Self::Occupied { x, y } => write!(f, "cell ({x}, {y}) is occupied"),
            Self::Vacant { x, y } => write!(f, "cell ({x}, {y}) is empty"),
            Self::UnknownObject { id } => write!(f, "object {id} is not on the grid"),
            Self::NotMergeable { x, y } => {
                write!(f, "object at ({x}, {y}) cannot take another rail piece")
            }
            Self::NoSelection => write!(f, "nothing selected to place"),
        }
    }
}

impl Error for PlacementError {}

impl From<TileError> for PlacementError {
    fn from(e: TileError) -> Self {
        match e {
            TileError::InvalidFootprint { width, height } => {
                Self::InvalidFootprint { width, height }
            }
            TileError::NegativeCoordinate { x, y } => Self::OutOfBounds { x, y },
        }
    }
}

/// Network registry invariant violations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkError {
    /// A merge named a network that is not live.
    MissingNetwork {
        /// The missing network.
        network: NetworkId,
    },
    /// A rail tile is not a member of any live network.
    UntrackedTile {
        /// The orphaned tile.
        tile: ObjectId,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNetwork { network } => write!(f, "network {network} is not live"),
            Self::UntrackedTile { tile } => write!(f, "rail tile {tile} belongs to no network"),
        }
    }
}

impl Error for NetworkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_errors_convert_to_placement_errors() {
        let e: PlacementError = TileError::InvalidFootprint {
            width: 0,
            height: 2,
        }
        .into();
        assert_eq!(
            e,
            PlacementError::InvalidFootprint {
                width: 0,
                height: 2
            }
        );
        let e: PlacementError = TileError::NegativeCoordinate { x: -1, y: 0 }.into();
        assert_eq!(e, PlacementError::OutOfBounds { x: -1, y: 0 });
    }

    #[test]
    fn display_mentions_cell() {
        let msg = PlacementError::Occupied { x: 3, y: 4 }.to_string();
        assert!(msg.contains("(3, 4)"));
    }
}
