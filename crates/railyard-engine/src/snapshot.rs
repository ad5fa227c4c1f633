//! Immutable copies of simulation state for renderers.

use railyard_core::{
    CellCoord, CellRect, ConnectionMask, NetworkId, ObjectId, Orientation, TickId,
};
use railyard_grid::TileKind;

use crate::metrics::StepMetrics;

/// A stationary tile as a renderer sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileView {
    /// Identity.
    pub id: ObjectId,
    /// Kind tag.
    pub kind: TileKind,
    /// Top-left cell.
    pub origin: CellCoord,
    /// Covered cells.
    pub footprint: CellRect,
    /// Facing.
    pub orientation: Orientation,
    /// Connection mask, for texture lookup.
    pub mask: ConnectionMask,
    /// Owning network, for debug coloring.
    pub network: Option<NetworkId>,
}

/// A train as a renderer sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainView {
    /// Identity.
    pub id: ObjectId,
    /// Continuous column.
    pub x: f32,
    /// Continuous row.
    pub y: f32,
    /// Direction of travel.
    pub heading: Orientation,
    /// Side most recently entered through.
    pub from: Orientation,
    /// Rendering angle in degrees.
    pub facing: f32,
}

/// Owned, immutable state of the world after one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    /// Last executed tick.
    pub tick: TickId,
    /// Grid columns.
    pub width: u32,
    /// Grid rows.
    pub height: u32,
    /// Tiles in placement order.
    pub tiles: Vec<TileView>,
    /// Trains in spawn order.
    pub trains: Vec<TrainView>,
    /// Number of live networks.
    pub live_networks: usize,
    /// Metrics of the tick that produced this snapshot.
    pub metrics: StepMetrics,
}

impl WorldSnapshot {
    /// The tile covering `cell`.
    pub fn tile_at(&self, cell: CellCoord) -> Option<&TileView> {
        self.tiles.iter().find(|t| t.footprint.contains(cell))
    }

    /// A train by identity.
    pub fn train(&self, id: ObjectId) -> Option<&TrainView> {
        self.trains.iter().find(|t| t.id == id)
    }
}
