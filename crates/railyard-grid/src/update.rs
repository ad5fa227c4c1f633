//! Per-tick contracts for moving objects and the routing seam they use.

use railyard_core::{CellCoord, ObjectId, Orientation, OrientationSet, TickId};

use crate::layer::TileLayer;

/// Read-only view handed to every updateable during a tick.
pub struct UpdateContext<'a> {
    /// Stationary tiles, frozen for the duration of the tick.
    pub tiles: &'a TileLayer,
    /// Routing answers for moving objects.
    pub routes: &'a dyn RouteQuery,
    /// The tick being executed.
    pub tick: TickId,
}

/// Objects that participate in the tick schedule.
pub trait Updateable {
    /// Called on every tick.
    fn quick_update(&mut self, ctx: &UpdateContext<'_>);

    /// Called on every slow tick, after [`quick_update`](Self::quick_update).
    fn slow_update(&mut self, _ctx: &UpdateContext<'_>) {}
}

/// An object that floats over the grid instead of claiming cells.
pub trait MovingObject {
    /// Identity.
    fn id(&self) -> ObjectId;

    /// Continuous position in cell units.
    fn position(&self) -> (f32, f32);

    /// The cell under the object's position.
    fn cell(&self) -> CellCoord {
        let (x, y) = self.position();
        CellCoord::containing(x, y)
    }

    /// Tick capability, if the object has one.
    fn as_updateable(&mut self) -> Option<&mut dyn Updateable> {
        None
    }
}

/// Answers "where can a train heading `heading` go from `cell`?".
pub trait RouteQuery {
    /// Exits from the tile at `cell` for a train that entered it travelling
    /// `heading`, in canonical order. Empty when the cell holds no tile.
    fn directions(&self, tiles: &TileLayer, cell: CellCoord, heading: Orientation)
        -> OrientationSet;
}

/// Routing straight from the tile masks, without any network bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackRoutes;

impl RouteQuery for TrackRoutes {
    fn directions(
        &self,
        tiles: &TileLayer,
        cell: CellCoord,
        heading: Orientation,
    ) -> OrientationSet {
        match tiles.tile_at(cell) {
            Some(tile) => tile.mask().exits_from(heading.opposite()),
            None => OrientationSet::EMPTY,
        }
    }
}
