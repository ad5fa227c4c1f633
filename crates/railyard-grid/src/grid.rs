//! The grid: tile layer, moving objects, tick schedule and event queue.

use indexmap::{IndexMap, IndexSet};
use railyard_core::{
    CellCoord, ConnectionMask, GridError, ObjectId, Placeable, PlacementError, TickId,
};

use crate::event::{GridEvent, RailArgs};
use crate::layer::TileLayer;
use crate::tile::{Tile, TileKind};
use crate::update::{MovingObject, RouteQuery, UpdateContext};

/// Slow updates run on every sixth tick unless configured otherwise.
pub const DEFAULT_SLOW_UPDATE_INTERVAL: u64 = 6;

/// Outcome of one [`Grid::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// The tick that ran.
    pub tick: TickId,
    /// Number of objects whose quick update ran.
    pub updated: usize,
    /// Whether this was a slow tick.
    pub slow: bool,
}

/// A fixed-size grid of stationary tiles plus moving objects of type `M`.
///
/// Every mutation appends [`GridEvent`]s in the order it performed them;
/// the owner drains them with [`drain_events`](Self::drain_events) and
/// dispatches them before handing control back to its caller.
///
/// # Examples
///
/// ```
/// use railyard_core::{CellCoord, Orientation, Placeable};
/// use railyard_grid::{Grid, GridEvent, MovingObject};
///
/// struct Marker(railyard_core::ObjectId);
/// impl MovingObject for Marker {
///     fn id(&self) -> railyard_core::ObjectId { self.0 }
///     fn position(&self) -> (f32, f32) { (0.5, 0.5) }
/// }
///
/// let mut grid: Grid<Marker> = Grid::new(4, 4).unwrap();
/// let id = grid.place(CellCoord::new(1, 1), Placeable::rail(Orientation::Up)).unwrap();
/// assert!(!grid.can_place(CellCoord::new(1, 1), 1, 1));
///
/// let events = grid.drain_events();
/// assert!(matches!(events[0], GridEvent::RailAdded(args) if args.tile == id));
/// ```
#[derive(Debug)]
pub struct Grid<M> {
    layer: TileLayer,
    moving: IndexMap<ObjectId, M>,
    updateables: IndexSet<ObjectId>,
    pending: Vec<GridEvent>,
    tick: TickId,
    slow_update_interval: u64,
}

impl<M: MovingObject> Grid<M> {
    /// An empty `width × height` grid.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        Ok(Self {
            layer: TileLayer::new(width, height)?,
            moving: IndexMap::new(),
            updateables: IndexSet::new(),
            pending: Vec::new(),
            tick: TickId(0),
            slow_update_interval: DEFAULT_SLOW_UPDATE_INTERVAL,
        })
    }

    /// Run slow updates every `interval` ticks. Zero is treated as one.
    pub fn with_slow_update_interval(mut self, interval: u64) -> Self {
        self.slow_update_interval = interval.max(1);
        self
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The stationary layer.
    pub fn layer(&self) -> &TileLayer {
        &self.layer
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.layer.width()
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.layer.height()
    }

    /// Occupant of `cell`; `None` when empty or out of bounds.
    pub fn occupant(&self, cell: CellCoord) -> Option<ObjectId> {
        self.layer.occupant(cell)
    }

    /// Tile covering `cell`.
    pub fn tile_at(&self, cell: CellCoord) -> Option<&Tile> {
        self.layer.tile_at(cell)
    }

    /// Whether the footprint is in bounds, non-degenerate and free.
    pub fn can_place(&self, origin: CellCoord, width: u32, height: u32) -> bool {
        self.layer.can_place(origin, width, height)
    }

    /// Moving objects in insertion order.
    pub fn moving_objects(&self) -> impl Iterator<Item = &M> {
        self.moving.values()
    }

    /// A moving object by identity.
    pub fn moving(&self, id: ObjectId) -> Option<&M> {
        self.moving.get(&id)
    }

    /// Number of objects in the tick schedule.
    pub fn updateable_count(&self) -> usize {
        self.updateables.len()
    }

    /// Last executed tick; `TickId(0)` before the first.
    pub fn tick_id(&self) -> TickId {
        self.tick
    }

    /// Configured slow update interval.
    pub fn slow_update_interval(&self) -> u64 {
        self.slow_update_interval
    }

    /// Events not yet drained.
    pub fn pending_events(&self) -> &[GridEvent] {
        &self.pending
    }

    /// Take every pending event in mutation order.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.pending)
    }

    // ── Stationary objects ──────────────────────────────────────

    /// Claim `tile`'s footprint.
    ///
    /// Fails without mutating anything when the footprint is out of bounds
    /// or overlaps another occupant. On success emits `RailAdded` then
    /// `ObjectAdded` and queues a redraw of every claimed cell.
    pub fn add_stationary(&mut self, tile: Tile) -> Result<ObjectId, PlacementError> {
        let rect = tile.footprint();
        self.layer
            .check_placement(rect.origin, rect.width, rect.height)?;
        let id = tile.id();
        log::debug!("placing {tile}");
        let args = RailArgs::of(self.layer.insert(tile));
        self.pending.push(GridEvent::RailAdded(args));
        self.pending.push(GridEvent::ObjectAdded { id });
        Ok(id)
    }

    /// Instantiate `placeable` at `origin` and add it.
    pub fn place(
        &mut self,
        origin: CellCoord,
        placeable: Placeable,
    ) -> Result<ObjectId, PlacementError> {
        let (width, height) = placeable.footprint();
        self.layer.check_placement(origin, width, height)?;
        let tile = Tile::from_placeable(origin, placeable)?;
        self.add_stationary(tile)
    }

    /// Remove a stationary object, freeing its whole footprint.
    ///
    /// Emits `RailRemoved` then `ObjectRemoved`.
    pub fn remove_stationary(&mut self, id: ObjectId) -> Result<Tile, PlacementError> {
        let tile = self
            .layer
            .remove(id)
            .ok_or(PlacementError::UnknownObject { id })?;
        log::debug!("removed {tile}");
        self.pending.push(GridEvent::RailRemoved(RailArgs::of(&tile)));
        self.pending.push(GridEvent::ObjectRemoved { id });
        Ok(tile)
    }

    /// Remove whatever stationary object covers `cell`.
    pub fn remove_at(&mut self, cell: CellCoord) -> Result<Tile, PlacementError> {
        if !self.layer.in_bounds(cell) {
            return Err(PlacementError::OutOfBounds {
                x: cell.x,
                y: cell.y,
            });
        }
        let id = self
            .layer
            .occupant(cell)
            .ok_or(PlacementError::Vacant {
                x: cell.x,
                y: cell.y,
            })?;
        self.remove_stationary(id)
    }

    /// OR a rail piece onto the straight rail at `cell`.
    ///
    /// When the mask actually changes, queues a redraw of the cell and
    /// emits `RailUpdated`; an unchanged mask emits nothing.
    pub fn merge_piece(
        &mut self,
        cell: CellCoord,
        piece: ConnectionMask,
    ) -> Result<ObjectId, PlacementError> {
        let id = self.layer.occupant(cell).ok_or(PlacementError::Vacant {
            x: cell.x,
            y: cell.y,
        })?;
        let tile = self
            .layer
            .tile_mut(id)
            .ok_or(PlacementError::UnknownObject { id })?;
        let previous = tile.mask();
        if tile.merge_piece(piece)? {
            let args = RailArgs::of(tile);
            log::debug!("rail {id} mask {previous} -> {}", args.mask);
            for cell in args.footprint.cells() {
                self.layer.redraw_queue().enqueue(cell);
            }
            self.pending.push(GridEvent::RailUpdated { args, previous });
        }
        Ok(id)
    }

    /// Apply a player click at `cell`.
    ///
    /// An empty cell receives the selection with its footprint starting at
    /// `cell`. A straight rail under the cursor takes a selected rail or
    /// curve piece. Anything else is `Occupied`.
    pub fn click(
        &mut self,
        cell: CellCoord,
        selection: Option<Placeable>,
    ) -> Result<ObjectId, PlacementError> {
        let placeable = selection.ok_or(PlacementError::NoSelection)?;
        let Some(existing) = self.layer.tile_at(cell) else {
            return self.place(cell, placeable);
        };
        let mergeable = placeable.is_rail_piece()
            && matches!(existing.kind(), TileKind::Rail { .. });
        if !mergeable {
            return Err(PlacementError::Occupied {
                x: cell.x,
                y: cell.y,
            });
        }
        let piece = Tile::from_placeable(cell, placeable)?.mask();
        self.merge_piece(cell, piece)
    }

    // ── Moving objects ──────────────────────────────────────────

    /// Add a moving object. Returns `false` if one with the same ID is
    /// already present.
    pub fn add_moving(&mut self, mut object: M) -> bool {
        let id = object.id();
        if self.moving.contains_key(&id) {
            return false;
        }
        if object.as_updateable().is_some() {
            self.updateables.insert(id);
        }
        self.moving.insert(id, object);
        self.pending.push(GridEvent::ObjectAdded { id });
        true
    }

    /// Remove a moving object and unschedule it.
    pub fn remove_moving(&mut self, id: ObjectId) -> Option<M> {
        let object = self.moving.shift_remove(&id)?;
        self.updateables.shift_remove(&id);
        self.pending.push(GridEvent::ObjectRemoved { id });
        Some(object)
    }

    // ── Ticking ─────────────────────────────────────────────────

    /// Advance one tick: quick update on every scheduled object, plus a
    /// slow update when the tick number is a multiple of the interval.
    pub fn tick(&mut self, routes: &dyn RouteQuery) -> TickReport {
        self.tick = TickId(self.tick.0 + 1);
        let slow = self.tick.0 % self.slow_update_interval == 0;
        let Self {
            layer,
            moving,
            updateables,
            tick,
            ..
        } = self;
        let ctx = UpdateContext {
            tiles: layer,
            routes,
            tick: *tick,
        };
        let mut updated = 0;
        for id in updateables.iter() {
            let Some(updateable) = moving.get_mut(id).and_then(|m| m.as_updateable()) else {
                continue;
            };
            updateable.quick_update(&ctx);
            if slow {
                updateable.slow_update(&ctx);
            }
            updated += 1;
        }
        TickReport {
            tick: *tick,
            updated,
            slow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::{TrackRoutes, Updateable};
    use railyard_core::Orientation::*;

    #[derive(Debug)]
    struct Counter {
        id: ObjectId,
        quick: u32,
        slow: u32,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                id: ObjectId::next(),
                quick: 0,
                slow: 0,
            }
        }
    }

    impl Updateable for Counter {
        fn quick_update(&mut self, _ctx: &UpdateContext<'_>) {
            self.quick += 1;
        }
        fn slow_update(&mut self, _ctx: &UpdateContext<'_>) {
            self.slow += 1;
        }
    }

    impl MovingObject for Counter {
        fn id(&self) -> ObjectId {
            self.id
        }
        fn position(&self) -> (f32, f32) {
            (0.5, 0.5)
        }
        fn as_updateable(&mut self) -> Option<&mut dyn Updateable> {
            Some(self)
        }
    }

    fn grid() -> Grid<Counter> {
        Grid::new(6, 6).unwrap()
    }

    fn at(x: i32, y: i32) -> CellCoord {
        CellCoord::new(x, y)
    }

    #[test]
    fn failed_placement_leaves_grid_untouched() {
        let mut g = grid();
        g.place(at(2, 2), Placeable::rail(Up)).unwrap();
        g.drain_events();
        let before = g.layer().occupancy().to_vec();

        let err = g.place(at(1, 1), Placeable::station(2, 2)).unwrap_err();
        assert_eq!(err, PlacementError::Occupied { x: 2, y: 2 });
        assert_eq!(g.layer().occupancy(), before.as_slice());
        assert!(g.pending_events().is_empty());
        assert!(!g.can_place(at(1, 1), 2, 2));
    }

    #[test]
    fn oversized_footprint_is_out_of_bounds() {
        let mut g = grid();
        assert!(!g.can_place(at(0, 0), u32::MAX, 1));
        assert!(!g.can_place(at(0, 0), 1, 1 << 31));
        assert!(!g.can_place(at(0, 0), 7, 1));

        let err = g.place(at(0, 0), Placeable::station(1 << 31, 1)).unwrap_err();
        assert_eq!(err, PlacementError::OutOfBounds { x: 0, y: 0 });
        assert_eq!(g.layer().tile_count(), 0);
        assert!(g.layer().occupancy().iter().all(Option::is_none));
        assert!(g.pending_events().is_empty());
    }

    #[test]
    fn add_emits_rail_then_object_event() {
        let mut g = grid();
        let id = g.place(at(0, 0), Placeable::curved(Right)).unwrap();
        let events = g.drain_events();
        assert_eq!(events.len(), 2);
        match &events[0] {
            GridEvent::RailAdded(args) => {
                assert_eq!(args.tile, id);
                assert_eq!(args.mask, ConnectionMask::BOTTOM_TO_RIGHT);
                assert_eq!(args.sides.iter().collect::<Vec<_>>(), vec![Right, Down]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(events[1], GridEvent::ObjectAdded { id });
        assert_eq!(g.layer().redraw_queue().drain(), vec![at(0, 0)]);
    }

    #[test]
    fn remove_frees_every_station_cell() {
        let mut g = grid();
        let id = g.place(at(1, 1), Placeable::station(3, 2)).unwrap();
        g.drain_events();
        let tile = g.remove_at(at(3, 2)).unwrap();
        assert_eq!(tile.id(), id);
        assert!(g.layer().occupancy().iter().all(Option::is_none));
        let events = g.drain_events();
        assert!(matches!(events[0], GridEvent::RailRemoved(a) if a.tile == id));
        assert_eq!(events[1], GridEvent::ObjectRemoved { id });
        assert_eq!(
            g.remove_stationary(id).unwrap_err(),
            PlacementError::UnknownObject { id }
        );
    }

    #[test]
    fn click_places_then_merges() {
        let mut g = grid();
        let id = g.click(at(2, 2), Some(Placeable::rail(Left))).unwrap();
        g.drain_events();

        let merged = g.click(at(2, 2), Some(Placeable::curved(Up))).unwrap();
        assert_eq!(merged, id);
        assert_eq!(
            g.tile_at(at(2, 2)).unwrap().mask(),
            ConnectionMask::HORIZONTAL | ConnectionMask::TOP_TO_RIGHT
        );
        let events = g.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GridEvent::RailUpdated { previous, .. }] if *previous == ConnectionMask::HORIZONTAL
        ));

        // Same piece again: no change, no event.
        g.click(at(2, 2), Some(Placeable::curved(Up))).unwrap();
        assert!(g.pending_events().is_empty());
    }

    #[test]
    fn click_refuses_stations_and_non_rails() {
        let mut g = grid();
        g.place(at(0, 0), Placeable::curved(Up)).unwrap();
        assert_eq!(
            g.click(at(0, 0), Some(Placeable::rail(Up))),
            Err(PlacementError::Occupied { x: 0, y: 0 })
        );
        g.place(at(3, 3), Placeable::rail(Up)).unwrap();
        assert_eq!(
            g.click(at(3, 3), Some(Placeable::station(1, 1))),
            Err(PlacementError::Occupied { x: 3, y: 3 })
        );
        assert_eq!(g.click(at(5, 5), None), Err(PlacementError::NoSelection));
    }

    #[test]
    fn slow_update_every_sixth_tick() {
        let mut g = grid();
        let c = Counter::new();
        let id = c.id;
        assert!(g.add_moving(c));
        assert_eq!(g.updateable_count(), 1);

        for _ in 0..12 {
            g.tick(&TrackRoutes);
        }
        let c = g.moving(id).unwrap();
        assert_eq!(c.quick, 12);
        assert_eq!(c.slow, 2);
        assert_eq!(g.tick_id(), TickId(12));
    }

    #[test]
    fn moving_objects_add_once_and_unschedule_on_remove() {
        let mut g = grid();
        let c = Counter::new();
        let id = c.id;
        assert!(g.add_moving(c));
        let dup = Counter {
            id,
            quick: 0,
            slow: 0,
        };
        assert!(!g.add_moving(dup));
        assert_eq!(g.moving_objects().count(), 1);

        assert!(g.remove_moving(id).is_some());
        assert_eq!(g.updateable_count(), 0);
        let report = g.tick(&TrackRoutes);
        assert_eq!(report.updated, 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn occupancy_matches_footprints(
                placements in prop::collection::vec((0i32..6, 0i32..6, 1u32..4, 1u32..4), 1..24)
            ) {
                let mut g = grid();
                for (x, y, w, h) in placements {
                    let before = g.layer().occupancy().to_vec();
                    let fits = g.can_place(at(x, y), w, h);
                    let placed = g.place(at(x, y), Placeable::station(w, h));
                    prop_assert_eq!(fits, placed.is_ok());
                    if placed.is_err() {
                        prop_assert_eq!(g.layer().occupancy(), before.as_slice());
                    }
                }
                for (cell, occupant) in g.layer().cells() {
                    let covering = g
                        .layer()
                        .tiles()
                        .filter(|t| t.footprint().contains(cell))
                        .map(Tile::id)
                        .collect::<Vec<_>>();
                    prop_assert!(covering.len() <= 1);
                    prop_assert_eq!(occupant, covering.first().copied());
                }
            }
        }
    }
}
