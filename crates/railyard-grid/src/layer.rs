//! Cell occupancy and the stationary tile store.

use std::sync::Arc;

use indexmap::IndexMap;
use railyard_core::{
    CellCoord, CellRect, ConnectionMask, GridError, ObjectId, Orientation, PlacementError,
};
use smallvec::SmallVec;

use crate::redraw::RedrawQueue;
use crate::tile::Tile;

/// A fixed-size cell array with at most one occupant per cell.
///
/// Every tile's footprint is claimed in `cells`; the tile itself lives in
/// an insertion-ordered store keyed by [`ObjectId`]. Reads off the edge of
/// the grid return `None` rather than failing.
#[derive(Debug)]
pub struct TileLayer {
    width: u32,
    height: u32,
    cells: Vec<Option<ObjectId>>,
    tiles: IndexMap<ObjectId, Tile>,
    redraw: Arc<RedrawQueue>,
}

impl TileLayer {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// An empty `width × height` layer.
    ///
    /// Returns `Err(GridError::InvalidDimensions)` if either side is zero
    /// or too large to address.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { width, height };
        if width == 0 || height == 0 || width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(invalid);
        }
        let count = (width as usize).checked_mul(height as usize).ok_or(invalid)?;
        Ok(Self {
            width,
            height,
            cells: vec![None; count],
            tiles: IndexMap::new(),
            redraw: Arc::new(RedrawQueue::new()),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `cell` is on the grid.
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as u32) < self.width
            && (cell.y as u32) < self.height
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Occupant of `cell`, or `None` when empty or out of bounds.
    pub fn occupant(&self, cell: CellCoord) -> Option<ObjectId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// The tile covering `cell`.
    pub fn tile_at(&self, cell: CellCoord) -> Option<&Tile> {
        self.occupant(cell).and_then(|id| self.tiles.get(&id))
    }

    /// Connection mask of the tile covering `cell`.
    pub fn mask_at(&self, cell: CellCoord) -> Option<ConnectionMask> {
        self.tile_at(cell).map(Tile::mask)
    }

    /// Tile by identity.
    pub fn tile(&self, id: ObjectId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Every tile, in placement order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Every cell with its occupant, row-major, for full redraws.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Option<ObjectId>)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(i, occ)| {
            (
                CellCoord::new((i % width) as i32, (i / width) as i32),
                *occ,
            )
        })
    }

    /// The raw occupancy array, row-major.
    pub fn occupancy(&self) -> &[Option<ObjectId>] {
        &self.cells
    }

    /// Queue shared with the render loop.
    pub fn redraw_queue(&self) -> &Arc<RedrawQueue> {
        &self.redraw
    }

    /// Check that `width × height` cells from `origin` are in bounds and free.
    pub fn check_placement(
        &self,
        origin: CellCoord,
        width: u32,
        height: u32,
    ) -> Result<(), PlacementError> {
        if width == 0 || height == 0 {
            return Err(PlacementError::InvalidFootprint { width, height });
        }
        if width > self.width || height > self.height {
            return Err(PlacementError::OutOfBounds {
                x: origin.x,
                y: origin.y,
            });
        }
        for cell in CellRect::new(origin, width, height).cells() {
            match self.index(cell) {
                None => return Err(PlacementError::OutOfBounds { x: cell.x, y: cell.y }),
                Some(i) if self.cells[i].is_some() => {
                    return Err(PlacementError::Occupied { x: cell.x, y: cell.y })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Boolean form of [`check_placement`](Self::check_placement).
    pub fn can_place(&self, origin: CellCoord, width: u32, height: u32) -> bool {
        self.check_placement(origin, width, height).is_ok()
    }

    /// Tiles next to `origin` on each side of `mask`, skipping the tile
    /// `own` itself. Sides come in canonical order.
    pub fn neighbors(
        &self,
        origin: CellCoord,
        mask: ConnectionMask,
        own: ObjectId,
    ) -> SmallVec<[(Orientation, &Tile); 4]> {
        mask.sides()
            .iter()
            .filter_map(|side| {
                let other = self.tile_at(origin.neighbor(side))?;
                (other.id() != own).then_some((side, other))
            })
            .collect()
    }

    /// Claim the footprint and store the tile. Caller checked placement.
    pub(crate) fn insert(&mut self, tile: Tile) -> &Tile {
        let id = tile.id();
        for cell in tile.footprint().cells() {
            if let Some(i) = self.index(cell) {
                self.cells[i] = Some(id);
            }
        }
        self.redraw.enqueue_all(tile.footprint().cells());
        self.tiles.entry(id).or_insert(tile)
    }

    /// Release the footprint and return the tile.
    pub(crate) fn remove(&mut self, id: ObjectId) -> Option<Tile> {
        let tile = self.tiles.shift_remove(&id)?;
        for cell in tile.footprint().cells() {
            if let Some(i) = self.index(cell) {
                if self.cells[i] == Some(id) {
                    self.cells[i] = None;
                }
            }
        }
        self.redraw.enqueue_all(tile.footprint().cells());
        Some(tile)
    }

    pub(crate) fn tile_mut(&mut self, id: ObjectId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }
}
