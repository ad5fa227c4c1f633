//! Rail-capable tiles and the adjacency test that drives network merging.

use std::fmt;

use railyard_core::{
    CellCoord, CellRect, ConnectionMask, ObjectId, Orientation, Placeable, PlaceableKind,
    PlacementError, TileError,
};

/// The closed set of stationary tile kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    /// Straight rail. Its mask accumulates every piece merged onto it.
    Rail {
        /// Current connections.
        mask: ConnectionMask,
    },
    /// Quarter-circle rail; mask fixed by orientation.
    CurvedRail,
    /// Station; straight mask fixed by orientation, any footprint.
    Station,
}

/// Largest footprint side; cell coordinates are `i32`.
const MAX_EXTENT: u32 = i32::MAX as u32;

/// A stationary grid occupant exposing a connection mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    id: ObjectId,
    origin: CellCoord,
    width: u32,
    height: u32,
    orientation: Orientation,
    kind: TileKind,
}

impl Tile {
    fn build(
        origin: CellCoord,
        width: u32,
        height: u32,
        orientation: Orientation,
        kind: TileKind,
    ) -> Result<Self, TileError> {
        if width == 0 || height == 0 || width > MAX_EXTENT || height > MAX_EXTENT {
            return Err(TileError::InvalidFootprint { width, height });
        }
        if origin.x < 0 || origin.y < 0 {
            return Err(TileError::NegativeCoordinate {
                x: origin.x,
                y: origin.y,
            });
        }
        Ok(Self {
            id: ObjectId::next(),
            origin,
            width,
            height,
            orientation,
            kind,
        })
    }

    /// A straight rail along `orientation`.
    pub fn rail(origin: CellCoord, orientation: Orientation) -> Result<Self, TileError> {
        let mask = ConnectionMask::straight(orientation);
        Self::build(origin, 1, 1, orientation, TileKind::Rail { mask })
    }

    /// A curved rail facing `orientation`.
    pub fn curved_rail(origin: CellCoord, orientation: Orientation) -> Result<Self, TileError> {
        Self::build(origin, 1, 1, orientation, TileKind::CurvedRail)
    }

    /// A `width × height` station facing `orientation`.
    pub fn station(
        origin: CellCoord,
        width: u32,
        height: u32,
        orientation: Orientation,
    ) -> Result<Self, TileError> {
        Self::build(origin, width, height, orientation, TileKind::Station)
    }

    /// Instantiate a player selection at `origin`.
    ///
    /// # Examples
    ///
    /// ```
    /// use railyard_core::{CellCoord, ConnectionMask, Orientation, Placeable};
    /// use railyard_grid::Tile;
    ///
    /// let tile = Tile::from_placeable(CellCoord::new(2, 3), Placeable::curved(Orientation::Down)).unwrap();
    /// assert_eq!(tile.mask(), ConnectionMask::BOTTOM_TO_LEFT);
    /// ```
    pub fn from_placeable(origin: CellCoord, placeable: Placeable) -> Result<Self, TileError> {
        match placeable.kind {
            PlaceableKind::Rail => Self::rail(origin, placeable.orientation),
            PlaceableKind::CurvedRail => Self::curved_rail(origin, placeable.orientation),
            PlaceableKind::Station { width, height } => {
                Self::station(origin, width, height, placeable.orientation)
            }
        }
    }

    /// Identity.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Top-left cell of the footprint.
    pub fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Covered cells.
    pub fn footprint(&self) -> CellRect {
        CellRect::new(self.origin, self.width, self.height)
    }

    /// Facing chosen at placement.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Kind tag.
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Connection mask used for routing, adjacency and texture lookup.
    pub fn mask(&self) -> ConnectionMask {
        match self.kind {
            TileKind::Rail { mask } => mask,
            TileKind::CurvedRail => ConnectionMask::curve(self.orientation),
            TileKind::Station => ConnectionMask::straight(self.orientation),
        }
    }

    /// OR a rail piece onto a straight rail.
    ///
    /// Returns whether the mask changed. Curves and stations refuse.
    pub fn merge_piece(&mut self, piece: ConnectionMask) -> Result<bool, PlacementError> {
        match &mut self.kind {
            TileKind::Rail { mask } => {
                let merged = *mask | piece;
                let changed = merged != *mask;
                *mask = merged;
                Ok(changed)
            }
            TileKind::CurvedRail | TileKind::Station => Err(PlacementError::NotMergeable {
                x: self.origin.x,
                y: self.origin.y,
            }),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TileKind::Rail { .. } => "rail",
            TileKind::CurvedRail => "curved rail",
            TileKind::Station => "station",
        };
        write!(f, "{kind} {} at {}", self.id, self.origin)
    }
}

/// Adjacency test over raw placement data.
///
/// True when the first side of `a_mask` whose neighbor cell (taken from
/// `a_origin`) overlaps `b_rect` is matched by the opposite side in
/// `b_mask`. Only that first overlapping side is considered.
pub fn footprints_attach(
    a_origin: CellCoord,
    a_mask: ConnectionMask,
    b_rect: CellRect,
    b_mask: ConnectionMask,
) -> bool {
    for side in a_mask.sides().iter() {
        let probe = CellRect::unit(a_origin.neighbor(side));
        if probe.intersects(&b_rect) {
            return b_mask.sides().contains(side.opposite());
        }
    }
    false
}

/// Whether `a` connects into `b` across a shared edge.
pub fn tiles_attach(a: &Tile, b: &Tile) -> bool {
    footprints_attach(a.origin, a.mask(), b.footprint(), b.mask())
}
