//! Integer grid coordinates and rectangular footprints.

use std::fmt;

use crate::orientation::Orientation;

/// A grid cell position. `x` grows rightwards, `y` downwards.
///
/// Coordinates are signed so that neighbor lookups off the edge of the
/// grid are representable; the grid treats them as out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl CellCoord {
    /// Construct a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell `amount` steps away in direction `o`.
    pub fn offset(self, o: Orientation, amount: i32) -> Self {
        let (dx, dy) = o.offset(amount);
        Self::new(self.x + dx, self.y + dy)
    }

    /// The adjacent cell in direction `o`.
    pub fn neighbor(self, o: Orientation) -> Self {
        self.offset(o, 1)
    }

    /// The cell containing a continuous position (floor of each axis).
    pub fn containing(x: f32, y: f32) -> Self {
        Self::new(x.floor() as i32, y.floor() as i32)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned block of cells: `width × height` starting at `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Top-left cell.
    pub origin: CellCoord,
    /// Columns covered.
    pub width: u32,
    /// Rows covered.
    pub height: u32,
}

impl CellRect {
    /// Construct a rectangle.
    pub const fn new(origin: CellCoord, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// The 1×1 rectangle covering `cell`.
    pub const fn unit(cell: CellCoord) -> Self {
        Self::new(cell, 1, 1)
    }

    /// One past the last column, widened to avoid overflow.
    fn right(&self) -> i64 {
        self.origin.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.origin.y as i64 + self.height as i64
    }

    /// Whether `cell` lies inside the rectangle.
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= self.origin.x
            && cell.y >= self.origin.y
            && (cell.x as i64) < self.right()
            && (cell.y as i64) < self.bottom()
    }

    /// Whether the two rectangles share at least one cell.
    pub fn intersects(&self, other: &CellRect) -> bool {
        (self.origin.x as i64) < other.right()
            && (other.origin.x as i64) < self.right()
            && (self.origin.y as i64) < other.bottom()
            && (other.origin.y as i64) < self.bottom()
    }

    /// Every covered cell that `i32` coordinates can address, row-major.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        let Self {
            origin,
            width,
            height,
        } = self;
        let cols = i32::try_from(width).unwrap_or(i32::MAX);
        let rows = i32::try_from(height).unwrap_or(i32::MAX);
        (0..rows)
            .map_while(move |dy| origin.y.checked_add(dy))
            .flat_map(move |y| {
                (0..cols)
                    .map_while(move |dx| origin.x.checked_add(dx))
                    .map(move |x| CellCoord::new(x, y))
            })
    }

    /// Number of covered cells.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_positions() {
        assert_eq!(CellCoord::containing(1.99, 0.0), CellCoord::new(1, 0));
        assert_eq!(CellCoord::containing(-0.25, 2.5), CellCoord::new(-1, 2));
    }

    #[test]
    fn rect_intersection_is_exclusive_at_edges() {
        let station = CellRect::new(CellCoord::new(2, 2), 3, 2);
        assert!(station.intersects(&CellRect::unit(CellCoord::new(4, 3))));
        assert!(!station.intersects(&CellRect::unit(CellCoord::new(5, 3))));
        assert!(!station.intersects(&CellRect::unit(CellCoord::new(2, 4))));
        assert!(station.contains(CellCoord::new(3, 3)));
        assert!(!station.contains(CellCoord::new(1, 2)));
    }

    #[test]
    fn rect_cells_never_wrap() {
        let wide = CellRect::new(CellCoord::new(0, 0), u32::MAX, 1);
        assert_eq!(wide.cells().take(3).count(), 3);
        let edge = CellRect::new(CellCoord::new(i32::MAX - 1, 0), 5, 1);
        assert_eq!(
            edge.cells().collect::<Vec<_>>(),
            vec![CellCoord::new(i32::MAX - 1, 0), CellCoord::new(i32::MAX, 0)]
        );
    }

    #[test]
    fn rect_cells_row_major() {
        let rect = CellRect::new(CellCoord::new(1, 1), 2, 2);
        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
            ]
        );
        assert_eq!(rect.area(), 4);
    }
}
