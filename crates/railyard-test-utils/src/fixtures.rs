//! Reusable track layouts.
//!
//! Each fixture returns the `(origin, placeable)` pairs in placement order,
//! so the same layout can be laid on a bare grid or through a simulation:
//!
//! - [`straight_line`]: a run of straight rails.
//! - [`loop_track`]: a closed rectangle of straight rails with curved corners.
//! - [`t_junction`]: a horizontal line with one branch curving down.

use railyard_core::{CellCoord, Orientation, Placeable, PlacementError};
use railyard_grid::{Grid, MovingObject};

/// A track layout in placement order.
pub type Layout = Vec<(CellCoord, Placeable)>;

/// `len` straight rails starting at `start`, stepping along `along`.
pub fn straight_line(start: CellCoord, along: Orientation, len: u32) -> Layout {
    (0..len as i32)
        .map(|i| (start.offset(along, i), Placeable::rail(along)))
        .collect()
}

/// A closed rectangular loop whose corners sit at `top_left` and
/// `top_left + (width - 1, height - 1)`. Needs `width, height >= 2`.
///
/// Corners are curves: top-left opens down/right, top-right down/left,
/// bottom-right up/left, bottom-left up/right.
pub fn loop_track(top_left: CellCoord, width: u32, height: u32) -> Layout {
    let (w, h) = (width as i32, height as i32);
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (x0 + w - 1, y0 + h - 1);
    let mut layout = vec![
        (CellCoord::new(x0, y0), Placeable::curved(Orientation::Right)),
        (CellCoord::new(x1, y0), Placeable::curved(Orientation::Down)),
        (CellCoord::new(x1, y1), Placeable::curved(Orientation::Left)),
        (CellCoord::new(x0, y1), Placeable::curved(Orientation::Up)),
    ];
    for x in x0 + 1..x1 {
        layout.push((CellCoord::new(x, y0), Placeable::rail(Orientation::Right)));
        layout.push((CellCoord::new(x, y1), Placeable::rail(Orientation::Right)));
    }
    for y in y0 + 1..y1 {
        layout.push((CellCoord::new(x0, y), Placeable::rail(Orientation::Down)));
        layout.push((CellCoord::new(x1, y), Placeable::rail(Orientation::Down)));
    }
    layout
}

/// A horizontal line of `len` rails from `start`, with a curve at
/// `branch` (an offset along the line) turning down into a one-rail stub.
///
/// The junction cell is a straight rail with the curve merged onto it,
/// so it must be applied with a click rather than a plain place; see
/// [`junction_piece`].
pub fn t_junction(start: CellCoord, len: u32, branch: i32) -> Layout {
    let mut layout = straight_line(start, Orientation::Right, len);
    let below = start.offset(Orientation::Right, branch).neighbor(Orientation::Down);
    layout.push((below, Placeable::rail(Orientation::Down)));
    layout
}

/// The extra piece merged onto the junction cell of [`t_junction`]:
/// a curve connecting the left side to the branch below.
pub fn junction_piece() -> Placeable {
    Placeable::curved(Orientation::Down)
}

/// Place every piece of `layout` on `grid`.
pub fn lay<M: MovingObject>(grid: &mut Grid<M>, layout: &Layout) -> Result<(), PlacementError> {
    for (origin, placeable) in layout {
        grid.place(*origin, *placeable)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_grid;

    #[test]
    fn loop_has_perimeter_cells() {
        let layout = loop_track(CellCoord::new(1, 1), 4, 3);
        assert_eq!(layout.len(), 2 * 4 + 2 * 3 - 4);
        let mut grid = test_grid(8, 8);
        lay(&mut grid, &layout).unwrap();
        assert_eq!(grid.layer().tile_count(), layout.len());
    }

    #[test]
    fn straight_line_steps_along() {
        let layout = straight_line(CellCoord::new(0, 2), Orientation::Right, 3);
        let cells: Vec<_> = layout.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            cells,
            vec![CellCoord::new(0, 2), CellCoord::new(1, 2), CellCoord::new(2, 2)]
        );
    }
}
