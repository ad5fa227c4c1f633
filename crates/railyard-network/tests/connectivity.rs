//! Connectivity over whole layouts and random placement sequences.

use proptest::prelude::*;
use railyard_core::{CellCoord, NetworkId, Orientation, Placeable};
use railyard_network::NetworkRegistry;
use railyard_test_utils::fixtures::{junction_piece, loop_track, straight_line, t_junction};
use railyard_test_utils::{test_grid, TestGrid};

fn sync(grid: &mut TestGrid, registry: &mut NetworkRegistry) {
    for event in grid.drain_events() {
        registry.handle(&event, grid.layer());
    }
}

#[test]
fn loop_forms_single_network() {
    let mut grid = test_grid(10, 10);
    let mut registry = NetworkRegistry::new();
    for (cell, piece) in loop_track(CellCoord::new(2, 2), 5, 4) {
        grid.place(cell, piece).unwrap();
        sync(&mut grid, &mut registry);
    }
    assert_eq!(registry.len(), 1);
    let network = registry.live_networks().next().unwrap();
    assert_eq!(network.len(), grid.layer().tile_count());
}

#[test]
fn parallel_lines_stay_apart() {
    let mut grid = test_grid(10, 10);
    let mut registry = NetworkRegistry::new();
    for row in [1, 2] {
        for (cell, piece) in straight_line(CellCoord::new(0, row), Orientation::Right, 6) {
            grid.place(cell, piece).unwrap();
            sync(&mut grid, &mut registry);
        }
    }
    assert_eq!(registry.len(), 2);
}

#[test]
fn junction_click_links_branch() {
    let mut grid = test_grid(10, 10);
    let mut registry = NetworkRegistry::new();
    let start = CellCoord::new(1, 1);
    for (cell, piece) in t_junction(start, 5, 2) {
        grid.place(cell, piece).unwrap();
        sync(&mut grid, &mut registry);
    }
    // The stub below the line is its own network until the curve is merged.
    assert_eq!(registry.len(), 2);

    let junction = start.offset(Orientation::Right, 2);
    grid.click(junction, Some(junction_piece())).unwrap();
    sync(&mut grid, &mut registry);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.live_networks().next().unwrap().id(), NetworkId(1));
}

fn any_piece() -> impl Strategy<Value = Placeable> {
    (0usize..4, any::<bool>()).prop_map(|(o, curved)| {
        let o = Orientation::ALL[o];
        if curved {
            Placeable::curved(o)
        } else {
            Placeable::rail(o)
        }
    })
}

proptest! {
    #[test]
    fn every_tile_in_exactly_one_live_network(
        placements in prop::collection::vec(((0i32..6, 0i32..6), any_piece()), 1..40)
    ) {
        let mut grid = test_grid(6, 6);
        let mut registry = NetworkRegistry::new();
        for ((x, y), piece) in placements {
            let _ = grid.click(CellCoord::new(x, y), Some(piece));
            sync(&mut grid, &mut registry);
        }
        for tile in grid.layer().tiles() {
            let owners = registry
                .live_networks()
                .filter(|n| n.contains(tile.id()))
                .count();
            prop_assert_eq!(owners, 1);
        }
        let mut ids: Vec<_> = registry.live_networks().map(|n| n.id()).collect();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
        prop_assert!(registry.live_networks().all(|n| !n.is_empty()));
    }
}
