//! Criterion micro-benchmarks for placement and network bookkeeping.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use railyard_bench::{lattice_layout, scatter_layout};
use railyard_core::{ConnectionMask, Orientation};
use railyard_grid::{RouteQuery, TrackRoutes};
use railyard_network::NetworkRegistry;
use railyard_test_utils::{test_grid, TestGrid};

fn sync(grid: &mut TestGrid, registry: &mut NetworkRegistry) {
    for event in grid.drain_events() {
        registry.handle(&event, grid.layer());
    }
}

/// Benchmark: Place 2K scattered rails on a 64x64 grid, dispatching every
/// event to the registry.
fn bench_place_scattered_2k(c: &mut Criterion) {
    let layout = scatter_layout(64, 64, 2_000, 7);

    c.bench_function("place_scattered_2k", |b| {
        b.iter_batched(
            || (test_grid(64, 64), NetworkRegistry::new()),
            |(mut grid, mut registry)| {
                for (origin, placeable) in &layout {
                    grid.place(*origin, *placeable).unwrap();
                    sync(&mut grid, &mut registry);
                }
                black_box(registry.len())
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: Click a full 64x64 lattice into place. Every crossing is a
/// mask merge that folds networks together.
fn bench_lattice_clicks_64(c: &mut Criterion) {
    let clicks = lattice_layout(64, 64);

    c.bench_function("lattice_clicks_64", |b| {
        b.iter_batched(
            || (test_grid(64, 64), NetworkRegistry::new()),
            |(mut grid, mut registry)| {
                for (cell, piece) in &clicks {
                    grid.click(*cell, Some(*piece)).unwrap();
                    sync(&mut grid, &mut registry);
                }
                black_box(registry.len())
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: network_of() for every tile of a scattered layout. The
/// lookup is a linear scan over live networks.
fn bench_network_of_scattered(c: &mut Criterion) {
    let layout = scatter_layout(64, 64, 2_000, 11);
    let mut grid = test_grid(64, 64);
    let mut registry = NetworkRegistry::new();
    for (origin, placeable) in &layout {
        grid.place(*origin, *placeable).unwrap();
        sync(&mut grid, &mut registry);
    }
    let ids: Vec<_> = grid.layer().tiles().map(|t| t.id()).collect();

    c.bench_function("network_of_scattered_2k", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(registry.network_id_of(*id));
            }
        });
    });
}

/// Benchmark: Decode every mask against every arrival side.
fn bench_mask_decode(c: &mut Criterion) {
    let masks: Vec<ConnectionMask> = (0..=u16::MAX)
        .filter_map(|bits| ConnectionMask::from_bits(bits).ok())
        .collect();

    c.bench_function("mask_decode_all", |b| {
        b.iter(|| {
            for mask in &masks {
                for from in Orientation::ALL {
                    black_box(mask.exits_from(from));
                }
                black_box(mask.sides());
            }
        });
    });
}

/// Benchmark: Route queries straight off the tile masks across a lattice.
fn bench_track_routes(c: &mut Criterion) {
    let mut grid = test_grid(64, 64);
    for (cell, piece) in lattice_layout(64, 64) {
        grid.click(cell, Some(piece)).unwrap();
    }
    let routes = TrackRoutes;

    c.bench_function("track_routes_64", |b| {
        b.iter(|| {
            for (cell, _) in grid.layer().cells() {
                for heading in Orientation::ALL {
                    black_box(routes.directions(grid.layer(), black_box(cell), heading));
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_place_scattered_2k,
    bench_lattice_clicks_64,
    bench_network_of_scattered,
    bench_mask_decode,
    bench_track_routes
);
criterion_main!(benches);
