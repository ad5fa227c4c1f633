//! Benchmark profiles and utilities for Railyard.
//!
//! - [`lattice_layout`]: a city-block lattice of straight rails with
//!   crossings at every intersection
//! - [`reference_profile`]: 64x64 lattice with 32 trains
//! - [`stress_profile`]: 256x256 lattice with 512 trains
//! - [`build`]: lay a profile's track and return a ready-to-step simulation
//! - [`scatter_layout`]: deterministic random rails for registry benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use railyard_core::{CellCoord, Orientation, Placeable};
use railyard_engine::{SimConfig, Simulation, TrainSpawn};

/// Spacing between lattice lines.
pub const BLOCK: i32 = 4;

/// Clicks that lay a lattice over a `width` x `height` grid: horizontal
/// rails on every [`BLOCK`]th row, vertical rails on every [`BLOCK`]th
/// column. Intersections appear twice, so the second click merges a
/// crossing.
pub fn lattice_layout(width: u32, height: u32) -> Vec<(CellCoord, Placeable)> {
    let (w, h) = (width as i32, height as i32);
    let mut clicks = Vec::new();
    for y in (0..h).step_by(BLOCK as usize) {
        for x in 0..w {
            clicks.push((CellCoord::new(x, y), Placeable::rail(Orientation::Right)));
        }
    }
    for x in (0..w).step_by(BLOCK as usize) {
        for y in 0..h {
            clicks.push((CellCoord::new(x, y), Placeable::rail(Orientation::Up)));
        }
    }
    clicks
}

/// Build a reference benchmark profile: 64x64 lattice, 32 trains.
pub fn reference_profile(seed: u64) -> SimConfig {
    lattice_profile(64, 64, 32, seed)
}

/// Build a stress benchmark profile: 256x256 lattice, 512 trains.
pub fn stress_profile(seed: u64) -> SimConfig {
    lattice_profile(256, 256, 512, seed)
}

fn lattice_profile(width: u32, height: u32, trains: usize, seed: u64) -> SimConfig {
    SimConfig {
        width,
        height,
        seed,
        trains: init_train_spawns(width, height, trains, seed),
        ..SimConfig::default()
    }
}

/// Deterministic train spawns on the lattice's horizontal lines.
pub fn init_train_spawns(width: u32, height: u32, n: usize, seed: u64) -> Vec<TrainSpawn> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows = (height as i32 + BLOCK - 1) / BLOCK;
    (0..n)
        .map(|_| {
            let x = rng.gen_range(0..width as i32);
            let y = rng.gen_range(0..rows) * BLOCK;
            let heading = if rng.gen_bool(0.5) {
                Orientation::Right
            } else {
                Orientation::Left
            };
            TrainSpawn {
                cell: CellCoord::new(x, y),
                heading,
            }
        })
        .collect()
}

/// Create the simulation for `config` and lay its lattice.
///
/// # Panics
///
/// Panics if `config` is invalid; profiles from this crate never are.
pub fn build(config: SimConfig) -> Simulation {
    let (width, height) = (config.width, config.height);
    let mut sim = Simulation::new(config).expect("benchmark profile is valid");
    for (cell, piece) in lattice_layout(width, height) {
        sim.click(cell, Some(piece))
            .expect("lattice clicks never collide");
    }
    sim
}

/// `n` straight rails with random orientation at distinct random cells.
///
/// Rails land wherever the generator says, so neighbors attach by chance
/// and the registry sees a realistic mix of seeds and merges.
pub fn scatter_layout(width: u32, height: u32, n: usize, seed: u64) -> Vec<(CellCoord, Placeable)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut taken = std::collections::HashSet::new();
    let mut layout = Vec::with_capacity(n);
    let cap = (width as usize * height as usize).min(n);
    while layout.len() < cap {
        let cell = CellCoord::new(
            rng.gen_range(0..width as i32),
            rng.gen_range(0..height as i32),
        );
        if !taken.insert(cell) {
            continue;
        }
        let orientation = Orientation::ALL[rng.gen_range(0..4)];
        layout.push((cell, Placeable::rail(orientation)));
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_is_one_network() {
        let sim = build(lattice_profile(17, 17, 4, 1));
        assert_eq!(sim.registry().len(), 1);
        assert_eq!(sim.trains().count(), 4);
    }

    #[test]
    fn spawns_land_on_track() {
        let config = reference_profile(9);
        let sim = build(config.clone());
        for spawn in &config.trains {
            assert!(sim.grid().tile_at(spawn.cell).is_some(), "{}", spawn.cell);
        }
    }

    #[test]
    fn scatter_is_deterministic_and_distinct() {
        let a = scatter_layout(10, 10, 40, 3);
        assert_eq!(a, scatter_layout(10, 10, 40, 3));
        let cells: std::collections::HashSet<_> = a.iter().map(|(c, _)| *c).collect();
        assert_eq!(cells.len(), 40);
    }
}
