//! Test utilities and mock types for Railyard development.
//!
//! Provides mock implementations of the grid seams ([`MovingObject`],
//! [`RouteQuery`], [`GridObserver`]) and track layout [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use railyard_core::{CellCoord, ObjectId, Orientation, OrientationSet};
use railyard_grid::{Grid, GridEvent, GridObserver, MovingObject, RouteQuery, TileLayer};

/// A moving object that never ticks. Lets grid-only tests instantiate
/// [`Grid`] without a real train type.
#[derive(Clone, Debug)]
pub struct StaticMover {
    id: ObjectId,
    pub x: f32,
    pub y: f32,
}

impl StaticMover {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            id: ObjectId::next(),
            x,
            y,
        }
    }
}

impl MovingObject for StaticMover {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Grid type used by tests that never add moving objects.
pub type TestGrid = Grid<StaticMover>;

/// Build an empty [`TestGrid`], panicking on invalid dimensions.
pub fn test_grid(width: u32, height: u32) -> TestGrid {
    Grid::new(width, height).expect("test grid dimensions must be valid")
}

/// Mock [`RouteQuery`] with scripted answers per cell.
///
/// Cells without a scripted answer report no exits.
#[derive(Clone, Debug, Default)]
pub struct FixedRoutes {
    answers: HashMap<CellCoord, OrientationSet>,
}

impl FixedRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the exits for `cell`, regardless of heading.
    pub fn with(mut self, cell: CellCoord, exits: &[Orientation]) -> Self {
        self.answers
            .insert(cell, exits.iter().copied().collect());
        self
    }
}

impl RouteQuery for FixedRoutes {
    fn directions(
        &self,
        _tiles: &TileLayer,
        cell: CellCoord,
        _heading: Orientation,
    ) -> OrientationSet {
        self.answers.get(&cell).copied().unwrap_or_default()
    }
}

/// Observer that appends every event to a shared log.
///
/// Clone it before handing it to the simulation, then inspect the clone.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<GridEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<GridEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl GridObserver for RecordingObserver {
    fn on_event(&mut self, event: &GridEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
