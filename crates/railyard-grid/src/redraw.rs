//! Cells waiting to be repainted.

use std::sync::{Mutex, PoisonError};

use indexmap::IndexSet;
use railyard_core::CellCoord;

/// A set of cells pending repaint, shared between the writers that
/// enqueue and the render loop that drains.
///
/// Enqueue and drain-and-clear are each a single critical section.
/// Duplicate enqueues collapse; drain order is first-enqueued first.
#[derive(Debug, Default)]
pub struct RedrawQueue {
    cells: Mutex<IndexSet<CellCoord>>,
}

impl RedrawQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a repaint of `cell`.
    pub fn enqueue(&self, cell: CellCoord) {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cell);
    }

    /// Request a repaint of every cell in `cells`.
    pub fn enqueue_all(&self, cells: impl IntoIterator<Item = CellCoord>) {
        let mut guard = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        guard.extend(cells);
    }

    /// Take every pending cell, leaving the queue empty.
    pub fn drain(&self) -> Vec<CellCoord> {
        let mut guard = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        guard.drain(..).collect()
    }

    /// Number of pending cells.
    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
