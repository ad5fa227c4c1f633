//! Fixed-capacity ring of published world snapshots.
//!
//! The tick thread is the only producer; any number of readers fetch the
//! latest snapshot or a specific one by publish position.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::snapshot::WorldSnapshot;

/// A snapshot tagged with the publish position it was stored at, so a
/// reader can tell when the slot was overwritten under it.
struct Tagged {
    pos: u64,
    snapshot: Arc<WorldSnapshot>,
}

/// Ring buffer of `Arc<WorldSnapshot>`.
///
/// The publish position grows monotonically and never wraps; slot index
/// is `pos % capacity`.
pub struct SnapshotRing {
    slots: Vec<Mutex<Option<Tagged>>>,
    published: AtomicU64,
}

// Compile-time assertion: SnapshotRing must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SnapshotRing>();
};

impl SnapshotRing {
    /// A ring retaining the last `capacity` snapshots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`; `SimConfig::validate` rejects such sizes.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "SnapshotRing capacity must be >= 2, got {capacity}");
        Self {
            slots: (0..capacity).map(|_| Mutex::new(None)).collect(),
            published: AtomicU64::new(0),
        }
    }

    fn slot(&self, pos: u64) -> &Mutex<Option<Tagged>> {
        &self.slots[(pos % self.slots.len() as u64) as usize]
    }

    /// Publish a snapshot. Single producer only.
    ///
    /// Returns the snapshot it displaced, if any.
    pub fn push(&self, snapshot: WorldSnapshot) -> Option<Arc<WorldSnapshot>> {
        let pos = self.published.load(Ordering::Relaxed);
        let evicted = {
            let mut slot = self.slot(pos).lock().unwrap_or_else(PoisonError::into_inner);
            slot.replace(Tagged {
                pos,
                snapshot: Arc::new(snapshot),
            })
        };
        // Readers that observe the new position also see the slot write.
        self.published.store(pos + 1, Ordering::Release);
        evicted.map(|t| t.snapshot)
    }

    /// The snapshot published at `pos`, unless not yet written or evicted.
    pub fn get(&self, pos: u64) -> Option<Arc<WorldSnapshot>> {
        let published = self.published.load(Ordering::Acquire);
        if pos >= published || published - pos > self.slots.len() as u64 {
            return None;
        }
        let slot = self.slot(pos).lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|t| t.pos == pos)
            .map(|t| Arc::clone(&t.snapshot))
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> Option<Arc<WorldSnapshot>> {
        let published = self.published.load(Ordering::Acquire);
        self.get(published.checked_sub(1)?)
    }

    /// Snapshots currently retained.
    pub fn len(&self) -> usize {
        (self.published.load(Ordering::Acquire) as usize).min(self.slots.len())
    }

    /// Whether nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.published.load(Ordering::Acquire) == 0
    }

    /// Maximum retained snapshots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of snapshots ever published.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::StepMetrics;
    use railyard_core::TickId;
    use std::thread;

    fn snap(tick: u64) -> WorldSnapshot {
        WorldSnapshot {
            tick: TickId(tick),
            width: 4,
            height: 4,
            tiles: Vec::new(),
            trains: Vec::new(),
            live_networks: 0,
            metrics: StepMetrics::default(),
        }
    }

    #[test]
    fn empty_ring_has_no_latest() {
        let ring = SnapshotRing::new(4);
        assert!(ring.is_empty());
        assert!(ring.latest().is_none());
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn latest_tracks_pushes() {
        let ring = SnapshotRing::new(3);
        for t in 1..=5 {
            ring.push(snap(t));
            assert_eq!(ring.latest().unwrap().tick, TickId(t));
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.published(), 5);
    }

    #[test]
    fn evicted_positions_are_gone() {
        let ring = SnapshotRing::new(2);
        assert!(ring.push(snap(1)).is_none());
        ring.push(snap(2));
        let evicted = ring.push(snap(3)).unwrap();
        assert_eq!(evicted.tick, TickId(1));
        assert!(ring.get(0).is_none());
        assert_eq!(ring.get(1).unwrap().tick, TickId(2));
        assert!(ring.get(3).is_none());
    }

    #[test]
    #[should_panic(expected = "capacity must be >= 2")]
    fn tiny_ring_panics() {
        SnapshotRing::new(1);
    }

    #[test]
    fn concurrent_readers_see_monotonic_ticks() {
        let ring = Arc::new(SnapshotRing::new(4));
        let reader = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..1000 {
                    if let Some(s) = ring.latest() {
                        assert!(s.tick.0 >= last);
                        last = s.tick.0;
                    }
                }
            })
        };
        for t in 1..=200 {
            ring.push(snap(t));
        }
        reader.join().unwrap();
    }
}
