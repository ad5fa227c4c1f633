//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ObjectId`] allocation.
static OBJECT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a grid object (tile or train).
///
/// Allocated from a monotonic atomic counter via [`ObjectId::next`]. Two
/// objects never share an ID within a process, even if they are otherwise
/// equal, so network membership is tracked by identity rather than by
/// value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh, unique object ID. Thread-safe.
    pub fn next() -> Self {
        Self(OBJECT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a train network within one registry.
///
/// Assigned from a per-registry counter starting at 0. The ID decides
/// which side survives a merge (the higher one) and picks the debug color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(pub u64);

impl NetworkId {
    /// Index into a debug color palette of `palette_len` entries.
    ///
    /// Returns 0 for an empty palette.
    pub fn palette_index(self, palette_len: usize) -> usize {
        if palette_len == 0 {
            return 0;
        }
        (self.0 % palette_len as u64) as usize
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NetworkId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation advances one step; the first
/// executed tick is `TickId(1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ids_are_unique() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn palette_index_wraps() {
        assert_eq!(NetworkId(7).palette_index(5), 2);
        assert_eq!(NetworkId(3).palette_index(0), 0);
    }
}
