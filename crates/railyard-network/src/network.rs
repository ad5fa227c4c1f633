//! A single connected set of rail tiles.

use indexmap::IndexSet;
use railyard_core::{NetworkId, ObjectId};

/// A set of rail tiles, by identity, sharing one [`NetworkId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainNetwork {
    id: NetworkId,
    members: IndexSet<ObjectId>,
}

impl TrainNetwork {
    pub(crate) fn seeded(id: NetworkId, first: ObjectId) -> Self {
        let mut members = IndexSet::new();
        members.insert(first);
        Self { id, members }
    }

    /// Identity, fixed at creation.
    pub fn id(&self) -> NetworkId {
        self.id
    }

    /// Whether `tile` is a member.
    pub fn contains(&self, tile: ObjectId) -> bool {
        self.members.contains(&tile)
    }

    /// Members in the order they joined.
    pub fn tiles(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.members.iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn insert(&mut self, tile: ObjectId) {
        self.members.insert(tile);
    }

    /// Move every member of `other` into `self`, leaving `other` empty.
    pub(crate) fn absorb(&mut self, other: &mut TrainNetwork) {
        self.members.extend(other.members.drain(..));
    }
}
