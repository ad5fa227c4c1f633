//! The network registry: incremental partition of rail tiles.

use indexmap::IndexMap;
use railyard_core::{CellCoord, NetworkError, NetworkId, ObjectId, Orientation, OrientationSet};
use railyard_grid::{footprints_attach, GridEvent, RailArgs, RouteQuery, TileLayer, TrackRoutes};

use crate::network::TrainNetwork;

/// Live train networks for one grid, in creation order.
///
/// Feed it every [`GridEvent`] through [`handle`](Self::handle), passing
/// the tile layer as it stands after the mutation that produced the event.
///
/// # Examples
///
/// ```
/// use railyard_core::{CellCoord, Orientation, Placeable};
/// use railyard_network::NetworkRegistry;
/// use railyard_test_utils::test_grid;
///
/// let mut grid = test_grid(4, 4);
/// let mut registry = NetworkRegistry::new();
/// let a = grid.place(CellCoord::new(1, 1), Placeable::rail(Orientation::Up)).unwrap();
/// let b = grid.place(CellCoord::new(1, 2), Placeable::rail(Orientation::Up)).unwrap();
/// for event in grid.drain_events() {
///     registry.handle(&event, grid.layer());
/// }
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.network_id_of(a), registry.network_id_of(b));
/// ```
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    networks: IndexMap<NetworkId, TrainNetwork>,
    next_id: u64,
}

impl NetworkRegistry {
    /// An empty registry; the first network gets `NetworkId(0)`.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The live network containing `tile`, by linear scan.
    pub fn network_of(&self, tile: ObjectId) -> Option<&TrainNetwork> {
        self.networks.values().find(|n| n.contains(tile))
    }

    /// ID of the live network containing `tile`.
    pub fn network_id_of(&self, tile: ObjectId) -> Option<NetworkId> {
        self.network_of(tile).map(TrainNetwork::id)
    }

    /// A live network by ID.
    pub fn get(&self, id: NetworkId) -> Option<&TrainNetwork> {
        self.networks.get(&id)
    }

    /// Live networks in creation order.
    pub fn live_networks(&self) -> impl Iterator<Item = &TrainNetwork> {
        self.networks.values()
    }

    /// Number of live networks.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Whether no network is live.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    // ── Event handling ──────────────────────────────────────────

    /// Apply one grid event.
    ///
    /// # Panics
    ///
    /// Panics if the event would merge with a network that is not live.
    /// That can only happen after an earlier invariant break, so it is not
    /// recoverable.
    pub fn handle(&mut self, event: &GridEvent, tiles: &TileLayer) {
        if let Err(e) = self.try_handle(event, tiles) {
            log::error!("network registry invariant broken: {e}");
            panic!("network registry invariant broken: {e}");
        }
    }

    /// Apply one grid event, surfacing invariant breaks as errors.
    pub fn try_handle(&mut self, event: &GridEvent, tiles: &TileLayer) -> Result<(), NetworkError> {
        match event {
            GridEvent::RailAdded(args) => {
                self.on_rail_added(args, tiles)?;
            }
            GridEvent::RailUpdated { args, .. } => {
                self.on_rail_updated(args, tiles)?;
            }
            GridEvent::RailRemoved(args) => self.on_rail_removed(args),
            GridEvent::ObjectAdded { .. } | GridEvent::ObjectRemoved { .. } => {}
        }
        Ok(())
    }

    /// Join a new tile to the network of its first attaching neighbor,
    /// then merge in the network of every later neighbor on a connected
    /// side, attaching or not. A tile with no attaching neighbor seeds a
    /// new network.
    pub fn on_rail_added(
        &mut self,
        args: &RailArgs,
        tiles: &TileLayer,
    ) -> Result<NetworkId, NetworkError> {
        match self.connect(args, tiles, None, MergeRule::AnyNeighbor)? {
            Some(id) => Ok(id),
            None => Ok(self.create(args.tile)),
        }
    }

    /// Re-examine a tile whose mask grew and merge every newly attaching
    /// neighbor's network with the tile's own.
    pub fn on_rail_updated(
        &mut self,
        args: &RailArgs,
        tiles: &TileLayer,
    ) -> Result<NetworkId, NetworkError> {
        let own = self
            .network_id_of(args.tile)
            .ok_or(NetworkError::UntrackedTile { tile: args.tile })?;
        let id = self.connect(args, tiles, Some(own), MergeRule::Attaching)?;
        Ok(id.unwrap_or(own))
    }

    /// Removal leaves membership as it was: the tile stays listed in its
    /// network and the network is not split, even if the tile was the
    /// only link between two clusters.
    pub fn on_rail_removed(&mut self, args: &RailArgs) {
        log::debug!(
            "rail {} removed; network {:?} left unchanged",
            args.tile,
            self.network_id_of(args.tile)
        );
    }

    /// Merge two live networks. The higher ID absorbs the lower, which
    /// leaves the live set. Returns the survivor.
    pub fn merge(&mut self, a: NetworkId, b: NetworkId) -> Result<NetworkId, NetworkError> {
        for id in [a, b] {
            if !self.networks.contains_key(&id) {
                return Err(NetworkError::MissingNetwork { network: id });
            }
        }
        if a == b {
            return Ok(a);
        }
        let (winner, loser) = if a > b { (a, b) } else { (b, a) };
        let mut absorbed = self
            .networks
            .shift_remove(&loser)
            .ok_or(NetworkError::MissingNetwork { network: loser })?;
        let survivor = self
            .networks
            .get_mut(&winner)
            .ok_or(NetworkError::MissingNetwork { network: winner })?;
        log::debug!(
            "network {winner} absorbs network {loser} ({} tiles)",
            absorbed.len()
        );
        survivor.absorb(&mut absorbed);
        Ok(winner)
    }

    // ── Internals ───────────────────────────────────────────────

    fn create(&mut self, first: ObjectId) -> NetworkId {
        let id = NetworkId(self.next_id);
        self.next_id += 1;
        self.networks.insert(id, TrainNetwork::seeded(id, first));
        log::debug!("network {id} created for rail {first}");
        id
    }

    /// Walk the neighbors on the connected sides of `args`. While nothing
    /// is adopted, the first attaching neighbor's network is adopted. After
    /// that, every neighbor in another network allowed by `rule` is merged
    /// with the adopted one.
    fn connect(
        &mut self,
        args: &RailArgs,
        tiles: &TileLayer,
        mut adopted: Option<NetworkId>,
        rule: MergeRule,
    ) -> Result<Option<NetworkId>, NetworkError> {
        for (_, neighbor) in tiles.neighbors(args.origin, args.mask, args.tile) {
            let must_attach = adopted.is_none() || rule == MergeRule::Attaching;
            if must_attach
                && !footprints_attach(args.origin, args.mask, neighbor.footprint(), neighbor.mask())
            {
                continue;
            }
            let theirs = self
                .network_id_of(neighbor.id())
                .ok_or(NetworkError::UntrackedTile {
                    tile: neighbor.id(),
                })?;
            adopted = match adopted {
                None => {
                    self.networks
                        .get_mut(&theirs)
                        .ok_or(NetworkError::MissingNetwork { network: theirs })?
                        .insert(args.tile);
                    log::debug!("rail {} joins network {theirs}", args.tile);
                    Some(theirs)
                }
                Some(current) if current != theirs => Some(self.merge(current, theirs)?),
                Some(current) => Some(current),
            };
        }
        Ok(adopted)
    }
}

/// Which neighbors past the adopted one take part in merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MergeRule {
    /// Any rail on a connected side. New tiles use this.
    AnyNeighbor,
    /// Only rails that attach back. Grown masks use this.
    Attaching,
}

/// Routes come straight off the tile masks; membership never narrows them.
impl RouteQuery for NetworkRegistry {
    fn directions(
        &self,
        tiles: &TileLayer,
        cell: CellCoord,
        heading: Orientation,
    ) -> OrientationSet {
        TrackRoutes.directions(tiles, cell, heading)
    }
}
