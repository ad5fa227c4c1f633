//! Lockstep simulation context.
//!
//! [`Simulation`] owns the grid, the network registry and the observer
//! list. Every structural mutation goes through it, and the events the
//! mutation produced are fully dispatched (registry first, then each
//! observer in subscription order) before the call returns.
//!
//! # Ownership model
//!
//! `Simulation` is [`Send`] but not [`Sync`]. All mutating methods take
//! `&mut self`, so a tick can never interleave with a placement: the
//! borrow checker is the reentrancy guard.

use std::sync::Arc;
use std::time::Instant;

use railyard_core::{
    CellCoord, Command, CommandPayload, NetworkId, ObjectId, Orientation, Placeable,
    PlacementError, Receipt, TickId,
};
use railyard_grid::{Grid, GridObserver, MovingObject, RedrawQueue, Tile};
use railyard_network::NetworkRegistry;

use crate::config::{ConfigError, SimConfig};
use crate::metrics::StepMetrics;
use crate::snapshot::{TileView, TrainView, WorldSnapshot};
use crate::train::Train;

// Compile-time assertion: Simulation must be Send so it can move onto
// the tick thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

/// Single-threaded simulation of one rail grid.
///
/// # Examples
///
/// ```
/// use railyard_core::{CellCoord, Orientation, Placeable};
/// use railyard_engine::{SimConfig, Simulation};
///
/// let mut sim = Simulation::new(SimConfig::default()).unwrap();
/// let a = sim.place(CellCoord::new(1, 1), Placeable::rail(Orientation::Right)).unwrap();
/// let b = sim.place(CellCoord::new(2, 1), Placeable::rail(Orientation::Right)).unwrap();
/// assert_eq!(sim.network_of(a), sim.network_of(b));
///
/// let metrics = sim.step();
/// assert_eq!(metrics.tick.0, 1);
/// ```
pub struct Simulation {
    config: SimConfig,
    grid: Grid<Train>,
    registry: NetworkRegistry,
    observers: Vec<Box<dyn GridObserver + Send>>,
    spawned: u64,
    last_metrics: StepMetrics,
    next_arrival_seq: u64,
}

impl Simulation {
    /// Validate `config`, build the grid and spawn the configured trains.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height)?
            .with_slow_update_interval(config.slow_update_interval);
        let spawns = config.trains.clone();
        let mut sim = Self {
            config,
            grid,
            registry: NetworkRegistry::new(),
            observers: Vec::new(),
            spawned: 0,
            last_metrics: StepMetrics::default(),
            next_arrival_seq: 0,
        };
        for spawn in spawns {
            sim.add_train(spawn.cell, spawn.heading)
                .map_err(|_| ConfigError::SpawnOutOfBounds {
                    x: spawn.cell.x,
                    y: spawn.cell.y,
                })?;
        }
        log::info!(
            "simulation started: {}x{} grid, {} train(s), seed {}",
            sim.config.width,
            sim.config.height,
            sim.spawned,
            sim.config.seed
        );
        Ok(sim)
    }

    // ── Accessors ───────────────────────────────────────────────

    /// The grid.
    pub fn grid(&self) -> &Grid<Train> {
        &self.grid
    }

    /// The network registry.
    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Last executed tick; `TickId(0)` before the first step.
    pub fn tick_id(&self) -> TickId {
        self.grid.tick_id()
    }

    /// Trains in spawn order.
    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.grid.moving_objects()
    }

    /// A train by identity.
    pub fn train(&self, id: ObjectId) -> Option<&Train> {
        self.grid.moving(id)
    }

    /// The queue of cells awaiting a redraw. Shared with renderers.
    pub fn redraw_queue(&self) -> &Arc<RedrawQueue> {
        self.grid.layer().redraw_queue()
    }

    /// Metrics from the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    // ── Structural mutation ─────────────────────────────────────

    /// Whether a `width` x `height` footprint at `origin` is free.
    pub fn can_place(&self, origin: CellCoord, width: u32, height: u32) -> bool {
        self.grid.can_place(origin, width, height)
    }

    /// Place `placeable` with its top-left cell at `origin`.
    pub fn place(
        &mut self,
        origin: CellCoord,
        placeable: Placeable,
    ) -> Result<ObjectId, PlacementError> {
        let id = self.grid.place(origin, placeable)?;
        self.dispatch();
        Ok(id)
    }

    /// Apply a player click: place on an empty cell, or merge a rail piece
    /// into the straight rail under the cursor.
    pub fn click(
        &mut self,
        cell: CellCoord,
        selection: Option<Placeable>,
    ) -> Result<ObjectId, PlacementError> {
        let id = self.grid.click(cell, selection)?;
        self.dispatch();
        Ok(id)
    }

    /// Remove the stationary object covering `cell`.
    pub fn remove_at(&mut self, cell: CellCoord) -> Result<Tile, PlacementError> {
        let tile = self.grid.remove_at(cell)?;
        self.dispatch();
        Ok(tile)
    }

    /// Remove a stationary object by identity.
    pub fn remove(&mut self, id: ObjectId) -> Result<Tile, PlacementError> {
        let tile = self.grid.remove_stationary(id)?;
        self.dispatch();
        Ok(tile)
    }

    /// Spawn a train at the center of `cell`.
    ///
    /// Each train draws its direction choices from its own generator,
    /// seeded from the configured seed and the spawn index.
    pub fn add_train(
        &mut self,
        cell: CellCoord,
        heading: Orientation,
    ) -> Result<ObjectId, PlacementError> {
        if !self.grid.layer().in_bounds(cell) {
            return Err(PlacementError::OutOfBounds {
                x: cell.x,
                y: cell.y,
            });
        }
        let seed = self.config.seed ^ self.spawned;
        let train = Train::new(cell, heading, self.config.train_speed, seed);
        let id = train.id();
        self.spawned += 1;
        self.grid.add_moving(train);
        log::debug!("spawned train {id} at {cell} heading {heading}");
        self.dispatch();
        Ok(id)
    }

    /// Remove a train.
    pub fn remove_train(&mut self, id: ObjectId) -> Option<Train> {
        let train = self.grid.remove_moving(id)?;
        self.dispatch();
        Some(train)
    }

    /// Register an observer. Observers see every grid event after the
    /// registry has processed it, in subscription order.
    pub fn subscribe(&mut self, observer: Box<dyn GridObserver + Send>) {
        self.observers.push(observer);
    }

    // ── Network queries ─────────────────────────────────────────

    /// The network a tile belongs to.
    pub fn network_of(&self, tile: ObjectId) -> Option<NetworkId> {
        self.registry.network_id_of(tile)
    }

    /// The network of the tile covering `cell`.
    pub fn network_of_cell(&self, cell: CellCoord) -> Option<NetworkId> {
        self.network_of(self.grid.occupant(cell)?)
    }

    // ── Commands ────────────────────────────────────────────────

    /// Apply a batch of commands in order.
    ///
    /// Each command yields one receipt at the same index. Accepted
    /// commands are stamped with the tick they first take part in, which
    /// is the next one to execute.
    pub fn apply_commands(&mut self, commands: Vec<Command>) -> Vec<Receipt> {
        let applies_at = TickId(self.tick_id().0 + 1);
        let mut receipts = Vec::with_capacity(commands.len());
        for (index, mut command) in commands.into_iter().enumerate() {
            command.arrival_seq = self.next_arrival_seq;
            self.next_arrival_seq += 1;
            let receipt = match self.execute(&command.payload) {
                Ok(object) => Receipt::applied(index, applies_at, object),
                Err(reason) => {
                    log::warn!(
                        "command {} (seq {}) rejected: {reason}",
                        index,
                        command.arrival_seq
                    );
                    Receipt::rejected(index, reason)
                }
            };
            receipts.push(receipt);
        }
        receipts
    }

    fn execute(&mut self, payload: &CommandPayload) -> Result<ObjectId, PlacementError> {
        match *payload {
            CommandPayload::Click { cell, selection } => self.click(cell, selection),
            CommandPayload::Place { origin, placeable } => self.place(origin, placeable),
            CommandPayload::Remove { cell } => self.remove_at(cell).map(|tile| tile.id()),
        }
    }

    // ── Ticking ─────────────────────────────────────────────────

    /// Execute one tick and return its metrics.
    pub fn step(&mut self) -> StepMetrics {
        let start = Instant::now();
        let report = self.grid.tick(&self.registry);
        self.dispatch();
        let metrics = StepMetrics {
            tick: report.tick,
            total_us: start.elapsed().as_micros() as u64,
            updated_objects: report.updated,
            slow_update: report.slow,
            live_networks: self.registry.len(),
        };
        log::trace!("tick {} took {}us", metrics.tick, metrics.total_us);
        self.last_metrics = metrics;
        metrics
    }

    /// Copy the current state out for readers.
    pub fn snapshot(&self) -> WorldSnapshot {
        let tiles = self
            .grid
            .layer()
            .tiles()
            .map(|tile| TileView {
                id: tile.id(),
                kind: tile.kind(),
                origin: tile.origin(),
                footprint: tile.footprint(),
                orientation: tile.orientation(),
                mask: tile.mask(),
                network: self.registry.network_id_of(tile.id()),
            })
            .collect();
        let trains = self
            .trains()
            .map(|train| {
                let (x, y) = train.position();
                TrainView {
                    id: train.id(),
                    x,
                    y,
                    heading: train.heading(),
                    from: train.from(),
                    facing: train.facing(),
                }
            })
            .collect();
        WorldSnapshot {
            tick: self.tick_id(),
            width: self.grid.width(),
            height: self.grid.height(),
            tiles,
            trains,
            live_networks: self.registry.len(),
            metrics: self.last_metrics,
        }
    }

    /// Hand every pending grid event to the registry, then to observers.
    fn dispatch(&mut self) {
        for event in self.grid.drain_events() {
            self.registry.handle(&event, self.grid.layer());
            for observer in &mut self.observers {
                observer.on_event(&event);
            }
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.tick_id())
            .field("tiles", &self.grid.layer().tile_count())
            .field("trains", &self.spawned)
            .field("networks", &self.registry.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
