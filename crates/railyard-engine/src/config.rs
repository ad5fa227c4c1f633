//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for constructing a [`Simulation`](crate::Simulation).
//! [`validate()`](SimConfig::validate) checks every structural invariant up
//! front so that construction never half-succeeds.

use std::error::Error;
use std::fmt;

use railyard_core::{CellCoord, GridError, Orientation};

// ── TrainSpawn ─────────────────────────────────────────────────────

/// A train created when the simulation starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainSpawn {
    /// Starting cell; the train starts at its center.
    pub cell: CellCoord,
    /// Initial heading.
    pub heading: Orientation,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`] or while starting and
/// stopping a realtime simulation.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Grid construction failed.
    Grid(GridError),
    /// tick_rate_hz is NaN, infinite, zero, negative, or too small to have
    /// a finite period.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// train_speed is outside `(0, 1]`.
    InvalidTrainSpeed {
        /// The invalid value.
        value: f32,
    },
    /// slow_update_interval is zero.
    SlowUpdateIntervalZero,
    /// Ring buffer size is below the minimum of 2.
    RingBufferTooSmall {
        /// The configured size that was too small.
        configured: usize,
    },
    /// A configured train starts off the grid.
    SpawnOutOfBounds {
        /// Spawn column.
        x: i32,
        /// Spawn row.
        y: i32,
    },
    /// The simulation could not be recovered from the tick thread.
    SimulationRecoveryFailed,
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::InvalidTickRate { value } => {
                write!(f, "tick_rate_hz must be finite and positive, got {value}")
            }
            Self::InvalidTrainSpeed { value } => {
                write!(f, "train_speed must be in (0, 1], got {value}")
            }
            Self::SlowUpdateIntervalZero => write!(f, "slow_update_interval must be at least 1"),
            Self::RingBufferTooSmall { configured } => {
                write!(f, "ring_buffer_size {configured} is below minimum of 2")
            }
            Self::SpawnOutOfBounds { x, y } => {
                write!(f, "train spawn ({x}, {y}) is outside the grid")
            }
            Self::SimulationRecoveryFailed => {
                write!(f, "simulation could not be recovered from tick thread")
            }
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for a simulation.
///
/// # Examples
///
/// ```
/// use railyard_core::{CellCoord, Orientation};
/// use railyard_engine::{SimConfig, TrainSpawn};
///
/// let config = SimConfig {
///     width: 8,
///     height: 8,
///     trains: vec![TrainSpawn { cell: CellCoord::new(2, 2), heading: Orientation::Right }],
///     ..SimConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tick_rate_hz, 60.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Grid columns. Default: 20.
    pub width: u32,
    /// Grid rows. Default: 20.
    pub height: u32,
    /// Realtime step rate. Default: 60.
    pub tick_rate_hz: f64,
    /// Cells travelled per tick; a quarter turn takes `1 / speed` ticks.
    /// Default: 0.05.
    pub train_speed: f32,
    /// Slow updates run every this many ticks. Default: 6.
    pub slow_update_interval: u64,
    /// Seed for train direction choice.
    pub seed: u64,
    /// Snapshots retained for readers in realtime mode. Default: 8.
    pub ring_buffer_size: usize,
    /// Trains created at start.
    pub trains: Vec<TrainSpawn>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            tick_rate_hz: 60.0,
            train_speed: 0.05,
            slow_update_interval: railyard_grid::DEFAULT_SLOW_UPDATE_INTERVAL,
            seed: 0,
            ring_buffer_size: 8,
            trains: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Grid(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            }));
        }
        let rate = self.tick_rate_hz;
        if !rate.is_finite() || rate <= 0.0 || !(1.0 / rate).is_finite() {
            return Err(ConfigError::InvalidTickRate { value: rate });
        }
        let speed = self.train_speed;
        if !speed.is_finite() || speed <= 0.0 || speed > 1.0 {
            return Err(ConfigError::InvalidTrainSpeed { value: speed });
        }
        if self.slow_update_interval == 0 {
            return Err(ConfigError::SlowUpdateIntervalZero);
        }
        if self.ring_buffer_size < 2 {
            return Err(ConfigError::RingBufferTooSmall {
                configured: self.ring_buffer_size,
            });
        }
        for spawn in &self.trains {
            let CellCoord { x, y } = spawn.cell;
            if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
                return Err(ConfigError::SpawnOutOfBounds { x, y });
            }
        }
        Ok(())
    }
}
