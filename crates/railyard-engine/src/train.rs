//! Continuous-position trains and their navigation state machine.
//!
//! A train is either travelling straight (`from == heading.opposite()`) or
//! turning along a quarter circle of radius 0.5 around the corner of its
//! cell shared by the entry and exit sides. Each tick it moves by `speed`
//! cells (straight) or `90° × speed` (turning), so a turn takes as many
//! ticks as crossing a cell.
//!
//! When a move carries the train into a new cell it asks the router for
//! the exits of that cell and picks one at random. With no exit it undoes
//! the move and turns around in place.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use railyard_core::{CellCoord, ObjectId, Orientation};
use railyard_grid::{MovingObject, UpdateContext, Updateable};

/// Swept angles within this many degrees of 90 finish the turn.
const TURN_EPSILON: f32 = 1e-3;

/// Kinematic state restored when a move runs into a dead end.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Motion {
    x: f32,
    y: f32,
    cell: CellCoord,
    heading: Orientation,
    from: Orientation,
    facing: f32,
    swept: f32,
}

/// A train.
#[derive(Clone, Debug)]
pub struct Train {
    id: ObjectId,
    motion: Motion,
    speed: f32,
    radial_speed: f32,
    rng: ChaCha8Rng,
}

impl Train {
    /// Default forward speed in cells per tick.
    pub const DEFAULT_SPEED: f32 = 0.05;

    /// A train at the center of `cell`, travelling straight along `heading`.
    pub fn new(cell: CellCoord, heading: Orientation, speed: f32, seed: u64) -> Self {
        Self::at(cell.x as f32 + 0.5, cell.y as f32 + 0.5, heading, speed, seed)
    }

    /// A train at an arbitrary position, travelling straight along `heading`.
    pub fn at(x: f32, y: f32, heading: Orientation, speed: f32, seed: u64) -> Self {
        Self {
            id: ObjectId::next(),
            motion: Motion {
                x,
                y,
                cell: CellCoord::containing(x, y),
                heading,
                from: heading.opposite(),
                facing: heading.to_angle(),
                swept: 0.0,
            },
            speed,
            radial_speed: 90.0 * speed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Direction of travel.
    pub fn heading(&self) -> Orientation {
        self.motion.heading
    }

    /// Side the train most recently entered through.
    pub fn from(&self) -> Orientation {
        self.motion.from
    }

    /// Rendering angle in degrees, in `[0, 360)`.
    pub fn facing(&self) -> f32 {
        self.motion.facing
    }

    /// Cells per tick.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Degrees per tick while turning.
    pub fn radial_speed(&self) -> f32 {
        self.radial_speed
    }

    /// Degrees of the current turn already covered.
    pub fn swept(&self) -> f32 {
        self.motion.swept
    }

    /// Whether the train is mid-curve.
    pub fn is_turning(&self) -> bool {
        self.motion.from != self.motion.heading.opposite()
    }

    /// Set a new heading on entering a cell. `from` becomes the side
    /// opposite the old heading and facing snaps to the old heading.
    pub fn set_heading(&mut self, heading: Orientation) {
        let m = &mut self.motion;
        m.from = m.heading.opposite();
        m.facing = m.heading.to_angle();
        m.heading = heading;
        m.swept = 0.0;
    }

    /// Reverse in place: swap `from` and `heading`, rotate facing by 180°,
    /// and mirror a partly swept turn.
    pub fn turn_around(&mut self) {
        let m = &mut self.motion;
        std::mem::swap(&mut m.from, &mut m.heading);
        m.facing = normalize(m.facing + 180.0);
        if m.from != m.heading.opposite() {
            m.swept = 90.0 - m.swept;
        } else {
            m.swept = 0.0;
        }
    }

    /// Move one tick along the current straight line or arc, without
    /// consulting the track.
    fn advance(&mut self) {
        if !self.is_turning() {
            let (dx, dy) = self.motion.heading.offset(1);
            self.motion.x += dx as f32 * self.speed;
            self.motion.y += dy as f32 * self.speed;
            return;
        }

        let m = &mut self.motion;
        let clockwise = m.from.opposite().rotate(true) == m.heading;
        m.swept += self.radial_speed;
        if m.swept >= 90.0 - TURN_EPSILON {
            let (x, y) = edge_midpoint(m.cell, m.heading);
            m.x = x;
            m.y = y;
            m.from = m.heading.opposite();
            m.facing = m.heading.to_angle();
            m.swept = 0.0;
            return;
        }
        m.facing = if clockwise {
            normalize(m.facing + self.radial_speed)
        } else {
            normalize(m.facing - self.radial_speed)
        };
        let (px, py) = pivot(m.cell, m.from, m.heading);
        let theta = if clockwise {
            m.facing - 90.0
        } else {
            m.facing + 90.0
        }
        .to_radians();
        m.x = px + 0.5 * theta.cos();
        m.y = py + 0.5 * theta.sin();
    }
}

/// Corner of `cell` shared by the entry side `from` and exit side `heading`.
fn pivot(cell: CellCoord, from: Orientation, heading: Orientation) -> (f32, f32) {
    let right = from == Orientation::Right || heading == Orientation::Right;
    let down = from == Orientation::Down || heading == Orientation::Down;
    (
        cell.x as f32 + if right { 1.0 } else { 0.0 },
        cell.y as f32 + if down { 1.0 } else { 0.0 },
    )
}

/// Midpoint of the `side` edge of `cell`.
fn edge_midpoint(cell: CellCoord, side: Orientation) -> (f32, f32) {
    let (cx, cy) = (cell.x as f32, cell.y as f32);
    match side {
        Orientation::Up => (cx + 0.5, cy),
        Orientation::Right => (cx + 1.0, cy + 0.5),
        Orientation::Down => (cx + 0.5, cy + 1.0),
        Orientation::Left => (cx, cy + 0.5),
    }
}

fn normalize(degrees: f32) -> f32 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

impl Updateable for Train {
    fn quick_update(&mut self, ctx: &UpdateContext<'_>) {
        let before = self.motion;
        self.advance();
        let cell = CellCoord::containing(self.motion.x, self.motion.y);
        if cell == before.cell {
            return;
        }

        let exits = ctx.routes.directions(ctx.tiles, cell, self.motion.heading);
        if exits.is_empty() {
            self.motion = before;
            self.turn_around();
            log::debug!(
                "train {} turned around at {}: no track beyond",
                self.id,
                before.cell
            );
            return;
        }

        self.motion.cell = cell;
        let choice = self.rng.gen_range(0..exits.len());
        if let Some(heading) = exits.nth(choice) {
            log::trace!(
                "train {} entered {cell} heading {}, leaves {heading}",
                self.id,
                self.motion.heading
            );
            self.set_heading(heading);
        }
    }
}

impl MovingObject for Train {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn position(&self) -> (f32, f32) {
        (self.motion.x, self.motion.y)
    }

    fn as_updateable(&mut self) -> Option<&mut dyn Updateable> {
        Some(self)
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.motion;
        write!(
            f,
            "train moving from {} to {} ({:.2}/{:.2}/{:.1}°)",
            m.from, m.heading, m.x, m.y, m.facing
        )
    }
}
