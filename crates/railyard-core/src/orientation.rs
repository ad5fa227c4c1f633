//! The four cardinal orientations and small sets of them.
//!
//! [`Orientation`] doubles as a tile facing and a movement heading. The
//! cyclic order is Up → Right → Down → Left, and the discriminants match
//! the bit-group layout used by [`ConnectionMask`](crate::ConnectionMask).

use std::fmt;

/// One of the four cardinal orientations.
///
/// Grid coordinates grow rightwards in `x` and downwards in `y`, so
/// `Up` is `-y` and `Down` is `+y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Orientation {
    /// Towards `-y`.
    #[default]
    Up = 0,
    /// Towards `+x`.
    Right = 1,
    /// Towards `+y`.
    Down = 2,
    /// Towards `-x`.
    Left = 3,
}

impl Orientation {
    /// All orientations in canonical (clockwise from `Up`) order.
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Right,
        Orientation::Down,
        Orientation::Left,
    ];

    /// Zero-based position in the canonical order.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The orientation pointing the other way. An involution.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Cyclic successor (`clockwise = true`) or predecessor.
    #[inline]
    pub fn rotate(self, clockwise: bool) -> Self {
        let step = if clockwise { 1 } else { 3 };
        Self::ALL[((self.index() + step) % 4) as usize]
    }

    /// Rendering angle in degrees: `Right` is 0 and angles grow clockwise
    /// on screen (`Down` is 90, `Left` 180, `Up` 270).
    #[inline]
    pub fn to_angle(self) -> f32 {
        match self {
            Self::Up => 270.0,
            Self::Right => 0.0,
            Self::Down => 90.0,
            Self::Left => 180.0,
        }
    }

    /// Grid offset of `amount` cells in this direction as `(dx, dy)`.
    #[inline]
    pub fn offset(self, amount: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -amount),
            Self::Right => (amount, 0),
            Self::Down => (0, amount),
            Self::Left => (-amount, 0),
        }
    }

    /// Whether this orientation runs along the x axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        };
        f.write_str(name)
    }
}

/// A set of orientations, stored as a 4-bit mask.
///
/// Iteration always yields members in canonical order (Up, Right, Down,
/// Left), which makes decoded connection masks deterministic and free of
/// duplicates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrientationSet(u8);

impl OrientationSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);
    /// All four orientations.
    pub const FULL: Self = Self(0b1111);

    /// Build a set from the low four bits of `bits`; bit `n` is the
    /// orientation with index `n`.
    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Raw bit representation.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether `o` is a member.
    #[inline]
    pub fn contains(self, o: Orientation) -> bool {
        self.0 & (1 << o.index()) != 0
    }

    /// Add `o` to the set.
    #[inline]
    pub fn insert(&mut self, o: Orientation) {
        self.0 |= 1 << o.index();
    }

    /// Set union.
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether every member of `self` is in `other`.
    #[inline]
    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Number of members.
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no members.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The `n`-th member in canonical order, if any.
    pub fn nth(self, n: usize) -> Option<Orientation> {
        self.iter().nth(n)
    }

    /// Iterate members in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Orientation> {
        Orientation::ALL
            .into_iter()
            .filter(move |o| self.contains(*o))
    }
}

impl FromIterator<Orientation> for OrientationSet {
    fn from_iter<I: IntoIterator<Item = Orientation>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for o in iter {
            set.insert(o);
        }
        set
    }
}

impl fmt::Debug for OrientationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
