//! Rail connection masks.
//!
//! A [`ConnectionMask`] is a 16-bit set of ordered `(from, to)` orientation
//! pairs. Bit `4 * from + to` is set when a train that arrived through the
//! `from` side may leave through the `to` side. Self-pairs never appear in
//! the named masks, so only 12 of the 16 bits are meaningful.

use std::fmt;
use std::ops::BitOr;

use crate::error::MaskError;
use crate::orientation::{Orientation, OrientationSet};

/// Bit-encoded set of `(from, to)` connections through a tile.
///
/// Every value of this type is a subset of [`ConnectionMask::ALL`];
/// [`ConnectionMask::from_bits`] rejects anything else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConnectionMask(u16);

/// Bit for a single `from → to` connection.
const fn pair(from: Orientation, to: Orientation) -> u16 {
    1 << (4 * from as u16 + to as u16)
}

impl ConnectionMask {
    /// No connections.
    pub const EMPTY: Self = Self(0);
    /// Up ↔ Down.
    pub const VERTICAL: Self = Self(
        pair(Orientation::Up, Orientation::Down) | pair(Orientation::Down, Orientation::Up),
    );
    /// Left ↔ Right.
    pub const HORIZONTAL: Self = Self(
        pair(Orientation::Left, Orientation::Right) | pair(Orientation::Right, Orientation::Left),
    );
    /// Up ↔ Right.
    pub const TOP_TO_RIGHT: Self = Self(
        pair(Orientation::Up, Orientation::Right) | pair(Orientation::Right, Orientation::Up),
    );
    /// Up ↔ Left.
    pub const TOP_TO_LEFT: Self = Self(
        pair(Orientation::Up, Orientation::Left) | pair(Orientation::Left, Orientation::Up),
    );
    /// Down ↔ Right.
    pub const BOTTOM_TO_RIGHT: Self = Self(
        pair(Orientation::Down, Orientation::Right) | pair(Orientation::Right, Orientation::Down),
    );
    /// Down ↔ Left.
    pub const BOTTOM_TO_LEFT: Self = Self(
        pair(Orientation::Down, Orientation::Left) | pair(Orientation::Left, Orientation::Down),
    );
    /// Union of every named mask.
    pub const ALL: Self = Self(
        Self::VERTICAL.0
            | Self::HORIZONTAL.0
            | Self::TOP_TO_RIGHT.0
            | Self::TOP_TO_LEFT.0
            | Self::BOTTOM_TO_RIGHT.0
            | Self::BOTTOM_TO_LEFT.0,
    );

    /// Wrap raw bits, rejecting any bit outside [`ConnectionMask::ALL`].
    pub fn from_bits(bits: u16) -> Result<Self, MaskError> {
        if bits & !Self::ALL.0 != 0 {
            return Err(MaskError::InvalidBits { bits });
        }
        Ok(Self(bits))
    }

    /// Raw bit representation.
    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Whether no connection is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every connection in `self` is also in `other`.
    #[inline]
    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Straight track along `o`: Up/Down give [`VERTICAL`](Self::VERTICAL),
    /// Left/Right give [`HORIZONTAL`](Self::HORIZONTAL).
    pub fn straight(o: Orientation) -> Self {
        if o.is_horizontal() {
            Self::HORIZONTAL
        } else {
            Self::VERTICAL
        }
    }

    /// Quarter-circle track for a curved rail facing `o`.
    pub fn curve(o: Orientation) -> Self {
        match o {
            Orientation::Up => Self::TOP_TO_RIGHT,
            Orientation::Right => Self::BOTTOM_TO_RIGHT,
            Orientation::Down => Self::BOTTOM_TO_LEFT,
            Orientation::Left => Self::TOP_TO_LEFT,
        }
    }

    /// Orientations reachable after arriving through the `from` side.
    #[inline]
    pub fn exits_from(self, from: Orientation) -> OrientationSet {
        OrientationSet::from_bits(((self.0 >> (4 * from.index() as u16)) & 0xF) as u8)
    }

    /// Every side this tile connects to, in canonical order.
    pub fn sides(self) -> OrientationSet {
        Orientation::ALL
            .into_iter()
            .fold(OrientationSet::EMPTY, |acc, from| {
                acc.union(self.exits_from(from))
            })
    }

    /// Decode with an optional arrival side; `None` yields [`sides`](Self::sides).
    pub fn decode(self, from: Option<Orientation>) -> OrientationSet {
        match from {
            Some(from) => self.exits_from(from),
            None => self.sides(),
        }
    }
}

impl BitOr for ConnectionMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for ConnectionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionMask({:#06x} {:?})", self.0, self.sides())
    }
}

impl fmt::Display for ConnectionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use Orientation::*;

    #[test]
    fn named_mask_values() {
        assert_eq!(ConnectionMask::VERTICAL.bits(), 260);
        assert_eq!(ConnectionMask::HORIZONTAL.bits(), 8320);
        assert_eq!(ConnectionMask::TOP_TO_RIGHT.bits(), 18);
        assert_eq!(ConnectionMask::TOP_TO_LEFT.bits(), 4104);
        assert_eq!(ConnectionMask::BOTTOM_TO_RIGHT.bits(), 576);
        assert_eq!(ConnectionMask::BOTTOM_TO_LEFT.bits(), 18432);
        assert_eq!(ConnectionMask::ALL.bits(), 31710);
    }

    #[test]
    fn vertical_decodes_to_up_and_down() {
        let sides: Vec<_> = ConnectionMask::VERTICAL.decode(None).iter().collect();
        assert_eq!(sides, vec![Up, Down]);
    }

    #[test]
    fn decode_with_arrival_side() {
        let h = ConnectionMask::HORIZONTAL;
        assert_eq!(h.exits_from(Left).iter().collect::<Vec<_>>(), vec![Right]);
        assert!(h.exits_from(Up).is_empty());

        let curve = ConnectionMask::BOTTOM_TO_RIGHT;
        assert_eq!(curve.exits_from(Right).iter().collect::<Vec<_>>(), vec![Down]);
        assert_eq!(curve.exits_from(Down).iter().collect::<Vec<_>>(), vec![Right]);
    }

    #[test]
    fn junction_offers_every_branch() {
        let junction = ConnectionMask::HORIZONTAL | ConnectionMask::BOTTOM_TO_LEFT;
        let exits: Vec<_> = junction.exits_from(Left).iter().collect();
        assert_eq!(exits, vec![Right, Down]);
        assert_eq!(junction.sides().iter().collect::<Vec<_>>(), vec![Right, Down, Left]);
    }

    #[test]
    fn from_bits_rejects_self_pairs() {
        // Up → Up is bit 0.
        assert_eq!(
            ConnectionMask::from_bits(1),
            Err(MaskError::InvalidBits { bits: 1 })
        );
        assert_eq!(
            ConnectionMask::from_bits(31710),
            Ok(ConnectionMask::ALL)
        );
    }

    #[test]
    fn straight_and_curve_shapes() {
        assert_eq!(ConnectionMask::straight(Up), ConnectionMask::VERTICAL);
        assert_eq!(ConnectionMask::straight(Down), ConnectionMask::VERTICAL);
        assert_eq!(ConnectionMask::straight(Left), ConnectionMask::HORIZONTAL);
        assert_eq!(ConnectionMask::straight(Right), ConnectionMask::HORIZONTAL);
        assert_eq!(ConnectionMask::curve(Up), ConnectionMask::TOP_TO_RIGHT);
        assert_eq!(ConnectionMask::curve(Right), ConnectionMask::BOTTOM_TO_RIGHT);
        assert_eq!(ConnectionMask::curve(Down), ConnectionMask::BOTTOM_TO_LEFT);
        assert_eq!(ConnectionMask::curve(Left), ConnectionMask::TOP_TO_LEFT);
    }

    fn any_valid_mask() -> impl Strategy<Value = ConnectionMask> {
        any::<u16>().prop_map(|bits| {
            ConnectionMask::from_bits(bits & ConnectionMask::ALL.bits()).unwrap()
        })
    }

    proptest! {
        #[test]
        fn decode_is_subset_of_all(mask in any_valid_mask()) {
            let all = ConnectionMask::ALL.decode(None);
            prop_assert!(mask.decode(None).is_subset(all));
            for from in Orientation::ALL {
                prop_assert!(mask.decode(Some(from)).is_subset(all));
                prop_assert!(!mask.exits_from(from).contains(from));
            }
        }

        #[test]
        fn union_stays_valid(a in any_valid_mask(), b in any_valid_mask()) {
            let merged = a | b;
            prop_assert!(merged.is_subset(ConnectionMask::ALL));
            prop_assert!(a.is_subset(merged) && b.is_subset(merged));
        }
    }
}
