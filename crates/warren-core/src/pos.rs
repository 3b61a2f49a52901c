//! Positions within a room and the eight movement directions.

use std::fmt;

/// Side length of a room grid.
pub const ROOM_SIZE: u8 = 50;

/// A tile position inside one room.
///
/// Both coordinates are in `0..50`. Positions on the outer ring
/// (`x == 0`, `x == 49`, `y == 0`, `y == 49`) are exit tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomPosition {
    /// Column, west to east.
    pub x: u8,
    /// Row, north to south.
    pub y: u8,
}

impl RoomPosition {
    /// Construct a position, rejecting out-of-bounds coordinates.
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if x < ROOM_SIZE && y < ROOM_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Chebyshev distance to another position: `max(|Δx|, |Δy|)`.
    ///
    /// This is the range metric for every ranged interaction in the game.
    /// Symmetric by construction.
    pub fn range_to(&self, other: RoomPosition) -> u32 {
        let dx = (i16::from(self.x) - i16::from(other.x)).unsigned_abs();
        let dy = (i16::from(self.y) - i16::from(other.y)).unsigned_abs();
        u32::from(dx.max(dy))
    }

    /// Whether `other` is within `range` tiles (Chebyshev).
    pub fn in_range_of(&self, other: RoomPosition, range: u32) -> bool {
        self.range_to(other) <= range
    }

    /// Whether this position sits on the room's outer exit ring.
    pub fn is_edge(&self) -> bool {
        self.x == 0 || self.y == 0 || self.x == ROOM_SIZE - 1 || self.y == ROOM_SIZE - 1
    }

    /// The position one step in `dir`, or `None` if that step leaves the
    /// room grid entirely (border crossing is handled by the inter-room
    /// transfer machinery, not by in-room movement).
    pub fn step(&self, dir: Direction) -> Option<RoomPosition> {
        let (dx, dy) = dir.offset();
        let x = i16::from(self.x) + i16::from(dx);
        let y = i16::from(self.y) + i16::from(dy);
        if (0..i16::from(ROOM_SIZE)).contains(&x) && (0..i16::from(ROOM_SIZE)).contains(&y) {
            Some(RoomPosition {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for RoomPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One of the eight movement directions, numbered clockwise from north.
///
/// The numbering matches the wire encoding of movement intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Up (−y).
    Top = 1,
    /// Up-right.
    TopRight = 2,
    /// Right (+x).
    Right = 3,
    /// Down-right.
    BottomRight = 4,
    /// Down (+y).
    Bottom = 5,
    /// Down-left.
    BottomLeft = 6,
    /// Left (−x).
    Left = 7,
    /// Up-left.
    TopLeft = 8,
}

impl Direction {
    /// Decode the wire number `1..=8`.
    pub fn from_number(n: u8) -> Option<Self> {
        Some(match n {
            1 => Self::Top,
            2 => Self::TopRight,
            3 => Self::Right,
            4 => Self::BottomRight,
            5 => Self::Bottom,
            6 => Self::BottomLeft,
            7 => Self::Left,
            8 => Self::TopLeft,
            _ => return None,
        })
    }

    /// The `(dx, dy)` tile offset for one step.
    pub fn offset(self) -> (i8, i8) {
        match self {
            Self::Top => (0, -1),
            Self::TopRight => (1, -1),
            Self::Right => (1, 0),
            Self::BottomRight => (1, 1),
            Self::Bottom => (0, 1),
            Self::BottomLeft => (-1, 1),
            Self::Left => (-1, 0),
            Self::TopLeft => (-1, -1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_rejects_out_of_bounds() {
        assert!(RoomPosition::new(49, 49).is_some());
        assert!(RoomPosition::new(50, 0).is_none());
        assert!(RoomPosition::new(0, 50).is_none());
    }

    #[test]
    fn range_is_chebyshev() {
        let a = RoomPosition::new(25, 25).unwrap();
        let b = RoomPosition::new(27, 26).unwrap();
        assert_eq!(a.range_to(b), 2);
    }

    #[test]
    fn step_stays_in_room_or_none() {
        let edge = RoomPosition::new(0, 10).unwrap();
        assert_eq!(edge.step(Direction::Left), None);
        assert_eq!(
            edge.step(Direction::Right),
            Some(RoomPosition { x: 1, y: 10 })
        );
    }

    #[test]
    fn all_direction_numbers_round_trip() {
        for n in 1..=8u8 {
            let d = Direction::from_number(n).unwrap();
            assert_eq!(d as u8, n);
        }
        assert_eq!(Direction::from_number(0), None);
        assert_eq!(Direction::from_number(9), None);
    }

    proptest! {
        #[test]
        fn range_symmetric(ax in 0u8..50, ay in 0u8..50, bx in 0u8..50, by in 0u8..50) {
            let a = RoomPosition::new(ax, ay).unwrap();
            let b = RoomPosition::new(bx, by).unwrap();
            prop_assert_eq!(a.range_to(b), b.range_to(a));
        }

        #[test]
        fn step_moves_at_most_one(x in 0u8..50, y in 0u8..50, n in 1u8..=8) {
            let p = RoomPosition::new(x, y).unwrap();
            let d = Direction::from_number(n).unwrap();
            if let Some(q) = p.step(d) {
                prop_assert_eq!(p.range_to(q), 1);
            }
        }
    }
}
