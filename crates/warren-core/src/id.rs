//! Strongly-typed identifiers shared across the engine.

use std::fmt;

/// Monotonically increasing game-time counter.
///
/// Incremented once per tick across the whole shard. Snapshots, intents,
/// and mutation batches are all keyed by the tick they belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameTime(pub u64);

impl GameTime {
    /// The next tick.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GameTime {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies one game object (creep, structure, dropped resource, …).
///
/// Object IDs originate in the storage collaborator's document model and
/// are opaque to the engine; equality and ordering are lexicographic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub String);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// Identifies a player account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

/// Identifies a market order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

/// A room name in `W12N3` / `E0S7` coordinate form.
///
/// The name encodes the room's position on the world map; [`coords()`]
/// recovers it for distance calculations (market send cost, exit
/// adjacency).
///
/// [`coords()`]: RoomName::coords
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(pub String);

impl RoomName {
    /// Parse the `(x, y)` world coordinates encoded in the name.
    ///
    /// `W` rooms have negative x (`W0` = -1), `E` rooms non-negative
    /// (`E0` = 0); `N` is negative y, `S` non-negative. Returns `None`
    /// for a malformed name.
    pub fn coords(&self) -> Option<(i32, i32)> {
        let s = self.0.as_bytes();
        if s.len() < 4 {
            return None;
        }
        let (hsign, rest) = match s[0] {
            b'W' | b'w' => (-1i32, &self.0[1..]),
            b'E' | b'e' => (1i32, &self.0[1..]),
            _ => return None,
        };
        let split = rest.find(|c| c == 'N' || c == 'S' || c == 'n' || c == 's')?;
        let (xs, ys) = rest.split_at(split);
        let vsign = match ys.as_bytes()[0] {
            b'N' | b'n' => -1i32,
            _ => 1i32,
        };
        let x: i32 = xs.parse().ok()?;
        let y: i32 = ys[1..].parse().ok()?;
        let wx = if hsign < 0 { -x - 1 } else { x };
        let wy = if vsign < 0 { -y - 1 } else { y };
        Some((wx, wy))
    }

    /// Chebyshev distance between two rooms on the world map.
    ///
    /// Used for the market send-cost formula and exit adjacency. Returns
    /// `None` if either name is malformed.
    pub fn range_to(&self, other: &RoomName) -> Option<u32> {
        let (ax, ay) = self.coords()?;
        let (bx, by) = other.coords()?;
        Some((ax - bx).unsigned_abs().max((ay - by).unsigned_abs()))
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomName {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_name_coords_all_quadrants() {
        assert_eq!(RoomName::from("E0S0").coords(), Some((0, 0)));
        assert_eq!(RoomName::from("W0N0").coords(), Some((-1, -1)));
        assert_eq!(RoomName::from("E12S3").coords(), Some((12, 3)));
        assert_eq!(RoomName::from("W5N7").coords(), Some((-6, -8)));
    }

    #[test]
    fn room_name_malformed_rejected() {
        assert_eq!(RoomName::from("").coords(), None);
        assert_eq!(RoomName::from("X1Y2").coords(), None);
        assert_eq!(RoomName::from("E1").coords(), None);
        assert_eq!(RoomName::from("EN").coords(), None);
    }

    #[test]
    fn room_range_is_chebyshev() {
        let a = RoomName::from("E0S0");
        let b = RoomName::from("E3S1");
        assert_eq!(a.range_to(&b), Some(3));
        assert_eq!(b.range_to(&a), Some(3));
    }

    #[test]
    fn adjacent_rooms_across_meridian() {
        // W0 and E0 are adjacent columns on the world map.
        let w = RoomName::from("W0N0");
        let e = RoomName::from("E0N0");
        assert_eq!(w.range_to(&e), Some(1));
    }

    #[test]
    fn game_time_next_increments() {
        assert_eq!(GameTime(41).next(), GameTime(42));
    }
}
