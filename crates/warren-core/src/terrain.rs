//! Packed room terrain and tile mask queries.

use crate::pos::{RoomPosition, ROOM_SIZE};
use std::error::Error;
use std::fmt;

/// Bit set on tiles that cannot be entered.
pub const TERRAIN_MASK_WALL: u8 = 1;
/// Bit set on swamp tiles (movement fatigue multiplier).
pub const TERRAIN_MASK_SWAMP: u8 = 2;

/// Error parsing a packed terrain string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerrainError {
    /// The string is not exactly 2500 characters.
    BadLength {
        /// Observed length.
        len: usize,
    },
    /// A character outside `0..=3` was found.
    BadDigit {
        /// Index of the offending character.
        index: usize,
    },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength { len } => {
                write!(f, "terrain string has {len} characters, expected 2500")
            }
            Self::BadDigit { index } => write!(f, "invalid terrain digit at index {index}"),
        }
    }
}

impl Error for TerrainError {}

/// Terrain for one room, decoded from the fixed-length packed string.
///
/// The wire format is 2500 ASCII digits, row-major (`index = y * 50 + x`),
/// each the tile's mask byte (`0` plain, `1` wall, `2` swamp, `3` both).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terrain {
    masks: Box<[u8]>,
}

impl Terrain {
    /// Parse the packed 2500-character string.
    pub fn parse(packed: &str) -> Result<Self, TerrainError> {
        let bytes = packed.as_bytes();
        let expected = usize::from(ROOM_SIZE) * usize::from(ROOM_SIZE);
        if bytes.len() != expected {
            return Err(TerrainError::BadLength { len: bytes.len() });
        }
        let mut masks = vec![0u8; expected];
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'0'..=b'3' => masks[i] = b - b'0',
                _ => return Err(TerrainError::BadDigit { index: i }),
            }
        }
        Ok(Self {
            masks: masks.into_boxed_slice(),
        })
    }

    /// An all-plain terrain (useful for tests and synthetic rooms).
    pub fn open() -> Self {
        let cells = usize::from(ROOM_SIZE) * usize::from(ROOM_SIZE);
        Self {
            masks: vec![0u8; cells].into_boxed_slice(),
        }
    }

    /// Raw mask at a position.
    pub fn mask(&self, pos: RoomPosition) -> u8 {
        self.masks[usize::from(pos.y) * usize::from(ROOM_SIZE) + usize::from(pos.x)]
    }

    /// Whether the tile is a natural wall.
    pub fn is_wall(&self, pos: RoomPosition) -> bool {
        self.mask(pos) & TERRAIN_MASK_WALL != 0
    }

    /// Whether the tile is swamp.
    pub fn is_swamp(&self, pos: RoomPosition) -> bool {
        self.mask(pos) & TERRAIN_MASK_SWAMP != 0
    }

    /// Re-encode to the packed wire string.
    pub fn pack(&self) -> String {
        self.masks.iter().map(|m| char::from(b'0' + m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> RoomPosition {
        RoomPosition::new(x, y).unwrap()
    }

    #[test]
    fn parse_round_trips() {
        let mut packed = "0".repeat(2500);
        // Put a wall at (1, 0) and a swamp at (0, 1).
        packed.replace_range(1..2, "1");
        packed.replace_range(50..51, "2");
        let t = Terrain::parse(&packed).unwrap();
        assert!(t.is_wall(pos(1, 0)));
        assert!(!t.is_swamp(pos(1, 0)));
        assert!(t.is_swamp(pos(0, 1)));
        assert_eq!(t.pack(), packed);
    }

    #[test]
    fn wrong_length_rejected() {
        assert_eq!(
            Terrain::parse("012"),
            Err(TerrainError::BadLength { len: 3 })
        );
    }

    #[test]
    fn bad_digit_rejected() {
        let mut packed = "0".repeat(2500);
        packed.replace_range(7..8, "9");
        assert_eq!(
            Terrain::parse(&packed),
            Err(TerrainError::BadDigit { index: 7 })
        );
    }

    #[test]
    fn open_terrain_is_walkable_everywhere() {
        let t = Terrain::open();
        assert!(!t.is_wall(pos(0, 0)));
        assert!(!t.is_wall(pos(49, 49)));
    }
}
