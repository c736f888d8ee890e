//! # Tile Type Module
//!
//! This module defines the different types of tiles that can occupy a grid cell.
//! It provides conversion from the raw bytes stored in the grid and map files,
//! and the digit-key mapping used to pick a tile for placement.

use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::TileTypeSize;

/// Enumerates all tile types a grid cell can hold.
///
/// The discriminants are the tile ids used by map files and stored in the grid,
/// with `0` meaning the cell is empty.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum TileType {
    /// An empty cell; nothing is drawn and nothing can be picked.
    #[default]
    Empty = 0,

    /// A plain stone wall cube.
    Wall = 1,

    /// A grass-covered ground cube.
    Grass = 2,

    /// A brick cube.
    Brick = 3,

    /// A wooden plank cube, used for floors.
    Wood = 4,

    /// A thin door slab.
    Door = 5,

    /// A sloped roof piece.
    Roof = 6,

    /// A ladder cube.
    Ladder = 7,

    /// A crossed-billboard tree, taller than a cell.
    Tree = 8,
}

impl TileType {
    /// Returns every tile type in id order.
    pub fn all() -> [TileType; 9] {
        [
            TileType::Empty,
            TileType::Wall,
            TileType::Grass,
            TileType::Brick,
            TileType::Wood,
            TileType::Door,
            TileType::Roof,
            TileType::Ladder,
            TileType::Tree,
        ]
    }

    /// Converts a stored tile id to a `TileType`.
    ///
    /// # Returns
    /// `None` if the id does not name a known tile type.
    pub fn from_id(id: TileTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The id stored in the grid for this tile type.
    pub fn id(self) -> TileTypeSize {
        self as TileTypeSize
    }

    /// Maps a number key (1-9) to the tile type it selects for placement.
    ///
    /// Digit `n` selects the tile with id `n`; digits without a matching tile
    /// select nothing.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1..=9 => Self::from_id(digit),
            _ => None,
        }
    }

    /// Whether this tile type is drawn at all.
    pub fn is_empty(self) -> bool {
        self == TileType::Empty
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for tile in TileType::all() {
            assert_eq!(TileType::from_id(tile.id()), Some(tile));
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(TileType::from_id(9), None);
        assert_eq!(TileType::from_id(255), None);
    }

    #[test]
    fn digits_select_matching_ids() {
        assert_eq!(TileType::from_digit(1), Some(TileType::Wall));
        assert_eq!(TileType::from_digit(2), Some(TileType::Grass));
        assert_eq!(TileType::from_digit(8), Some(TileType::Tree));
        assert_eq!(TileType::from_digit(9), None);
        assert_eq!(TileType::from_digit(0), None);
    }
}
