//! # Picking
//!
//! Turns a value read from the identity buffer into a grid edit.
//!
//! The renderer writes, for every covered pixel, the pick value of the topmost
//! cell face (or the UI sentinel). When the user clicks, that one pixel is read
//! back and handed to [`apply_pick`]:
//!
//! * left button removes the clicked cell
//! * right button places the selected tile in the cell across the clicked face
//!
//! Clicks on background or UI resolve to no edit. A face id outside `0..=5` on a
//! cell hit means encoder and decoder disagree, and is reported as an error
//! instead of touching the grid.

pub mod pick_encoding;

use log::{debug, warn};
use thiserror::Error;

use pick_encoding::{decode, DecodedPick};

use super::voxels::{face::Face, grid::VoxelGrid, tile::tile_type::TileType};

/// Mouse buttons that trigger an edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickButton {
    /// Removes the clicked cell.
    Left,
    /// Places the selected tile next to the clicked face.
    Right,
}

/// A click waiting for its pixel to be read back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PickRequest {
    /// Pixel column, from the left edge of the window.
    pub x: u32,
    /// Pixel row, from the top edge of the window.
    pub y: u32,
    /// Button that was pressed.
    pub button: PickButton,
}

/// What a pick value points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickTarget {
    /// Nothing was drawn at the pixel.
    Background,
    /// The pixel is covered by the UI panel or tile preview.
    Interface,
    /// A face of a grid cell.
    Voxel {
        /// Linear index of the cell.
        index: usize,
        /// Face that was clicked.
        face: Face,
    },
}

/// The grid change made by a pick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    /// The click did not land on a cell.
    Missed,
    /// The cell at `index` was cleared.
    Removed {
        /// Linear index of the cleared cell.
        index: usize,
        /// Tile that was there.
        previous: TileType,
    },
    /// `tile` was written to the cell at `index`.
    Placed {
        /// Linear index of the written cell.
        index: usize,
        /// Tile written.
        tile: TileType,
    },
    /// The cell across the clicked face lies outside the grid.
    OutOfBounds,
}

/// Errors from decoding a pick value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    /// The face bits of a cell hit are not a known face.
    #[error("pick value {value:#010x} names cell {index} with invalid face id {face_id}")]
    InvalidFace {
        /// Raw value read back.
        value: i32,
        /// Decoded cell index.
        index: u32,
        /// Decoded face bits.
        face_id: u8,
    },
}

/// Classifies a pick value against `grid`.
///
/// Indices past the grid are the normal case for background and UI clicks. An
/// index between the last cell and the UI sentinel should never be written, so
/// it is logged before being treated as background.
pub fn resolve(grid: &VoxelGrid, value: i32) -> Result<PickTarget, PickError> {
    let DecodedPick { index, face_id } = decode(value);
    let voxel_count = grid.voxel_count() as u64;
    let sentinel = grid.interface_sentinel();

    if index as u64 >= voxel_count {
        if index == sentinel {
            return Ok(PickTarget::Interface);
        }
        if index < sentinel {
            warn!(
                "Pick value {:#010x} decoded to index {} between the grid ({} cells) and the UI sentinel",
                value, index, voxel_count
            );
        }
        return Ok(PickTarget::Background);
    }

    let face = Face::from_id(face_id).ok_or(PickError::InvalidFace {
        value,
        index,
        face_id,
    })?;
    Ok(PickTarget::Voxel {
        index: index as usize,
        face,
    })
}

/// Applies a click to the grid.
///
/// # Arguments
/// * `grid` - Grid to edit
/// * `value` - Pick value read from the identity buffer under the cursor
/// * `button` - Button that was clicked
/// * `selected` - Tile placed by a right click
///
/// # Returns
/// The edit that was made, or an error if the face bits are invalid. The grid is
/// untouched when an error is returned.
pub fn apply_pick(
    grid: &mut VoxelGrid,
    value: i32,
    button: PickButton,
    selected: TileType,
) -> Result<PickOutcome, PickError> {
    let PickTarget::Voxel { index, face } = resolve(grid, value)? else {
        return Ok(PickOutcome::Missed);
    };

    match button {
        PickButton::Left => {
            let previous = grid.set(index, TileType::Empty).unwrap_or_default();
            debug!("Removed {} at cell {}", previous, index);
            Ok(PickOutcome::Removed { index, previous })
        }
        PickButton::Right => {
            let Some(target) = grid.neighbor(index, face) else {
                debug!("Placement across {:?} of cell {} is outside the grid", face, index);
                return Ok(PickOutcome::OutOfBounds);
            };
            grid.set(target, selected);
            debug!("Placed {} at cell {}", selected, target);
            Ok(PickOutcome::Placed {
                index: target,
                tile: selected,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{pick_encoding::*, *};
    use crate::engine_state::voxels::grid::{GridDimensions, MAX_VOXEL_COUNT};

    fn grid(width: u32, height: u32, depth: u32) -> VoxelGrid {
        let mut grid = VoxelGrid::new(GridDimensions::new(width, height, depth)).unwrap();
        for index in 0..grid.voxel_count() {
            grid.set(index, TileType::Wall);
        }
        grid
    }

    #[test]
    fn largest_sentinel_stays_below_the_cleared_index() {
        let largest_sentinel = MAX_VOXEL_COUNT as u32 + 1;
        let cleared = decode(CLEARED_PICK_VALUE).index;
        assert_eq!(cleared, MAX_PICK_INDEX);
        assert!(largest_sentinel < cleared);
        assert_eq!(decode(encode(largest_sentinel, 0)).index, largest_sentinel);
    }

    #[test]
    fn resolves_background_interface_and_voxels() {
        let grid = grid(2, 2, 2);
        assert_eq!(resolve(&grid, CLEARED_PICK_VALUE), Ok(PickTarget::Background));
        assert_eq!(
            resolve(&grid, encode(grid.interface_sentinel(), 0)),
            Ok(PickTarget::Interface)
        );
        assert_eq!(resolve(&grid, encode(8, 3)), Ok(PickTarget::Background));
        assert_eq!(
            resolve(&grid, encode(5, 4)),
            Ok(PickTarget::Voxel {
                index: 5,
                face: Face::LEFT
            })
        );
    }

    #[test]
    fn invalid_face_is_an_error_and_leaves_grid_untouched() {
        let mut grid = grid(2, 2, 2);
        let before = grid.clone();
        for button in [PickButton::Left, PickButton::Right] {
            let result = apply_pick(&mut grid, encode(3, 6), button, TileType::Grass);
            assert_eq!(
                result,
                Err(PickError::InvalidFace {
                    value: encode(3, 6),
                    index: 3,
                    face_id: 6
                })
            );
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn left_click_clears_only_the_picked_cell() {
        let mut grid = grid(3, 3, 3);
        for _ in 0..50 {
            let index = fastrand::usize(0..grid.voxel_count());
            let mut expected = grid.tiles().to_vec();
            expected[index] = TileType::Empty;
            let face_id = fastrand::u8(0..6);
            apply_pick(&mut grid, encode(index as u32, face_id), PickButton::Left, TileType::Wood)
                .unwrap();
            assert_eq!(grid.tiles(), &expected[..]);
        }
    }

    #[test]
    fn right_click_places_across_each_face() {
        let mut grid = VoxelGrid::new(GridDimensions::new(3, 3, 3)).unwrap();
        let centre = grid.linear_index(1, 1, 1).unwrap();
        for face in Face::all() {
            let value = encode(centre as u32, face.id());
            let outcome = apply_pick(&mut grid, value, PickButton::Right, TileType::Brick).unwrap();
            let target = grid.neighbor(centre, face).unwrap();
            assert_eq!(
                outcome,
                PickOutcome::Placed {
                    index: target,
                    tile: TileType::Brick
                }
            );
            assert_eq!(grid.get(target), Some(TileType::Brick));
        }
        assert_eq!(grid.iter_occupied().count(), 6);
        assert_eq!(grid.get(centre), Some(TileType::Empty));
    }

    #[test]
    fn right_click_past_the_edge_is_ignored() {
        let mut grid = grid(2, 2, 1);
        let before = grid.clone();
        let value = encode(0, Face::TOP.id());
        assert_eq!(
            apply_pick(&mut grid, value, PickButton::Right, TileType::Grass),
            Ok(PickOutcome::OutOfBounds)
        );
        let value = encode(0, Face::LEFT.id());
        assert_eq!(
            apply_pick(&mut grid, value, PickButton::Right, TileType::Grass),
            Ok(PickOutcome::OutOfBounds)
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn clicks_on_background_and_ui_change_nothing() {
        let mut grid = grid(2, 2, 1);
        let before = grid.clone();
        let sentinel = encode(grid.interface_sentinel(), 0);
        for value in [CLEARED_PICK_VALUE, sentinel] {
            for button in [PickButton::Left, PickButton::Right] {
                assert_eq!(
                    apply_pick(&mut grid, value, button, TileType::Tree),
                    Ok(PickOutcome::Missed)
                );
            }
        }
        assert_eq!(grid, before);
    }
}
