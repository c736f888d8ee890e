//! # Voxel Grid Module
//!
//! The voxel grid is the single piece of world data: a fixed-size 3D array of
//! tile types, addressed either by `(x, y, z)` coordinates or by the linear
//! index that the renderer writes into the identity buffer.
//!
//! Grid axes: `x` is width, `y` is depth into the scene and `z` is height.
//! The renderer remaps these to world space with `z` pointing up.

use cgmath::Vector3;
use thiserror::Error;

use super::{face::Face, tile::tile_type::TileType};

/// Largest number of cells a grid may hold.
///
/// Pick values keep the cell index in 29 bits. The UI sentinel
/// (`voxel_count + 1`) has to fit there too, strictly below the index the
/// cleared identity value decodes to (`2^29 - 1`).
pub const MAX_VOXEL_COUNT: usize = (1 << 29) - 3;

/// Width, height and depth of a grid, in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridDimensions {
    /// Number of cells along grid x.
    pub width: u32,
    /// Number of cells along grid y (depth into the scene).
    pub height: u32,
    /// Number of cells along grid z (vertical layers).
    pub depth: u32,
}

impl GridDimensions {
    /// Creates a new set of dimensions.
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total number of cells, computed without overflow.
    pub fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }
}

/// Errors raised when a grid cannot be allocated with the requested size.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// One of the dimensions is zero.
    #[error("grid dimensions {width}x{height}x{depth} contain no cells")]
    NoCells {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Requested depth.
        depth: u32,
    },

    /// The grid has more cells than a pick value can address.
    #[error("grid holds {count} cells, more than the {max} a pick value can address")]
    TooLarge {
        /// Requested number of cells.
        count: u64,
        /// Largest allowed number of cells.
        max: usize,
    },

    /// The tile array does not match the dimensions.
    #[error("expected {expected} tiles for the grid dimensions, got {actual}")]
    TileCountMismatch {
        /// Cells implied by the dimensions.
        expected: usize,
        /// Tiles supplied.
        actual: usize,
    },
}

/// A fixed-size 3D array of tiles.
///
/// The dimensions never change after construction, so every index handed out
/// by the grid (and the UI sentinel derived from its size) stays valid for the
/// grid's whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    dimensions: GridDimensions,
    tiles: Vec<TileType>,
}

impl VoxelGrid {
    /// Creates a grid with every cell empty.
    pub fn new(dimensions: GridDimensions) -> Result<Self, GridError> {
        let count = Self::validate(dimensions)?;
        Ok(Self {
            dimensions,
            tiles: vec![TileType::Empty; count],
        })
    }

    /// Creates a grid from tiles already laid out in linear index order.
    pub fn from_tiles(dimensions: GridDimensions, tiles: Vec<TileType>) -> Result<Self, GridError> {
        let count = Self::validate(dimensions)?;
        if tiles.len() != count {
            return Err(GridError::TileCountMismatch {
                expected: count,
                actual: tiles.len(),
            });
        }
        Ok(Self { dimensions, tiles })
    }

    fn validate(dimensions: GridDimensions) -> Result<usize, GridError> {
        let count = dimensions.cell_count();
        if count == 0 {
            return Err(GridError::NoCells {
                width: dimensions.width,
                height: dimensions.height,
                depth: dimensions.depth,
            });
        }
        if count > MAX_VOXEL_COUNT as u64 {
            return Err(GridError::TooLarge {
                count,
                max: MAX_VOXEL_COUNT,
            });
        }
        Ok(count as usize)
    }

    /// The grid dimensions.
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of cells in the grid, occupied or not.
    pub fn voxel_count(&self) -> usize {
        self.tiles.len()
    }

    /// Index written to the identity buffer by UI draws.
    ///
    /// It is past the end of the grid so a click on the UI never resolves to a cell.
    pub fn interface_sentinel(&self) -> u32 {
        self.voxel_count() as u32 + 1
    }

    /// All tiles in linear index order.
    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    /// Linear index of `(x, y, z)`: `x + y * width + z * width * height`.
    ///
    /// # Returns
    /// `None` if any coordinate is outside the grid.
    pub fn linear_index(&self, x: u32, y: u32, z: u32) -> Option<usize> {
        let GridDimensions {
            width,
            height,
            depth,
        } = self.dimensions;
        if x >= width || y >= height || z >= depth {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        let (width, height) = (width as usize, height as usize);
        Some(x + y * width + z * width * height)
    }

    /// Inverse of [`VoxelGrid::linear_index`].
    pub fn coordinates(&self, index: usize) -> Option<Vector3<u32>> {
        if index >= self.voxel_count() {
            return None;
        }
        let width = self.dimensions.width as usize;
        let layer = width * self.dimensions.height as usize;
        let z = index / layer;
        let y = (index % layer) / width;
        let x = index % width;
        Some(Vector3::new(x as u32, y as u32, z as u32))
    }

    /// The tile at a linear index, if the index is inside the grid.
    pub fn get(&self, index: usize) -> Option<TileType> {
        self.tiles.get(index).copied()
    }

    /// The tile at `(x, y, z)`, if the coordinate is inside the grid.
    pub fn get_at(&self, x: u32, y: u32, z: u32) -> Option<TileType> {
        self.linear_index(x, y, z).and_then(|index| self.get(index))
    }

    /// Overwrites the tile at a linear index.
    ///
    /// # Returns
    /// The previous tile, or `None` (and no change) if the index is outside the grid.
    pub fn set(&mut self, index: usize, tile: TileType) -> Option<TileType> {
        self.tiles
            .get_mut(index)
            .map(|cell| std::mem::replace(cell, tile))
    }

    /// Linear index of the cell sharing `face` with the cell at `index`.
    ///
    /// # Returns
    /// `None` if `index` is outside the grid or the neighbour would be.
    pub fn neighbor(&self, index: usize, face: Face) -> Option<usize> {
        let position = self.coordinates(index)?;
        let (dx, dy, dz) = face.grid_offset();
        let step = |value: u32, delta: i64| u32::try_from(value as i64 + delta).ok();
        self.linear_index(
            step(position.x, dx)?,
            step(position.y, dy)?,
            step(position.z, dz)?,
        )
    }

    /// Iterates every non-empty cell in linear index order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, TileType)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| !tile.is_empty())
            .map(|(index, tile)| (index, *tile))
    }

    /// World-space centre of the cell at `index`.
    ///
    /// Each cell spans two world units; grid `y` becomes world depth and grid
    /// `z` becomes world height: `(x * 2 - width, z * 2, y * 2 - height)`.
    pub fn world_position(&self, index: usize) -> Option<Vector3<f32>> {
        let position = self.coordinates(index)?;
        Some(Vector3::new(
            position.x as f32 * 2.0 - self.dimensions.width as f32,
            position.z as f32 * 2.0,
            position.y as f32 * 2.0 - self.dimensions.height as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32, depth: u32) -> VoxelGrid {
        VoxelGrid::new(GridDimensions::new(width, height, depth)).unwrap()
    }

    #[test]
    fn linear_index_follows_row_major_layout() {
        let grid = grid(4, 3, 2);
        assert_eq!(grid.linear_index(0, 0, 0), Some(0));
        assert_eq!(grid.linear_index(1, 0, 0), Some(1));
        assert_eq!(grid.linear_index(0, 1, 0), Some(4));
        assert_eq!(grid.linear_index(0, 0, 1), Some(12));
        assert_eq!(grid.linear_index(3, 2, 1), Some(23));
        assert_eq!(grid.linear_index(4, 0, 0), None);
        assert_eq!(grid.linear_index(0, 3, 0), None);
        assert_eq!(grid.linear_index(0, 0, 2), None);
    }

    #[test]
    fn coordinates_invert_linear_index() {
        let grid = grid(7, 5, 3);
        for _ in 0..200 {
            let (x, y, z) = (fastrand::u32(0..7), fastrand::u32(0..5), fastrand::u32(0..3));
            let index = grid.linear_index(x, y, z).unwrap();
            assert_eq!(grid.coordinates(index), Some(Vector3::new(x, y, z)));
        }
        assert_eq!(grid.coordinates(grid.voxel_count()), None);
    }

    #[test]
    fn neighbours_stay_inside_the_grid() {
        let grid = grid(2, 2, 2);
        let origin = grid.linear_index(0, 0, 0).unwrap();
        assert_eq!(grid.neighbor(origin, Face::TOP), grid.linear_index(0, 0, 1));
        assert_eq!(grid.neighbor(origin, Face::FRONT), grid.linear_index(0, 1, 0));
        assert_eq!(grid.neighbor(origin, Face::RIGHT), grid.linear_index(1, 0, 0));
        assert_eq!(grid.neighbor(origin, Face::BOTTOM), None);
        assert_eq!(grid.neighbor(origin, Face::BACK), None);
        assert_eq!(grid.neighbor(origin, Face::LEFT), None);

        let corner = grid.linear_index(1, 1, 1).unwrap();
        assert_eq!(grid.neighbor(corner, Face::TOP), None);
        assert_eq!(grid.neighbor(corner, Face::LEFT), grid.linear_index(0, 1, 1));
    }

    #[test]
    fn set_reports_previous_tile_and_ignores_out_of_range() {
        let mut grid = grid(2, 1, 1);
        assert_eq!(grid.set(1, TileType::Brick), Some(TileType::Empty));
        assert_eq!(grid.set(1, TileType::Wood), Some(TileType::Brick));
        assert_eq!(grid.set(2, TileType::Wood), None);
        assert_eq!(grid.tiles(), &[TileType::Empty, TileType::Wood]);
    }

    #[test]
    fn occupied_cells_come_in_index_order() {
        let mut grid = grid(3, 1, 1);
        grid.set(2, TileType::Wall);
        grid.set(0, TileType::Tree);
        let occupied: Vec<_> = grid.iter_occupied().collect();
        assert_eq!(occupied, vec![(0, TileType::Tree), (2, TileType::Wall)]);
    }

    #[test]
    fn world_position_swaps_depth_and_height() {
        let grid = grid(4, 6, 3);
        let index = grid.linear_index(1, 2, 2).unwrap();
        assert_eq!(grid.world_position(index), Some(Vector3::new(-2.0, 4.0, -2.0)));
    }

    #[test]
    fn sentinel_sits_past_the_last_cell() {
        let grid = grid(2, 2, 1);
        assert_eq!(grid.voxel_count(), 4);
        assert_eq!(grid.interface_sentinel(), 5);
    }

    #[test]
    fn rejects_empty_and_oversized_grids() {
        assert!(matches!(
            VoxelGrid::new(GridDimensions::new(0, 4, 4)),
            Err(GridError::NoCells { .. })
        ));
        assert!(matches!(
            VoxelGrid::new(GridDimensions::new(1024, 1024, 1024)),
            Err(GridError::TooLarge { .. })
        ));
        // One cell past the limit: its sentinel would equal the cleared index.
        assert_eq!(870 * 4859 * 127, MAX_VOXEL_COUNT + 1);
        assert!(matches!(
            VoxelGrid::new(GridDimensions::new(870, 4859, 127)),
            Err(GridError::TooLarge { count: 536_870_910, .. })
        ));
        assert!(matches!(
            VoxelGrid::from_tiles(GridDimensions::new(2, 2, 1), vec![TileType::Wall; 3]),
            Err(GridError::TileCountMismatch { expected: 4, actual: 3 })
        ));
    }
}
