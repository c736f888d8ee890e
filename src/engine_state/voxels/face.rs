//! # Face Module
//!
//! This module defines the six faces of a voxel cell. The numbering is shared by
//! the mesh tables (which tag every vertex with the face it belongs to), the
//! object shader (which folds the face id into the pick value), and the pick
//! decoder (which turns a clicked face back into an adjacent grid cell).

use cgmath::Vector3;

/// Represents the six faces of a voxel cell.
///
/// Grid axes and world axes differ: grid `z` is the vertical (height) axis and
/// grid `y` is depth. The variants are named after the grid direction they point in.
///
/// The order is: [TOP, FRONT, BOTTOM, BACK, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Face {
    /// Faces up the grid height axis (+z grid, +y world)
    TOP = 0,

    /// Faces along increasing grid depth (+y grid, +z world)
    FRONT = 1,

    /// Faces down the grid height axis (-z grid, -y world)
    BOTTOM = 2,

    /// Faces along decreasing grid depth (-y grid, -z world)
    BACK = 3,

    /// Faces along decreasing grid x (-x)
    LEFT = 4,

    /// Faces along increasing grid x (+x)
    RIGHT = 5,
}

impl Face {
    /// Number of faces on a cell.
    pub const COUNT: usize = 6;

    /// Returns all six faces in id order.
    pub fn all() -> [Face; 6] {
        [
            Face::TOP,
            Face::FRONT,
            Face::BOTTOM,
            Face::BACK,
            Face::LEFT,
            Face::RIGHT,
        ]
    }

    /// Looks up a face by the id packed into a pick value.
    ///
    /// # Returns
    /// `None` for ids outside `[0, 5]`.
    pub fn from_id(id: u8) -> Option<Face> {
        Face::all().get(id as usize).copied()
    }

    /// The id written into the identity buffer for this face.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Unit step in grid coordinates `(dx, dy, dz)` towards the neighbouring
    /// cell that shares this face.
    pub fn grid_offset(self) -> (i64, i64, i64) {
        match self {
            Face::TOP => (0, 0, 1),
            Face::FRONT => (0, 1, 0),
            Face::BOTTOM => (0, 0, -1),
            Face::BACK => (0, -1, 0),
            Face::LEFT => (-1, 0, 0),
            Face::RIGHT => (1, 0, 0),
        }
    }

    /// Outward normal in world space, after the grid → world axis remap.
    pub fn world_normal(self) -> Vector3<f32> {
        let (dx, dy, dz) = self.grid_offset();
        Vector3::new(dx as f32, dz as f32, dy as f32)
    }
}
