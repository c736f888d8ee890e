//! # Tile Module
//!
//! This module provides the tile-related functionality of the voxel grid.
//! It includes the tile type enumeration and the fixed lookup from a tile type
//! to the mesh and texture it is drawn with.

use tile_type::TileType;

pub mod tile_type;

/// The underlying integer type used to store tile types in the grid.
/// This is also the value written to and read from map files.
pub type TileTypeSize = u8;

/// The primitive shapes a tile can be drawn with.
///
/// Every variant has a static vertex/index table in the mesh library.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// A unit cube spanning [-1, 1] on every axis.
    Cube,
    /// A cube whose upper edge is pulled back to form a slope.
    Roof,
    /// A thin slab used for doors.
    Door,
    /// Two crossed billboards, taller than a cube.
    Tree,
    /// The screen-space quad used by the UI panel.
    UiRect,
}

impl MeshKind {
    /// All mesh kinds, in upload order.
    pub fn all() -> [MeshKind; 5] {
        [
            MeshKind::Cube,
            MeshKind::Roof,
            MeshKind::Door,
            MeshKind::Tree,
            MeshKind::UiRect,
        ]
    }
}

/// The named textures loaded at startup, one per drawable tile plus the UI panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Wall,
    Grass,
    Brick,
    Wood,
    Door,
    Roof,
    Ladder,
    Tree,
    Panel,
}

impl TextureKind {
    /// All texture kinds, in load order.
    pub fn all() -> [TextureKind; 9] {
        [
            TextureKind::Wall,
            TextureKind::Grass,
            TextureKind::Brick,
            TextureKind::Wood,
            TextureKind::Door,
            TextureKind::Roof,
            TextureKind::Ladder,
            TextureKind::Tree,
            TextureKind::Panel,
        ]
    }

    /// The image file name for this texture inside the texture directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TextureKind::Wall => "wall.png",
            TextureKind::Grass => "grass.png",
            TextureKind::Brick => "brick.png",
            TextureKind::Wood => "wood.png",
            TextureKind::Door => "door.png",
            TextureKind::Roof => "roof.png",
            TextureKind::Ladder => "ladder.png",
            TextureKind::Tree => "tree.png",
            TextureKind::Panel => "panel.png",
        }
    }
}

/// The pair of GPU resources a tile type is drawn with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileDescriptor {
    /// Geometry used for the tile.
    pub mesh: MeshKind,
    /// Texture bound while drawing the tile.
    pub texture: TextureKind,
}

impl TileType {
    /// Looks up how this tile type is drawn.
    ///
    /// The match is exhaustive over `TileType`, so adding a variant without
    /// deciding how it renders fails to compile.
    ///
    /// # Returns
    /// `None` for `TileType::Empty`, which is never drawn.
    pub fn descriptor(self) -> Option<TileDescriptor> {
        let (mesh, texture) = match self {
            TileType::Empty => return None,
            TileType::Wall => (MeshKind::Cube, TextureKind::Wall),
            TileType::Grass => (MeshKind::Cube, TextureKind::Grass),
            TileType::Brick => (MeshKind::Cube, TextureKind::Brick),
            TileType::Wood => (MeshKind::Cube, TextureKind::Wood),
            TileType::Door => (MeshKind::Door, TextureKind::Door),
            TileType::Roof => (MeshKind::Roof, TextureKind::Roof),
            TileType::Ladder => (MeshKind::Cube, TextureKind::Ladder),
            TileType::Tree => (MeshKind::Tree, TextureKind::Tree),
        };
        Some(TileDescriptor { mesh, texture })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_non_empty_tile_has_a_descriptor() {
        for tile in TileType::all() {
            assert_eq!(tile.descriptor().is_none(), tile == TileType::Empty);
        }
    }

    #[test]
    fn descriptors_never_use_the_ui_rect() {
        for tile in TileType::all() {
            if let Some(descriptor) = tile.descriptor() {
                assert_ne!(descriptor.mesh, MeshKind::UiRect);
                assert_ne!(descriptor.texture, TextureKind::Panel);
            }
        }
    }

    #[test]
    fn texture_file_names_are_distinct() {
        let mut names: Vec<_> = TextureKind::all().iter().map(|t| t.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TextureKind::all().len());
    }
}
