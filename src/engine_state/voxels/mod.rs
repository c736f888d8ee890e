//! # Voxel Data
//!
//! This module contains the world data the editor operates on.
//!
//! ## Components
//!
//! * **Tile**: the tile types a cell can hold and how each one is drawn
//! * **Face**: the six cell faces and their numbering, shared with the renderer
//! * **Grid**: the fixed-size 3D tile array and its index arithmetic
//! * **Map file**: the text format grids are loaded from
//!
//! Nothing here touches the GPU, so all of it is exercised by plain unit tests.

pub mod face;
pub mod grid;
pub mod map_file;
pub mod tile;
