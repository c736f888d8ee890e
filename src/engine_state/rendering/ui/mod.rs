//! UI rendering for the voxel editor.
//!
//! The UI is a single panel along the bottom of the window holding a preview
//! of the tile the next right click will place.

pub mod layout;
mod renderer;

pub use renderer::UiRenderer;
