//! # Voxel Editor Application Entry Point
//!
//! This is the main entry point for the native application.
//! It simply calls into the library's `run()` function to load the map and start the editor.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- assets/viewer_config.json
//! ```

fn main() -> anyhow::Result<()> {
    voxel_editor::run()
}
