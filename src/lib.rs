#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Editor
//!
//! An interactive viewer and editor for fixed-size voxel maps, built with Rust and WGPU.
//!
//! A map is loaded from a text file and drawn as textured cubes and props
//! from an isometric or perspective camera with four cardinal facings.
//! Clicking edits the map: the left button removes the voxel under the
//! cursor and the right button places the selected tile against the clicked face.
//!
//! ## Key Modules
//!
//! * `application_state` - Window lifecycle, graphics bootstrap, input and configuration
//! * `engine_state` - Camera, voxel grid, picking and rendering
//!
//! ## Picking
//!
//! Every frame is drawn into an off-screen target with an extra integer
//! attachment recording which voxel face covers each pixel. A click copies
//! the one pixel under the cursor back to the CPU and decodes it into a grid
//! edit, so what is picked is exactly what is visible.
//!
//! ## Usage
//!
//! ```text
//! voxel-editor [path/to/viewer_config.json]
//! ```

use anyhow::Context;
use application_state::{graphics_resources_builder::GraphicsBuilder, viewer_config::ViewerConfig, ApplicationState};
use log::info;
use winit::event_loop::EventLoop;

pub mod application_state;
pub mod engine_state;

use engine_state::voxels::map_file::load_map;

/// Loads the configuration and map, opens the window and runs the editor
/// until it is closed.
///
/// # Errors
/// Returns the first fatal error: unreadable configuration or map, graphics
/// setup failure, or a frame that could not be rendered or resolved.
pub fn run() -> anyhow::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = ViewerConfig::from_args(std::env::args()).context("failed to load the configuration")?;
    let initial_tile = config.initial_tile()?;
    let map = load_map(&config.map_path)
        .with_context(|| format!("failed to load map {}", config.map_path.display()))?;

    let event_loop = EventLoop::with_user_event()
        .build()
        .context("failed to create the event loop")?;

    let builder = GraphicsBuilder::new(event_loop.create_proxy());
    let mut state = ApplicationState::new(config, map.grid, initial_tile, builder);

    event_loop.run_app(&mut state).context("event loop error")?;
    state.into_result()
}
