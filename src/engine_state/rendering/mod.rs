//! Rendering system for the voxel editor.
//!
//! This module contains the core rendering functionality: the off-screen
//! target with its identity attachment, the object/UI/blit pipelines, and
//! the per-frame pass sequence. It provides a high-level interface for
//! rendering the grid and reading back what is under the cursor.

use log::{error, warn};
use thiserror::Error;
use wgpu::{Adapter, Device, Queue, Surface, SurfaceConfiguration};

use pipeline_manager::PipelineManager;
pub use pipeline_manager::RenderSetupError;

use super::{viewer_state::ViewerState, voxels::tile::TextureKind};

mod bind_group_state;
mod blit_renderer;
pub mod draw_list;
mod draw_uniforms;
pub mod identity_buffer;
mod mesh_library;
pub mod meshes;
mod object_renderer;
mod pipeline_manager;
pub mod render_target;
mod texture;
pub mod ui;
mod vertex;

// Re-export commonly used types
pub use identity_buffer::ReadbackError;
pub use vertex::MeshVertex;

/// Shader sources and encoded texture files read at startup.
pub struct RenderAssets {
    pub object_shader: String,
    pub ui_shader: String,
    pub blit_shader: String,
    /// Encoded image bytes for every texture kind
    pub textures: Vec<(TextureKind, Vec<u8>)>,
}

/// Frame failures that stop the editor.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
    #[error(transparent)]
    Readback(#[from] ReadbackError),
}

/// Manages the entire rendering pipeline for the voxel editor.
///
/// This struct is the main entry point for all rendering operations.
/// It manages the WebGPU surface, device, queue, and rendering pipeline.
pub struct RenderManager {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    pub device: Device,
    /// The WebGPU queue for submitting command buffers
    pub queue: Queue,
    /// Manages the rendering pipelines and the off-screen target
    pipeline_manager: PipelineManager,
}

impl RenderManager {
    /// Creates a new `RenderManager` instance.
    ///
    /// # Arguments
    /// * `surface` - The WebGPU surface to render to, already configured
    /// * `surface_config` - Configuration for the surface
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `adapter` - The adapter the device was created from
    /// * `assets` - Shader sources and encoded textures
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        adapter: &Adapter,
        assets: &RenderAssets,
    ) -> Result<Self, RenderSetupError> {
        let pipeline_manager = PipelineManager::new(
            &device,
            &queue,
            adapter,
            surface_config.format,
            surface_config.width,
            surface_config.height,
            assets,
        )?;

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline_manager,
        })
    }

    /// Handles window resize events.
    ///
    /// A zero-sized window (minimised) leaves the surface untouched; frames
    /// are skipped until it has an area again.
    ///
    /// # Arguments
    /// * `size` - The new window size in physical pixels
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.pipeline_manager
            .resize(&self.device, size.width, size.height);
    }

    /// Renders a new frame.
    ///
    /// # Arguments
    /// * `viewer` - Grid, camera and selection to draw
    /// * `size` - Current window size
    /// * `pick` - Pixel to read the identity value of, if the user clicked
    ///
    /// # Returns
    /// The identity value under `pick` when one was read.
    pub fn render(
        &mut self,
        viewer: &ViewerState,
        size: winit::dpi::PhysicalSize<u32>,
        pick: Option<(u32, u32)>,
    ) -> Result<Option<i32>, RenderError> {
        if size.width == 0 || size.height == 0 {
            return Ok(None);
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!("Surface {err}, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return Ok(None);
            }
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                return Err(RenderError::Surface(err));
            }
        };

        let view = frame.texture.create_view(&Default::default());
        let value = self.pipeline_manager.render(
            &self.device,
            &self.queue,
            &view,
            viewer,
            self.surface_config.width,
            self.surface_config.height,
            pick,
        )?;
        frame.present();

        Ok(value)
    }
}
