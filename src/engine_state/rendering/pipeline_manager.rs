//! Manages the render passes of one frame and the resources they share.
//!
//! # Architecture
//!
//! - `PipelineManager`: coordinates the passes of a frame
//! - `ObjectRenderer`: voxel meshes into color + identity, depth tested
//! - `UiRenderer`: panel and tile preview over the world, same attachments
//! - `BlitRenderer`: off-screen color onto the window surface
//!
//! # Frame
//!
//! 1. Clear color, identity, and depth; draw every occupied voxel.
//! 2. Clear depth only; draw the UI.
//! 3. If a pick was requested, copy the identity pixel under the cursor.
//! 4. Blit color to the surface and submit.
//! 5. Map the copied pixel and return it.

use std::collections::HashMap;

use log::info;
use thiserror::Error;
use wgpu::{Adapter, Device, Queue, TextureFormat, TextureView};

use crate::engine_state::{
    picking::pick_encoding::CLEARED_PICK_VALUE, viewer_state::ViewerState, voxels::tile::TextureKind,
};

use super::{
    bind_group_state::BindGroupState,
    blit_renderer::BlitRenderer,
    draw_list::{build_draw_list, pack_uniforms},
    draw_uniforms::DrawUniformBuffer,
    identity_buffer::ReadbackError,
    mesh_library::MeshLibrary,
    object_renderer::ObjectRenderer,
    render_target::{OffscreenTarget, RenderTargetError},
    texture::Texture,
    ui::UiRenderer,
    RenderAssets,
};

/// Fatal problems while building the renderer at startup.
#[derive(Debug, Error)]
pub enum RenderSetupError {
    #[error(transparent)]
    Target(#[from] RenderTargetError),
    #[error("failed to decode texture {name}: {source}")]
    TextureDecode {
        name: &'static str,
        source: image::ImageError,
    },
    #[error("texture {0} was not loaded")]
    MissingTexture(&'static str),
}

/// Owns every pipeline and GPU resource of the frame.
pub struct PipelineManager {
    /// Layouts, texture bind groups and the blit bind group
    pub bind_group_state: BindGroupState,
    /// GPU buffers for every static mesh
    mesh_library: MeshLibrary,
    /// Per-draw uniforms for the current frame
    draw_uniforms: DrawUniformBuffer,
    /// Color, identity and depth attachments
    target: OffscreenTarget,
    object_renderer: ObjectRenderer,
    ui_renderer: UiRenderer,
    blit_renderer: BlitRenderer,
}

impl PipelineManager {
    /// Creates a new `PipelineManager` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for texture uploads
    /// * `adapter` - Used to check attachment format support
    /// * `surface_format` - Format of the window surface the blit writes to
    /// * `width`, `height` - Initial size of the off-screen target
    /// * `assets` - Shader sources and encoded textures
    ///
    /// # Errors
    /// Fails if an attachment format is unsupported or a texture cannot be decoded.
    pub fn new(
        device: &Device,
        queue: &Queue,
        adapter: &Adapter,
        surface_format: TextureFormat,
        width: u32,
        height: u32,
        assets: &RenderAssets,
    ) -> Result<Self, RenderSetupError> {
        OffscreenTarget::check_support(adapter)?;
        let target = OffscreenTarget::new(device, width, height);

        let mut textures = HashMap::new();
        for (kind, bytes) in &assets.textures {
            let texture = Texture::from_image_bytes(device, queue, bytes, kind.file_name()).map_err(
                |source| RenderSetupError::TextureDecode {
                    name: kind.file_name(),
                    source,
                },
            )?;
            textures.insert(*kind, texture);
        }
        if let Some(missing) = TextureKind::all().into_iter().find(|kind| !textures.contains_key(kind)) {
            return Err(RenderSetupError::MissingTexture(missing.file_name()));
        }
        info!("Loaded {} textures", textures.len());

        let bind_group_state = BindGroupState::new(device, &textures, &target.color);

        Ok(Self {
            mesh_library: MeshLibrary::new(device),
            draw_uniforms: DrawUniformBuffer::new(device),
            object_renderer: ObjectRenderer::new(device, &assets.object_shader, &bind_group_state),
            ui_renderer: UiRenderer::new(device, &assets.ui_shader, &bind_group_state),
            blit_renderer: BlitRenderer::new(device, &assets.blit_shader, surface_format, &bind_group_state),
            bind_group_state,
            target,
        })
    }

    /// Renders a frame into `surface_view`.
    ///
    /// # Arguments
    /// * `surface_view` - View of the acquired surface texture
    /// * `viewer` - Grid, camera and selection to draw
    /// * `width`, `height` - Current surface size
    /// * `pick` - Pixel whose identity value should be read back
    ///
    /// # Returns
    /// The identity value under `pick`, or `None` if no pick was requested or
    /// the pixel lies outside the target.
    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface_view: &TextureView,
        viewer: &ViewerState,
        width: u32,
        height: u32,
        pick: Option<(u32, u32)>,
    ) -> Result<Option<i32>, ReadbackError> {
        let draws = build_draw_list(viewer, width, height);

        let mut packer = self.draw_uniforms.create_packer();
        let object_slots = pack_uniforms(&draws.objects, &mut packer);
        let interface_slots = pack_uniforms(&draws.interface, &mut packer);
        self.draw_uniforms
            .upload(&packer, device, queue, self.bind_group_state.draw_uniform_layout());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Object Pass"),
                color_attachments: &[
                    Some(color_attachment(&self.target.color.view, wgpu::LoadOp::Clear(wgpu::Color::BLACK))),
                    Some(color_attachment(
                        &self.target.identity.view,
                        wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEARED_PICK_VALUE as f64,
                            g: 0.0,
                            b: 0.0,
                            a: 0.0,
                        }),
                    )),
                ],
                depth_stencil_attachment: Some(self.depth_attachment()),
                ..Default::default()
            });
            self.object_renderer.render(
                &mut rpass,
                &draws.objects,
                &object_slots,
                &self.draw_uniforms,
                &self.bind_group_state,
                &self.mesh_library,
            );
        }

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("UI Pass"),
                color_attachments: &[
                    Some(color_attachment(&self.target.color.view, wgpu::LoadOp::Load)),
                    Some(color_attachment(&self.target.identity.view, wgpu::LoadOp::Load)),
                ],
                depth_stencil_attachment: Some(self.depth_attachment()),
                ..Default::default()
            });
            self.ui_renderer.render(
                &mut rpass,
                &draws.interface,
                &interface_slots,
                &self.draw_uniforms,
                &self.bind_group_state,
                &self.mesh_library,
            );
        }

        let pick = pick.filter(|&(x, y)| self.target.identity.contains(x, y));
        if let Some((x, y)) = pick {
            self.target.identity.encode_pixel_copy(&mut encoder, x, y);
        }

        self.blit_renderer
            .render(&mut encoder, surface_view, &self.bind_group_state);

        queue.submit([encoder.finish()]);

        match pick {
            Some(_) => self.target.identity.read_copied_pixel(device).map(Some),
            None => Ok(None),
        }
    }

    /// Recreates the off-screen target at the new size and points the blit at it.
    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        self.target = OffscreenTarget::new(device, width, height);
        self.bind_group_state
            .rebuild_blit_bind_group(device, &self.target.color);
    }

    fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.target.depth.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }
}

fn color_attachment(
    view: &TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
) -> wgpu::RenderPassColorAttachment<'_> {
    wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        },
    }
}
