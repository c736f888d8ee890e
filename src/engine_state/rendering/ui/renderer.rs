//! UI rendering module for the voxel editor.
//!
//! Draws the bottom panel and the selected tile preview over the world. Both
//! write the interface sentinel into the identity attachment so clicks on the
//! UI never reach a voxel.

use wgpu::{DepthStencilState, Device, RenderPass, RenderPipeline};

use crate::engine_state::rendering::{
    bind_group_state::BindGroupState,
    draw_list::{record_draws, DrawItem},
    draw_uniforms::{DrawUniformBuffer, UniformSlot},
    mesh_library::MeshLibrary,
    object_renderer::create_two_target_pipeline,
    texture::DepthTexture,
};

/// Manages UI rendering in the voxel editor.
pub struct UiRenderer {
    /// The WebGPU render pipeline for UI elements
    render_pipeline: RenderPipeline,
}

impl UiRenderer {
    /// Creates a new `UiRenderer` instance.
    ///
    /// The UI pass starts with a cleared depth attachment, so depth testing
    /// here only orders UI draws against each other; the world never hides them.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `ui_shader_source` - Source code for the UI shader
    /// * `bind_group_state` - Provides the uniform and texture layouts
    pub fn new(device: &Device, ui_shader_source: &str, bind_group_state: &BindGroupState) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("UI Shader"),
            source: wgpu::ShaderSource::Wgsl(ui_shader_source.into()),
        });

        let depth_stencil = DepthStencilState {
            format: DepthTexture::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let render_pipeline = create_two_target_pipeline(
            device,
            &shader,
            bind_group_state,
            depth_stencil,
            "UI Render Pipeline",
        );

        Self { render_pipeline }
    }

    /// Renders the UI elements.
    pub fn render(
        &self,
        rpass: &mut RenderPass<'_>,
        items: &[DrawItem],
        slots: &[UniformSlot],
        uniforms: &DrawUniformBuffer,
        bind_group_state: &BindGroupState,
        mesh_library: &MeshLibrary,
    ) {
        if items.is_empty() {
            return;
        }

        rpass.set_pipeline(&self.render_pipeline);
        record_draws(rpass, items, slots, uniforms, bind_group_state, mesh_library);
    }
}
