//! Renders the voxel grid into the off-screen color and identity attachments.
//!
//! The fragment stage writes two outputs: the textured color at location 0
//! and the pick value at location 1. Depth testing keeps both attachments in
//! agreement about which fragment is topmost.

use wgpu::{DepthStencilState, Device, RenderPass, RenderPipeline, ShaderModule};

use super::{
    bind_group_state::BindGroupState,
    draw_list::{record_draws, DrawItem},
    draw_uniforms::{DrawUniformBuffer, UniformSlot},
    identity_buffer::IdentityBuffer,
    mesh_library::MeshLibrary,
    texture::{DepthTexture, Texture},
    vertex::MeshVertex,
};

/// Draws one mesh per occupied voxel.
pub struct ObjectRenderer {
    render_pipeline: RenderPipeline,
}

impl ObjectRenderer {
    /// Creates a new `ObjectRenderer`.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `shader_source` - WGSL source with `vs_main` and `fs_main`
    /// * `bind_group_state` - Provides the uniform and texture layouts
    pub fn new(device: &Device, shader_source: &str, bind_group_state: &BindGroupState) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Object Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
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
            "Object Render Pipeline",
        );

        Self { render_pipeline }
    }

    /// Records the object pass draws.
    pub fn render(
        &self,
        rpass: &mut RenderPass<'_>,
        items: &[DrawItem],
        slots: &[UniformSlot],
        uniforms: &DrawUniformBuffer,
        bind_group_state: &BindGroupState,
        mesh_library: &MeshLibrary,
    ) {
        rpass.set_pipeline(&self.render_pipeline);
        record_draws(rpass, items, slots, uniforms, bind_group_state, mesh_library);
    }
}

/// Builds a pipeline writing color and identity from [`MeshVertex`] geometry.
///
/// Shared with the UI renderer; only the shader and depth state differ.
pub(super) fn create_two_target_pipeline(
    device: &Device,
    shader: &ShaderModule,
    bind_group_state: &BindGroupState,
    depth_stencil: DepthStencilState,
    label: &str,
) -> RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[
            bind_group_state.draw_uniform_layout(),
            bind_group_state.texture_layout(),
        ],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[
                Some(wgpu::ColorTargetState {
                    format: Texture::COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                }),
                // Integer formats cannot blend.
                Some(wgpu::ColorTargetState {
                    format: IdentityBuffer::FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                }),
            ],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Tree quads are single sided and must show from behind.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
