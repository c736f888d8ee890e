//! Copies the off-screen color attachment onto the window surface.
//!
//! A single full-screen triangle samples the color attachment. The identity
//! attachment is never drawn to the surface.

use wgpu::{CommandEncoder, Device, RenderPipeline, TextureFormat, TextureView};

use super::bind_group_state::BindGroupState;

pub struct BlitRenderer {
    render_pipeline: RenderPipeline,
}

impl BlitRenderer {
    pub fn new(
        device: &Device,
        shader_source: &str,
        surface_format: TextureFormat,
        bind_group_state: &BindGroupState,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[bind_group_state.texture_layout()],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { render_pipeline }
    }

    /// Records a pass that overwrites `surface_view` with the color attachment.
    pub fn render(&self, encoder: &mut CommandEncoder, surface_view: &TextureView, bind_group_state: &BindGroupState) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_bind_group(0, bind_group_state.blit_bind_group(), &[]);
        rpass.draw(0..3, 0..1);
    }
}
