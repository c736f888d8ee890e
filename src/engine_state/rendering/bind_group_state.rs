//! Manages WebGPU bind groups and their layouts.
//!
//! Two layouts cover every pipeline: a dynamically offset uniform slot for
//! per-draw data, and a texture + sampler pair used for tile textures, the UI
//! panel, and the blit of the off-screen color attachment.

use std::collections::HashMap;

use wgpu::{BindGroup, BindGroupLayout, Device};

use crate::engine_state::voxels::tile::TextureKind;

use super::{draw_uniforms::DrawUniform, texture::Texture};

/// Name of the per-draw uniform bind group layout
pub const DRAW_UNIFORM_BIND_GROUP_LAYOUT: &str = "draw_uniform_bind_group_layout";
/// Name of the texture bind group layout
pub const TEXTURE_BIND_GROUP_LAYOUT: &str = "texture_bind_group_layout";
/// Name of the bind group sampling the off-screen color attachment
pub const BLIT_BIND_GROUP: &str = "blit_bind_group";

/// Manages WebGPU bind groups and their layouts.
pub struct BindGroupState {
    draw_uniform_layout: BindGroupLayout,
    texture_layout: BindGroupLayout,
    /// One bind group per loaded texture
    texture_bind_groups: HashMap<TextureKind, BindGroup>,
    /// Rebuilt whenever the off-screen target is recreated
    blit_bind_group: BindGroup,
}

impl BindGroupState {
    /// Creates the layouts, one bind group per texture, and the blit bind group.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `textures` - Decoded tile and panel textures
    /// * `blit_source` - The off-screen color attachment
    pub fn new(device: &Device, textures: &HashMap<TextureKind, Texture>, blit_source: &Texture) -> Self {
        let draw_uniform_layout = Self::generate_draw_uniform_layout(device);
        let texture_layout = Self::generate_texture_layout(device);

        let texture_bind_groups = textures
            .iter()
            .map(|(kind, texture)| {
                let bind_group =
                    Self::generate_texture_bind_group(device, &texture_layout, texture, kind.file_name());
                (*kind, bind_group)
            })
            .collect();

        let blit_bind_group =
            Self::generate_texture_bind_group(device, &texture_layout, blit_source, BLIT_BIND_GROUP);

        Self {
            draw_uniform_layout,
            texture_layout,
            texture_bind_groups,
            blit_bind_group,
        }
    }

    pub fn draw_uniform_layout(&self) -> &BindGroupLayout {
        &self.draw_uniform_layout
    }

    pub fn texture_layout(&self) -> &BindGroupLayout {
        &self.texture_layout
    }

    /// The bind group for a texture, if it was loaded.
    pub fn texture_bind_group(&self, kind: TextureKind) -> Option<&BindGroup> {
        self.texture_bind_groups.get(&kind)
    }

    pub fn blit_bind_group(&self) -> &BindGroup {
        &self.blit_bind_group
    }

    /// Points the blit bind group at a new off-screen color attachment.
    pub fn rebuild_blit_bind_group(&mut self, device: &Device, blit_source: &Texture) {
        self.blit_bind_group =
            Self::generate_texture_bind_group(device, &self.texture_layout, blit_source, BLIT_BIND_GROUP);
    }

    fn generate_draw_uniform_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(DrawUniform::SIZE),
                },
                count: None,
            }],
            label: Some(DRAW_UNIFORM_BIND_GROUP_LAYOUT),
        })
    }

    fn generate_texture_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    // This should match the filterable field of the corresponding Texture entry above.
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some(TEXTURE_BIND_GROUP_LAYOUT),
        })
    }

    fn generate_texture_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        texture: &Texture,
        label: &str,
    ) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some(label),
        })
    }
}
