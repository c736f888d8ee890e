//! GPU buffers for every static mesh, uploaded once at startup.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::engine_state::voxels::tile::MeshKind;

use super::meshes::mesh_data;

/// Vertex and index buffers of one uploaded mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Binds the mesh buffers and issues one indexed draw.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Every [`MeshKind`] uploaded to the GPU.
pub struct MeshLibrary {
    meshes: HashMap<MeshKind, GpuMesh>,
}

impl MeshLibrary {
    pub fn new(device: &wgpu::Device) -> Self {
        let meshes = MeshKind::all()
            .into_iter()
            .map(|kind| {
                let data = mesh_data(kind);
                let label = format!("{kind:?}");
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} VERTEX BUFFER")),
                    contents: bytemuck::cast_slice(&data.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} INDEX BUFFER")),
                    contents: bytemuck::cast_slice(&data.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let mesh = GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: data.index_count(),
                };
                (kind, mesh)
            })
            .collect();

        Self { meshes }
    }

    pub fn get(&self, kind: MeshKind) -> Option<&GpuMesh> {
        self.meshes.get(&kind)
    }
}
