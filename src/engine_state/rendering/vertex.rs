//! Vertex data structures and layouts for tile and UI meshes.
//!
//! Every mesh in the mesh library uses the same vertex format, so the object
//! and UI pipelines share one buffer layout.

/// A vertex of a tile or UI mesh.
///
/// # Memory Layout
/// - Coordinates: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Face id: u32 (4 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Model-space position
    pub coords: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Model-space normal of the face this vertex belongs to
    pub normals: [f32; 3],
    /// Face id (0-5) folded into the pick value by the object shader
    pub face_id: u32,
}

impl MeshVertex {
    /// Creates a new vertex.
    pub const fn new(coords: [f32; 3], tex_coords: [f32; 2], normals: [f32; 3], face_id: u32) -> Self {
        Self {
            coords,
            tex_coords,
            normals,
            face_id,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: coords (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: normals (vec3<f32>)
    /// - `location = 3`: face_id (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}
