//! Static geometry for every tile shape and the UI rectangle.
//!
//! All tile meshes are built around a cube spanning `[-1, 1]` on each axis, so
//! neighbouring voxels placed two world units apart touch exactly. Every quad
//! is wound counter-clockwise seen from outside and every vertex carries the
//! [`Face`] id of the quad it belongs to.

use crate::engine_state::voxels::{face::Face, tile::MeshKind};

use super::vertex::MeshVertex;

/// CPU-side geometry for one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

/// Texture coordinates for the four corners of a quad, bottom-left first.
const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Corners of each cube face, indexed by face id.
const CUBE_FACES: [[[f32; 3]; 4]; Face::COUNT] = [
    // TOP (+y world)
    [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
    // FRONT (+z world)
    [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    // BOTTOM (-y world)
    [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    // BACK (-z world)
    [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
    // LEFT (-x world)
    [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    // RIGHT (+x world)
    [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
];

impl MeshData {
    fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Appends one quad as two triangles.
    fn push_quad(&mut self, corners: [[f32; 3]; 4], face: Face) {
        let base = self.vertices.len() as u16;
        let normal = face.world_normal();
        for (corner, tex_coords) in corners.iter().zip(QUAD_TEX_COORDS) {
            self.vertices.push(MeshVertex::new(
                *corner,
                tex_coords,
                [normal.x, normal.y, normal.z],
                face.id() as u32,
            ));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Returns the geometry for a mesh kind.
pub fn mesh_data(kind: MeshKind) -> MeshData {
    match kind {
        MeshKind::Cube => cube(),
        MeshKind::Roof => roof(),
        MeshKind::Door => door(),
        MeshKind::Tree => tree(),
        MeshKind::UiRect => ui_rect(),
    }
}

fn cube() -> MeshData {
    let mut mesh = MeshData::new();
    for face in Face::all() {
        mesh.push_quad(CUBE_FACES[face.id() as usize], face);
    }
    mesh
}

/// A cube whose upper edge collapses onto the centre line, forming a ridge.
fn roof() -> MeshData {
    let mut mesh = cube();
    for vertex in &mut mesh.vertices {
        if vertex.coords[1] > 0.0 {
            vertex.coords[2] = 0.0;
        }
    }
    mesh
}

/// A thin slab, a fifth of a cube deep.
fn door() -> MeshData {
    let mut mesh = cube();
    for vertex in &mut mesh.vertices {
        vertex.coords[2] *= 0.2;
    }
    mesh
}

/// Two crossed quads, twice as tall as a cube and rooted at the cell floor.
///
/// The quads are single sided. The object shader flips the face id for
/// back-facing fragments so picking the far side still resolves correctly.
fn tree() -> MeshData {
    let mut mesh = MeshData::new();
    mesh.push_quad(
        [[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [1.0, 3.0, 0.0], [-1.0, 3.0, 0.0]],
        Face::FRONT,
    );
    mesh.push_quad(
        [[0.0, -1.0, 1.0], [0.0, -1.0, -1.0], [0.0, 3.0, -1.0], [0.0, 3.0, 1.0]],
        Face::RIGHT,
    );
    mesh
}

/// Unit square in screen space, `[0, 1]` on x and y.
fn ui_rect() -> MeshData {
    let mut mesh = MeshData::new();
    mesh.push_quad(
        [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
        Face::TOP,
    );
    mesh
}
