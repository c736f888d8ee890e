//! Screen-space placement of the UI panel and the selected tile preview.
//!
//! UI coordinates are pixels with the origin at the top-left corner and y
//! pointing down. The panel sits at the far end of the UI depth range so the
//! preview, drawn in front of it, always wins the depth test.

use cgmath::{ortho, Matrix4, Vector3};

use crate::engine_state::{camera_state::camera::OPENGL_TO_WGPU_MATRIX, voxels::tile::MeshKind};

/// Height of the bottom panel in pixels.
pub const PANEL_HEIGHT: f32 = 96.0;

/// Horizontal centre of the tile preview.
const PREVIEW_CENTER_X: f32 = 48.0;

/// Pixels per model unit for cube-shaped previews.
const CUBE_PREVIEW_SCALE: f32 = 20.0;
/// Pixels per model unit for the (taller) tree preview.
const TREE_PREVIEW_SCALE: f32 = 12.0;
/// The tree mesh grows upwards from its origin, so its preview sits lower.
const TREE_PREVIEW_OFFSET: f32 = 12.0;

const UI_NEAR: f32 = -100.0;
const UI_FAR: f32 = 100.0;
/// Panel depth, just in front of the far plane.
const PANEL_DEPTH: f32 = UI_NEAR + 1.0;

/// Orthographic pixel-space projection, origin top-left, y down.
pub fn screen_projection(width: f32, height: f32) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX * ortho(0.0, width, height, 0.0, UI_NEAR, UI_FAR)
}

/// Stretches the unit rect over the bottom strip of the screen.
pub fn panel_model(width: f32, height: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0.0, height - PANEL_HEIGHT, PANEL_DEPTH))
        * Matrix4::from_nonuniform_scale(width, PANEL_HEIGHT, 1.0)
}

/// Places a tile mesh in the panel, rotated like the world.
///
/// The y scale is negated so the mesh's up axis points up the screen.
pub fn preview_model(mesh: MeshKind, orientation: Matrix4<f32>, height: f32) -> Matrix4<f32> {
    let (scale, offset) = match mesh {
        MeshKind::Tree => (TREE_PREVIEW_SCALE, TREE_PREVIEW_OFFSET),
        _ => (CUBE_PREVIEW_SCALE, 0.0),
    };
    let center = Vector3::new(PREVIEW_CENTER_X, height - PANEL_HEIGHT / 2.0 + offset, 0.0);

    Matrix4::from_translation(center)
        * Matrix4::from_nonuniform_scale(scale, -scale, scale)
        * orientation
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Point3, SquareMatrix, Transform};

    use super::*;

    fn to_ndc(matrix: Matrix4<f32>, point: [f32; 3]) -> Point3<f32> {
        matrix.transform_point(Point3::from(point))
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn panel_covers_the_bottom_strip() {
        let (width, height) = (640.0, 480.0);
        let mvp = screen_projection(width, height) * panel_model(width, height);

        let top_left = to_ndc(mvp, [0.0, 0.0, 0.0]);
        assert_close(top_left.x, -1.0);
        assert_close(top_left.y, 1.0 - 2.0 * (height - PANEL_HEIGHT) / height);

        let bottom_right = to_ndc(mvp, [1.0, 1.0, 0.0]);
        assert_close(bottom_right.x, 1.0);
        assert_close(bottom_right.y, -1.0);
    }

    #[test]
    fn preview_sits_in_front_of_the_panel() {
        let (width, height) = (640.0, 480.0);
        let projection = screen_projection(width, height);
        let panel_depth = to_ndc(projection * panel_model(width, height), [0.5, 0.5, 0.0]).z;

        let orientation = Matrix4::from_angle_x(Deg(35.0)) * Matrix4::from_angle_y(Deg(-45.0));
        let preview = projection * preview_model(MeshKind::Cube, orientation, height);
        for corner in [[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [-1.0, 1.0, -1.0]] {
            let depth = to_ndc(preview, corner).z;
            assert!((0.0..panel_depth).contains(&depth));
        }
    }

    #[test]
    fn preview_stays_inside_the_panel() {
        let height = 480.0;
        let projection = screen_projection(640.0, height);
        let min_y = 1.0 - 2.0 * (height - PANEL_HEIGHT) / height;

        for (mesh, top) in [(MeshKind::Cube, 1.0), (MeshKind::Tree, 3.0)] {
            let mvp = projection * preview_model(mesh, Matrix4::identity(), height);
            for y in [-1.0, top] {
                let point = to_ndc(mvp, [0.0, y, 0.0]);
                assert!(point.y <= min_y && point.y >= -1.0, "{mesh:?} leaves the panel");
            }
        }
    }

    #[test]
    fn preview_up_is_screen_up() {
        let height = 480.0;
        let mvp = screen_projection(640.0, height) * preview_model(MeshKind::Cube, Matrix4::identity(), height);
        let center = to_ndc(mvp, [0.0, 0.0, 0.0]);
        let above = to_ndc(mvp, [0.0, 1.0, 0.0]);
        assert!(above.y > center.y);
    }
}
