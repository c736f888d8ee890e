//! # Camera Implementation
//!
//! This module contains the camera math used by the editor:
//! - `Camera`: pan offset, fixed tilt and one of four cardinal facings
//! - `Projection`: orthographic or perspective projection for the current window
//! - `CameraController`: accumulates held-key input and applies it per frame
//!
//! Everything here is plain `cgmath`, so matrices can be checked in unit tests
//! without a GPU.

use cgmath::*;
use web_time::Duration;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// WGPU's NDC depth range is 0 to 1 instead of OpenGL's -1 to 1.
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// Near and far planes of the orthographic projection, in world units.
const ORTHO_NEAR: f32 = -200.0;
const ORTHO_FAR: f32 = 200.0;

/// Near and far planes of the perspective projection.
const PERSPECTIVE_NEAR: f32 = 0.1;
const PERSPECTIVE_FAR: f32 = 500.0;

/// The four cardinal directions the camera can face.
///
/// Cycling right goes North → East → South → West → North.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Rotated -45° about the vertical axis.
    #[default]
    North,
    /// Rotated 45° about the vertical axis.
    East,
    /// Rotated 135° about the vertical axis.
    South,
    /// Rotated -135° about the vertical axis.
    West,
}

impl Facing {
    /// Rotation about the world vertical axis for this facing.
    pub fn angle(self) -> Deg<f32> {
        match self {
            Facing::North => Deg(-45.0),
            Facing::East => Deg(45.0),
            Facing::South => Deg(135.0),
            Facing::West => Deg(-135.0),
        }
    }

    /// The next facing clockwise.
    pub fn cycle_right(self) -> Self {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
        }
    }

    /// The next facing counter-clockwise.
    pub fn cycle_left(self) -> Self {
        match self {
            Facing::North => Facing::West,
            Facing::West => Facing::South,
            Facing::South => Facing::East,
            Facing::East => Facing::North,
        }
    }
}

/// Which projection the camera renders with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Parallel projection scaled by the zoom value.
    #[default]
    Orthographic,
    /// Fixed field-of-view perspective projection.
    Perspective,
}

impl ProjectionMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

/// Camera placement: a pan offset applied after the tilt and facing rotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Pan offset in view space. `z` moves the scene towards or away from the eye.
    pub pan: Vector3<f32>,
    /// Tilt about the horizontal screen axis.
    pub tilt: Deg<f32>,
    /// Current cardinal facing.
    pub facing: Facing,
}

impl Camera {
    /// Creates a new camera.
    pub fn new(pan: Vector3<f32>, tilt: Deg<f32>, facing: Facing) -> Self {
        Self { pan, tilt, facing }
    }

    /// Rotation shared by the world view and the UI tile preview.
    pub fn orientation(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(self.tilt) * Matrix4::from_angle_y(self.facing.angle())
    }

    /// Calculates the view matrix: pan, then tilt, then facing.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.pan) * self.orientation()
    }
}

/// Projection parameters for the current window.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    width: f32,
    height: f32,
    /// Vertical field of view used in perspective mode.
    fovy: Rad<f32>,
    /// Orthographic scale: half-extents are `screen size / zoom`.
    pub zoom: f32,
    /// Smallest zoom allowed.
    min_zoom: f32,
    /// Active projection.
    pub mode: ProjectionMode,
}

impl Projection {
    /// Creates a new projection.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view for perspective mode
    /// * `zoom` - Initial orthographic zoom
    /// * `min_zoom` - Lower bound for the zoom
    /// * `mode` - Initial projection mode
    pub fn new<F: Into<Rad<f32>>>(
        width: u32,
        height: u32,
        fovy: F,
        zoom: f32,
        min_zoom: f32,
        mode: ProjectionMode,
    ) -> Self {
        let min_zoom = min_zoom.max(f32::EPSILON);
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            fovy: fovy.into(),
            zoom: zoom.max(min_zoom),
            min_zoom,
            mode,
        }
    }

    /// Updates the viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    /// Adds `delta` to the zoom, clamped to the minimum.
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).max(self.min_zoom);
    }

    /// Switches between orthographic and perspective.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Calculates the projection matrix in wgpu clip space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let projection = match self.mode {
            ProjectionMode::Orthographic => {
                let half_width = self.width / self.zoom;
                let half_height = self.height / self.zoom;
                ortho(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    ORTHO_NEAR,
                    ORTHO_FAR,
                )
            }
            ProjectionMode::Perspective => perspective(
                self.fovy,
                self.width / self.height,
                PERSPECTIVE_NEAR,
                PERSPECTIVE_FAR,
            ),
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }
}

/// Turns held keys into camera motion.
///
/// Amounts are set from the frame's actions and consumed by
/// [`CameraController::update_camera`], which scales them by the frame time.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_up: f32,
    amount_down: f32,
    amount_zoom_in: f32,
    amount_zoom_out: f32,

    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Creates a new camera controller.
    ///
    /// # Arguments
    /// * `pan_speed` - Pan distance per second of held input
    /// * `zoom_speed` - Zoom change per second of held input
    pub fn new(pan_speed: f32, zoom_speed: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            amount_zoom_in: 0.0,
            amount_zoom_out: 0.0,
            pan_speed,
            zoom_speed,
        }
    }

    /// Records which motion keys are held this frame.
    ///
    /// # Arguments
    /// * `actions` - The editor actions translated from this frame's input
    pub fn intake_actions(&mut self, actions: &crate::engine_state::EditorActions) {
        if actions.pan_up {
            self.amount_up = 1.0;
        }
        if actions.pan_down {
            self.amount_down = 1.0;
        }
        if actions.pan_left {
            self.amount_left = 1.0;
        }
        if actions.pan_right {
            self.amount_right = 1.0;
        }
        if actions.zoom_in {
            self.amount_zoom_in = 1.0;
        }
        if actions.zoom_out {
            self.amount_zoom_out = 1.0;
        }
    }

    /// Checks if any motion key is held.
    pub fn has_updates(&self) -> bool {
        self.amount_left > 0.0
            || self.amount_right > 0.0
            || self.amount_up > 0.0
            || self.amount_down > 0.0
            || self.amount_zoom_in > 0.0
            || self.amount_zoom_out > 0.0
    }

    /// Applies the recorded motion for a frame lasting `dt`, then resets it.
    ///
    /// Zooming in also pushes the pan offset towards the eye so the perspective
    /// view follows the orthographic zoom.
    pub fn update_camera(&mut self, camera: &mut Camera, projection: &mut Projection, dt: Duration) {
        let dt = dt.as_secs_f32();
        let pan = self.pan_speed * dt;
        let zoom = self.zoom_speed * dt;

        camera.pan.x += (self.amount_right - self.amount_left) * pan;
        camera.pan.y += (self.amount_up - self.amount_down) * pan;
        camera.pan.z += (self.amount_zoom_in - self.amount_zoom_out) * pan;
        projection.adjust_zoom((self.amount_zoom_in - self.amount_zoom_out) * zoom);

        self.amount_left = 0.0;
        self.amount_right = 0.0;
        self.amount_up = 0.0;
        self.amount_down = 0.0;
        self.amount_zoom_in = 0.0;
        self.amount_zoom_out = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(mode: ProjectionMode) -> Projection {
        Projection::new(640, 480, Deg(40.0), 25.0, 1.0, mode)
    }

    #[test]
    fn cycling_four_times_returns_to_start() {
        for start in [Facing::North, Facing::East, Facing::South, Facing::West] {
            let mut right = start;
            let mut left = start;
            for _ in 0..4 {
                right = right.cycle_right();
                left = left.cycle_left();
            }
            assert_eq!(right, start);
            assert_eq!(left, start);
            assert_eq!(start.cycle_right().cycle_left(), start);
        }
    }

    #[test]
    fn cycling_rotates_the_view_by_quarter_turns() {
        let camera = Camera::new(Vector3::new(0.0, 0.0, -50.0), Deg(35.0), Facing::North);
        let mut turned = camera.clone();
        for _ in 0..4 {
            turned.facing = turned.facing.cycle_right();
            let step = turned.facing.angle() - camera.facing.angle();
            assert!(step.0.rem_euclid(90.0) < 1e-4);
        }
        assert_eq!(turned.calc_matrix(), camera.calc_matrix());
    }

    #[test]
    fn toggling_twice_restores_the_projection() {
        let mut projection = projection(ProjectionMode::Orthographic);
        let original = projection.calc_matrix();
        projection.toggle_mode();
        assert_ne!(projection.calc_matrix(), original);
        projection.toggle_mode();
        assert_eq!(projection.calc_matrix(), original);
    }

    #[test]
    fn orthographic_extents_scale_with_zoom() {
        let projection = projection(ProjectionMode::Orthographic);
        let matrix = projection.calc_matrix();
        // x = 640 / 25 lands on the right clip edge.
        let edge = matrix * Vector4::new(640.0 / 25.0, 0.0, 0.0, 1.0);
        assert!((edge.x - 1.0).abs() < 1e-5);
        let top = matrix * Vector4::new(0.0, 480.0 / 25.0, 0.0, 1.0);
        assert!((top.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn orthographic_depth_maps_into_wgpu_range() {
        let matrix = projection(ProjectionMode::Orthographic).calc_matrix();
        for z in [-199.0, 0.0, 199.0] {
            let clip = matrix * Vector4::new(0.0, 0.0, z, 1.0);
            assert!(clip.z >= 0.0 && clip.z <= 1.0, "z {} mapped to {}", z, clip.z);
        }
    }

    #[test]
    fn zoom_never_drops_below_minimum() {
        let mut projection = projection(ProjectionMode::Orthographic);
        projection.adjust_zoom(-100.0);
        assert_eq!(projection.zoom, 1.0);
        let matrix = projection.calc_matrix();
        assert!(matrix.x.x.is_finite() && matrix.x.x > 0.0);
    }

    #[test]
    fn controller_applies_motion_scaled_by_time() {
        let mut controller = CameraController::new(9.0, 9.0);
        let mut camera = Camera::new(Vector3::new(0.0, 0.0, -50.0), Deg(35.0), Facing::North);
        let mut projection = projection(ProjectionMode::Orthographic);
        let actions = crate::engine_state::EditorActions {
            pan_right: true,
            pan_up: true,
            zoom_in: true,
            ..Default::default()
        };

        controller.intake_actions(&actions);
        assert!(controller.has_updates());
        controller.update_camera(&mut camera, &mut projection, Duration::from_millis(500));

        assert_eq!(camera.pan, Vector3::new(4.5, 4.5, -45.5));
        assert_eq!(projection.zoom, 29.5);
        assert!(!controller.has_updates());
    }
}
