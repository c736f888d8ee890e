//! # Camera State Management
//!
//! This module owns everything the renderer needs to place the world on screen:
//! - Camera pan offset, tilt and cardinal facing
//! - Orthographic or perspective projection with a clamped zoom
//! - Held-key motion applied once per frame
//!
//! ## Core Components
//! - `Camera`: view matrix from pan, tilt and facing
//! - `Projection`: projection matrix for the current window size
//! - `CameraController`: accumulates motion input between frames

use camera::{Camera, CameraController, Projection};
use cgmath::{Deg, Matrix4, Vector3};
use log::debug;

use crate::application_state::viewer_config::CameraConfig;

use super::EditorActions;

pub mod camera;

/// Manages the camera, its projection and the controller that moves it.
pub struct CameraState {
    /// Pan, tilt and facing
    pub camera: Camera,
    /// Projection mode, zoom and viewport size
    pub projection: Projection,
    /// Handles held-key motion
    pub camera_controller: CameraController,
}

impl CameraState {
    /// Creates the camera from its configuration and the initial window size.
    ///
    /// # Arguments
    /// * `config` - Initial placement, speeds and projection settings
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let camera = Camera::new(
            Vector3::from(config.pan),
            Deg(config.tilt_degrees),
            config.facing,
        );
        let projection = Projection::new(
            width,
            height,
            Deg(config.fov_degrees),
            config.zoom,
            config.min_zoom,
            config.projection,
        );
        let camera_controller = CameraController::new(config.pan_speed, config.zoom_speed);

        CameraState {
            camera,
            projection,
            camera_controller,
        }
    }

    /// Applies one frame of editor actions.
    ///
    /// Facing and projection changes are discrete and take effect immediately.
    /// Pan and zoom are continuous and scale with `dt`.
    pub fn update(&mut self, actions: &EditorActions, dt: web_time::Duration) {
        if actions.cycle_left {
            self.camera.facing = self.camera.facing.cycle_left();
            debug!("Camera facing {:?}", self.camera.facing);
        }
        if actions.cycle_right {
            self.camera.facing = self.camera.facing.cycle_right();
            debug!("Camera facing {:?}", self.camera.facing);
        }
        if actions.toggle_projection {
            self.projection.toggle_mode();
            debug!("Projection {:?}", self.projection.mode);
        }

        self.camera_controller.intake_actions(actions);
        if self.camera_controller.has_updates() {
            self.camera_controller
                .update_camera(&mut self.camera, &mut self.projection, dt);
        }
    }

    /// Updates the projection for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Projection times view, used for every world draw this frame.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }
}
