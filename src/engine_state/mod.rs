//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel editor.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the editor
//! * `camera_state` - Camera facing, pan, zoom and projection
//! * `picking` - Pick value decoding and the grid edits it triggers
//! * `rendering` - Render passes, the identity buffer and pixel readback
//! * `viewer_state` - Grid, camera and selection, free of GPU resources
//! * `voxels` - The tile grid, its faces and the map file loader
//!
//! ## Frame
//!
//! Input is translated into [`EditorActions`] once per frame. Camera and tile
//! selection changes apply immediately; a click is kept as a pending pick and
//! resolved by the next render, which reads back the identity value under the
//! cursor and hands it to the pick decoder.

use log::debug;
use thiserror::Error;
use wgpu::{Adapter, Device, Queue, Surface, SurfaceConfiguration};
use winit::{event::MouseButton, keyboard::KeyCode};

use picking::{PickButton, PickError, PickRequest};
use rendering::{RenderAssets, RenderError, RenderManager, RenderSetupError};
use viewer_state::ViewerState;
use voxels::{grid::VoxelGrid, tile::tile_type::TileType};

use crate::application_state::{input_state::ProcessedInputState, viewer_config::CameraConfig};

pub mod camera_state;
pub mod picking;
pub mod rendering;
pub mod viewer_state;
pub mod voxels;

/// Digit keys and the digit each one selects.
const DIGIT_KEYS: [(KeyCode, u8); 9] = [
    (KeyCode::Digit1, 1),
    (KeyCode::Digit2, 2),
    (KeyCode::Digit3, 3),
    (KeyCode::Digit4, 4),
    (KeyCode::Digit5, 5),
    (KeyCode::Digit6, 6),
    (KeyCode::Digit7, 7),
    (KeyCode::Digit8, 8),
    (KeyCode::Digit9, 9),
];

/// Errors that end the frame loop.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Pick(#[from] PickError),
}

/// Editor actions derived from one frame of input.
///
/// Pan and zoom are held actions; facing, projection, tile selection and
/// picks fire once per key or button press.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct EditorActions {
    pub pan_up: bool,
    pub pan_down: bool,
    pub pan_left: bool,
    pub pan_right: bool,
    /// Zooms in and pulls the scene towards the eye
    pub zoom_in: bool,
    /// Zooms out and pushes the scene away from the eye
    pub zoom_out: bool,
    pub cycle_left: bool,
    pub cycle_right: bool,
    pub toggle_projection: bool,
    /// Tile chosen with a number key this frame
    pub select_tile: Option<TileType>,
    /// Click to resolve against the identity buffer
    pub pick: Option<PickRequest>,
}

impl EditorActions {
    /// Translates the processed input state into editor actions.
    ///
    /// # Arguments
    /// * `input` - The processed input state to translate
    pub fn from_input(input: &ProcessedInputState) -> Self {
        let mut actions = EditorActions {
            // Held actions - active if key is pressed or held
            pan_up: input.get_key_state(KeyCode::KeyW).is_active(),
            pan_down: input.get_key_state(KeyCode::KeyS).is_active(),
            pan_left: input.get_key_state(KeyCode::KeyA).is_active(),
            pan_right: input.get_key_state(KeyCode::KeyD).is_active(),
            zoom_in: input.get_key_state(KeyCode::ShiftLeft).is_active(),
            zoom_out: input.get_key_state(KeyCode::ControlLeft).is_active(),

            // Discrete actions - only trigger on press, not hold
            cycle_left: input.get_key_state(KeyCode::KeyQ).is_just_pressed(),
            cycle_right: input.get_key_state(KeyCode::KeyE).is_just_pressed(),
            toggle_projection: input.get_key_state(KeyCode::KeyX).is_just_pressed(),
            ..Default::default()
        };

        actions.select_tile = DIGIT_KEYS
            .iter()
            .filter(|(key, _)| input.get_key_state(*key).is_just_pressed())
            .find_map(|(_, digit)| TileType::from_digit(*digit));

        let button = if input.get_mouse_button_state(MouseButton::Left).is_just_pressed() {
            Some(PickButton::Left)
        } else if input.get_mouse_button_state(MouseButton::Right).is_just_pressed() {
            Some(PickButton::Right)
        } else {
            None
        };
        actions.pick = button.and_then(|button| {
            let (x, y) = input.get_cursor_position()?;
            if x < 0.0 || y < 0.0 {
                return None;
            }
            Some(PickRequest {
                x: x.floor() as u32,
                y: y.floor() as u32,
                button,
            })
        });

        actions
    }
}

/// The main state container for the voxel editor
///
/// This struct owns the editor state and the renderer, and coordinates
/// input processing, rendering and pick resolution.
pub struct EngineState {
    /// Grid, camera and tile selection
    pub viewer: ViewerState,
    /// Manager for all rendering operations
    pub render_manager: RenderManager,
    /// Current editor actions derived from input
    pub editor_actions: EditorActions,
    /// Click waiting for the next frame's readback
    pending_pick: Option<PickRequest>,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// # Arguments
    /// * `surface` - The rendering surface, already configured
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `adapter` - The adapter, used for attachment format checks
    /// * `assets` - Shader sources and texture bytes
    /// * `grid` - The loaded map
    /// * `camera_config` - Initial camera settings
    /// * `selected_tile` - Tile selected at startup
    ///
    /// # Errors
    /// Fails if the off-screen target is unsupported or a texture is unreadable.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        adapter: &Adapter,
        assets: &RenderAssets,
        grid: VoxelGrid,
        camera_config: &CameraConfig,
        selected_tile: TileType,
    ) -> Result<Self, RenderSetupError> {
        let viewer = ViewerState::new(
            grid,
            camera_config,
            selected_tile,
            surface_config.width,
            surface_config.height,
        );
        let render_manager = RenderManager::new(surface, surface_config, device, queue, adapter, assets)?;

        Ok(Self {
            viewer,
            render_manager,
            editor_actions: EditorActions::default(),
            pending_pick: None,
        })
    }

    /// Resizes the rendering surface when the window size changes
    ///
    /// # Arguments
    /// * `size` - The new physical size of the window
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.render_manager.resize_surface(size);
        if size.width > 0 && size.height > 0 {
            self.viewer.resize(size.width, size.height);
        }
    }

    /// Sets the input commands for the engine state.
    ///
    /// A click is kept until a frame resolves it.
    ///
    /// # Arguments
    /// * `input` - The processed input state to use for setting commands
    pub fn set_input_commands(&mut self, input: &ProcessedInputState) {
        self.editor_actions = EditorActions::from_input(input);
        if let Some(pick) = self.editor_actions.pick {
            self.pending_pick = Some(pick);
        }
    }

    /// Applies the frame's actions to the camera and tile selection
    ///
    /// # Arguments
    /// * `wait_duration` - The time elapsed since the last frame
    pub fn process_input(&mut self, wait_duration: web_time::Duration) {
        self.viewer.apply_actions(&self.editor_actions, wait_duration);
    }

    /// Renders the current frame and resolves a pending click against it.
    ///
    /// # Errors
    /// Surface out-of-memory, readback failures and corrupt pick values are fatal.
    pub fn render(&mut self, size: winit::dpi::PhysicalSize<u32>) -> Result<(), FrameError> {
        let pick = self.pending_pick.take();
        let value = self
            .render_manager
            .render(&self.viewer, size, pick.map(|pick| (pick.x, pick.y)))?;

        if let (Some(pick), Some(value)) = (pick, value) {
            let outcome = self.viewer.apply_pick(value, pick.button)?;
            debug!("Click at ({}, {}) resolved to {:?}", pick.x, pick.y, outcome);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use winit::{event::MouseButton, keyboard::KeyCode};

    use super::*;
    use crate::application_state::input_state::RawInputState;

    fn input(keys: &[(KeyCode, RawInputState)], buttons: &[(MouseButton, RawInputState)]) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect::<HashMap<_, _>>(),
            mouse_button_states: buttons.iter().copied().collect::<HashMap<_, _>>(),
            cursor_position: Some((120.7, 33.2)),
        }
    }

    #[test]
    fn held_keys_pan_and_zoom() {
        let actions = EditorActions::from_input(&input(
            &[
                (KeyCode::KeyW, RawInputState::Held),
                (KeyCode::KeyD, RawInputState::Pressed),
                (KeyCode::ControlLeft, RawInputState::Held),
                (KeyCode::KeyS, RawInputState::Released),
            ],
            &[],
        ));

        assert!(actions.pan_up && actions.pan_right && actions.zoom_out);
        assert!(!actions.pan_down && !actions.pan_left && !actions.zoom_in);
        assert_eq!(actions.pick, None);
    }

    #[test]
    fn discrete_actions_ignore_held_keys() {
        let pressed = EditorActions::from_input(&input(
            &[
                (KeyCode::KeyQ, RawInputState::Pressed),
                (KeyCode::KeyX, RawInputState::Pressed),
            ],
            &[],
        ));
        assert!(pressed.cycle_left && pressed.toggle_projection && !pressed.cycle_right);

        let held = EditorActions::from_input(&input(
            &[
                (KeyCode::KeyQ, RawInputState::Held),
                (KeyCode::KeyX, RawInputState::Held),
            ],
            &[],
        ));
        assert!(!held.cycle_left && !held.toggle_projection);
    }

    #[test]
    fn digit_keys_select_tiles() {
        let actions = EditorActions::from_input(&input(&[(KeyCode::Digit3, RawInputState::Pressed)], &[]));
        assert_eq!(actions.select_tile, Some(TileType::Brick));

        let unused = EditorActions::from_input(&input(&[(KeyCode::Digit9, RawInputState::Pressed)], &[]));
        assert_eq!(unused.select_tile, None);
    }

    #[test]
    fn clicks_become_pick_requests_at_the_cursor_pixel() {
        let actions = EditorActions::from_input(&input(&[], &[(MouseButton::Right, RawInputState::Pressed)]));
        assert_eq!(
            actions.pick,
            Some(PickRequest {
                x: 120,
                y: 33,
                button: PickButton::Right,
            })
        );

        let held = EditorActions::from_input(&input(&[], &[(MouseButton::Left, RawInputState::Held)]));
        assert_eq!(held.pick, None);
    }

    #[test]
    fn clicks_outside_the_window_are_ignored() {
        let mut state = input(&[], &[(MouseButton::Left, RawInputState::Pressed)]);
        state.cursor_position = None;
        assert_eq!(EditorActions::from_input(&state).pick, None);

        state.cursor_position = Some((-3.0, 10.0));
        assert_eq!(EditorActions::from_input(&state).pick, None);
    }
}
