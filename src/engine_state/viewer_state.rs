//! # Viewer State
//!
//! The editor state that lives across frames: the grid being edited, the
//! camera, and the tile the next placement will use. It holds no GPU resources,
//! so the whole edit loop (actions in, grid changes out) runs in tests.

use log::{debug, info};

use super::{
    camera_state::CameraState,
    picking::{apply_pick, PickButton, PickError, PickOutcome},
    voxels::{grid::VoxelGrid, tile::tile_type::TileType},
    EditorActions,
};
use crate::application_state::viewer_config::CameraConfig;

/// Grid, camera and tile selection.
pub struct ViewerState {
    /// The grid being edited
    pub grid: VoxelGrid,
    /// Camera placement and projection
    pub camera_state: CameraState,
    /// Tile placed by the next right click
    pub selected_tile: TileType,
}

impl ViewerState {
    /// Creates the editor state for a freshly loaded grid.
    ///
    /// # Arguments
    /// * `grid` - The loaded grid
    /// * `camera_config` - Initial camera settings
    /// * `selected_tile` - Tile selected before any number key is pressed
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    pub fn new(
        grid: VoxelGrid,
        camera_config: &CameraConfig,
        selected_tile: TileType,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            grid,
            camera_state: CameraState::new(camera_config, width, height),
            selected_tile,
        }
    }

    /// Applies one frame of actions to the camera and tile selection.
    pub fn apply_actions(&mut self, actions: &EditorActions, dt: web_time::Duration) {
        if let Some(tile) = actions.select_tile {
            if tile != self.selected_tile {
                info!("Selected tile {}", tile);
            }
            self.selected_tile = tile;
        }
        self.camera_state.update(actions, dt);
    }

    /// Applies a click whose pick value has been read back from the identity buffer.
    pub fn apply_pick(&mut self, value: i32, button: PickButton) -> Result<PickOutcome, PickError> {
        let outcome = apply_pick(&mut self.grid, value, button, self.selected_tile)?;
        debug!("Pick {:#010x} with {:?}: {:?}", value, button, outcome);
        Ok(outcome)
    }

    /// Updates the camera for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera_state.resize(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        picking::pick_encoding::encode,
        voxels::{face::Face, map_file::parse_map},
    };

    fn viewer(map: &str) -> ViewerState {
        let grid = parse_map(map).unwrap().grid;
        ViewerState::new(grid, &CameraConfig::default(), TileType::Wall, 640, 480)
    }

    #[test]
    fn number_keys_change_what_right_click_places() {
        let mut viewer = viewer("2 1 1\n0\n1 0\n");
        let actions = EditorActions {
            select_tile: Some(TileType::Brick),
            ..Default::default()
        };
        viewer.apply_actions(&actions, web_time::Duration::ZERO);
        assert_eq!(viewer.selected_tile, TileType::Brick);

        let outcome = viewer
            .apply_pick(encode(0, Face::RIGHT.id()), PickButton::Right)
            .unwrap();
        assert_eq!(
            outcome,
            PickOutcome::Placed {
                index: 1,
                tile: TileType::Brick
            }
        );
        assert_eq!(viewer.grid.tiles(), &[TileType::Wall, TileType::Brick]);
    }

    #[test]
    fn frames_without_selection_keep_the_current_tile() {
        let mut viewer = viewer("1 1 1\n0\n1\n");
        viewer.apply_actions(&EditorActions::default(), web_time::Duration::ZERO);
        assert_eq!(viewer.selected_tile, TileType::Wall);
    }
}
