//! # Viewer Configuration
//!
//! Startup settings read from a JSON file. Every field has a default, so a
//! missing file, or a file naming only a few fields, still yields a complete
//! configuration.
//!
//! ```json
//! {
//!     "window": { "width": 800, "height": 600 },
//!     "map_path": "assets/house_map",
//!     "camera": { "facing": "east", "projection": "perspective" }
//! }
//! ```

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::engine_state::{
    camera_state::camera::{Facing, ProjectionMode},
    voxels::tile::{tile_type::TileType, TileTypeSize},
};

/// Config file used when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "assets/viewer_config.json";

/// Errors raised while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for [`ViewerConfig`].
    #[error("failed to parse config file {path}")]
    Json {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The initial tile id names no placeable tile.
    #[error("initial_tile {0} is not a placeable tile id")]
    InvalidInitialTile(TileTypeSize),
}

/// Window creation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial inner width in pixels.
    pub width: u32,
    /// Initial inner height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: String::from("Voxel Editor"),
        }
    }
}

/// Initial camera placement, speeds and projection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Pan offset applied after the tilt and facing rotations.
    pub pan: [f32; 3],
    /// Orthographic zoom; half-extents are `window size / zoom`.
    pub zoom: f32,
    /// Pan distance per second while a pan key is held.
    pub pan_speed: f32,
    /// Zoom change per second while a zoom key is held.
    pub zoom_speed: f32,
    /// Lower bound for the zoom.
    pub min_zoom: f32,
    /// Tilt about the horizontal screen axis, in degrees.
    pub tilt_degrees: f32,
    /// Vertical field of view of the perspective projection, in degrees.
    pub fov_degrees: f32,
    /// Initial cardinal facing.
    pub facing: Facing,
    /// Initial projection mode.
    pub projection: ProjectionMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pan: [0.0, 0.0, -50.0],
            zoom: 25.0,
            pan_speed: 9.0,
            zoom_speed: 9.0,
            min_zoom: 1.0,
            tilt_degrees: 35.0,
            fov_degrees: 40.0,
            facing: Facing::North,
            projection: ProjectionMode::Orthographic,
        }
    }
}

/// Everything the viewer reads at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window settings.
    pub window: WindowConfig,
    /// Map file to load.
    pub map_path: PathBuf,
    /// Directory holding the tile and panel textures.
    pub texture_dir: PathBuf,
    /// Directory holding the WGSL shaders.
    pub shader_dir: PathBuf,
    /// Tile id selected for placement before any number key is pressed.
    pub initial_tile: TileTypeSize,
    /// Camera settings.
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            map_path: PathBuf::from("assets/house_map"),
            texture_dir: PathBuf::from("assets/textures"),
            shader_dir: PathBuf::from("assets/shaders"),
            initial_tile: TileType::Wall.id(),
            camera: CameraConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ViewerConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.initial_tile()?;
        Ok(config)
    }

    /// Loads the configuration at `path`, falling back to defaults if the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_json(&text, path)?;
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads the configuration named by the first command line argument, or
    /// [`DEFAULT_CONFIG_PATH`] when there is none.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, ConfigError> {
        let path = args
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(path)
    }

    /// The tile selected for placement at startup.
    pub fn initial_tile(&self) -> Result<TileType, ConfigError> {
        TileType::from_id(self.initial_tile)
            .filter(|tile| !tile.is_empty())
            .ok_or(ConfigError::InvalidInitialTile(self.initial_tile))
    }
}
