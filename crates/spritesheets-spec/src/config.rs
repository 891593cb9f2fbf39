//! Per-project sheet configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: [u32; 2] = [64, 64];

/// Default playback rate.
pub const DEFAULT_FRAME_RATE: f64 = 24.0;

/// Default name of the object the camera rig rotates around.
pub const DEFAULT_CAMERA_ROOT: &str = "CameraRoot";

/// Name of the tile scratch directory inside the output directory.
pub const TILE_DIR_NAME: &str = "temp";

/// Everything a render run needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Object whose actions are rendered.
    pub target: String,
    /// Object rotated around Z to orbit the camera.
    pub camera_root: String,
    /// Tile `[width, height]` in pixels.
    pub tile_size: [u32; 2],
    /// Playback rate written to the manifest.
    pub frame_rate: f64,
    /// Directory receiving tiles, the sheet image, and the manifest.
    pub output_path: PathBuf,
    /// Directory holding the assembler executables.
    pub bin_path: Option<PathBuf>,
    /// Render only pose-marker frames for actions that have markers.
    pub only_render_marked_frames: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            camera_root: DEFAULT_CAMERA_ROOT.to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            frame_rate: DEFAULT_FRAME_RATE,
            output_path: PathBuf::from("sprites"),
            bin_path: None,
            only_render_marked_frames: false,
        }
    }
}

impl SheetConfig {
    /// Creates a config for the given target with defaults elsewhere.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Sets the tile size.
    pub fn tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile_size = [width, height];
        self
    }

    /// Sets the frame rate.
    pub fn frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Sets the output directory.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Sets the assembler directory.
    pub fn bin_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bin_path = Some(path.into());
        self
    }

    /// Enables or disables marker-only rendering.
    pub fn only_render_marked_frames(mut self, enabled: bool) -> Self {
        self.only_render_marked_frames = enabled;
        self
    }

    /// Directory rendered tiles are written to.
    pub fn tile_dir(&self) -> PathBuf {
        self.output_path.join(TILE_DIR_NAME)
    }

    /// Parses a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> SheetResult<Self> {
        serde_json::from_str(json).map_err(|source| SheetError::Parse {
            what: "sheet config",
            source,
        })
    }

    /// Rejects configurations a run cannot succeed with.
    pub fn validate(&self) -> SheetResult<()> {
        if self.target.trim().is_empty() {
            return Err(SheetError::invalid_config("target must not be empty"));
        }
        if self.camera_root.trim().is_empty() {
            return Err(SheetError::invalid_config("camera_root must not be empty"));
        }
        if self.tile_size[0] == 0 || self.tile_size[1] == 0 {
            return Err(SheetError::invalid_config(format!(
                "tile_size {}x{} must be non-zero",
                self.tile_size[0], self.tile_size[1]
            )));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(SheetError::invalid_config(format!(
                "frame_rate {} must be a positive number",
                self.frame_rate
            )));
        }
        Ok(())
    }
}
