//! Loading sheet configs and scene descriptions from disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spritesheets_spec::{SceneDescription, SheetConfig};

/// Command-line values that override the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target: Option<String>,
    pub camera_root: Option<String>,
    pub tile_size: Option<[u32; 2]>,
    pub frame_rate: Option<f64>,
    pub output_path: Option<PathBuf>,
    pub bin_path: Option<PathBuf>,
    pub only_render_marked_frames: bool,
}

impl ConfigOverrides {
    /// Applies every set override to `config`.
    pub fn apply(&self, mut config: SheetConfig) -> SheetConfig {
        if let Some(ref target) = self.target {
            config.target = target.clone();
        }
        if let Some(ref camera_root) = self.camera_root {
            config.camera_root = camera_root.clone();
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        if let Some(ref output_path) = self.output_path {
            config.output_path = output_path.clone();
        }
        if let Some(ref bin_path) = self.bin_path {
            config.bin_path = Some(bin_path.clone());
        }
        if self.only_render_marked_frames {
            config.only_render_marked_frames = true;
        }
        config
    }
}

/// Parses `WIDTHxHEIGHT` (e.g. `64x48`).
pub fn parse_tile_size(value: &str) -> std::result::Result<[u32; 2], String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid tile dimension '{}': {}", s, e))
    };
    Ok([parse(w)?, parse(h)?])
}

/// Loads a config file (if given), applies overrides, and validates the result.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<SheetConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            SheetConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => SheetConfig::default(),
    };

    let config = overrides.apply(config);
    config.validate()?;
    Ok(config)
}

/// Loads a scene description JSON file.
pub fn load_scene(path: &Path) -> Result<SceneDescription> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
    SceneDescription::from_json(&json)
        .with_context(|| format!("Failed to parse scene file: {}", path.display()))
}
