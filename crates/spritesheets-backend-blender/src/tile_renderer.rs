//! Tile rendering through Blender.
//!
//! Each tile is one blocking Blender invocation: bind the action, rotate the
//! camera root to the requested angle, set the frame, and render a PNG into the
//! tile directory under its global tile index.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use spritesheets_spec::{SheetConfig, TileHandle, TileRenderer, TileRequest};
use tracing::debug;

use crate::error::{BlenderError, BlenderResult};
use crate::orchestrator::{BlenderSession, EntrypointMode, Orchestrator};

/// File name of the tile with the given global index (`000042.png`).
///
/// Zero padding keeps lexical and tile order identical for the assembler.
pub fn tile_file_name(tile_index: u32) -> String {
    format!("{:06}.png", tile_index)
}

/// Renders tiles for one subject of one `.blend` file.
#[derive(Debug)]
pub struct BlenderTileRenderer {
    session: BlenderSession,
    target: String,
    camera_root: String,
    tile_size: [u32; 2],
    tile_dir: PathBuf,
}

impl BlenderTileRenderer {
    /// Prepares a renderer writing into `config.tile_dir()`.
    pub fn new(orchestrator: &Orchestrator, blend_file: &Path, config: &SheetConfig) -> BlenderResult<Self> {
        let session = orchestrator.session(blend_file)?;
        let tile_dir = config.tile_dir();
        std::fs::create_dir_all(&tile_dir)?;

        Ok(Self {
            session,
            target: config.target.clone(),
            camera_root: config.camera_root.clone(),
            tile_size: config.tile_size,
            tile_dir,
        })
    }

    /// Directory tiles are written to.
    pub fn tile_dir(&self) -> &Path {
        &self.tile_dir
    }

    /// Path of the tile with the given global index.
    pub fn tile_path(&self, tile_index: u32) -> PathBuf {
        self.tile_dir.join(tile_file_name(tile_index))
    }

    fn tile_args(&self, request: &TileRequest<'_>, out: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        let mut push = |flag: &str, value: OsString| {
            args.push(OsString::from(flag));
            args.push(value);
        };
        push("--target", self.target.clone().into());
        push("--camera-root", self.camera_root.clone().into());
        push("--action", request.action.name.clone().into());
        push("--frame", request.frame.to_string().into());
        push("--angle", request.angle.to_string().into());
        push("--width", self.tile_size[0].to_string().into());
        push("--height", self.tile_size[1].to_string().into());
        push("--out", out.as_os_str().to_os_string());
        args
    }
}

impl TileRenderer for BlenderTileRenderer {
    type Error = BlenderError;

    fn render_tile(&mut self, request: &TileRequest<'_>) -> BlenderResult<TileHandle> {
        let path = self.tile_path(request.tile_index);
        let args = self.tile_args(request, &path);

        let report = self.session.run(EntrypointMode::RenderTile, &args)?;
        debug!(tile = request.tile_index, duration_ms = ?report.duration_ms, "tile rendered");

        if !path.exists() {
            return Err(BlenderError::TileNotFound { path });
        }
        Ok(TileHandle { path })
    }
}
