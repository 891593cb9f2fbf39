//! End-to-end sheet pipeline.
//!
//! Empty the tile directory, render every tile, serialize the manifest, run
//! the assembler, write the manifest, and remove the tile directory. The
//! manifest only reaches disk after the assembler succeeded, so a failed run
//! never leaves a `.bss` behind. The tile directory is removed on failure too.

use std::io::Write;
use std::path::{Path, PathBuf};

use spritesheets_spec::{
    render_animations, Action, Manifest, ProgressObserver, RunContext, SheetConfig, SheetError,
    TileRenderer,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::assembler::{Assembler, AssemblerError};

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Planning or rendering failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// The assembler could not be run or failed.
    #[error(transparent)]
    Assembler(#[from] AssemblerError),

    /// Filesystem error on the output directory.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The written manifest.
    pub manifest: Manifest,
    /// Where the manifest was written.
    pub manifest_path: PathBuf,
    /// Where the assembled sheet image was written.
    pub sheet_path: PathBuf,
    /// Number of tiles rendered.
    pub tile_count: usize,
    /// Set when the tile directory could not be removed.
    pub cleanup_warning: Option<String>,
}

/// Runs the full pipeline for `subject`.
#[tracing::instrument(skip_all, fields(subject = %subject))]
pub fn run<R: TileRenderer>(
    subject: &str,
    actions: &[Action],
    config: &SheetConfig,
    renderer: R,
    assembler: &Assembler,
    observer: &mut dyn ProgressObserver,
) -> Result<PipelineOutcome, PipelineError> {
    std::fs::create_dir_all(&config.output_path)
        .map_err(|e| PipelineError::io(&config.output_path, e))?;
    let root = config
        .output_path
        .canonicalize()
        .map_err(|e| PipelineError::io(&config.output_path, e))?;

    // Tiles left by an earlier failed run would be packed into this sheet.
    let tile_dir = config.tile_dir();
    reset_tile_dir(&tile_dir).map_err(|e| PipelineError::io(&tile_dir, e))?;

    let mut ctx = RunContext::new(observer);
    let outcome = match render_animations(subject, actions, config, renderer, &mut ctx) {
        Ok(outcome) => outcome,
        Err(e) => {
            remove_tile_dir(&tile_dir);
            return Err(e.into());
        }
    };

    let bss = match outcome.manifest.to_bss_string() {
        Ok(bss) => bss,
        Err(e) => {
            ctx.finish(false);
            remove_tile_dir(&tile_dir);
            return Err(e.into());
        }
    };

    let sheet_path = match assembler.assemble(&root, subject) {
        Ok(path) => path,
        Err(e) => {
            ctx.finish(false);
            remove_tile_dir(&tile_dir);
            return Err(e.into());
        }
    };

    let manifest_path = root.join(outcome.manifest.file_name());
    if let Err(e) = write_atomic(&root, &manifest_path, bss.as_bytes()) {
        ctx.finish(false);
        remove_tile_dir(&tile_dir);
        return Err(e);
    }
    ctx.finish(true);
    info!(manifest = %manifest_path.display(), tiles = outcome.tiles.len(), "sheet written");

    let cleanup_warning = remove_tile_dir(&tile_dir);

    Ok(PipelineOutcome {
        manifest: outcome.manifest,
        manifest_path,
        sheet_path,
        tile_count: outcome.tiles.len(),
        cleanup_warning,
    })
}

/// Empties `tile_dir`, creating it if needed.
fn reset_tile_dir(tile_dir: &Path) -> std::io::Result<()> {
    match std::fs::remove_dir_all(tile_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    std::fs::create_dir_all(tile_dir)
}

/// Removes `tile_dir`, returning a warning instead of failing.
fn remove_tile_dir(tile_dir: &Path) -> Option<String> {
    match std::fs::remove_dir_all(tile_dir) {
        Ok(()) => None,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            let message = format!("failed to remove {}: {}", tile_dir.display(), e);
            warn!("{}", message);
            Some(message)
        }
    }
}

/// Writes `contents` to `path` through a temp file in `dir`.
fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(path, e))?;
    file.write_all(contents)
        .and_then(|_| file.flush())
        .map_err(|e| PipelineError::io(path, e))?;
    file.persist(path)
        .map_err(|e| PipelineError::io(path, e.error))?;
    Ok(())
}
