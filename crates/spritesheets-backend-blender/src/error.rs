//! Error types for the Blender backend.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Blender backend operations.
pub type BlenderResult<T> = Result<T, BlenderError>;

/// Errors that can occur during Blender backend operations.
#[derive(Debug, Error)]
pub enum BlenderError {
    /// Blender executable not found.
    #[error("Blender executable not found. Ensure Blender is installed and in PATH, or set BLENDER_PATH environment variable")]
    BlenderNotFound,

    /// The configured Blender executable does not exist.
    #[error("Configured Blender executable not found: {path}")]
    ConfiguredBlenderMissing { path: PathBuf },

    /// Failed to spawn Blender process.
    #[error("Failed to spawn Blender process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Blender process timed out.
    #[error("Blender process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Blender process exited with non-zero status.
    #[error("Blender process exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// Failed to read report from Blender.
    #[error("Failed to read Blender report from {path}: {source}")]
    ReadReportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse report JSON from Blender.
    #[error("Failed to parse Blender report: {0}")]
    ParseReportFailed(#[source] serde_json::Error),

    /// The entrypoint reported an error.
    #[error("Blender {mode} failed: {message}")]
    EntrypointFailed { mode: &'static str, message: String },

    /// The inspect report did not contain a scene.
    #[error("Blender inspect report is missing the scene description")]
    MissingScene,

    /// Scene file does not exist.
    #[error("Blend file not found: {path}")]
    BlendFileNotFound { path: PathBuf },

    /// Tile image missing after a successful render.
    #[error("Expected tile not found after render: {path}")]
    TileNotFound { path: PathBuf },

    /// Python entrypoint script not found.
    #[error("Python entrypoint script not found at: {path}")]
    EntrypointNotFound { path: PathBuf },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlenderError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new entrypoint failed error.
    pub fn entrypoint_failed(mode: &'static str, message: impl Into<String>) -> Self {
        Self::EntrypointFailed {
            mode,
            message: message.into(),
        }
    }

    /// Stable error code for reports and machine output.
    pub fn code(&self) -> &'static str {
        match self {
            BlenderError::BlenderNotFound => "BLENDER_001",
            BlenderError::SpawnFailed(_) => "BLENDER_002",
            BlenderError::Timeout { .. } => "BLENDER_003",
            BlenderError::ProcessFailed { .. } => "BLENDER_004",
            BlenderError::ReadReportFailed { .. } => "BLENDER_005",
            BlenderError::ParseReportFailed(_) => "BLENDER_006",
            BlenderError::EntrypointFailed { .. } => "BLENDER_007",
            BlenderError::MissingScene => "BLENDER_008",
            BlenderError::BlendFileNotFound { .. } => "BLENDER_009",
            BlenderError::TileNotFound { .. } => "BLENDER_010",
            BlenderError::EntrypointNotFound { .. } => "BLENDER_011",
            BlenderError::Io(_) => "BLENDER_012",
            BlenderError::ConfiguredBlenderMissing { .. } => "BLENDER_013",
        }
    }
}
