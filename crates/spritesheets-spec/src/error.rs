//! Error types for frame selection, accumulation, and manifest handling.

use thiserror::Error;

/// Result type for sprite sheet spec operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors that can occur while planning or accumulating a sprite sheet run.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Action frame range is inverted or not finite.
    #[error("invalid frame range for action '{action}': [{start}, {end}]")]
    InvalidFrameRange {
        action: String,
        start: f64,
        end: f64,
    },

    /// Two pose markers on one action share a frame.
    #[error("action '{action}' has more than one pose marker on frame {frame}")]
    DuplicateMarker { action: String, frame: i32 },

    /// A pose marker lies past the last frame of the action.
    #[error("pose marker on frame {frame} of action '{action}' is past the last frame {max}")]
    MarkerAfterEnd {
        action: String,
        frame: i32,
        max: i32,
    },

    /// Sheet configuration is unusable.
    #[error("invalid sheet configuration: {message}")]
    InvalidConfig { message: String },

    /// The rendering collaborator failed to produce a tile.
    #[error("failed to render tile {tile_index} (angle {angle}, action '{action}', frame {frame}): {source}")]
    Render {
        tile_index: u32,
        angle: u32,
        action: String,
        frame: i32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Failed to serialize the manifest.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to parse a manifest, scene, or config document.
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SheetError {
    /// Creates a new invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Stable error code for reports and machine output.
    pub fn code(&self) -> &'static str {
        match self {
            SheetError::InvalidFrameRange { .. } => "SHEET_001",
            SheetError::DuplicateMarker { .. } => "SHEET_002",
            SheetError::MarkerAfterEnd { .. } => "SHEET_003",
            SheetError::InvalidConfig { .. } => "SHEET_004",
            SheetError::Render { .. } => "SHEET_005",
            SheetError::Serialize(_) => "SHEET_006",
            SheetError::Parse { .. } => "SHEET_007",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SheetError::InvalidFrameRange {
            action: "walk".to_string(),
            start: 10.0,
            end: 2.0,
        };
        assert!(err.to_string().contains("invalid frame range"));
        assert!(err.to_string().contains("walk"));

        let err = SheetError::DuplicateMarker {
            action: "attack".to_string(),
            frame: 7,
        };
        assert!(err.to_string().contains("frame 7"));
    }

    #[test]
    fn test_render_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "gpu on fire");
        let err = SheetError::Render {
            tile_index: 3,
            angle: 90,
            action: "idle_loop".to_string(),
            frame: 2,
            source: Box::new(source),
        };
        assert_eq!(err.code(), "SHEET_005");
        assert!(err.to_string().contains("gpu on fire"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
