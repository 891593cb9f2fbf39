//! Report written by the Blender entrypoint.

use serde::{Deserialize, Serialize};
use spritesheets_spec::SceneDescription;

/// Outcome of one entrypoint invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlenderReport {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Error message if the operation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Scene description (inspect mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneDescription>,
    /// Path of the rendered tile (render_tile mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Blender version used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blender_version: Option<String>,
    /// Execution time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl BlenderReport {
    /// Creates a failed report.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            scene: None,
            output_path: None,
            blender_version: None,
            duration_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect_report() {
        let json = r#"{
            "ok": true,
            "blender_version": "4.1.0",
            "scene": {"subject": "Hero", "actions": [
                {"name": "walk_loop", "frame_range": [1.0, 24.0], "pose_markers": []}
            ]},
            "duration_ms": 120
        }"#;
        let report: BlenderReport = serde_json::from_str(json).unwrap();
        assert!(report.ok);
        let scene = report.scene.unwrap();
        assert_eq!(scene.actions[0].display_name(), "walk");
        assert_eq!(report.duration_ms, Some(120));
    }

    #[test]
    fn test_failure_round_trip() {
        let report = BlenderReport::failure("no such object");
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"ok":false,"error":"no such object"}"#);
    }
}
