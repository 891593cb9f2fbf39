//! Animation actions as exported from a 3D scene.

use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

/// Name suffix that marks an action as a looping animation.
pub const LOOP_SUFFIX: &str = "_loop";

/// A named keyframe position on an action's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseMarker {
    /// Marker label (unused by frame selection).
    #[serde(default)]
    pub name: String,
    /// Timeline frame the marker sits on.
    pub frame: i32,
}

impl PoseMarker {
    /// Creates a new pose marker.
    pub fn new(name: impl Into<String>, frame: i32) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }
}

/// An animation clip with a frame range and optional pose markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action name, possibly carrying the `_loop` suffix.
    pub name: String,
    /// Frame range `[start, end]` as reported by the scene.
    pub frame_range: [f64; 2],
    /// Pose markers in scene order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pose_markers: Vec<PoseMarker>,
}

/// Integer frame bounds derived from an action's floating point range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    /// `floor(range.start)`.
    pub min: i32,
    /// `ceil(range.end)`.
    pub max: i32,
}

impl FrameBounds {
    /// Number of frame steps covered by the range (`max - min`).
    pub fn span(&self) -> u32 {
        (self.max - self.min) as u32
    }
}

impl Action {
    /// Creates an action without pose markers.
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            name: name.into(),
            frame_range: [start, end],
            pose_markers: Vec::new(),
        }
    }

    /// Adds a pose marker.
    pub fn marker(mut self, name: impl Into<String>, frame: i32) -> Self {
        self.pose_markers.push(PoseMarker::new(name, frame));
        self
    }

    /// Returns the floor/ceil integer bounds of the frame range.
    ///
    /// Non-finite bounds and inverted ranges are rejected.
    pub fn frame_bounds(&self) -> SheetResult<FrameBounds> {
        let [start, end] = self.frame_range;
        let invalid = || SheetError::InvalidFrameRange {
            action: self.name.clone(),
            start,
            end,
        };

        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(invalid());
        }

        let min = start.floor();
        let max = end.ceil();
        if min < i32::MIN as f64 || max > i32::MAX as f64 {
            return Err(invalid());
        }

        Ok(FrameBounds {
            min: min as i32,
            max: max as i32,
        })
    }

    /// Returns true if the action name carries the loop suffix.
    pub fn is_loop(&self) -> bool {
        split_loop_suffix(&self.name).1
    }

    /// Returns the action name with any loop suffix stripped.
    pub fn display_name(&self) -> &str {
        split_loop_suffix(&self.name).0
    }
}

/// Splits the `_loop` suffix off an action name.
///
/// Matching is exact and case-sensitive; only one trailing suffix is removed.
pub fn split_loop_suffix(name: &str) -> (&str, bool) {
    match name.strip_suffix(LOOP_SUFFIX) {
        Some(base) => (base, true),
        None => (name, false),
    }
}

/// The subject and action enumeration of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Name of the rendered subject, used for output file names.
    pub subject: String,
    /// Actions in enumeration order.
    pub actions: Vec<Action>,
}

impl SceneDescription {
    /// Parses a scene description from JSON.
    pub fn from_json(json: &str) -> SheetResult<Self> {
        serde_json::from_str(json).map_err(|source| SheetError::Parse {
            what: "scene description",
            source,
        })
    }

    /// Serializes the scene description as pretty JSON.
    pub fn to_json_pretty(&self) -> SheetResult<String> {
        serde_json::to_string_pretty(self).map_err(SheetError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_loop_suffix() {
        assert_eq!(split_loop_suffix("walk_loop"), ("walk", true));
        assert_eq!(split_loop_suffix("walk"), ("walk", false));
        assert_eq!(split_loop_suffix("walk_Loop"), ("walk_Loop", false));
        assert_eq!(split_loop_suffix("walk_loops"), ("walk_loops", false));
        assert_eq!(split_loop_suffix("loop"), ("loop", false));
        assert_eq!(split_loop_suffix("_loop"), ("", true));
    }

    #[test]
    fn test_split_loop_suffix_strips_once() {
        assert_eq!(split_loop_suffix("spin_loop_loop"), ("spin_loop", true));
        let (base, _) = split_loop_suffix("walk_loop");
        assert_eq!(split_loop_suffix(base), ("walk", false));
    }

    #[test]
    fn test_frame_bounds_floor_and_ceil() {
        let action = Action::new("jump", 1.25, 9.5);
        let bounds = action.frame_bounds().unwrap();
        assert_eq!(bounds, FrameBounds { min: 1, max: 10 });
        assert_eq!(bounds.span(), 9);
    }

    #[test]
    fn test_frame_bounds_rejects_bad_ranges() {
        assert!(Action::new("a", 5.0, 1.0).frame_bounds().is_err());
        assert!(Action::new("a", f64::NAN, 1.0).frame_bounds().is_err());
        assert!(Action::new("a", 0.0, f64::INFINITY).frame_bounds().is_err());
        assert!(Action::new("a", 3.0, 3.0).frame_bounds().is_ok());
    }

    #[test]
    fn test_scene_description_json() {
        let json = r#"{
            "subject": "Hero",
            "actions": [
                {"name": "idle_loop", "frame_range": [1.0, 4.0]},
                {"name": "attack", "frame_range": [0.0, 10.0],
                 "pose_markers": [{"name": "wind", "frame": 2}, {"frame": 7}]}
            ]
        }"#;
        let scene = SceneDescription::from_json(json).unwrap();
        assert_eq!(scene.subject, "Hero");
        assert_eq!(scene.actions.len(), 2);
        assert_eq!(scene.actions[0].display_name(), "idle");
        assert!(scene.actions[0].is_loop());
        assert_eq!(scene.actions[1].pose_markers[1], PoseMarker::new("", 7));
    }

    #[test]
    fn test_scene_description_parse_error() {
        let err = SceneDescription::from_json("{").unwrap_err();
        assert_eq!(err.code(), "SHEET_007");
    }
}
