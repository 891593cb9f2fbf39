//! The `.bss` sprite sheet manifest.
//!
//! The manifest is a tab-indented JSON document read by the sheet assembler
//! and by game runtimes. Field names are part of the file contract:
//!
//! ```text
//! {
//! 	"name": "Hero",
//! 	"tileWidth": 64,
//! 	"tileHeight": 64,
//! 	"frameRate": 12,
//! 	"animations": [
//! 		{
//! 			"angle": 0,
//! 			"name": "idle",
//! 			"end": 4,
//! 			"frame_durations": [1],
//! 			"loop": true
//! 		}
//! 	]
//! }
//! ```

use serde::{Deserialize, Serialize, Serializer};

use crate::angle::is_sheet_angle;
use crate::error::{SheetError, SheetResult};

/// File extension of manifest files.
pub const MANIFEST_EXTENSION: &str = "bss";

/// One animation (action at one camera angle) in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    /// Camera angle in degrees.
    pub angle: u32,
    /// Action name without the loop suffix.
    pub name: String,
    /// Global tile count after this animation's tiles.
    pub end: u32,
    /// `[1]` for uniform timing, otherwise one duration per tile.
    pub frame_durations: Vec<u32>,
    /// Whether the animation repeats.
    #[serde(rename = "loop")]
    pub looping: bool,
}

/// Sheet-level metadata plus every animation descriptor, in render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Subject name.
    pub name: String,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Playback rate in frames per second.
    #[serde(serialize_with = "serialize_frame_rate")]
    pub frame_rate: f64,
    /// Animations in render order.
    pub animations: Vec<AnimationDescriptor>,
}

/// Whole rates are written as integers to keep `12` rather than `12.0`.
fn serialize_frame_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if rate.is_finite() && rate.fract() == 0.0 && rate.abs() <= i64::MAX as f64 {
        serializer.serialize_i64(*rate as i64)
    } else {
        serializer.serialize_f64(*rate)
    }
}

/// A problem found by [`Manifest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestIssue {
    /// Index into `animations`, if the issue concerns one descriptor.
    pub animation: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl ManifestIssue {
    fn sheet(message: impl Into<String>) -> Self {
        Self {
            animation: None,
            message: message.into(),
        }
    }

    fn at(index: usize, message: impl Into<String>) -> Self {
        Self {
            animation: Some(index),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.animation {
            Some(index) => write!(f, "animations[{}]: {}", index, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new(name: impl Into<String>, tile_size: [u32; 2], frame_rate: f64) -> Self {
        Self {
            name: name.into(),
            tile_width: tile_size[0],
            tile_height: tile_size[1],
            frame_rate,
            animations: Vec::new(),
        }
    }

    /// Total number of tiles referenced by the manifest.
    pub fn tile_count(&self) -> u32 {
        self.animations.last().map(|a| a.end).unwrap_or(0)
    }

    /// File name of the manifest for this subject (`<name>.bss`).
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, MANIFEST_EXTENSION)
    }

    /// Serializes the manifest as tab-indented JSON.
    pub fn to_bss_string(&self) -> SheetResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(SheetError::Serialize)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parses a manifest from JSON.
    pub fn from_json(json: &str) -> SheetResult<Self> {
        serde_json::from_str(json).map_err(|source| SheetError::Parse {
            what: "manifest",
            source,
        })
    }

    /// Checks the structural invariants of the manifest.
    ///
    /// Returns every issue found; an empty list means the manifest is valid.
    pub fn validate(&self) -> Vec<ManifestIssue> {
        let mut issues = Vec::new();

        if self.name.is_empty() {
            issues.push(ManifestIssue::sheet("name is empty"));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            issues.push(ManifestIssue::sheet(format!(
                "tile size {}x{} has a zero dimension",
                self.tile_width, self.tile_height
            )));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            issues.push(ManifestIssue::sheet(format!(
                "frameRate {} is not a positive number",
                self.frame_rate
            )));
        }

        let mut previous_end = 0;
        for (index, animation) in self.animations.iter().enumerate() {
            if !is_sheet_angle(animation.angle) {
                issues.push(ManifestIssue::at(
                    index,
                    format!("angle {} is not a multiple of 45 in [0, 315]", animation.angle),
                ));
            }
            if animation.end < previous_end {
                issues.push(ManifestIssue::at(
                    index,
                    format!("end {} is below previous end {}", animation.end, previous_end),
                ));
            }
            if animation.frame_durations.is_empty() {
                issues.push(ManifestIssue::at(index, "frame_durations is empty"));
            } else if animation.frame_durations.contains(&0) {
                issues.push(ManifestIssue::at(index, "frame_durations contains 0"));
            }

            let tiles = animation.end.saturating_sub(previous_end) as usize;
            let durations = animation.frame_durations.len();
            if durations > 1 && durations != tiles {
                issues.push(ManifestIssue::at(
                    index,
                    format!("{} frame_durations for {} tiles", durations, tiles),
                ));
            }

            previous_end = previous_end.max(animation.end);
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn descriptor(angle: u32, name: &str, end: u32, durations: &[u32], looping: bool) -> AnimationDescriptor {
        AnimationDescriptor {
            angle,
            name: name.to_string(),
            end,
            frame_durations: durations.to_vec(),
            looping,
        }
    }

    fn hero() -> Manifest {
        let mut manifest = Manifest::new("Hero", [64, 64], 12.0);
        manifest.animations.push(descriptor(0, "idle", 4, &[1], true));
        manifest
    }

    #[test]
    fn test_bss_format_is_tab_indented() {
        let expected = "{\n\t\"name\": \"Hero\",\n\t\"tileWidth\": 64,\n\t\"tileHeight\": 64,\n\t\"frameRate\": 12,\n\t\"animations\": [\n\t\t{\n\t\t\t\"angle\": 0,\n\t\t\t\"name\": \"idle\",\n\t\t\t\"end\": 4,\n\t\t\t\"frame_durations\": [\n\t\t\t\t1\n\t\t\t],\n\t\t\t\"loop\": true\n\t\t}\n\t]\n}";
        assert_eq!(hero().to_bss_string().unwrap(), expected);
    }

    #[test]
    fn test_fractional_frame_rate_round_trip() {
        let mut manifest = hero();
        manifest.frame_rate = 29.97;
        let json = manifest.to_bss_string().unwrap();
        assert!(json.contains("\"frameRate\": 29.97"));
        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let mut manifest = Manifest::new("Knight", [32, 48], 24.0);
        manifest.animations = vec![
            descriptor(0, "walk", 9, &[1], true),
            descriptor(0, "attack", 11, &[5, 3], false),
            descriptor(45, "walk", 20, &[1], true),
            descriptor(45, "attack", 22, &[5, 3], false),
        ];
        let parsed = Manifest::from_json(&manifest.to_bss_string().unwrap()).unwrap();
        assert_eq!(parsed, manifest);
        assert_eq!(parsed.tile_count(), 22);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(hero().file_name(), "Hero.bss");
    }

    #[test]
    fn test_validate_accepts_valid_manifest() {
        assert!(hero().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_issues() {
        let mut manifest = Manifest::new("", [0, 64], 0.0);
        manifest.animations = vec![
            descriptor(30, "walk", 5, &[1], false),
            descriptor(0, "run", 3, &[], false),
            descriptor(0, "hit", 9, &[2, 0], false),
            descriptor(0, "cast", 12, &[1, 1], false),
        ];
        let issues = manifest.validate();
        let messages: Vec<String> = issues.iter().map(|i| i.to_string()).collect();

        assert!(messages.iter().any(|m| m == "name is empty"));
        assert!(messages.iter().any(|m| m.contains("zero dimension")));
        assert!(messages.iter().any(|m| m.contains("frameRate")));
        assert!(messages.iter().any(|m| m.starts_with("animations[0]: angle 30")));
        assert!(messages.iter().any(|m| m.starts_with("animations[1]: end 3")));
        assert!(messages.iter().any(|m| m == "animations[1]: frame_durations is empty"));
        assert!(messages.iter().any(|m| m == "animations[2]: frame_durations contains 0"));
        assert!(messages.iter().any(|m| m == "animations[3]: 2 frame_durations for 3 tiles"));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let err = Manifest::from_json(r#"{"name": "Hero"}"#).unwrap_err();
        assert!(err.to_string().contains("manifest"));
    }
}
