//! Sprite sheet planning library.
//!
//! This crate turns a scene's animation actions into the list of tiles to
//! render and the `.bss` manifest that describes how the assembled sheet is
//! played back.
//!
//! # Overview
//!
//! - Every action is rendered from 8 camera angles (0°, 45°, ..., 315°).
//! - Per action, [`select_frames`] picks either every frame of the range
//!   (uniform timing, `frame_durations: [1]`) or one frame per pose marker
//!   with a per-frame duration.
//! - [`render_animations`] walks angles and actions in a fixed order, asks a
//!   [`TileRenderer`] for each tile, and accumulates one
//!   [`AnimationDescriptor`] per (angle, action) with a running tile count.
//!
//! # Example
//!
//! ```
//! use spritesheets_spec::{plan_manifest, Action, SheetConfig};
//!
//! let actions = vec![Action::new("idle_loop", 1.0, 4.0)];
//! let config = SheetConfig::new("Hero").tile_size(64, 64).frame_rate(12.0);
//!
//! let manifest = plan_manifest("Hero", &actions, &config).unwrap();
//! assert_eq!(manifest.animations.len(), 8);
//! assert_eq!(manifest.tile_count(), 32);
//! assert!(manifest.to_bss_string().unwrap().starts_with("{\n\t\"name\": \"Hero\""));
//! ```
//!
//! # Modules
//!
//! - [`action`]: Actions, pose markers, and the loop suffix convention
//! - [`angle`]: The fixed camera angles
//! - [`selection`]: Frame selection for one action
//! - [`accumulator`]: Angle x action iteration and descriptor accumulation
//! - [`manifest`]: The `.bss` manifest format
//! - [`config`]: Sheet configuration
//! - [`progress`]: Progress snapshots for observers
//! - [`error`]: Error types

pub mod accumulator;
pub mod action;
pub mod angle;
pub mod config;
pub mod error;
pub mod manifest;
pub mod progress;
pub mod selection;

pub use accumulator::{
    plan_animations, plan_manifest, render_animations, AnimationAccumulator, AnimationPlan,
    RenderOutcome, TileHandle, TileRenderer, TileRequest,
};
pub use action::{split_loop_suffix, Action, FrameBounds, PoseMarker, SceneDescription, LOOP_SUFFIX};
pub use angle::{angles, ANGLE_COUNT, ANGLE_STEP_DEGREES};
pub use config::{SheetConfig, TILE_DIR_NAME};
pub use error::{SheetError, SheetResult};
pub use manifest::{AnimationDescriptor, Manifest, ManifestIssue, MANIFEST_EXTENSION};
pub use progress::{NoProgress, ProgressObserver, RunContext, RunProgress};
pub use selection::{select_frames, FrameSelection, SelectionMode};
