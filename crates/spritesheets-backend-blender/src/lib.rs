//! Spritesheets Blender Backend
//!
//! Renders sprite sheet tiles with Blender running as a subprocess.
//!
//! # Architecture
//!
//! 1. **Rust Orchestrator** - Locates Blender, spawns it against a `.blend`
//!    file, and collects results
//! 2. **Python Entrypoint** - Runs inside Blender to inspect the scene or
//!    render one tile
//!
//! The entrypoint writes a JSON report that the orchestrator reads back.
//!
//! # Example
//!
//! ```ignore
//! use spritesheets_backend_blender::{BlenderTileRenderer, Orchestrator};
//! use spritesheets_spec::{render_animations, NoProgress, RunContext, SheetConfig};
//! use std::path::Path;
//!
//! let orchestrator = Orchestrator::new();
//! let scene = orchestrator.inspect(Path::new("hero.blend"), Some("Hero"))?;
//! let config = SheetConfig::new("Hero").output_path("sprites");
//! let renderer = BlenderTileRenderer::new(&orchestrator, Path::new("hero.blend"), &config)?;
//!
//! let mut observer = NoProgress;
//! let mut ctx = RunContext::new(&mut observer);
//! let outcome = render_animations(&scene.subject, &scene.actions, &config, renderer, &mut ctx)?;
//! ```
//!
//! # Blender Requirements
//!
//! The orchestrator searches for Blender in:
//!
//! 1. The configured path
//! 2. `BLENDER_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations (platform-specific)

pub mod error;
pub mod orchestrator;
pub mod report;
pub mod tile_renderer;

pub use error::{BlenderError, BlenderResult};
pub use orchestrator::{
    blender_version, BlenderSession, EntrypointMode, Orchestrator, OrchestratorConfig,
    DEFAULT_TIMEOUT_SECS,
};
pub use report::BlenderReport;
pub use tile_renderer::{tile_file_name, BlenderTileRenderer};
