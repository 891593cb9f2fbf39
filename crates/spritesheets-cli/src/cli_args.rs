//! CLI argument definitions for the spritesheets command-line interface.

use clap::{Args, Parser, Subcommand};
use spritesheets_cli::input::{parse_tile_size, ConfigOverrides};
use std::path::PathBuf;

/// Spritesheets - render 8-direction sprite sheets from Blender actions
#[derive(Parser)]
#[command(name = "spritesheets")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Sheet config file and per-field overrides.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ConfigArgs {
    /// Path to the sheet config file (JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Object whose actions are rendered
    #[arg(long)]
    pub target: Option<String>,

    /// Object rotated to orbit the camera
    #[arg(long)]
    pub camera_root: Option<String>,

    /// Tile size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_tile_size)]
    pub tile_size: Option<[u32; 2]>,

    /// Playback rate written to the manifest
    #[arg(long)]
    pub frame_rate: Option<f64>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing the assembler executables
    #[arg(long)]
    pub bin_path: Option<PathBuf>,

    /// Render only pose-marker frames for actions that have markers
    #[arg(long)]
    pub only_marked_frames: bool,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target: self.target.clone(),
            camera_root: self.camera_root.clone(),
            tile_size: self.tile_size,
            frame_rate: self.frame_rate,
            output_path: self.output.clone(),
            bin_path: self.bin_path.clone(),
            only_render_marked_frames: self.only_marked_frames,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Export the actions of a .blend file as a scene description
    Inspect {
        /// Path to the .blend file
        #[arg(short, long)]
        blend: String,

        /// Subject object name (default: active object)
        #[arg(long)]
        target: Option<String>,

        /// Write the scene description to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Compute the manifest for a scene description without rendering
    Plan {
        #[command(flatten)]
        config: ConfigArgs,

        /// Path to the scene description (JSON)
        #[arg(short, long)]
        scene: String,

        /// Print the manifest in .bss form
        #[arg(long)]
        json: bool,
    },

    /// Render, assemble, and write the sprite sheet of a .blend file
    Render {
        #[command(flatten)]
        config: ConfigArgs,

        /// Path to the .blend file
        #[arg(short, long)]
        blend: String,

        /// Use this scene description instead of inspecting the .blend file
        #[arg(short, long)]
        scene: Option<String>,

        /// Explicit assembler executable
        #[arg(long)]
        assembler: Option<String>,

        /// Explicit Blender executable
        #[arg(long)]
        blender: Option<String>,

        /// Per-tile Blender timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a .bss manifest
    Validate {
        /// Path to the manifest
        #[arg(short, long)]
        manifest: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check that Blender and the assembler are available
    Doctor {
        /// Directory containing the assembler executables
        #[arg(long)]
        bin_path: Option<String>,
    },
}
