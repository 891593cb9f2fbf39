//! Render command implementation
//!
//! Renders every tile of a `.blend` file's sheet, assembles the image, and
//! writes the `.bss` manifest.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use spritesheets_backend_blender::{BlenderTileRenderer, Orchestrator, OrchestratorConfig};
use spritesheets_spec::{ProgressObserver, RunProgress};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use super::summary::print_manifest_summary;
use crate::assembler::{Assembler, AssemblerPlatform};
use crate::input::{load_config, load_scene, ConfigOverrides};
use crate::pipeline::{self, PipelineOutcome};

/// Options of the render command besides config overrides.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Scene description to use instead of inspecting the blend file.
    pub scene: Option<String>,
    /// Explicit assembler executable.
    pub assembler: Option<String>,
    /// Explicit Blender executable.
    pub blender: Option<String>,
    /// Per-tile Blender timeout in seconds.
    pub timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    success: bool,
    manifest_path: Option<String>,
    sheet_path: Option<String>,
    tile_count: usize,
    warnings: Vec<String>,
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<&'a spritesheets_spec::Manifest>,
}

impl RenderOutput<'_> {
    fn failure(error: &anyhow::Error) -> Self {
        Self {
            success: false,
            manifest_path: None,
            sheet_path: None,
            tile_count: 0,
            warnings: Vec::new(),
            error: Some(format!("{:#}", error)),
            manifest: None,
        }
    }
}

/// Prints one line per (angle, action) as rendering advances.
struct ConsoleProgress {
    current: Option<(u32, usize)>,
}

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&mut self, progress: &RunProgress) {
        if !progress.rendering {
            return;
        }
        let key = (progress.angle, progress.action_index);
        if progress.tile_total > 0 && self.current != Some(key) {
            self.current = Some(key);
            println!(
                "  {} {:>3}° {} ({}/{}) {} tiles [{}/{}]",
                "->".green(),
                progress.angle,
                progress.action_name,
                progress.action_index + 1,
                progress.action_total,
                progress.tile_total,
                progress.tiles_rendered,
                progress.tiles_expected
            );
        }
    }
}

/// Loads inputs, locates the tools, and runs the pipeline.
fn render(
    config_path: Option<&str>,
    blend_path: &str,
    overrides: &ConfigOverrides,
    options: &RenderOptions,
    json_output: bool,
) -> Result<PipelineOutcome> {
    let config = load_config(config_path.map(Path::new), overrides)?;

    let mut orchestrator_config = OrchestratorConfig::default();
    if let Some(ref blender) = options.blender {
        orchestrator_config = orchestrator_config.blender_path(blender);
    }
    if let Some(secs) = options.timeout_secs {
        orchestrator_config = orchestrator_config.timeout(Duration::from_secs(secs));
    }
    let orchestrator = Orchestrator::with_config(orchestrator_config);

    let assembler = match options.assembler {
        Some(ref path) => Assembler::new(path),
        None => Assembler::locate(config.bin_path.as_deref(), AssemblerPlatform::current())?,
    };

    let blend = Path::new(blend_path);
    let actions = match options.scene {
        Some(ref scene) => load_scene(Path::new(scene))?.actions,
        None => {
            orchestrator
                .inspect(blend, Some(&config.target))
                .with_context(|| format!("Failed to inspect {}", blend_path))?
                .actions
        }
    };

    if !json_output {
        println!("{} {} ({})", "Rendering:".cyan().bold(), config.target, blend_path);
        println!("{} {}", "Assembler:".dimmed(), assembler.path().display());
    }

    let renderer = BlenderTileRenderer::new(&orchestrator, blend, &config)?;
    let mut console = ConsoleProgress { current: None };
    let mut quiet = spritesheets_spec::NoProgress;
    let observer: &mut dyn ProgressObserver = if json_output { &mut quiet } else { &mut console };

    let outcome = pipeline::run(&config.target, &actions, &config, renderer, &assembler, observer)?;
    Ok(outcome)
}

/// Run the render command
///
/// # Arguments
/// * `config_path` - Optional sheet config file
/// * `blend_path` - Scene file to render
/// * `overrides` - Command-line config overrides
/// * `options` - Scene/assembler/Blender options
/// * `json_output` - Print a machine-readable result
///
/// # Returns
/// Exit code: 0 on success, 1 on failure
pub fn run(
    config_path: Option<&str>,
    blend_path: &str,
    overrides: &ConfigOverrides,
    options: &RenderOptions,
    json_output: bool,
) -> Result<ExitCode> {
    let start = Instant::now();
    let result = render(config_path, blend_path, overrides, options, json_output);
    let duration_ms = start.elapsed().as_millis();

    match result {
        Ok(outcome) => {
            let warnings: Vec<String> = outcome.cleanup_warning.iter().cloned().collect();
            if json_output {
                let output = RenderOutput {
                    success: true,
                    manifest_path: Some(outcome.manifest_path.display().to_string()),
                    sheet_path: Some(outcome.sheet_path.display().to_string()),
                    tile_count: outcome.tile_count,
                    warnings,
                    error: None,
                    manifest: Some(&outcome.manifest),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_manifest_summary(&outcome.manifest);
                for warning in &warnings {
                    println!("  {} {}", "!".yellow(), warning);
                }
                println!("{} {}", "Sheet:".dimmed(), outcome.sheet_path.display());
                println!("{} {}", "Manifest:".dimmed(), outcome.manifest_path.display());
                println!(
                    "\n{} Rendered {} tiles ({}ms)",
                    "SUCCESS".green().bold(),
                    outcome.tile_count,
                    duration_ms
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&RenderOutput::failure(&e))?);
            } else {
                println!("\n{} {:#}", "FAILED".red().bold(), e);
            }
            Ok(ExitCode::from(1))
        }
    }
}
