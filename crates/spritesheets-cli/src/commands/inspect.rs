//! Inspect command implementation
//!
//! Exports a `.blend` file's actions as a scene description.

use anyhow::{Context, Result};
use colored::Colorize;
use spritesheets_backend_blender::Orchestrator;
use spritesheets_spec::{select_frames, SceneDescription};
use std::path::Path;
use std::process::ExitCode;

/// Run the inspect command
///
/// # Arguments
/// * `blend_path` - Scene file to inspect
/// * `target` - Subject object name (defaults to the active object)
/// * `output` - Where to write the scene JSON (stdout when `None`)
/// * `json_output` - Print JSON instead of a colored summary
pub fn run(
    blend_path: &str,
    target: Option<&str>,
    output: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let orchestrator = Orchestrator::new();
    let scene = orchestrator
        .inspect(Path::new(blend_path), target)
        .with_context(|| format!("Failed to inspect {}", blend_path))?;

    let json = scene.to_json_pretty()?;
    if let Some(output) = output {
        std::fs::write(output, &json)
            .with_context(|| format!("Failed to write scene file: {}", output))?;
    }

    if json_output {
        if output.is_none() {
            println!("{}", json);
        }
    } else {
        print_scene(&scene);
        if let Some(output) = output {
            println!("{} {}", "Wrote:".dimmed(), output);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_scene(scene: &SceneDescription) {
    println!("{} {}", "Subject:".cyan().bold(), scene.subject);
    for action in &scene.actions {
        let range = format!("[{}, {}]", action.frame_range[0], action.frame_range[1]);
        let frames = select_frames(action, false)
            .map(|s| format!("{} frames", s.len()))
            .unwrap_or_else(|e| e.to_string().red().to_string());
        println!(
            "  {} {} {} {} {} markers",
            "->".green(),
            action.name,
            range.dimmed(),
            frames,
            action.pose_markers.len()
        );
    }
}
