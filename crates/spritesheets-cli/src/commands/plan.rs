//! Plan command implementation
//!
//! Computes the manifest a render would produce, without rendering.

use anyhow::{Context, Result};
use colored::Colorize;
use spritesheets_spec::plan_manifest;
use std::path::Path;
use std::process::ExitCode;

use super::summary::print_manifest_summary;
use crate::input::{load_config, load_scene, ConfigOverrides};

/// Run the plan command
///
/// # Arguments
/// * `config_path` - Optional sheet config file
/// * `scene_path` - Scene description JSON (see `inspect`)
/// * `overrides` - Command-line config overrides
/// * `json_output` - Print the manifest in `.bss` form
pub fn run(
    config_path: Option<&str>,
    scene_path: &str,
    overrides: &ConfigOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let scene = load_scene(Path::new(scene_path))?;
    let mut overrides = overrides.clone();
    if overrides.target.is_none() && config_path.is_none() {
        overrides.target = Some(scene.subject.clone());
    }
    let config = load_config(config_path.map(Path::new), &overrides)?;

    let manifest = plan_manifest(&config.target, &scene.actions, &config)
        .with_context(|| format!("Failed to plan sheet for {}", scene_path))?;

    if json_output {
        println!("{}", manifest.to_bss_string()?);
    } else {
        println!("{} {}", "Planning:".cyan().bold(), scene_path);
        print_manifest_summary(&manifest);
    }

    Ok(ExitCode::SUCCESS)
}
