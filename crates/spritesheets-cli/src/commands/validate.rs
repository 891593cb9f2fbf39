//! Validate command implementation
//!
//! Parses a `.bss` manifest and checks its invariants.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use spritesheets_spec::Manifest;
use std::process::ExitCode;

use super::summary::{print_issues, print_manifest_summary};

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
    animations: usize,
    tile_count: u32,
    issues: Vec<String>,
}

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(manifest_path: &str, json_output: bool) -> Result<ExitCode> {
    let json = std::fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read manifest: {}", manifest_path))?;
    let manifest = Manifest::from_json(&json)
        .with_context(|| format!("Failed to parse manifest: {}", manifest_path))?;
    let issues = manifest.validate();

    if json_output {
        let output = ValidateOutput {
            valid: issues.is_empty(),
            animations: manifest.animations.len(),
            tile_count: manifest.tile_count(),
            issues: issues.iter().map(|i| i.to_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Validating:".cyan().bold(), manifest_path);
        print_manifest_summary(&manifest);
        if issues.is_empty() {
            println!("\n{} Manifest is valid", "SUCCESS".green().bold());
        } else {
            print_issues(&issues);
            println!(
                "\n{} {} issue(s) found",
                "FAILED".red().bold(),
                issues.len()
            );
        }
    }

    if issues.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
