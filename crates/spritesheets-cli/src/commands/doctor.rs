//! Doctor command implementation
//!
//! Checks that Blender and the sheet assembler can be found.

use anyhow::Result;
use colored::Colorize;
use spritesheets_backend_blender::{blender_version, Orchestrator};
use std::path::Path;
use std::process::ExitCode;

use crate::assembler::{Assembler, AssemblerPlatform};

/// Run the doctor command
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(bin_path: Option<&str>) -> Result<ExitCode> {
    println!("{}", "Spritesheets Doctor".cyan().bold());
    println!("{}", "===================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} spritesheets-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    match Orchestrator::new().find_blender() {
        Ok(path) => match blender_version(&path) {
            Ok(version) => {
                println!("  {} Blender {} ({})", "ok".green(), version, path.display());
            }
            Err(e) => {
                println!("  {} Blender check failed: {}", "!!".red(), e);
                all_ok = false;
            }
        },
        Err(e) => {
            println!("  {} {}", "!!".red(), e);
            println!(
                "     {}",
                "Install from https://www.blender.org/download/".dimmed()
            );
            all_ok = false;
        }
    }

    let platform = AssemblerPlatform::current();
    match Assembler::locate(bin_path.map(Path::new), platform) {
        Ok(assembler) => {
            println!(
                "  {} {} ({})",
                "ok".green(),
                platform.executable_name(),
                assembler.path().display()
            );
        }
        Err(e) => {
            println!("  {} {}", "!!".red(), e);
            println!(
                "     {}",
                "Pass --bin-path or set bin_path in the sheet config.".dimmed()
            );
            all_ok = false;
        }
    }

    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}
