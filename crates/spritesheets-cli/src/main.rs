//! Spritesheets CLI - Command-line interface for sprite sheet rendering
//!
//! This binary renders every action of a Blender scene from eight camera
//! angles, packs the tiles with the external assembler, and writes the
//! `.bss` manifest describing the sheet.

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use spritesheets_cli::commands;
use spritesheets_cli::commands::render::RenderOptions;

mod cli_args;

use cli_args::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inspect {
            blend,
            target,
            output,
            json,
        } => commands::inspect::run(&blend, target.as_deref(), output.as_deref(), json),
        Commands::Plan {
            config,
            scene,
            json,
        } => commands::plan::run(config.config.as_deref(), &scene, &config.overrides(), json),
        Commands::Render {
            config,
            blend,
            scene,
            assembler,
            blender,
            timeout,
            json,
        } => {
            let options = RenderOptions {
                scene,
                assembler,
                blender,
                timeout_secs: timeout,
            };
            commands::render::run(
                config.config.as_deref(),
                &blend,
                &config.overrides(),
                &options,
                json,
            )
        }
        Commands::Validate { manifest, json } => commands::validate::run(&manifest, json),
        Commands::Doctor { bin_path } => commands::doctor::run(bin_path.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(1)
        }
    }
}
