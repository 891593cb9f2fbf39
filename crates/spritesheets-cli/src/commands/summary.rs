use colored::Colorize;
use spritesheets_spec::{Manifest, ManifestIssue};

/// Prints one line per animation of the first angle plus sheet totals.
pub(crate) fn print_manifest_summary(manifest: &Manifest) {
    println!(
        "{} {} ({}x{} @ {} fps)",
        "Sheet:".dimmed(),
        manifest.name,
        manifest.tile_width,
        manifest.tile_height,
        manifest.frame_rate
    );

    let mut previous_end = 0;
    for animation in &manifest.animations {
        let tiles = animation.end.saturating_sub(previous_end);
        previous_end = animation.end;
        if animation.angle != 0 {
            continue;
        }
        let looping = if animation.looping { " loop" } else { "" };
        println!(
            "  {} {} {} tiles, durations {:?}{}",
            "->".green(),
            animation.name,
            tiles,
            animation.frame_durations,
            looping.cyan()
        );
    }

    println!(
        "{} {} animations, {} tiles",
        "Total:".dimmed(),
        manifest.animations.len(),
        manifest.tile_count()
    );
}

pub(crate) fn print_issues(issues: &[ManifestIssue]) {
    for issue in issues {
        println!("  {} {}", "x".red(), issue);
    }
}
