use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::Level;

use badge_check::{
    BadgeConfig, BadgeValidator, ColorProfile, FileReport, DEFAULT_BADGE_PATH,
    DEFAULT_BADGE_SIZE, DEFAULT_EFFICIENCY, DEFAULT_MIN_SCORE,
};

#[derive(Parser)]
#[command(
    name = "badge-check",
    about = "Validate circular badge images: size, transparency outside the circle, and happy colors",
    version,
    after_help = "Simple usage: badge-check <badge.png>\n\n\
                  Directories are searched (non-recursively) for PNG, WebP, TIFF, BMP, GIF, TGA, ICO and QOI files."
)]
struct Cli {
    /// Badge image files or directories
    #[arg(default_value = DEFAULT_BADGE_PATH)]
    inputs: Vec<PathBuf>,

    /// Minimum color score (0.0-1.0) for the badge to pass
    #[arg(short, long, default_value_t = DEFAULT_MIN_SCORE, allow_negative_numbers = true)]
    min_score: f64,

    /// Sampling efficiency: color scoring samples every 2^N-th pixel on each axis
    #[arg(short, long, default_value_t = DEFAULT_EFFICIENCY)]
    efficiency: u32,

    /// Required badge width and height in pixels
    #[arg(short, long, default_value_t = DEFAULT_BADGE_SIZE)]
    size: u32,

    /// Reference palette, e.g. "#6d071a;255,221,51" (default: the happy palette)
    #[arg(short, long)]
    palette: Option<ColorProfile>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.min_score) {
        eprintln!("Error: Minimum color score must be between 0.0 and 1.0");
        process::exit(2);
    }

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = BadgeConfig {
        size: cli.size,
        min_score: cli.min_score,
        profile: cli.palette.unwrap_or_default(),
        efficiency: cli.efficiency,
    };

    let validator = match BadgeValidator::new(config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Fatal: invalid configuration: {e}");
            process::exit(2);
        }
    };

    let mut reports = Vec::new();
    for input in &cli.inputs {
        if input.is_dir() {
            match validator.validate_directory(input) {
                Ok(found) if found.is_empty() => {
                    eprintln!("Warning: no badge images found in {}", input.display());
                }
                Ok(found) => reports.extend(found),
                Err(e) => reports.push(FileReport {
                    path: input.clone(),
                    outcome: Err(e),
                }),
            }
        } else {
            reports.extend(validator.validate_files(std::slice::from_ref(input)));
        }
    }

    let mut pass_count = 0u32;
    let mut fail_count = 0u32;
    for report in &reports {
        print_report(report, reports.len() > 1, cli.quiet);
        if report.passed() {
            pass_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if reports.len() > 1 && !cli.quiet {
        println!();
        println!(
            "[Summary] Passed: {pass_count}, Failed: {fail_count} (Total: {})",
            reports.len()
        );
    }

    if fail_count > 0 || reports.is_empty() {
        process::exit(1);
    }
}

fn print_report(report: &FileReport, batch: bool, quiet: bool) {
    let filename = report.path.file_name().map_or_else(
        || report.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    match &report.outcome {
        Ok(result) if result.success => {
            if quiet {
                return;
            }
            if batch {
                println!("[OK] {filename}: {}", result.message);
            } else {
                println!("{}", result.message);
            }
        }
        Ok(result) => {
            if batch {
                println!("[FAIL] {filename}: {}", result.message);
            } else {
                println!("{}", result.message);
            }
        }
        Err(e) => eprintln!("[ERROR] {filename}: {e}"),
    }
}
