//! Needle Plotter - Main entry point
//!
//! Plots every simulation run under a deployment profile's root folder.
//!
//! Usage:
//! ```bash
//! needle_plotter <profile> [--root <dir>] [--config <file.json>]
//! ```
//!
//! Profiles 0 and 1 walk the collections under a user's simulation folder
//! and skip finished runs that are already plotted. Profiles 2 and 3 replot
//! one partition-coefficient folder. Profile 99 replots a generic root.

use anyhow::{anyhow, Context, Result};
use needle_plotter::config::{PlotterConfig, Profile};
use needle_plotter::pipeline;
use needle_plotter::simulation::PropertyReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Override file picked up from the working directory
const DEFAULT_CONFIG_FILE: &str = "plotter_config.json";

const USAGE: &str = "usage: needle_plotter <profile> [--root <dir>] [--config <file.json>]";

#[derive(Debug, PartialEq)]
struct CliArgs {
    profile: u32,
    root: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn main() {
    println!("Needle Plotter v{}\n", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("✗ {}", msg);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if !Profile::IDS.contains(&cli.profile) {
        eprintln!(
            "✗ Unknown profile {} (expected one of {:?})",
            cli.profile,
            Profile::IDS
        );
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let start = Instant::now();
    match run(&cli) {
        Ok(()) => {
            println!(
                "\n✓ Plotting complete in {:.2}s",
                start.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            eprintln!("\n✗ Plotting failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &CliArgs) -> Result<()> {
    let props = load_properties(cli.config.as_deref())?;
    let config = PlotterConfig::from_properties(&props);

    let mut profile = Profile::select(cli.profile, &props)
        .with_context(|| format!("Failed to select profile {}", cli.profile))?;
    if let Some(ref root) = cli.root {
        profile = profile.with_root(root);
    }

    println!("Configuration:");
    println!("  Profile: {} ({:?}, {:?})", profile.id, profile.mode, profile.scope);
    println!("  Root: {}", profile.root.display());
    println!("  Units: {:?}", config.units);
    println!("  On run error: {:?}", config.on_run_error);

    let summaries = pipeline::generate_plots(&profile, &config)
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("Failed to plot {}", profile.root.display()))?;

    let plotted: usize = summaries.iter().map(|s| s.plotted.len()).sum();
    let skipped: usize = summaries.iter().map(|s| s.skipped.len()).sum();
    let failed: usize = summaries.iter().map(|s| s.failed.len()).sum();
    println!(
        "\nTotal: {} plotted, {} skipped, {} failed",
        plotted, skipped, failed
    );
    for summary in &summaries {
        for (name, error) in &summary.failed {
            println!("  ⚠ {}: {}", name, error);
        }
    }

    Ok(())
}

/// Parse `<profile> [--root <dir>] [--config <file>]`
fn parse_args(args: &[String]) -> std::result::Result<CliArgs, String> {
    let mut profile = None;
    let mut root = None;
    let mut config = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--root" if i + 1 < args.len() => {
                root = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            flag @ ("--root" | "--config") => {
                return Err(format!("{} needs a value", flag));
            }
            value if profile.is_none() => {
                let id = value
                    .parse::<u32>()
                    .map_err(|_| format!("profile must be an integer, got '{}'", value))?;
                profile = Some(id);
                i += 1;
            }
            other => return Err(format!("unexpected argument '{}'", other)),
        }
    }

    let profile = profile.ok_or_else(|| "missing profile number".to_string())?;
    Ok(CliArgs {
        profile,
        root,
        config,
    })
}

/// Registry defaults plus the override file, if any
fn load_properties(explicit: Option<&Path>) -> Result<PropertyReader> {
    if let Some(path) = explicit {
        let props = PropertyReader::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        println!("  Loaded configuration from {}", path.display());
        return Ok(props);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        let props = PropertyReader::from_file(default_path)
            .with_context(|| format!("Failed to load config {}", DEFAULT_CONFIG_FILE))?;
        println!("  Loaded configuration from {}", DEFAULT_CONFIG_FILE);
        Ok(props)
    } else {
        println!("  No {} found, using defaults", DEFAULT_CONFIG_FILE);
        Ok(PropertyReader::defaults())
    }
}
