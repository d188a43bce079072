//! Needle Plotter - Development entry point
//!
//! Plots a single run directory, regardless of whether it is finished or
//! already plotted. Handy when tuning figure properties.
//!
//! Usage:
//! ```bash
//! cargo run --bin plot_run -- <run_dir> [--out <dir>] [--config <file.json>]
//! ```
//!
//! Figures go to `<out>/simulation_plots/` where `<out>` defaults to the
//! run's parent folder.

use anyhow::{anyhow, bail, Context, Result};
use needle_plotter::config::PlotterConfig;
use needle_plotter::pipeline;
use needle_plotter::simulation::{Completion, PropertyReader, RunDirectory};
use std::path::PathBuf;
use std::time::Instant;

fn log_phase(start: Instant, phase: &str) {
    let elapsed = start.elapsed();
    eprintln!("[PHASE @{:.3}s] {}", elapsed.as_secs_f64(), phase);
}

fn main() -> Result<()> {
    let start = Instant::now();
    log_phase(start, "START: Single run");
    println!("=== Needle Plotter - Development Mode ===\n");

    let args: Vec<String> = std::env::args().collect();
    let mut run_dir = None;
    let mut out_dir = None;
    let mut config_path = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" if i + 1 < args.len() => {
                out_dir = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            other if run_dir.is_none() && !other.starts_with("--") => {
                run_dir = Some(PathBuf::from(other));
                i += 1;
            }
            other => bail!("unexpected argument '{}'", other),
        }
    }
    let Some(run_dir) = run_dir else {
        bail!("usage: plot_run <run_dir> [--out <dir>] [--config <file.json>]");
    };

    log_phase(start, "PHASE 1: Loading configuration");
    let props = match config_path {
        Some(ref path) => {
            println!("Loading configuration from {}", path.display());
            PropertyReader::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => {
            println!("No --config given, using defaults");
            PropertyReader::defaults()
        }
    };
    let config = PlotterConfig::from_properties(&props);
    println!("  Units: {:?}", config.units);
    println!(
        "  Smoothing: every {} rows (summary), {} rows (needles)",
        config.small_grid_smoothing, config.big_grid_smoothing
    );
    println!("  Survivor fraction: {}", config.survivor_fraction);
    println!();

    log_phase(start, "PHASE 2: Scanning run directory");
    let run = RunDirectory::open(&run_dir)
        .with_context(|| format!("Failed to open run {}", run_dir.display()))?;
    println!("Run: {}", run.name);
    println!("  Aggregate: {}", run.needle_ymax.display());
    println!("  Needle files: {}", run.needles.len());
    match Completion::check(&run) {
        Ok(c) => println!(
            "  Time: {} of {} ({})",
            c.elapsed,
            c.target,
            if c.is_complete() { "complete" } else { "running" }
        ),
        Err(e) => println!("  ⚠ Completion unknown: {}", e),
    }

    let out_root = match out_dir {
        Some(dir) => dir,
        None => run
            .path
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("{} has no parent folder", run.path.display()))?,
    };
    let paths = config.output_paths(&out_root);

    log_phase(start, "PHASE 3: Rendering");
    let result =
        pipeline::plot_run(&run, &config, &paths).map_err(|e| anyhow!("Plotting failed: {}", e))?;

    log_phase(start, "COMPLETE");
    println!("\n✓ Saved {}", result.small_grid.display());
    println!(
        "✓ Saved {} ({} of {} needles)",
        result.big_grid.display(),
        result.survivors,
        result.needles
    );

    Ok(())
}
