//! Shared plot generation pipeline
//!
//! This module contains the batch logic that is shared between the
//! production (main.rs) and development (plot_run.rs) entry points.
//!
//! The pipeline, per collection folder:
//! 1. Discovers run directories
//! 2. Skips runs that are finished and already plotted (incremental mode)
//! 3. Loads the aggregate table and selects surviving needles
//! 4. Renders the run summary and the per-needle figure

use crate::config::{OutputPaths, PlotMode, PlotterConfig, Profile, ProfileScope, RunErrorPolicy};
use crate::render::{plot_big_grid, plot_small_grid};
use crate::simulation::{
    discover_runs, list_subdirectories, Completion, NeedleTable, RunDirectory, SurvivorSet,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Error type for pipeline operations
pub type PipelineError = Box<dyn std::error::Error>;

/// Figures written for one run
#[derive(Debug, Clone, PartialEq)]
pub struct PlotResult {
    /// Output file stem
    pub name: String,
    pub small_grid: PathBuf,
    pub big_grid: PathBuf,
    /// Needles drawn in the per-needle figure
    pub survivors: usize,
    /// Needle files found in the run
    pub needles: usize,
}

/// What happened to each run of one collection
#[derive(Debug, Default)]
pub struct CollectionSummary {
    pub collection: PathBuf,
    pub plotted: Vec<PlotResult>,
    /// Run names left alone in incremental mode
    pub skipped: Vec<String>,
    /// (run name, error) for runs that failed under the skip policy
    pub failed: Vec<(String, String)>,
}

/// Plot every collection a profile points at
pub fn generate_plots(
    profile: &Profile,
    config: &PlotterConfig,
) -> Result<Vec<CollectionSummary>, PipelineError> {
    let collections = match profile.scope {
        ProfileScope::Parent => list_subdirectories(&profile.root)?,
        ProfileScope::Collection => vec![profile.root.clone()],
    };

    println!(
        "Profile {}: {} collection(s) under {}",
        profile.id,
        collections.len(),
        profile.root.display()
    );

    let mut summaries = Vec::with_capacity(collections.len());
    for collection in &collections {
        summaries.push(plot_collection(collection, config, profile.mode)?);
    }
    Ok(summaries)
}

/// Plot all runs of one collection folder
pub fn plot_collection(
    collection: &Path,
    config: &PlotterConfig,
    mode: PlotMode,
) -> Result<CollectionSummary, PipelineError> {
    let t0 = Instant::now();
    let mut summary = CollectionSummary {
        collection: collection.to_path_buf(),
        ..CollectionSummary::default()
    };

    println!("\n[1/3] Discovering runs in {}...", collection.display());
    let runs = discover_runs(collection)?;
    println!("  Runs found: {}", runs.len());
    if runs.is_empty() {
        return Ok(summary);
    }

    let paths = config.output_paths(collection);
    std::fs::create_dir_all(&paths.small_grid)?;

    println!("\n[2/3] Plotting ({:?} mode)...", mode);
    for (i, run_path) in runs.iter().enumerate() {
        let run_name = run_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("\n  Run {}/{}: {}", i + 1, runs.len(), run_name);

        match process_run(run_path, config, &paths, mode) {
            Ok(Some(result)) => summary.plotted.push(result),
            Ok(None) => {
                println!("  - complete and already plotted, skipping");
                summary.skipped.push(run_name);
            }
            Err(e) => match config.on_run_error {
                RunErrorPolicy::Abort => {
                    return Err(format!("run {} failed: {}", run_name, e).into());
                }
                RunErrorPolicy::Skip => {
                    println!("  ⚠ {} failed: {}", run_name, e);
                    summary.failed.push((run_name, e.to_string()));
                }
            },
        }
    }

    println!(
        "\n[3/3] Collection done in {:.2}s: {} plotted, {} skipped, {} failed",
        t0.elapsed().as_secs_f64(),
        summary.plotted.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    Ok(summary)
}

/// Open, check and plot one run; None when it was skipped
fn process_run(
    run_path: &Path,
    config: &PlotterConfig,
    paths: &OutputPaths,
    mode: PlotMode,
) -> Result<Option<PlotResult>, PipelineError> {
    let run = RunDirectory::open(run_path)?;
    if mode == PlotMode::Incremental && should_skip(&run, paths)? {
        return Ok(None);
    }
    plot_run(&run, config, paths).map(Some)
}

/// A run is skipped only when it is complete and both figures exist
///
/// Completion is not read when an output is missing, so unfinished runs
/// without a parameter file still get plotted.
pub fn should_skip(run: &RunDirectory, paths: &OutputPaths) -> Result<bool, PipelineError> {
    let name = run.plot_name();
    if !(paths.small_grid_pdf(name).exists() && paths.big_grid_pdf(name).exists()) {
        return Ok(false);
    }

    let completion = Completion::check(run)?;
    eprintln!(
        "DEBUG: {} elapsed={} target={}",
        name, completion.elapsed, completion.target
    );
    Ok(completion.is_complete())
}

/// Render both figures for one run
pub fn plot_run(
    run: &RunDirectory,
    config: &PlotterConfig,
    paths: &OutputPaths,
) -> Result<PlotResult, PipelineError> {
    let name = run.plot_name();

    let table = NeedleTable::load(&run.needle_ymax)?;
    println!("  Aggregate rows: {}", table.height());

    let survivors =
        SurvivorSet::from_needle_files(&run.path, &run.needles, config.survivor_fraction)?;
    println!(
        "  Survivors: {} of {} needles (final tip-Y ≥ {:.4})",
        survivors.len(),
        survivors.total,
        survivors.threshold
    );

    let small_grid = paths.small_grid_pdf(name);
    plot_small_grid(&table, name, config.units, config, &small_grid)?;

    let big_grid = paths.big_grid_pdf(name);
    plot_big_grid(
        &survivors,
        &run.needles,
        name,
        config.units,
        config,
        &big_grid,
    )?;

    Ok(PlotResult {
        name: name.to_string(),
        small_grid,
        big_grid,
        survivors: survivors.len(),
        needles: survivors.total,
    })
}
