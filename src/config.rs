//! Plotter configuration from properties
//!
//! Configuration is loaded from plotter properties (defined in plotter.json).
//! All default values come from plotter.json, optionally overridden by a user
//! JSON file; there are no hardcoded fallbacks in this code.

use crate::render::layout::ClampRule;
use crate::simulation::{PropertyReader, Result, SimulationError, UnitMode};
use std::path::{Path, PathBuf};

/// What to do when a single run fails to load or render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunErrorPolicy {
    /// Stop the whole batch at the first failing run
    #[default]
    Abort,
    /// Report the failure and continue with the next run
    Skip,
}

impl RunErrorPolicy {
    /// Parse from string value
    ///
    /// Validation happens in PropertyReader::get_enum()
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "skip" => Self::Skip,
            _ => Self::Abort,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlotterConfig {
    /// Column set for time, length, velocity and radius
    pub units: UnitMode,

    /// Row stride of the smoothed velocity in the run summary figure
    pub small_grid_smoothing: usize,

    /// Row stride of the smoothed velocity in the per-needle figure
    pub big_grid_smoothing: usize,

    /// Fraction of the highest final tip-Y a needle needs to be plotted
    pub survivor_fraction: f64,

    /// Outlier clamp for velocity and radius axes
    pub clamp: ClampRule,

    /// Output folder created inside each collection root
    pub output_dir: String,

    /// Subfolder of `output_dir` for run summary figures
    pub small_grid_dir: String,

    /// Canvas pixels per inch
    pub figure_dpi: f64,

    /// Font family for titles and labels
    pub font_family: String,

    /// Base font size in points
    pub font_size: f64,

    /// Failure handling across runs
    pub on_run_error: RunErrorPolicy,
}

impl PlotterConfig {
    /// Create config from plotter properties
    pub fn from_properties(props: &PropertyReader) -> Self {
        let units = UnitMode::parse(&props.get_enum("units"));

        let small_grid_smoothing = props.get_usize_in_range("small.grid.smoothing", 1, 100_000);
        let big_grid_smoothing = props.get_usize_in_range("big.grid.smoothing", 1, 100_000);

        let survivor_fraction = props.get_f64_in_range("survivor.fraction", 0.0, 1.0);

        let clamp = ClampRule {
            ratio: props.get_f64_in_range("clamp.ratio", 1.0, 1.0e6),
            factor: props.get_f64_in_range("clamp.factor", 0.01, 1.0e6),
        };

        let output_dir = props.get_string("output.dir");
        let small_grid_dir = props.get_string("small.grid.dir");

        let figure_dpi = props.get_f64_in_range("figure.dpi", 10.0, 1200.0);
        let font_family = props.get_string("font.family");
        let font_size = props.get_f64_in_range("font.size", 1.0, 200.0);

        let on_run_error = RunErrorPolicy::parse(&props.get_enum("on.run.error"));

        Self {
            units,
            small_grid_smoothing,
            big_grid_smoothing,
            survivor_fraction,
            clamp,
            output_dir,
            small_grid_dir,
            figure_dpi,
            font_family,
            font_size,
            on_run_error,
        }
    }

    /// Output tree for a collection folder
    pub fn output_paths(&self, collection: &Path) -> OutputPaths {
        let plots = collection.join(&self.output_dir);
        let small_grid = plots.join(&self.small_grid_dir);
        OutputPaths { plots, small_grid }
    }
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self::from_properties(&PropertyReader::defaults())
    }
}

/// Where one collection's figures are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Per-needle figures
    pub plots: PathBuf,
    /// Run summary figures
    pub small_grid: PathBuf,
}

impl OutputPaths {
    pub fn big_grid_pdf(&self, plot_name: &str) -> PathBuf {
        self.plots.join(format!("{}.pdf", plot_name))
    }

    pub fn small_grid_pdf(&self, plot_name: &str) -> PathBuf {
        self.small_grid.join(format!("{}.pdf", plot_name))
    }
}

/// Whether finished runs are re-plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    /// Skip runs that are complete and already have both figures
    Incremental,
    /// Re-plot every run
    Full,
}

/// How the profile root is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileScope {
    /// Root holds several collection folders, each processed in turn
    Parent,
    /// Root is itself a collection folder
    Collection,
}

/// Deployment environment selected by the command-line integer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: u32,
    pub root: PathBuf,
    pub mode: PlotMode,
    pub scope: ProfileScope,
}

impl Profile {
    /// Known profile numbers
    pub const IDS: [u32; 5] = [0, 1, 2, 3, 99];

    /// Resolve a profile number; its root comes from `profile.<id>.root`
    pub fn select(id: u32, props: &PropertyReader) -> Result<Self> {
        let (mode, scope) = match id {
            0 | 1 => (PlotMode::Incremental, ProfileScope::Parent),
            2 | 3 => (PlotMode::Full, ProfileScope::Collection),
            99 => (PlotMode::Full, ProfileScope::Parent),
            other => {
                return Err(SimulationError::Config(format!(
                    "unknown profile {} (expected one of {:?})",
                    other,
                    Self::IDS
                )))
            }
        };

        let root = props.get_string(&format!("profile.{}.root", id));
        if root.is_empty() {
            return Err(SimulationError::Config(format!(
                "profile.{}.root is not set",
                id
            )));
        }

        Ok(Profile {
            id,
            root: PathBuf::from(root),
            mode,
            scope,
        })
    }

    /// Replace the configured root with an explicit path
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}
