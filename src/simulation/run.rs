//! Run directory discovery
//!
//! A collection folder holds one directory per simulation run. Run directory
//! names encode the parameter signature (`v<...>_<...>_..._G<...>`); inside,
//! files are recognised by name suffix.

use super::error::{Result, SimulationError};
use std::path::{Path, PathBuf};

/// Suffix of the aggregate (all needles) table
pub const AGGREGATE_SUFFIX: &str = "needleYmax.dat";
/// Substring identifying a per-needle table
pub const NEEDLE_MARKER: &str = "needle0";
/// Suffix of the simulation parameter file
pub const PARAMS_SUFFIX: &str = "_Param.txt";
/// Plot names are cut before the last occurrence of this marker
pub const NAME_MARKER: &str = "_G";

/// Minimum number of `_` separators in a run directory name
const RUN_NAME_SEPARATORS: usize = 7;

/// What a file inside a run directory is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Aggregate,
    Needle,
    Params,
    Other,
}

/// Classify a file name
pub fn classify(file_name: &str) -> FileRole {
    if file_name.ends_with(AGGREGATE_SUFFIX) {
        FileRole::Aggregate
    } else if file_name.contains(NEEDLE_MARKER) && file_name.ends_with(".dat") {
        FileRole::Needle
    } else if file_name.ends_with(PARAMS_SUFFIX) {
        FileRole::Params
    } else {
        FileRole::Other
    }
}

/// Does a directory name look like a simulation run?
pub fn is_run_dir_name(name: &str) -> bool {
    name.starts_with('v') && name.matches('_').count() >= RUN_NAME_SEPARATORS
}

/// Output file stem for a run directory name
pub fn plot_name(dir_name: &str) -> &str {
    match dir_name.rfind(NAME_MARKER) {
        Some(pos) => &dir_name[..pos],
        None => dir_name,
    }
}

/// Files of one simulation run
#[derive(Debug, Clone)]
pub struct RunDirectory {
    pub path: PathBuf,
    /// Directory name
    pub name: String,
    /// Aggregate table (first match by name)
    pub needle_ymax: PathBuf,
    /// Per-needle tables, sorted by file name
    pub needles: Vec<PathBuf>,
    /// Parameter file, if present
    pub params: Option<PathBuf>,
}

impl RunDirectory {
    /// Scan a run directory and classify its files
    pub fn open(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut aggregates = Vec::new();
        let mut needles = Vec::new();
        let mut params = Vec::new();

        for file in sorted_entries(path)? {
            if !file.is_file() {
                continue;
            }
            let file_name = match file.file_name() {
                Some(n) => n.to_string_lossy().into_owned(),
                None => continue,
            };
            match classify(&file_name) {
                FileRole::Aggregate => aggregates.push(file),
                FileRole::Needle => needles.push(file),
                FileRole::Params => params.push(file),
                FileRole::Other => {}
            }
        }

        let needle_ymax =
            aggregates
                .into_iter()
                .next()
                .ok_or_else(|| SimulationError::MissingFile {
                    dir: path.to_path_buf(),
                    pattern: format!("*{}", AGGREGATE_SUFFIX),
                })?;

        Ok(RunDirectory {
            path: path.to_path_buf(),
            name,
            needle_ymax,
            needles,
            params: params.into_iter().next(),
        })
    }

    /// Output file stem
    pub fn plot_name(&self) -> &str {
        plot_name(&self.name)
    }

    /// Parameter file, or an error naming the missing pattern
    pub fn params(&self) -> Result<&Path> {
        self.params
            .as_deref()
            .ok_or_else(|| SimulationError::MissingFile {
                dir: self.path.clone(),
                pattern: format!("*{}", PARAMS_SUFFIX),
            })
    }
}

/// Run directories directly inside a collection folder, sorted by name
pub fn discover_runs(collection: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(collection)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter(|p| {
            p.file_name()
                .map(|n| is_run_dir_name(&n.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect())
}

/// All subdirectories of a folder, sorted by name
pub fn list_subdirectories(parent: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(parent)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SimulationError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SimulationError::io(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}
