//! Survivor needle selection
//!
//! Needles that stop growing early end far below the leading front. Only
//! needles whose final tip-Y reaches a fraction of the highest final tip-Y
//! are plotted individually.

use super::error::{Result, SimulationError};
use super::fields::Field;
use super::table::read_last_value;
use std::path::{Path, PathBuf};

/// Needles kept for the per-needle figure
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivorSet {
    /// Positions in the needle file list, ascending
    pub indices: Vec<usize>,
    /// Highest final tip-Y across all needles
    pub max_tip: f64,
    /// Minimum final tip-Y a survivor needs
    pub threshold: f64,
    /// Number of needles considered
    pub total: usize,
}

impl SurvivorSet {
    /// Select survivors from final tip-Y values
    ///
    /// Returns None when there are no tips to compare.
    pub fn from_tips(tips: &[f64], fraction: f64) -> Option<Self> {
        let max_tip = tips
            .iter()
            .copied()
            .filter(|t| !t.is_nan())
            .reduce(f64::max)?;
        let threshold = fraction * max_tip;

        Some(SurvivorSet {
            indices: survivor_indices(tips, threshold),
            max_tip,
            threshold,
            total: tips.len(),
        })
    }

    /// Read the final tip-Y of every needle file and select survivors
    pub fn from_needle_files(run_dir: &Path, needles: &[PathBuf], fraction: f64) -> Result<Self> {
        let tips = needles
            .iter()
            .map(|path| read_last_value(path, Field::YTip))
            .collect::<Result<Vec<f64>>>()?;

        Self::from_tips(&tips, fraction)
            .ok_or_else(|| SimulationError::NoNeedles(run_dir.to_path_buf()))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Indices of values at or above the threshold
pub fn survivor_indices(tips: &[f64], threshold: f64) -> Vec<usize> {
    tips.iter()
        .enumerate()
        .filter(|(_, tip)| **tip >= threshold)
        .map(|(i, _)| i)
        .collect()
}
