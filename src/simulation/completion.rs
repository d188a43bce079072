//! Run completion check
//!
//! A run is finished once the elapsed time in the last row of its needleYmax
//! file has reached the end time requested in its parameter file.

use super::error::{Result, SimulationError};
use super::fields::Field;
use super::run::RunDirectory;
use super::table::read_last_value;
use std::path::Path;

/// Marker of the end-time line in the parameter file
const TIME_KEY: &str = " Time = ";

/// Elapsed and requested simulation time of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    /// Time (Rs/Vs units) in the last row of the needleYmax file
    pub elapsed: f64,
    /// Requested end time from the parameter file
    pub target: f64,
}

impl Completion {
    /// Read both times for a run
    pub fn check(run: &RunDirectory) -> Result<Self> {
        let elapsed = read_last_value(&run.needle_ymax, Field::TimeRsVs)?;
        let params = run.params()?;
        let text =
            std::fs::read_to_string(params).map_err(|e| SimulationError::io(params, e))?;
        let target = parse_target_time(&text, params)?;

        Ok(Completion { elapsed, target })
    }

    pub fn is_complete(&self) -> bool {
        is_complete(self.elapsed, self.target)
    }
}

/// Completion predicate
///
/// The elapsed time is rounded half-to-even and the target is cut to its
/// integer part; the run counts as complete one unit before the target.
pub fn is_complete(elapsed: f64, target: f64) -> bool {
    elapsed.round_ties_even() + 1.0 >= target.trunc()
}

/// Extract the end time from parameter file text
///
/// The last line containing ` Time = ` wins.
pub fn parse_target_time(text: &str, source: &Path) -> Result<f64> {
    let mut target = None;

    for (line_idx, line) in text.lines().enumerate() {
        if let Some(pos) = line.find(TIME_KEY) {
            let rest = line[pos + TIME_KEY.len()..].trim_start();
            let token: String = rest
                .chars()
                .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
                .collect();

            let value = token.parse::<f64>().map_err(|_| SimulationError::Parse {
                path: source.to_path_buf(),
                line: line_idx + 1,
                message: format!("invalid end time '{}'", rest),
            })?;
            target = Some(value);
        }
    }

    target.ok_or_else(|| SimulationError::MissingParameter {
        path: source.to_path_buf(),
        name: TIME_KEY.trim().trim_end_matches('=').trim().to_string(),
    })
}
