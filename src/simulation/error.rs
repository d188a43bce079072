use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading simulation output
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Filesystem error on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cell or parameter could not be parsed as a number
    #[error("Parse error in {path} line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A data row has a different number of cells than the first row
    #[error("Ragged row in {path} line {line}: expected {expected} columns, found {found}")]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// No data rows after the header
    #[error("No data rows in {0}")]
    EmptyTable(PathBuf),

    /// Requested field is not present in the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A run directory lacks one of its expected files
    #[error("No file matching '{pattern}' in {dir}")]
    MissingFile { dir: PathBuf, pattern: String },

    /// A parameter line was not found in the parameter file
    #[error("Parameter '{name}' not found in {path}")]
    MissingParameter { path: PathBuf, name: String },

    /// A run directory without any per-needle files
    #[error("No needle files in {0}")]
    NoNeedles(PathBuf),

    /// DataFrame construction or access error
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] polars::error::PolarsError),

    /// Configuration error (bad override file, unknown profile, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SimulationError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimulationError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using SimulationError
pub type Result<T> = std::result::Result<T, SimulationError>;
