//! Simulation output access
//!
//! Everything that knows about the simulator's on-disk layout lives here:
//!
//! Structure:
//! - `fields.rs`: column schema of the needle tables
//! - `table.rs`: table loading and last-line reading
//! - `run.rs`: run directory discovery and file roles
//! - `completion.rs`: finished-run check
//! - `survivors.rs`: survivor needle selection
//! - `properties.rs`: plotter.json registry and typed property reader
//! - `error.rs`: error types

pub mod completion;
pub mod error;
pub mod fields;
pub mod properties;
pub mod run;
pub mod survivors;
pub mod table;

pub use completion::{is_complete, Completion};
pub use error::{Result, SimulationError};
pub use fields::{Field, UnitMode};
pub use properties::PropertyReader;
pub use run::{discover_runs, list_subdirectories, RunDirectory};
pub use survivors::SurvivorSet;
pub use table::NeedleTable;

#[cfg(test)]
pub(crate) mod test_support {
    use super::fields::Field;
    use std::path::{Path, PathBuf};

    /// Fresh empty directory under the system temp dir
    pub fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("needle_plotter_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    /// Full-width data row, zero except for the given fields
    pub fn needle_row(values: &[(Field, f64)]) -> String {
        let mut row = vec![0.0; Field::ALL.len()];
        for (field, value) in values {
            row[field.index()] = *value;
        }
        row.iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" \t")
            + " \t"
    }
}
