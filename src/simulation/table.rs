//! Needle table loading
//!
//! Needle files are whitespace-delimited numeric tables with one header row.
//! Rows are parsed into per-column vectors and stored in a polars DataFrame
//! whose column names come from the `Field` schema.

use super::error::{Result, SimulationError};
use super::fields::{column_key, Field};
use polars::prelude::*;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Bytes read per step when scanning a file backwards for its last line
const TAIL_BLOCK: u64 = 4096;

/// One needle (or aggregate) time series table
#[derive(Debug, Clone)]
pub struct NeedleTable {
    df: DataFrame,
    source: PathBuf,
}

impl NeedleTable {
    /// Load a table from disk, skipping the header row
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SimulationError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Parse table text; `source` is only used for error messages
    pub fn parse(text: &str, source: &Path) -> Result<Self> {
        let mut columns: Vec<Vec<f64>> = Vec::new();

        for (line_idx, line) in text.lines().enumerate().skip(1) {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let line_no = line_idx + 1;
            let row = parse_row(trimmed, source, line_no)?;

            if columns.is_empty() {
                columns = vec![Vec::new(); row.len()];
            } else if row.len() != columns.len() {
                return Err(SimulationError::RaggedRow {
                    path: source.to_path_buf(),
                    line: line_no,
                    expected: columns.len(),
                    found: row.len(),
                });
            }

            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        if columns.is_empty() {
            return Err(SimulationError::EmptyTable(source.to_path_buf()));
        }

        let frame_columns: Vec<Column> = columns
            .into_iter()
            .enumerate()
            .map(|(i, values)| Column::from(Series::new(column_key(i).into(), values)))
            .collect();

        Ok(NeedleTable {
            df: DataFrame::new(frame_columns)?,
            source: source.to_path_buf(),
        })
    }

    /// Number of rows (simulation steps)
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns in the file
    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// File this table was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Underlying DataFrame
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Copy one field out as a plain vector
    pub fn values(&self, field: Field) -> Result<Vec<f64>> {
        let column = self
            .df
            .column(field.key())
            .map_err(|_| SimulationError::MissingColumn(field.key().to_string()))?;
        let ca = column.as_materialized_series().f64()?;
        Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

/// Split a whitespace-delimited row into numbers
pub fn parse_row(line: &str, source: &Path, line_no: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|cell| {
            cell.parse::<f64>().map_err(|_| SimulationError::Parse {
                path: source.to_path_buf(),
                line: line_no,
                message: format!("invalid number '{}'", cell),
            })
        })
        .collect()
}

/// Read the last non-blank line of a file without loading the whole file
pub fn read_last_line(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| SimulationError::io(path, e))?;
    let len = file
        .seek(SeekFrom::End(0))
        .map_err(|e| SimulationError::io(path, e))?;

    let mut tail: Vec<u8> = Vec::new();
    let mut pos = len;

    loop {
        let start = pos.saturating_sub(TAIL_BLOCK);
        let mut block = vec![0u8; (pos - start) as usize];
        file.seek(SeekFrom::Start(start))
            .and_then(|_| file.read_exact(&mut block))
            .map_err(|e| SimulationError::io(path, e))?;
        block.extend_from_slice(&tail);
        tail = block;
        pos = start;

        let content_end = tail.iter().rposition(|b| !b.is_ascii_whitespace());
        if let Some(end) = content_end {
            if let Some(newline) = tail[..end].iter().rposition(|&b| b == b'\n') {
                return Ok(String::from_utf8_lossy(&tail[newline + 1..=end]).into_owned());
            }
        }

        if pos == 0 {
            return match content_end {
                Some(end) => Ok(String::from_utf8_lossy(&tail[..=end]).into_owned()),
                None => Err(SimulationError::EmptyTable(path.to_path_buf())),
            };
        }
    }
}

/// Parse the last row of a table file into numbers
pub fn read_last_row(path: &Path) -> Result<Vec<f64>> {
    let line = read_last_line(path)?;
    // Line 0: position counted from the end is not known
    parse_row(&line, path, 0)
}

/// Value of one field in the last row of a table file
pub fn read_last_value(path: &Path, field: Field) -> Result<f64> {
    let row = read_last_row(path)?;
    row.get(field.index())
        .copied()
        .ok_or_else(|| SimulationError::MissingColumn(field.key().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::{scratch_dir, write_file};

    const SAMPLE: &str = "iter t_rsvs t_s\n\
                          0 \t0.0 \t0.5 \t\n\
                          1 \t1.0 \t1.5 \t\n\
                          \n\
                          2 \t2.0 \t2.5 \t\n";

    #[test]
    fn test_parse_skips_header_and_blank_lines() {
        let table = NeedleTable::parse(SAMPLE, Path::new("sample.dat")).unwrap();
        assert_eq!(table.height(), 3);
        assert_eq!(table.width(), 3);
        assert_eq!(table.values(Field::TimeRsVs).unwrap(), vec![0.0, 1.0, 2.0]);
        assert_eq!(table.values(Field::TimeSi).unwrap(), vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_missing_field() {
        let table = NeedleTable::parse(SAMPLE, Path::new("sample.dat")).unwrap();
        let err = table.values(Field::YTip).unwrap_err();
        assert!(matches!(err, SimulationError::MissingColumn(ref k) if k == "y_tip"));
    }

    #[test]
    fn test_ragged_row() {
        let text = "header\n1 2 3\n4 5\n";
        let err = NeedleTable::parse(text, Path::new("ragged.dat")).unwrap_err();
        match err {
            SimulationError::RaggedRow {
                line,
                expected,
                found,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_bad_number() {
        let err = NeedleTable::parse("h\n1 x 3\n", Path::new("bad.dat")).unwrap_err();
        assert!(matches!(err, SimulationError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = NeedleTable::parse("only a header\n", Path::new("h.dat")).unwrap_err();
        assert!(matches!(err, SimulationError::EmptyTable(_)));
    }

    #[test]
    fn test_extra_columns_named_by_position() {
        let row: Vec<String> = (0..41).map(|i| i.to_string()).collect();
        let text = format!("header\n{}\n", row.join(" "));
        let table = NeedleTable::parse(&text, Path::new("wide.dat")).unwrap();
        assert_eq!(table.width(), 41);
        assert!(table.frame().column("col_40").is_ok());
        assert_eq!(table.values(Field::OmegaInd).unwrap(), vec![38.0]);
    }

    #[test]
    fn test_read_last_line_with_trailing_blank_lines() {
        let dir = scratch_dir();
        let path = write_file(&dir, "tail.dat", SAMPLE);
        assert_eq!(read_last_line(&path).unwrap().trim(), "2 \t2.0 \t2.5");
        assert_eq!(read_last_row(&path).unwrap(), vec![2.0, 2.0, 2.5]);
        assert_eq!(read_last_value(&path, Field::TimeSi).unwrap(), 2.5);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_read_last_line_spanning_blocks() {
        let dir = scratch_dir();
        let mut text = String::from("header\n");
        for i in 0..2000 {
            text.push_str(&format!("{} \t{}.25 \t{}.5 \t\n", i, i, i));
        }
        let path = write_file(&dir, "long.dat", &text);
        assert_eq!(read_last_row(&path).unwrap(), vec![1999.0, 1999.25, 1999.5]);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_read_last_line_single_line_file() {
        let dir = scratch_dir();
        let path = write_file(&dir, "one.dat", "1 2 3");
        assert_eq!(read_last_line(&path).unwrap(), "1 2 3");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_read_last_line_empty_file() {
        let dir = scratch_dir();
        let path = write_file(&dir, "empty.dat", "\n\n");
        assert!(matches!(
            read_last_line(&path),
            Err(SimulationError::EmptyTable(_))
        ));
        std::fs::remove_dir_all(dir).ok();
    }
}
