//! Per-needle velocity figure
//!
//! One panel per surviving needle on a near-square grid. Each panel shows
//! the raw velocity and the smoothed dL/dt. Clamped axes are capped relative
//! to the mean of all plotted needles' maxima, so one spiky needle does not
//! set its own scale far above the others.

use super::figure::{render_svg, write_pdf};
use super::layout::{mean_of_maxima, GridLayout};
use super::panel::{draw_panel, PanelSpec};
use super::smoothing::smoothed_velocity;
use super::style::{FigureMargins, PlotStyle};
use super::RenderResult;
use crate::config::PlotterConfig;
use crate::simulation::{NeedleTable, SurvivorSet, UnitMode};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Inches per grid cell (width, height)
const CELL_SIZE: (f64, f64) = (6.0, 3.0);

const MARGINS: FigureMargins = FigureMargins {
    left: 0.09,
    right: 0.975,
    top: 0.95,
    bottom: 0.1,
};

/// Data behind one needle panel
#[derive(Debug, Clone)]
pub struct NeedleSeries {
    /// Position in the run's needle file list
    pub index: usize,
    pub time: Vec<f64>,
    pub velocity: Vec<f64>,
    pub smoothed: Vec<(f64, f64)>,
}

/// Load the surviving needles' time, velocity and smoothed velocity
pub fn load_survivor_series(
    survivors: &SurvivorSet,
    needle_files: &[PathBuf],
    units: UnitMode,
    stride: usize,
) -> RenderResult<Vec<NeedleSeries>> {
    let mut series = Vec::with_capacity(survivors.len());

    for &index in &survivors.indices {
        let path = needle_files.get(index).ok_or_else(|| {
            format!(
                "survivor index {} out of range ({} needle files)",
                index,
                needle_files.len()
            )
        })?;

        let table = NeedleTable::load(path)?;
        let time = table.values(units.time())?;
        let length = table.values(units.length())?;
        let velocity = table.values(units.velocity())?;
        let smoothed = smoothed_velocity(&time, &length, stride);

        series.push(NeedleSeries {
            index,
            time,
            velocity,
            smoothed,
        });
    }

    Ok(series)
}

/// Render one panel per survivor to `out_path`
pub fn plot_big_grid(
    survivors: &SurvivorSet,
    needle_files: &[PathBuf],
    title: &str,
    units: UnitMode,
    config: &PlotterConfig,
    out_path: &Path,
) -> RenderResult<()> {
    let svg = big_grid_svg(survivors, needle_files, title, units, config)?;
    write_pdf(out_path, &svg, config.figure_dpi)?;

    println!(
        "  ✓ {} ({} of {} needles)",
        out_path.display(),
        survivors.len(),
        survivors.total
    );
    Ok(())
}

/// Draw the per-needle grid as SVG text
pub fn big_grid_svg(
    survivors: &SurvivorSet,
    needle_files: &[PathBuf],
    title: &str,
    units: UnitMode,
    config: &PlotterConfig,
) -> RenderResult<String> {
    let grid = GridLayout::near_square(survivors.len())
        .ok_or_else(|| format!("no surviving needles to plot for {}", title))?;

    let series = load_survivor_series(survivors, needle_files, units, config.big_grid_smoothing)?;
    let reference = mean_of_maxima(series.iter().map(|s| s.velocity.as_slice()));

    let style = PlotStyle::from_config(config);
    let size = style.canvas(
        grid.cols as f64 * CELL_SIZE.0,
        grid.rows as f64 * CELL_SIZE.1,
    );
    let x_label = units.time().label();
    let y_label = units.velocity().label();

    render_svg(size, |root| {
        root.fill(&WHITE)?;
        let (top, bottom, left, right) = MARGINS.to_pixels(size);
        let titled = root.titled(title, style.text(1.4))?;
        let body = titled.margin(top / 2, bottom, left, right);
        let cells = body.split_evenly((grid.rows, grid.cols));

        for (needle, (row, col)) in series.iter().zip(grid.cells()) {
            let y_upper = match reference {
                Some(reference) => config
                    .clamp
                    .upper_bound_with_reference(&needle.velocity, reference),
                None => config.clamp.upper_bound(&needle.velocity),
            };
            let spec = PanelSpec {
                title: Some(format!("Needle {}", needle.index)),
                x_label,
                y_label,
                x: &needle.time,
                y: &needle.velocity,
                smoothed: Some(&needle.smoothed),
                y_upper,
            };
            draw_panel(&cells[row * grid.cols + col], &spec, &style)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::{contains_bytes, needle_row, scratch_dir, write_file};
    use crate::simulation::Field;

    fn write_needle(dir: &Path, name: &str, peak: f64) -> PathBuf {
        let mut text = String::from("header\n");
        for i in 0..10 {
            let t = i as f64;
            let v = if i == 5 { peak } else { 1.0 };
            text.push_str(&needle_row(&[
                (Field::TimeSi, t),
                (Field::LengthSi, 2.0 * t),
                (Field::VelocitySi, v),
                (Field::YTip, peak),
            ]));
            text.push('\n');
        }
        write_file(dir, name, &text)
    }

    fn survivors(indices: Vec<usize>, total: usize) -> SurvivorSet {
        SurvivorSet {
            indices,
            max_tip: 1.0,
            threshold: 0.1,
            total,
        }
    }

    #[test]
    fn test_load_survivor_series() {
        let dir = scratch_dir();
        let files = vec![
            write_needle(&dir, "a_needle0.dat", 4.0),
            write_needle(&dir, "b_needle0.dat", 0.1),
            write_needle(&dir, "c_needle0.dat", 8.0),
        ];

        let series =
            load_survivor_series(&survivors(vec![0, 2], 3), &files, UnitMode::Physical, 2).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].index, 0);
        assert_eq!(series[1].index, 2);
        assert_eq!(series[1].velocity[5], 8.0);
        // Length grows 2 per unit time
        assert!(series[0].smoothed.iter().all(|(_, v)| (v - 2.0).abs() < 1e-12));

        let reference = mean_of_maxima(series.iter().map(|s| s.velocity.as_slice()));
        assert_eq!(reference, Some(6.0));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_survivor_index_out_of_range() {
        let dir = scratch_dir();
        let files = vec![write_needle(&dir, "a_needle0.dat", 1.0)];
        let result = load_survivor_series(&survivors(vec![3], 1), &files, UnitMode::Physical, 1);
        assert!(result.is_err());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_empty_survivors_rejected() {
        let dir = scratch_dir();
        let out = dir.join("v1.pdf");
        let result = plot_big_grid(
            &survivors(vec![], 0),
            &[],
            "v1",
            UnitMode::Physical,
            &PlotterConfig::default(),
            &out,
        );
        assert!(result.is_err());
        assert!(!out.exists());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_big_grid_svg_titles_each_needle() {
        let dir = scratch_dir();
        let files: Vec<PathBuf> = (0..3)
            .map(|i| write_needle(&dir, &format!("n{}_needle0.dat", i), 2.0 + i as f64))
            .collect();

        let svg = big_grid_svg(
            &survivors(vec![0, 2], 3),
            &files,
            "v1_run",
            UnitMode::Physical,
            &PlotterConfig::default(),
        )
        .unwrap();
        assert!(svg.contains("v1_run"));
        assert!(svg.contains("Needle 0"));
        assert!(svg.contains("Needle 2"));
        assert!(!svg.contains("Needle 1"));
        assert!(svg.contains("Velocity"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_plot_big_grid_writes_pdf_with_fonts() {
        let dir = scratch_dir();
        let files: Vec<PathBuf> = (0..5)
            .map(|i| write_needle(&dir, &format!("n{}_needle0.dat", i), 2.0 + i as f64))
            .collect();
        let out = dir.join("simulation_plots").join("v1.pdf");

        plot_big_grid(
            &survivors(vec![0, 1, 2, 3, 4], 5),
            &files,
            "v1",
            UnitMode::Physical,
            &PlotterConfig::default(),
            &out,
        )
        .unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains_bytes(&bytes, b"/Font"));
        std::fs::remove_dir_all(dir).ok();
    }
}
