//! Run summary figure
//!
//! Five panels from the aggregate table on a 2×3 grid:
//!
//! ```text
//! +-----------+-----------+-----------+
//! |  Δ(t)     |  L(t)     |  R(t)     |
//! +-----------+-----------+-----------+
//! | comp. t   |  V(t) + smoothed dL/dt |
//! +-----------+-----------------------+
//! ```

use super::figure::{render_svg, write_pdf};
use super::panel::{draw_panel, PanelSpec};
use super::smoothing::smoothed_velocity;
use super::style::{FigureMargins, PlotStyle};
use super::RenderResult;
use crate::config::PlotterConfig;
use crate::simulation::{Field, NeedleTable, UnitMode};
use plotters::prelude::*;
use std::path::Path;

/// Figure size in inches
const FIGURE_SIZE: (f64, f64) = (6.47699, 4.7);

const MARGINS: FigureMargins = FigureMargins {
    left: 0.085,
    right: 0.975,
    top: 0.9,
    bottom: 0.1,
};

/// Columns one summary figure reads
struct SummaryColumns {
    time_si: Vec<f64>,
    time: Vec<f64>,
    delta: Vec<f64>,
    length: Vec<f64>,
    radius: Vec<f64>,
    velocity: Vec<f64>,
    computation: Vec<f64>,
}

impl SummaryColumns {
    fn load(table: &NeedleTable, units: UnitMode) -> crate::simulation::Result<Self> {
        Ok(SummaryColumns {
            time_si: table.values(Field::TimeSi)?,
            time: table.values(units.time())?,
            delta: table.values(Field::Delta)?,
            length: table.values(units.length())?,
            radius: table.values(units.radius())?,
            velocity: table.values(units.velocity())?,
            computation: table.values(Field::ComputationTime)?,
        })
    }
}

/// Render the run summary of `table` to `out_path`
pub fn plot_small_grid(
    table: &NeedleTable,
    title: &str,
    units: UnitMode,
    config: &PlotterConfig,
    out_path: &Path,
) -> RenderResult<()> {
    let svg = small_grid_svg(table, title, units, config)?;
    write_pdf(out_path, &svg, config.figure_dpi)?;
    println!("  ✓ {}", out_path.display());
    Ok(())
}

/// Draw the run summary as SVG text
pub fn small_grid_svg(
    table: &NeedleTable,
    title: &str,
    units: UnitMode,
    config: &PlotterConfig,
) -> RenderResult<String> {
    let columns = SummaryColumns::load(table, units)?;
    let style = PlotStyle::from_config(config);
    let size = style.canvas(FIGURE_SIZE.0, FIGURE_SIZE.1);

    let smoothed = smoothed_velocity(&columns.time, &columns.length, config.small_grid_smoothing);
    let radius_upper = config.clamp.upper_bound(&columns.radius);
    let velocity_upper = config.clamp.upper_bound(&columns.velocity);

    let panels = [
        PanelSpec {
            title: None,
            x_label: Field::TimeSi.label(),
            y_label: Field::Delta.label(),
            x: &columns.time_si,
            y: &columns.delta,
            smoothed: None,
            y_upper: None,
        },
        PanelSpec {
            title: None,
            x_label: units.time().label(),
            y_label: units.length().label(),
            x: &columns.time,
            y: &columns.length,
            smoothed: None,
            y_upper: None,
        },
        PanelSpec {
            title: None,
            x_label: units.time().label(),
            y_label: units.radius().label(),
            x: &columns.time,
            y: &columns.radius,
            smoothed: None,
            y_upper: radius_upper,
        },
        PanelSpec {
            title: None,
            x_label: Field::TimeSi.label(),
            y_label: Field::ComputationTime.label(),
            x: &columns.time_si,
            y: &columns.computation,
            smoothed: None,
            y_upper: None,
        },
        PanelSpec {
            title: None,
            x_label: units.time().label(),
            y_label: units.velocity().label(),
            x: &columns.time,
            y: &columns.velocity,
            smoothed: Some(&smoothed),
            y_upper: velocity_upper,
        },
    ];

    render_svg(size, |root| {
        root.fill(&WHITE)?;
        let (top, bottom, left, right) = MARGINS.to_pixels(size);
        let titled = root.titled(title, style.text(1.2))?;
        let body = titled.margin(top / 2, bottom, left / 2, right);

        let (_, height) = body.dim_in_pixel();
        let (upper, lower) = body.split_vertically(height / 2);
        let upper_cells = upper.split_evenly((1, 3));
        let (lower_width, _) = lower.dim_in_pixel();
        let (lower_left, lower_right) = lower.split_horizontally(lower_width / 3);

        let areas = [
            &upper_cells[0],
            &upper_cells[1],
            &upper_cells[2],
            &lower_left,
            &lower_right,
        ];
        for (area, spec) in areas.into_iter().zip(panels.iter()) {
            draw_panel(area, spec, &style)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::{contains_bytes, needle_row, scratch_dir};

    fn summary_table(rows: usize) -> NeedleTable {
        let mut text = String::from("header\n");
        for i in 0..rows {
            let t = i as f64;
            text.push_str(&needle_row(&[
                (Field::TimeSi, t),
                (Field::TimeRsVs, t * 2.0),
                (Field::Delta, 0.5),
                (Field::LengthSi, 3.0 * t),
                (Field::LengthRs, 6.0 * t),
                (Field::RadiusSi, if i == 3 { 500.0 } else { 1.0 }),
                (Field::VelocitySi, 3.0),
                (Field::ComputationTime, t * 10.0),
            ]));
            text.push('\n');
        }
        NeedleTable::parse(&text, Path::new("needleYmax.dat")).unwrap()
    }

    #[test]
    fn test_summary_columns_follow_units() {
        let table = summary_table(5);

        let physical = SummaryColumns::load(&table, UnitMode::Physical).unwrap();
        assert_eq!(physical.time, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(physical.length[4], 12.0);

        let normalized = SummaryColumns::load(&table, UnitMode::Normalized).unwrap();
        assert_eq!(normalized.time[4], 8.0);
        assert_eq!(normalized.length[4], 24.0);
        // Time(s) panels ignore the unit mode
        assert_eq!(normalized.time_si, physical.time_si);
    }

    #[test]
    fn test_small_grid_svg_carries_text() {
        let svg = small_grid_svg(
            &summary_table(12),
            "v1_run",
            UnitMode::Physical,
            &PlotterConfig::default(),
        )
        .unwrap();
        assert!(svg.contains("v1_run"));
        for label in ["Undercooling", "Length", "Radius", "Computation", "Velocity"] {
            assert!(svg.contains(label), "missing label {}", label);
        }
    }

    #[test]
    fn test_plot_small_grid_writes_pdf_with_fonts() {
        let dir = scratch_dir();
        let out = dir.join("simulation_plots").join("small_grid").join("v1_run.pdf");
        let config = PlotterConfig {
            small_grid_smoothing: 2,
            ..PlotterConfig::default()
        };

        plot_small_grid(&summary_table(12), "v1_run", UnitMode::Physical, &config, &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains_bytes(&bytes, b"/Font"));
        std::fs::remove_dir_all(dir).ok();
    }
}
