//! Single line-chart panel
//!
//! Every panel in both figures has the same shape: one raw series, an
//! optional smoothed overlay, axes starting at zero and an optional clamped
//! upper y bound.

use super::style::{format_tick, PlotStyle, RAW_COLOR, SMOOTH_COLOR};
use super::RenderResult;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Headroom above the data when the y axis is not clamped
const Y_HEADROOM: f64 = 1.05;

/// Inward tick marks
const TICK_SIZE: i32 = -4;

pub struct PanelSpec<'a> {
    pub title: Option<String>,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub x: &'a [f64],
    pub y: &'a [f64],
    /// Smoothed (x, y) points drawn over the raw series
    pub smoothed: Option<&'a [(f64, f64)]>,
    /// Clamped y upper bound; None fits the data
    pub y_upper: Option<f64>,
}

impl PanelSpec<'_> {
    /// Axis ranges: both start at zero
    pub fn ranges(&self) -> (f64, f64) {
        let x_max = positive_max(self.x.iter().copied()).unwrap_or(1.0);

        let y_max = match self.y_upper {
            Some(upper) if upper > 0.0 => upper,
            _ => {
                let smoothed = self.smoothed.unwrap_or(&[]).iter().map(|(_, y)| *y);
                positive_max(self.y.iter().copied().chain(smoothed))
                    .map(|m| m * Y_HEADROOM)
                    .unwrap_or(1.0)
            }
        };

        (x_max, y_max)
    }
}

fn positive_max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|v| v.is_finite() && *v > 0.0)
        .reduce(f64::max)
}

/// Finite points, with y clipped to the visible band
pub fn visible_points(
    points: impl Iterator<Item = (f64, f64)>,
    y_max: f64,
) -> Vec<(f64, f64)> {
    points
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (x, y.clamp(0.0, y_max)))
        .collect()
}

/// Draw one panel into a drawing area
pub fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    spec: &PanelSpec<'_>,
    style: &PlotStyle,
) -> RenderResult<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_max, y_max) = spec.ranges();
    let font_px = style.font_px();

    let mut builder = ChartBuilder::on(area);
    builder
        .margin((font_px * 0.8) as u32)
        .x_label_area_size((font_px * 2.8) as u32)
        .y_label_area_size((font_px * 4.2) as u32);
    if let Some(ref title) = spec.title {
        builder.caption(title, style.text(1.0));
    }

    let mut chart = builder.build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .set_all_tick_mark_size(TICK_SIZE)
        .x_labels(5)
        .y_labels(6)
        .x_label_formatter(&format_tick)
        .y_label_formatter(&format_tick)
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .axis_desc_style(style.text(0.9))
        .label_style(style.text(0.8))
        .draw()?;

    let raw = visible_points(spec.x.iter().copied().zip(spec.y.iter().copied()), y_max);
    chart.draw_series(LineSeries::new(raw, RAW_COLOR.stroke_width(1)))?;

    if let Some(smoothed) = spec.smoothed {
        let overlay = visible_points(smoothed.iter().copied(), y_max);
        chart.draw_series(LineSeries::new(overlay, SMOOTH_COLOR.stroke_width(1)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec<'a>(x: &'a [f64], y: &'a [f64]) -> PanelSpec<'a> {
        PanelSpec {
            title: None,
            x_label: "x",
            y_label: "y",
            x,
            y,
            smoothed: None,
            y_upper: None,
        }
    }

    #[test]
    fn test_ranges_fit_data() {
        let x = [0.0, 1.0, 4.0];
        let y = [0.0, 2.0, 10.0];
        let (x_max, y_max) = spec(&x, &y).ranges();
        assert_eq!(x_max, 4.0);
        assert!((y_max - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_ranges_include_overlay() {
        let x = [0.0, 1.0];
        let y = [1.0, 2.0];
        let overlay = [(0.0, 8.0)];
        let mut s = spec(&x, &y);
        s.smoothed = Some(&overlay);
        assert!((s.ranges().1 - 8.4).abs() < 1e-12);
    }

    #[test]
    fn test_ranges_use_clamp() {
        let x = [0.0, 1.0];
        let y = [1.0, 200.0];
        let mut s = spec(&x, &y);
        s.y_upper = Some(50.0);
        assert_eq!(s.ranges().1, 50.0);
    }

    #[test]
    fn test_ranges_degenerate_data() {
        let (x_max, y_max) = spec(&[], &[]).ranges();
        assert_eq!((x_max, y_max), (1.0, 1.0));
        let (_, y_max) = spec(&[0.0, 1.0], &[-1.0, f64::NAN]).ranges();
        assert_eq!(y_max, 1.0);
    }

    #[test]
    fn test_visible_points() {
        let points = visible_points(
            vec![(0.0, 5.0), (1.0, f64::NAN), (2.0, 80.0), (3.0, -1.0)].into_iter(),
            50.0,
        );
        assert_eq!(points, vec![(0.0, 5.0), (2.0, 50.0), (3.0, 0.0)]);
    }
}
