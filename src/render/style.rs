//! Figure geometry and text styling

use super::figure::resolve_font_family;
use crate::config::PlotterConfig;
use plotters::style::{RGBColor, TextStyle, BLACK};

/// Raw simulator series
pub const RAW_COLOR: RGBColor = RGBColor(31, 119, 180);
/// Smoothed dL/dt overlay
pub const SMOOTH_COLOR: RGBColor = BLACK;

/// Panel edge margins as fractions of the figure (left, right, top, bottom)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl FigureMargins {
    /// Pixel margins (top, bottom, left, right) for a canvas
    pub fn to_pixels(&self, (width, height): (u32, u32)) -> (u32, u32, u32, u32) {
        let w = width as f64;
        let h = height as f64;
        (
            ((1.0 - self.top) * h).round() as u32,
            (self.bottom * h).round() as u32,
            (self.left * w).round() as u32,
            ((1.0 - self.right) * w).round() as u32,
        )
    }
}

/// Shared figure styling
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub dpi: f64,
    pub font_family: String,
    /// Base font size in points
    pub font_size: f64,
}

impl PlotStyle {
    /// Styling from config, with the font family checked against installed fonts
    pub fn from_config(config: &PlotterConfig) -> Self {
        PlotStyle {
            dpi: config.figure_dpi,
            font_family: resolve_font_family(&config.font_family),
            font_size: config.font_size,
        }
    }

    /// Canvas size in pixels for a figure size in inches
    pub fn canvas(&self, width_in: f64, height_in: f64) -> (u32, u32) {
        (self.px(width_in), self.px(height_in))
    }

    pub fn px(&self, inches: f64) -> u32 {
        (inches * self.dpi).round().max(1.0) as u32
    }

    /// Base font size in pixels
    pub fn font_px(&self) -> f64 {
        self.font_size * self.dpi / 72.0
    }

    /// Text style at a multiple of the base size
    pub fn text(&self, scale: f64) -> TextStyle<'_> {
        (self.font_family.as_str(), self.font_px() * scale).into()
    }
}

/// Tick label with a width that stays readable across magnitudes
pub fn format_tick(value: &f64) -> String {
    let v = *value;
    if v == 0.0 {
        return "0".to_string();
    }
    let magnitude = v.abs();
    if !(1e-3..1e4).contains(&magnitude) {
        format!("{:.1e}", v)
    } else if magnitude >= 100.0 {
        format!("{:.0}", v)
    } else if magnitude >= 1.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.3}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_and_font_size() {
        let style = PlotStyle {
            dpi: 100.0,
            font_family: "serif".to_string(),
            font_size: 10.0,
        };
        assert_eq!(style.canvas(6.47699, 4.7), (648, 470));
        assert_eq!(style.canvas(12.0, 12.0), (1200, 1200));
        assert!((style.font_px() - 13.888_888).abs() < 1e-4);
    }

    #[test]
    fn test_margins_to_pixels() {
        let margins = FigureMargins {
            left: 0.1,
            right: 0.9,
            top: 0.9,
            bottom: 0.1,
        };
        assert_eq!(margins.to_pixels((1000, 500)), (50, 50, 100, 100));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(&0.0), "0");
        assert_eq!(format_tick(&250.0), "250");
        assert_eq!(format_tick(&2.5), "2.5");
        assert_eq!(format_tick(&0.125), "0.125");
        assert_eq!(format_tick(&1.5e-6), "1.5e-6");
        assert_eq!(format_tick(&32000.0), "3.2e4");
    }
}
