//! Figure rendering
//!
//! Charts are drawn with plotters on an SVG canvas and written as PDF.
//!
//! Structure:
//! - `smoothing.rs`: sub-sampled finite-difference velocity
//! - `layout.rs`: grid layout and outlier clamp
//! - `style.rs`: figure geometry, colours and fonts
//! - `panel.rs`: one line panel
//! - `figure.rs`: SVG to PDF output
//! - `small_grid.rs`: run summary figure
//! - `big_grid.rs`: per-needle velocity figure

pub mod big_grid;
pub mod figure;
pub mod layout;
pub mod panel;
pub mod small_grid;
pub mod smoothing;
pub mod style;

pub use big_grid::plot_big_grid;
pub use layout::{ClampRule, GridLayout};
pub use small_grid::plot_small_grid;

/// Error type for drawing and PDF conversion
pub type RenderResult<T> = Result<T, Box<dyn std::error::Error>>;
