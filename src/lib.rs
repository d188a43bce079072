//! Needle Plotter Library
//!
//! Batch plotting of dendrite needle-growth simulation output. The library
//! is shared by the production binary (one profile, many runs) and the
//! development binary (one run directory).

pub mod config;
pub mod pipeline;
pub mod render;
pub mod simulation;
