//! QuickPlot - CSV Dataset Plotting Tool
//!
//! Loads a CSV file, validates a plot request against its column types and
//! renders one of six statistical charts to PNG.

pub mod charts;
pub mod data;
pub mod gui;
pub mod logging;
pub mod pipeline;
pub mod stats;

pub use charts::{ChartRenderer, ChartSpec, ColorScheme, PlotRequest, PlotType, RenderedImage, Theme};
pub use data::{DataLoader, Dataset};
pub use pipeline::{plot, plot_csv, ErrorKind, PlotError, FORMAT_GUIDANCE};
