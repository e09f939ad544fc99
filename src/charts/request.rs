//! Plot Request Module
//! User-facing plot parameters: chart type, column selections, bins, palette.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest bin count offered for histograms.
pub const MIN_BINS: usize = 5;
/// Largest bin count offered for histograms.
pub const MAX_BINS: usize = 50;
/// Bin count used when the request leaves it unset.
pub const DEFAULT_BINS: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown plot type '{0}'")]
    UnknownPlotType(String),
    #[error("unknown color scheme '{0}'")]
    UnknownColorScheme(String),
}

/// The six supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotType {
    #[serde(rename = "Line Plot")]
    Line,
    #[serde(rename = "Bar Plot")]
    Bar,
    #[serde(rename = "Scatter Plot")]
    Scatter,
    #[serde(rename = "Histogram")]
    Histogram,
    #[serde(rename = "Box Plot")]
    Box,
    #[serde(rename = "Correlation Matrix")]
    CorrelationMatrix,
}

impl PlotType {
    pub const ALL: [PlotType; 6] = [
        PlotType::Line,
        PlotType::Bar,
        PlotType::Scatter,
        PlotType::Histogram,
        PlotType::Box,
        PlotType::CorrelationMatrix,
    ];

    /// Name shown in the plot type selector.
    pub fn label(self) -> &'static str {
        match self {
            PlotType::Line => "Line Plot",
            PlotType::Bar => "Bar Plot",
            PlotType::Scatter => "Scatter Plot",
            PlotType::Histogram => "Histogram",
            PlotType::Box => "Box Plot",
            PlotType::CorrelationMatrix => "Correlation Matrix",
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlotType {
    type Err = ParseError;

    /// Accepts the selector label ("Box Plot") or a short name ("box").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        let plot_type = match key.as_str() {
            "line" | "line plot" => PlotType::Line,
            "bar" | "bar plot" => PlotType::Bar,
            "scatter" | "scatter plot" => PlotType::Scatter,
            "histogram" | "hist" => PlotType::Histogram,
            "box" | "box plot" | "boxplot" => PlotType::Box,
            "correlation" | "correlation matrix" | "corr" => PlotType::CorrelationMatrix,
            _ => return Err(ParseError::UnknownPlotType(s.to_string())),
        };
        Ok(plot_type)
    }
}

/// Named continuous palettes mapping [0, 1] to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Viridis,
    Magma,
    Plasma,
    Inferno,
    Cividis,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Viridis,
        ColorScheme::Magma,
        ColorScheme::Plasma,
        ColorScheme::Inferno,
        ColorScheme::Cividis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Viridis => "viridis",
            ColorScheme::Magma => "magma",
            ColorScheme::Plasma => "plasma",
            ColorScheme::Inferno => "inferno",
            ColorScheme::Cividis => "cividis",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorScheme::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownColorScheme(s.to_string()))
    }
}

/// One render request, built fresh for every interaction.
///
/// `columns` holds the selections in role order: `[x, y]` for line, bar and
/// scatter, `[value]` for histograms, `[group, value]` for box plots and
/// nothing for the correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub plot_type: PlotType,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub bin_count: Option<usize>,
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

impl PlotRequest {
    pub fn new(plot_type: PlotType, columns: Vec<String>) -> Self {
        Self {
            plot_type,
            columns,
            bin_count: None,
            color_scheme: ColorScheme::default(),
        }
    }

    pub fn line(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self::new(PlotType::Line, vec![x.into(), y.into()])
    }

    pub fn bar(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self::new(PlotType::Bar, vec![x.into(), y.into()])
    }

    pub fn scatter(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self::new(PlotType::Scatter, vec![x.into(), y.into()])
    }

    pub fn histogram(column: impl Into<String>, bins: usize) -> Self {
        Self::new(PlotType::Histogram, vec![column.into()]).with_bins(bins)
    }

    pub fn box_plot(group: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(PlotType::Box, vec![group.into(), value.into()])
    }

    pub fn correlation() -> Self {
        Self::new(PlotType::CorrelationMatrix, Vec::new())
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bin_count = Some(bins);
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    /// Requested bin count, falling back to the default.
    pub fn bins(&self) -> usize {
        self.bin_count.unwrap_or(DEFAULT_BINS)
    }
}
