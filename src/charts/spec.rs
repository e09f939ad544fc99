//! Chart Spec Module
//! Validated, render-ready description of a single chart.

use plotters::style::RGBColor;

use super::request::{ColorScheme, PlotType};
use crate::stats::{BoxStats, CorrelationMatrix};

/// Categorical domains larger than this get rotated tick labels.
pub const ROTATE_LABELS_ABOVE: usize = 10;
/// Tick label rotation for crowded categorical axes, in degrees.
pub const ROTATED_TICK_DEGREES: f64 = 45.0;

/// Horizontal axis of line and bar charts.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Continuous numeric axis.
    Numeric,
    /// Category labels in first-seen order; element `i` sits at position `i`.
    Categorical(Vec<String>),
}

impl XAxis {
    pub fn categories(&self) -> &[String] {
        match self {
            XAxis::Numeric => &[],
            XAxis::Categorical(labels) => labels,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub x_axis: XAxis,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Category slot on the x axis.
    pub slot: usize,
    pub label: String,
    pub value: f64,
    /// Palette position `bar_index / total_bars`.
    pub color_fraction: f64,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub categories: Vec<String>,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Row index in the dataset.
    pub index: usize,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub points: Vec<ScatterPoint>,
    /// Range of the index color bar.
    pub index_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub color_fraction: f64,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub bins: Vec<HistogramBin>,
}

impl HistogramChart {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn span(&self) -> (f64, f64) {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: String,
    /// `None` when the group has no non-missing values.
    pub stats: Option<BoxStats>,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxChart {
    pub groups: Vec<BoxGroup>,
}

/// Text color chosen for contrast against a correlation cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    Light,
    Dark,
}

impl TextTone {
    /// Light text on strong correlations, dark otherwise.
    pub fn for_value(value: f64) -> Self {
        if value.abs() > 0.5 {
            TextTone::Light
        } else {
            TextTone::Dark
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationCell {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    /// `None` for an undefined coefficient.
    pub color: Option<RGBColor>,
    pub text: String,
    pub tone: TextTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationChart {
    pub matrix: CorrelationMatrix,
    pub cells: Vec<CorrelationCell>,
    /// Value range mapped onto the palette.
    pub value_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Line(LineChart),
    Bar(BarChart),
    Scatter(ScatterChart),
    Histogram(HistogramChart),
    Box(BoxChart),
    Correlation(CorrelationChart),
}

/// Fully resolved chart. Only the validator constructs one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    plot_type: PlotType,
    title: String,
    x_label: String,
    y_label: String,
    x_tick_rotation: f64,
    color_scheme: ColorScheme,
    body: ChartBody,
}

impl ChartSpec {
    pub(crate) fn new(
        plot_type: PlotType,
        title: String,
        x_label: String,
        y_label: String,
        x_tick_rotation: f64,
        color_scheme: ColorScheme,
        body: ChartBody,
    ) -> Self {
        Self {
            plot_type,
            title,
            x_label,
            y_label,
            x_tick_rotation,
            color_scheme,
            body,
        }
    }

    pub fn plot_type(&self) -> PlotType {
        self.plot_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Rotation of categorical x tick labels in degrees (0 or 45).
    pub fn x_tick_rotation(&self) -> f64 {
        self.x_tick_rotation
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn body(&self) -> &ChartBody {
        &self.body
    }
}

/// Tick rotation for an x axis with `distinct` categories.
pub fn tick_rotation_for(distinct: usize) -> f64 {
    if distinct > ROTATE_LABELS_ABOVE {
        ROTATED_TICK_DEGREES
    } else {
        0.0
    }
}
