//! Validator Module
//! Checks a plot request against the dataset schema and resolves a ChartSpec.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::palette::{element_fraction, normalize, LINE_SAMPLE};
use super::request::{ColorScheme, PlotRequest, PlotType, MAX_BINS, MIN_BINS};
use super::spec::{
    tick_rotation_for, Bar, BarChart, BoxChart, BoxGroup, ChartBody, ChartSpec,
    CorrelationCell, CorrelationChart, HistogramBin, HistogramChart, LineChart, ScatterChart,
    ScatterPoint, TextTone, XAxis, ROTATED_TICK_DEGREES,
};
use crate::data::{DataColumn, Dataset};
use crate::stats::StatsCalculator;

/// Expected, user-facing reasons a chart cannot be drawn.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Y-axis column must be numeric for this plot type.")]
    NonNumericY { column: String },
    #[error("Both X and Y columns must be numeric for scatter plot.")]
    NonNumericScatter { x: String, y: String },
    #[error("Column must be numeric for histogram.")]
    NonNumericHistogram { column: String },
    #[error("Value column must be numeric for box plot.")]
    NonNumericBoxValue { column: String },
    #[error("No numeric columns found.")]
    NoNumericColumns,
    #[error("Column '{0}' not found in dataset.")]
    UnknownColumn(String),
    #[error("{plot_type} requires {expected} column selection(s), got {actual}.")]
    WrongSelectionCount {
        plot_type: PlotType,
        expected: usize,
        actual: usize,
    },
    #[error("Number of bins must be between {min} and {max}, got {0}.", min = MIN_BINS, max = MAX_BINS)]
    BinCountOutOfRange(usize),
    #[error("Column '{0}' has no values to plot.")]
    NoValues(String),
    #[error("Column '{0}' contains non-finite values.")]
    NonFiniteValues(String),
}

/// The part a selected column plays in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    X,
    Y,
    Value,
    Group,
}

/// One column slot a plot type needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRequirement {
    pub role: ColumnRole,
    /// Prompt shown next to the selector.
    pub prompt: &'static str,
    pub numeric: bool,
}

const fn slot(role: ColumnRole, prompt: &'static str, numeric: bool) -> ColumnRequirement {
    ColumnRequirement {
        role,
        prompt,
        numeric,
    }
}

const XY_ANY_X: [ColumnRequirement; 2] = [
    slot(ColumnRole::X, "Select X-axis column:", false),
    slot(ColumnRole::Y, "Select Y-axis column:", true),
];
const XY_NUMERIC: [ColumnRequirement; 2] = [
    slot(ColumnRole::X, "Select X-axis column:", true),
    slot(ColumnRole::Y, "Select Y-axis column:", true),
];
const HISTOGRAM: [ColumnRequirement; 1] = [slot(ColumnRole::Value, "Select column:", true)];
const BOX: [ColumnRequirement; 2] = [
    slot(ColumnRole::Group, "Select grouping column:", false),
    slot(ColumnRole::Value, "Select value column:", true),
];

/// Column slots for a plot type, in the order `PlotRequest::columns` uses.
pub fn requirements(plot_type: PlotType) -> &'static [ColumnRequirement] {
    match plot_type {
        PlotType::Line | PlotType::Bar => &XY_ANY_X,
        PlotType::Scatter => &XY_NUMERIC,
        PlotType::Histogram => &HISTOGRAM,
        PlotType::Box => &BOX,
        PlotType::CorrelationMatrix => &[],
    }
}

/// Columns allowed in `role` for `plot_type`, in dataset order.
pub fn eligible_columns(dataset: &Dataset, plot_type: PlotType, role: ColumnRole) -> Vec<String> {
    let Some(requirement) = requirements(plot_type).iter().find(|r| r.role == role) else {
        return Vec::new();
    };
    dataset
        .columns()
        .iter()
        .filter(|c| !requirement.numeric || c.is_numeric())
        .map(|c| c.name().to_string())
        .collect()
}

/// Validate `request` against `dataset` and resolve everything the renderer needs.
pub fn validate(dataset: &Dataset, request: &PlotRequest) -> Result<ChartSpec, ValidationError> {
    let expected = requirements(request.plot_type).len();
    if request.columns.len() != expected {
        return Err(ValidationError::WrongSelectionCount {
            plot_type: request.plot_type,
            expected,
            actual: request.columns.len(),
        });
    }

    let columns = request
        .columns
        .iter()
        .map(|name| {
            dataset
                .column(name)
                .ok_or_else(|| ValidationError::UnknownColumn(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let scheme = request.color_scheme;
    let spec = match request.plot_type {
        PlotType::Line => line_spec(columns[0], columns[1], scheme)?,
        PlotType::Bar => bar_spec(columns[0], columns[1], scheme)?,
        PlotType::Scatter => scatter_spec(dataset, columns[0], columns[1], scheme)?,
        PlotType::Histogram => histogram_spec(columns[0], request.bins(), scheme)?,
        PlotType::Box => box_spec(columns[0], columns[1], scheme)?,
        PlotType::CorrelationMatrix => correlation_spec(dataset, scheme)?,
    };

    debug!(plot_type = %spec.plot_type(), title = spec.title(), "chart spec resolved");
    Ok(spec)
}

fn ensure_finite(column: &DataColumn) -> Result<(), ValidationError> {
    if column.has_non_finite() {
        return Err(ValidationError::NonFiniteValues(column.name().to_string()));
    }
    Ok(())
}

/// Rows where both cells are present, as (x label, x number, y).
fn complete_rows<'a>(
    x: &'a DataColumn,
    ys: &'a [Option<f64>],
) -> impl Iterator<Item = (usize, String, Option<f64>, f64)> + 'a {
    let xs = x.as_numeric();
    ys.iter().enumerate().filter_map(move |(row, y)| {
        let y = (*y)?;
        let label = x.label_at(row)?;
        let x_num = xs.and_then(|cells| cells[row]);
        Some((row, label, x_num, y))
    })
}

/// Maps labels to first-seen slots.
#[derive(Default)]
struct CategoryIndex {
    labels: Vec<String>,
    slots: HashMap<String, usize>,
}

impl CategoryIndex {
    fn slot_of(&mut self, label: &str) -> usize {
        if let Some(&slot) = self.slots.get(label) {
            return slot;
        }
        let slot = self.labels.len();
        self.labels.push(label.to_string());
        self.slots.insert(label.to_string(), slot);
        slot
    }
}

fn line_spec(
    x: &DataColumn,
    y: &DataColumn,
    scheme: ColorScheme,
) -> Result<ChartSpec, ValidationError> {
    let ys = y.as_numeric().ok_or_else(|| ValidationError::NonNumericY {
        column: y.name().to_string(),
    })?;
    ensure_finite(x)?;
    ensure_finite(y)?;

    let mut categories = CategoryIndex::default();
    let mut points = Vec::new();
    for (_, label, x_num, y_val) in complete_rows(x, ys) {
        let x_pos = match x_num {
            Some(v) => v,
            None => categories.slot_of(&label) as f64,
        };
        points.push((x_pos, y_val));
    }
    if points.is_empty() {
        return Err(ValidationError::NoValues(y.name().to_string()));
    }

    let (x_axis, rotation) = if x.is_numeric() {
        (XAxis::Numeric, 0.0)
    } else {
        (XAxis::Categorical(categories.labels), tick_rotation_for(x.distinct_count()))
    };

    Ok(ChartSpec::new(
        PlotType::Line,
        format!("Line Plot of {} vs {}", y.name(), x.name()),
        x.name().to_string(),
        y.name().to_string(),
        rotation,
        scheme,
        ChartBody::Line(LineChart {
            x_axis,
            points,
            color: scheme.sample(LINE_SAMPLE),
        }),
    ))
}

fn bar_spec(
    x: &DataColumn,
    y: &DataColumn,
    scheme: ColorScheme,
) -> Result<ChartSpec, ValidationError> {
    let ys = y.as_numeric().ok_or_else(|| ValidationError::NonNumericY {
        column: y.name().to_string(),
    })?;
    ensure_finite(y)?;

    let rows: Vec<_> = complete_rows(x, ys).collect();
    if rows.is_empty() {
        return Err(ValidationError::NoValues(y.name().to_string()));
    }

    // Duplicate x values share a slot; later rows draw over earlier ones.
    let mut categories = CategoryIndex::default();
    let total = rows.len();
    let bars = rows
        .into_iter()
        .enumerate()
        .map(|(i, (_, label, _, value))| {
            let color_fraction = element_fraction(i, total);
            Bar {
                slot: categories.slot_of(&label),
                label,
                value,
                color_fraction,
                color: scheme.sample(color_fraction),
            }
        })
        .collect();

    Ok(ChartSpec::new(
        PlotType::Bar,
        format!("Bar Plot of {} vs {}", y.name(), x.name()),
        x.name().to_string(),
        y.name().to_string(),
        tick_rotation_for(x.distinct_count()),
        scheme,
        ChartBody::Bar(BarChart {
            categories: categories.labels,
            bars,
        }),
    ))
}

fn scatter_spec(
    dataset: &Dataset,
    x: &DataColumn,
    y: &DataColumn,
    scheme: ColorScheme,
) -> Result<ChartSpec, ValidationError> {
    let (Some(xs), Some(ys)) = (x.as_numeric(), y.as_numeric()) else {
        return Err(ValidationError::NonNumericScatter {
            x: x.name().to_string(),
            y: y.name().to_string(),
        });
    };
    ensure_finite(x)?;
    ensure_finite(y)?;

    // Colors follow the row index over the whole dataset.
    let last_index = dataset.row_count().saturating_sub(1) as f64;
    let points: Vec<ScatterPoint> = xs
        .iter()
        .zip(ys)
        .enumerate()
        .filter_map(|(index, (x, y))| {
            Some(ScatterPoint {
                x: (*x)?,
                y: (*y)?,
                index,
                color: scheme.sample(normalize(index as f64, 0.0, last_index)),
            })
        })
        .collect();
    if points.is_empty() {
        return Err(ValidationError::NoValues(y.name().to_string()));
    }

    Ok(ChartSpec::new(
        PlotType::Scatter,
        format!("Scatter Plot of {} vs {}", y.name(), x.name()),
        x.name().to_string(),
        y.name().to_string(),
        0.0,
        scheme,
        ChartBody::Scatter(ScatterChart {
            points,
            index_range: (0.0, last_index),
        }),
    ))
}

fn histogram_spec(
    column: &DataColumn,
    bins: usize,
    scheme: ColorScheme,
) -> Result<ChartSpec, ValidationError> {
    if !column.is_numeric() {
        return Err(ValidationError::NonNumericHistogram {
            column: column.name().to_string(),
        });
    }
    if !(MIN_BINS..=MAX_BINS).contains(&bins) {
        return Err(ValidationError::BinCountOutOfRange(bins));
    }
    ensure_finite(column)?;

    let values = column.present_numbers();
    let histogram = StatsCalculator::histogram(&values, bins)
        .ok_or_else(|| ValidationError::NoValues(column.name().to_string()))?;

    let bins = histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let color_fraction = element_fraction(i, bins);
            HistogramBin {
                lower: histogram.edges[i],
                upper: histogram.edges[i + 1],
                count,
                color_fraction,
                color: scheme.sample(color_fraction),
            }
        })
        .collect();

    Ok(ChartSpec::new(
        PlotType::Histogram,
        format!("Histogram of {}", column.name()),
        column.name().to_string(),
        "Frequency".to_string(),
        0.0,
        scheme,
        ChartBody::Histogram(HistogramChart { bins }),
    ))
}

fn box_spec(
    group: &DataColumn,
    value: &DataColumn,
    scheme: ColorScheme,
) -> Result<ChartSpec, ValidationError> {
    let values = value.as_numeric().ok_or_else(|| ValidationError::NonNumericBoxValue {
        column: value.name().to_string(),
    })?;
    ensure_finite(value)?;

    let mut categories = CategoryIndex::default();
    let mut grouped: Vec<Vec<f64>> = Vec::new();
    for (row, cell) in values.iter().enumerate() {
        let Some(label) = group.label_at(row) else {
            continue;
        };
        let slot = categories.slot_of(&label);
        if slot == grouped.len() {
            grouped.push(Vec::new());
        }
        if let Some(v) = cell {
            grouped[slot].push(*v);
        }
    }
    if grouped.iter().all(Vec::is_empty) {
        return Err(ValidationError::NoValues(value.name().to_string()));
    }

    let total = grouped.len();
    let groups = categories
        .labels
        .into_iter()
        .zip(grouped)
        .enumerate()
        .map(|(i, (label, vals))| BoxGroup {
            label,
            stats: StatsCalculator::box_stats(&vals),
            color: scheme.sample(element_fraction(i, total)),
        })
        .collect::<Vec<_>>();

    Ok(ChartSpec::new(
        PlotType::Box,
        format!("Box Plot of {} grouped by {}", value.name(), group.name()),
        group.name().to_string(),
        value.name().to_string(),
        tick_rotation_for(groups.len()),
        scheme,
        ChartBody::Box(BoxChart { groups }),
    ))
}

fn correlation_spec(dataset: &Dataset, scheme: ColorScheme) -> Result<ChartSpec, ValidationError> {
    let numeric: Vec<(&str, &[Option<f64>])> = dataset
        .numeric_columns()
        .into_iter()
        .filter_map(|c| Some((c.name(), c.as_numeric()?)))
        .collect();
    if numeric.is_empty() {
        return Err(ValidationError::NoNumericColumns);
    }

    let matrix = StatsCalculator::correlation_matrix(&numeric);
    let (lo, hi) = matrix.finite_range().unwrap_or((-1.0, 1.0));

    let n = matrix.size();
    let mut cells = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let value = matrix.get(row, col);
            let defined = value.is_finite();
            cells.push(CorrelationCell {
                row,
                col,
                value,
                color: defined.then(|| scheme.sample(normalize(value, lo, hi))),
                text: if defined {
                    format!("{:.2}", value)
                } else {
                    "nan".to_string()
                },
                tone: TextTone::for_value(value),
            });
        }
    }

    Ok(ChartSpec::new(
        PlotType::CorrelationMatrix,
        "Correlation Matrix".to_string(),
        String::new(),
        String::new(),
        ROTATED_TICK_DEGREES,
        scheme,
        ChartBody::Correlation(CorrelationChart {
            matrix,
            cells,
            value_range: (lo, hi),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataColumn, DataLoader};

    fn text(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn nums(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    fn sales() -> Dataset {
        Dataset::new(vec![
            DataColumn::categorical("date", text(&["2024-01", "2024-02", "2024-03"])),
            DataColumn::numeric("sales", nums(&[10.0, 20.0, 15.0])),
            DataColumn::categorical("region", text(&["n", "s", "n"])),
        ])
        .unwrap()
    }

    #[test]
    fn selector_lists_numeric_columns_for_value_roles() {
        let ds = sales();
        assert_eq!(eligible_columns(&ds, PlotType::Line, ColumnRole::X).len(), 3);
        assert_eq!(eligible_columns(&ds, PlotType::Line, ColumnRole::Y), vec!["sales"]);
        assert_eq!(eligible_columns(&ds, PlotType::Scatter, ColumnRole::X), vec!["sales"]);
        assert!(eligible_columns(&ds, PlotType::CorrelationMatrix, ColumnRole::X).is_empty());
        assert_eq!(requirements(PlotType::Box)[0].prompt, "Select grouping column:");
    }

    #[test]
    fn line_and_bar_reject_non_numeric_y() {
        let ds = sales();
        for request in [PlotRequest::line("date", "region"), PlotRequest::bar("date", "region")] {
            let err = validate(&ds, &request).unwrap_err();
            assert_eq!(err.to_string(), "Y-axis column must be numeric for this plot type.");
        }
    }

    #[test]
    fn scatter_requires_both_axes_numeric() {
        let err = validate(&sales(), &PlotRequest::scatter("date", "sales")).unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericScatter { .. }));
    }

    #[test]
    fn unknown_columns_and_arity_are_reported() {
        let ds = sales();
        assert_eq!(
            validate(&ds, &PlotRequest::line("date", "profit")),
            Err(ValidationError::UnknownColumn("profit".into()))
        );
        let request = PlotRequest::new(PlotType::Box, vec!["region".into()]);
        assert_eq!(
            validate(&ds, &request).unwrap_err().to_string(),
            "Box Plot requires 2 column selection(s), got 1."
        );
    }

    #[test]
    fn histogram_bins_are_bounded() {
        let ds = sales();
        for bins in [4, 51] {
            assert_eq!(
                validate(&ds, &PlotRequest::histogram("sales", bins)),
                Err(ValidationError::BinCountOutOfRange(bins))
            );
        }
        let err = validate(&ds, &PlotRequest::histogram("region", 10)).unwrap_err();
        assert_eq!(err.to_string(), "Column must be numeric for histogram.");
    }

    #[test]
    fn infinite_cells_are_rejected() {
        let ds = DataLoader::load_csv_bytes(b"price\n1\n2\ninf\n").unwrap();
        assert_eq!(
            validate(&ds, &PlotRequest::histogram("price", 5)),
            Err(ValidationError::NonFiniteValues("price".into()))
        );

        let ds = Dataset::new(vec![
            DataColumn::categorical("team", text(&["a", "b", "a"])),
            DataColumn::numeric("x", nums(&[1.0, 2.0, 3.0])),
            DataColumn::numeric("y", nums(&[1.0, f64::NEG_INFINITY, 3.0])),
        ])
        .unwrap();
        for request in [
            PlotRequest::line("x", "y"),
            PlotRequest::bar("team", "y"),
            PlotRequest::scatter("x", "y"),
            PlotRequest::box_plot("team", "y"),
        ] {
            let err = validate(&ds, &request).unwrap_err();
            assert_eq!(err.to_string(), "Column 'y' contains non-finite values.");
        }
    }

    #[test]
    fn bar_colors_are_evenly_spaced() {
        let spec = validate(&sales(), &PlotRequest::bar("date", "sales")).unwrap();
        let ChartBody::Bar(chart) = spec.body() else {
            panic!("expected bar chart");
        };
        let fractions: Vec<f64> = chart.bars.iter().map(|b| b.color_fraction).collect();
        assert_eq!(fractions, vec![0.0, 1.0 / 3.0, 2.0 / 3.0]);
        assert_eq!(chart.bars[0].color, ColorScheme::Viridis.sample(0.0));
        assert_eq!(spec.title(), "Bar Plot of sales vs date");
        assert_eq!(spec.x_tick_rotation(), 0.0);
    }

    #[test]
    fn duplicate_bar_labels_share_first_seen_slot() {
        let ds = Dataset::new(vec![
            DataColumn::categorical("k", text(&["b", "a", "b"])),
            DataColumn::numeric("v", nums(&[1.0, 2.0, 3.0])),
        ])
        .unwrap();
        let spec = validate(&ds, &PlotRequest::bar("k", "v")).unwrap();
        let ChartBody::Bar(chart) = spec.body() else {
            panic!("expected bar chart");
        };
        assert_eq!(chart.categories, vec!["b", "a"]);
        let slots: Vec<usize> = chart.bars.iter().map(|b| b.slot).collect();
        assert_eq!(slots, vec![0, 1, 0]);
    }

    #[test]
    fn crowded_categorical_axis_rotates_labels() {
        let labels: Vec<String> = (0..12).map(|i| format!("c{}", i)).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let ds = Dataset::new(vec![
            DataColumn::categorical("cat", text(&refs)),
            DataColumn::numeric("v", nums(&[1.0; 12])),
        ])
        .unwrap();
        let spec = validate(&ds, &PlotRequest::line("cat", "v")).unwrap();
        assert_eq!(spec.x_tick_rotation(), 45.0);
    }

    #[test]
    fn scatter_colors_follow_row_index() {
        let ds = Dataset::new(vec![
            DataColumn::numeric("x", vec![Some(1.0), None, Some(3.0)]),
            DataColumn::numeric("y", nums(&[4.0, 5.0, 6.0])),
        ])
        .unwrap();
        let spec = validate(&ds, &PlotRequest::scatter("x", "y")).unwrap();
        let ChartBody::Scatter(chart) = spec.body() else {
            panic!("expected scatter chart");
        };
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[1].index, 2);
        assert_eq!(chart.points[1].color, ColorScheme::Viridis.sample(1.0));
        assert_eq!(chart.index_range, (0.0, 2.0));
    }

    #[test]
    fn box_groups_follow_first_seen_order() {
        let ds = Dataset::new(vec![
            DataColumn::categorical(
                "team",
                vec![Some("red".into()), Some("blue".into()), None, Some("red".into())],
            ),
            DataColumn::numeric("score", nums(&[1.0, 2.0, 3.0, 5.0])),
        ])
        .unwrap();
        let spec = validate(&ds, &PlotRequest::box_plot("team", "score")).unwrap();
        let ChartBody::Box(chart) = spec.body() else {
            panic!("expected box chart");
        };
        let labels: Vec<&str> = chart.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["red", "blue"]);
        assert_eq!(chart.groups[0].stats.as_ref().unwrap().count, 2);
        assert_eq!(chart.groups[1].color, ColorScheme::Viridis.sample(0.5));
        assert_eq!(spec.title(), "Box Plot of score grouped by team");
    }

    #[test]
    fn correlation_without_numeric_columns_is_rejected() {
        let ds = Dataset::new(vec![DataColumn::categorical("name", text(&["a", "b"]))]).unwrap();
        let err = validate(&ds, &PlotRequest::correlation()).unwrap_err();
        assert_eq!(err, ValidationError::NoNumericColumns);
        assert_eq!(err.to_string(), "No numeric columns found.");
    }

    #[test]
    fn correlation_cells_carry_text_and_tone() {
        let ds = Dataset::new(vec![
            DataColumn::numeric("a", nums(&[1.0, 2.0, 3.0])),
            DataColumn::numeric("b", nums(&[1.0, 3.0, 2.0])),
            DataColumn::categorical("label", text(&["x", "y", "z"])),
        ])
        .unwrap();
        let spec = validate(&ds, &PlotRequest::correlation()).unwrap();
        let ChartBody::Correlation(chart) = spec.body() else {
            panic!("expected correlation chart");
        };
        assert_eq!(chart.matrix.columns, vec!["a", "b"]);
        assert_eq!(chart.cells.len(), 4);
        assert_eq!(chart.cells[0].text, "1.00");
        assert_eq!(chart.cells[0].tone, TextTone::Light);
        assert_eq!(chart.cells[1].text, "0.50");
        assert_eq!(chart.cells[1].tone, TextTone::Dark);
        assert_eq!(spec.x_tick_rotation(), 45.0);
    }
}
