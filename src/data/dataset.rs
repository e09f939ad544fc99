//! Dataset Module
//! In-memory table with an explicit column schema fixed at load time.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::loader::LoadError;

/// Type tag attached to every column when the dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell storage for one column. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct DataColumn {
    name: String,
    values: ColumnValues,
}

impl DataColumn {
    /// Build a numeric column. NaN cells are stored as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Categorical(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        match self.values {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric cells, or `None` for a categorical column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Categorical(_) => None,
        }
    }

    /// Non-missing numeric values in row order.
    pub fn present_numbers(&self) -> Vec<f64> {
        self.as_numeric()
            .map(|cells| cells.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// True when a present numeric cell is infinite.
    pub fn has_non_finite(&self) -> bool {
        self.as_numeric()
            .is_some_and(|cells| cells.iter().flatten().any(|v| !v.is_finite()))
    }

    /// Display text of a cell, `None` when the cell is missing or out of range.
    pub fn label_at(&self, row: usize) -> Option<String> {
        match &self.values {
            ColumnValues::Numeric(v) => v.get(row).copied().flatten().map(format_number),
            ColumnValues::Categorical(v) => v.get(row).cloned().flatten(),
        }
    }

    /// Distinct non-missing labels in first-seen order.
    pub fn distinct_labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        (0..self.len())
            .filter_map(|row| self.label_at(row))
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }

    pub fn distinct_count(&self) -> usize {
        self.distinct_labels().len()
    }
}

/// Format a number the way it appears as a category label.
pub fn format_number(value: f64) -> String {
    value.to_string()
}

/// Ordered collection of uniquely named columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<DataColumn>,
    row_count: usize,
}

impl Dataset {
    pub fn new(columns: Vec<DataColumn>) -> Result<Self, LoadError> {
        let Some(first) = columns.first() else {
            return Err(LoadError::NoColumns);
        };
        let row_count = first.len();

        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(LoadError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != row_count {
                return Err(LoadError::RaggedColumn {
                    name: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<&DataColumn> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Display text for the preview grid; missing cells render empty.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.columns
            .get(column)
            .and_then(|c| c.label_at(row))
            .unwrap_or_default()
    }
}
