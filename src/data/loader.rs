//! CSV Data Loader Module
//! Reads CSV input with Polars and tags every column numeric or categorical.

use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use super::dataset::{DataColumn, Dataset};

/// Rows sampled by Polars when inferring column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Dataset has no columns")]
    NoColumns,
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Loads CSV files into a [`Dataset`].
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file from disk. The first row is the header.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
        let file_path = file_path.as_ref();
        debug!(path = %file_path.display(), "reading csv");

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        let dataset = Self::from_dataframe(&df)?;
        info!(
            path = %file_path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Load CSV content already held in memory, e.g. an uploaded file.
    pub fn load_csv_bytes(bytes: &[u8]) -> Result<Dataset, LoadError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;

        let dataset = Self::from_dataframe(&df)?;
        info!(
            bytes = bytes.len(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Convert a Polars DataFrame, fixing each column's kind once.
    pub fn from_dataframe(df: &DataFrame) -> Result<Dataset, LoadError> {
        let mut columns = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let name = col.name().to_string();
            if is_numeric_dtype(col.dtype()) {
                let as_f64 = col.cast(&DataType::Float64)?;
                let values: Vec<Option<f64>> = as_f64
                    .as_materialized_series()
                    .f64()?
                    .into_iter()
                    .collect();
                columns.push(DataColumn::numeric(name, values));
            } else {
                let as_str = col.cast(&DataType::String)?;
                let values: Vec<Option<String>> = as_str
                    .as_materialized_series()
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect();
                columns.push(DataColumn::categorical(name, values));
            }
        }

        Dataset::new(columns)
    }
}

/// Polars dtypes treated as numeric value columns.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ColumnKind;

    #[test]
    fn infers_schema_from_csv_bytes() {
        let csv = b"date,sales,region\n2024-01-01,10,north\n2024-01-02,20,south\n2024-01-03,15.5,north\n";
        let ds = DataLoader::load_csv_bytes(csv).expect("csv loads");

        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column_names(), vec!["date", "sales", "region"]);
        let kinds: Vec<_> = ds.columns().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Categorical, ColumnKind::Numeric, ColumnKind::Categorical]
        );
        assert_eq!(ds.column("sales").unwrap().present_numbers(), vec![10.0, 20.0, 15.5]);
    }

    #[test]
    fn empty_cells_become_missing() {
        let csv = b"a,b\n1,x\n,y\n3,\n";
        let ds = DataLoader::load_csv_bytes(csv).expect("csv loads");

        assert_eq!(ds.column("a").unwrap().as_numeric().unwrap(), &[Some(1.0), None, Some(3.0)]);
        assert_eq!(ds.column("b").unwrap().label_at(2), None);
    }

    #[test]
    fn dataframe_conversion_keeps_column_order() {
        let df = DataFrame::new(vec![
            Column::new("label".into(), ["a", "b"]),
            Column::new("count".into(), [1i64, 2]),
            Column::new("ratio".into(), [0.5f32, 1.5]),
        ])
        .unwrap();

        let ds = DataLoader::from_dataframe(&df).unwrap();
        assert_eq!(ds.column_names(), vec!["label", "count", "ratio"]);
        assert_eq!(ds.numeric_columns().len(), 2);
    }
}
