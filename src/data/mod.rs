//! Data module - CSV loading and the typed dataset model

mod dataset;
mod loader;

pub use dataset::{format_number, ColumnKind, ColumnValues, DataColumn, Dataset};
pub use loader::{is_numeric_dtype, DataLoader, LoadError};
